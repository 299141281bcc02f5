//! At most one focused game frame per room, and the settings panel that follows it.
//!
//! There is no central arbiter: every client applies focus and blur messages
//! in the order it processes them, and the last focus wins locally. Two
//! concurrent focuses can leave clients briefly disagreeing until the next
//! focus message.

#[cfg(test)]
#[path = "focus_test.rs"]
mod focus_test;

use wire::{FrameId, GameKind};

use crate::store::SurfaceStore;

/// What the settings panel should do after a focus change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsChange {
    /// Populate the panel for this frame.
    Show { frame: FrameId, kind: GameKind },
    /// Empty the panel.
    Clear,
    /// Leave the panel as it is.
    Unchanged,
}

#[derive(Debug, Default)]
pub struct FocusArbitrator {
    /// Frame whose settings the panel currently shows.
    showing: Option<FrameId>,
}

impl FocusArbitrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The frame the settings panel is showing.
    #[must_use]
    pub fn showing(&self) -> Option<&FrameId> {
        self.showing.as_ref()
    }

    /// The focused frame, if any.
    #[must_use]
    pub fn focused(store: &SurfaceStore) -> Option<&FrameId> {
        store.frames().find(|f| f.focused).map(|f| &f.id)
    }

    /// Focus `id` and unfocus every other frame.
    ///
    /// Returns `None` when the frame is unknown; nothing changes then.
    pub fn focus(&mut self, store: &mut SurfaceStore, id: &FrameId) -> Option<SettingsChange> {
        let kind = store.frame(id)?.kind();
        for frame in store.frames_mut() {
            frame.focused = frame.id == *id;
        }
        if self.showing.as_ref() == Some(id) {
            return Some(SettingsChange::Unchanged);
        }
        self.showing = Some(id.clone());
        Some(SettingsChange::Show { frame: id.clone(), kind })
    }

    /// Unfocus `id`. The panel is cleared once no frame is focused.
    ///
    /// Returns `None` when the frame is unknown.
    pub fn blur(&mut self, store: &mut SurfaceStore, id: &FrameId) -> Option<SettingsChange> {
        store.frame_mut(id)?.focused = false;
        Some(self.settle(store))
    }

    /// Account for a frame that has been removed from the store.
    pub fn forget(&mut self, store: &SurfaceStore, id: &FrameId) -> SettingsChange {
        if self.showing.as_ref() == Some(id) {
            self.showing = None;
            return match Self::focused(store) {
                Some(other) => self.show_focused(store, other.clone()),
                None => SettingsChange::Clear,
            };
        }
        SettingsChange::Unchanged
    }

    /// Drop all focus state after a board clear.
    pub fn reset(&mut self) -> SettingsChange {
        if self.showing.take().is_some() { SettingsChange::Clear } else { SettingsChange::Unchanged }
    }

    fn settle(&mut self, store: &SurfaceStore) -> SettingsChange {
        if Self::focused(store).is_some() || self.showing.is_none() {
            return SettingsChange::Unchanged;
        }
        self.showing = None;
        SettingsChange::Clear
    }

    fn show_focused(&mut self, store: &SurfaceStore, id: FrameId) -> SettingsChange {
        let Some(frame) = store.frame(&id) else {
            return SettingsChange::Clear;
        };
        let kind = frame.kind();
        self.showing = Some(id.clone());
        SettingsChange::Show { frame: id, kind }
    }
}
