//! Per-client identity allocation for images and game frames.
//!
//! Each namespace is a monotonically increasing counter. Ids observed in
//! inbound messages push the counter past them, so a client never hands out
//! an id it has already seen. Two clients allocating at the same instant can
//! still pick the same id; the later-processed creation then overwrites the
//! earlier one locally. Ids carry no client tag, so that collision class is
//! tolerated rather than removed.

#[cfg(test)]
#[path = "ids_test.rs"]
mod ids_test;

use wire::{FrameId, ImageId};

/// Which counter an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Image,
    Frame,
}

#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_image: u64,
    next_frame: u64,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn counter_mut(&mut self, ns: Namespace) -> &mut u64 {
        match ns {
            Namespace::Image => &mut self.next_image,
            Namespace::Frame => &mut self.next_frame,
        }
    }

    /// Allocate the next id in `ns`.
    pub fn next(&mut self, ns: Namespace) -> u64 {
        let counter = self.counter_mut(ns);
        let id = *counter;
        *counter = counter.saturating_add(1);
        id
    }

    /// Record an id seen on the wire: `counter = max(counter, id + 1)`.
    pub fn observe(&mut self, ns: Namespace, id: u64) {
        let counter = self.counter_mut(ns);
        *counter = (*counter).max(id.saturating_add(1));
    }

    /// The id the next call to [`IdAllocator::next`] would return.
    #[must_use]
    pub fn peek(&self, ns: Namespace) -> u64 {
        match ns {
            Namespace::Image => self.next_image,
            Namespace::Frame => self.next_frame,
        }
    }

    /// Reset both counters to zero (on `clear`).
    pub fn reset(&mut self) {
        self.next_image = 0;
        self.next_frame = 0;
    }

    pub fn next_image_id(&mut self) -> ImageId {
        self.next(Namespace::Image)
    }

    pub fn next_frame_id(&mut self) -> FrameId {
        FrameId::from_counter(self.next(Namespace::Frame))
    }

    pub fn observe_image(&mut self, id: ImageId) {
        self.observe(Namespace::Image, id);
    }

    /// Frame ids that do not follow the `game-<n>` shape leave the counter alone.
    pub fn observe_frame(&mut self, id: &FrameId) {
        if let Some(n) = id.counter() {
            self.observe(Namespace::Frame, n);
        }
    }
}
