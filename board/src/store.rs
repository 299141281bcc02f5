//! Client-local table of placed images and game frames.
//!
//! Strokes are not stored; they are replayed once onto the raster. Images
//! and frames are stored with absolute geometry, and every mutator *sets*
//! fields rather than applying deltas. Each field is last-writer-wins in
//! processing order: re-applying a message is a no-op, and an interim update
//! arriving after a final one is overwritten by the next final.
//!
//! Mutators return whether anything changed so callers can skip redraws.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::{BTreeMap, HashMap};

use wire::{FrameId, GameKind, ImageId};

use crate::geom::Rect;
use crate::ids::IdAllocator;
use crate::memory::MemoryGame;
use crate::puzzle::PuzzleGame;

/// A placed, decoded image.
#[derive(Debug, Clone)]
pub struct Image {
    pub id: ImageId,
    pub rect: Rect,
    /// Source the bitmap was decoded from; resent with final geometry.
    pub data_url: String,
    /// Stacking order; higher values are drawn above lower values.
    pub z: u64,
}

/// Embedded game state attached to a frame.
#[derive(Debug, Clone)]
pub enum GameState {
    Puzzle(PuzzleGame),
    Memory(MemoryGame),
}

impl GameState {
    /// A game of `kind` awaiting its configuration.
    #[must_use]
    pub fn unconfigured(kind: GameKind) -> Self {
        match kind {
            GameKind::Puzzle => Self::Puzzle(PuzzleGame::unconfigured()),
            GameKind::Memory => Self::Memory(MemoryGame::unconfigured()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> GameKind {
        match self {
            Self::Puzzle(_) => GameKind::Puzzle,
            Self::Memory(_) => GameKind::Memory,
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        match self {
            Self::Puzzle(game) => game.is_configured(),
            Self::Memory(game) => game.is_configured(),
        }
    }
}

/// A movable, resizable frame hosting one game instance.
#[derive(Debug, Clone)]
pub struct GameFrame {
    pub id: FrameId,
    pub rect: Rect,
    pub focused: bool,
    pub game: GameState,
    /// Whether this client created the frame and so owns its first broadcast.
    pub authored: bool,
    pub z: u64,
}

impl GameFrame {
    #[must_use]
    pub fn kind(&self) -> GameKind {
        self.game.kind()
    }
}

#[derive(Debug, Default)]
pub struct SurfaceStore {
    images: HashMap<ImageId, Image>,
    frames: BTreeMap<FrameId, GameFrame>,
    next_z: u64,
    ids: IdAllocator,
}

impl SurfaceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn ids_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    fn bump_z(&mut self) -> u64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    // --- Images ---

    /// Insert an image above everything else, replacing any image with the
    /// same id. The id is observed by the allocator.
    pub fn put_image(&mut self, id: ImageId, rect: Rect, data_url: String) {
        self.ids.observe_image(id);
        let z = self.bump_z();
        self.images.insert(id, Image { id, rect, data_url, z });
    }

    /// Set an image's position. Returns false if unknown or unchanged.
    pub fn move_image(&mut self, id: ImageId, x: f64, y: f64) -> bool {
        let Some(image) = self.images.get_mut(&id) else {
            return false;
        };
        set_origin(&mut image.rect, x, y)
    }

    /// Set an image's full geometry. Returns false if unknown or unchanged.
    pub fn resize_image(&mut self, id: ImageId, rect: Rect) -> bool {
        let Some(image) = self.images.get_mut(&id) else {
            return false;
        };
        set_rect(&mut image.rect, rect)
    }

    pub fn delete_image(&mut self, id: ImageId) -> Option<Image> {
        self.images.remove(&id)
    }

    #[must_use]
    pub fn image(&self, id: ImageId) -> Option<&Image> {
        self.images.get(&id)
    }

    /// Images bottom to top.
    #[must_use]
    pub fn images(&self) -> Vec<&Image> {
        let mut images: Vec<&Image> = self.images.values().collect();
        images.sort_by_key(|i| (i.z, i.id));
        images
    }

    // --- Frames ---

    /// Insert a frame above the other frames, replacing any frame with the
    /// same id. The id is observed by the allocator.
    pub fn put_game_frame(&mut self, id: FrameId, rect: Rect, game: GameState, authored: bool) {
        self.ids.observe_frame(&id);
        let z = self.bump_z();
        self.frames.insert(id.clone(), GameFrame { id, rect, focused: false, game, authored, z });
    }

    /// Set a frame's position. Returns false if unknown or unchanged.
    pub fn move_game_frame(&mut self, id: &FrameId, x: f64, y: f64) -> bool {
        let Some(frame) = self.frames.get_mut(id) else {
            return false;
        };
        set_origin(&mut frame.rect, x, y)
    }

    /// Set a frame's full geometry. Returns false if unknown or unchanged.
    pub fn resize_game_frame(&mut self, id: &FrameId, rect: Rect) -> bool {
        let Some(frame) = self.frames.get_mut(id) else {
            return false;
        };
        set_rect(&mut frame.rect, rect)
    }

    pub fn delete_game_frame(&mut self, id: &FrameId) -> Option<GameFrame> {
        self.frames.remove(id)
    }

    #[must_use]
    pub fn frame(&self, id: &FrameId) -> Option<&GameFrame> {
        self.frames.get(id)
    }

    pub fn frame_mut(&mut self, id: &FrameId) -> Option<&mut GameFrame> {
        self.frames.get_mut(id)
    }

    /// Frames in id order.
    pub fn frames(&self) -> impl Iterator<Item = &GameFrame> {
        self.frames.values()
    }

    pub fn frames_mut(&mut self) -> impl Iterator<Item = &mut GameFrame> {
        self.frames.values_mut()
    }

    // --- Bulk ---

    /// Remove every image and frame and reset both id counters.
    ///
    /// Returns the removed frames so the caller can release their game
    /// channels and timers.
    pub fn clear_all(&mut self) -> Vec<GameFrame> {
        self.images.clear();
        self.next_z = 0;
        self.ids.reset();
        std::mem::take(&mut self.frames).into_values().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.frames.is_empty()
    }
}

fn set_origin(rect: &mut Rect, x: f64, y: f64) -> bool {
    let next = Rect::new(x, y, rect.width, rect.height);
    set_rect(rect, next)
}

fn set_rect(rect: &mut Rect, next: Rect) -> bool {
    if *rect == next {
        return false;
    }
    *rect = next;
    true
}
