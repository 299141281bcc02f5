#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use wire::{FrameId, ImageId};

use crate::geom::{Point, Rect};
use crate::store::SurfaceStore;

/// Something on the surface a pointer can grab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Image(ImageId),
    Frame(FrameId),
}

/// Which part of the target was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    /// The square handle at the bottom-right corner.
    ResizeHandle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub target: Target,
    pub part: HitPart,
}

/// Find the topmost target under `p`.
///
/// Frames sit above the raster layer, so they are tested before images.
/// Within each layer the most recently placed entity wins.
#[must_use]
pub fn hit_test(store: &SurfaceStore, p: Point, handle: f64) -> Option<Hit> {
    let mut frames: Vec<_> = store.frames().filter(|f| f.rect.contains(p)).collect();
    frames.sort_by_key(|f| f.z);
    if let Some(frame) = frames.last() {
        return Some(Hit { target: Target::Frame(frame.id.clone()), part: part_at(&frame.rect, p, handle) });
    }
    store
        .images()
        .into_iter()
        .rev()
        .find(|i| i.rect.contains(p))
        .map(|image| Hit { target: Target::Image(image.id), part: part_at(&image.rect, p, handle) })
}

fn part_at(rect: &Rect, p: Point, handle: f64) -> HitPart {
    if rect.in_corner_handle(p, handle) { HitPart::ResizeHandle } else { HitPart::Body }
}
