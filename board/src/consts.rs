//! Shared numeric and string constants for the board crate.

// ── Placement ───────────────────────────────────────────────────

/// Where a freshly uploaded image is placed.
pub const DEFAULT_IMAGE_X: f64 = 50.0;
pub const DEFAULT_IMAGE_Y: f64 = 50.0;

/// Edge length of a freshly uploaded image.
pub const DEFAULT_IMAGE_SIZE: f64 = 200.0;

/// Where a freshly added game frame is placed.
pub const DEFAULT_FRAME_X: f64 = 100.0;
pub const DEFAULT_FRAME_Y: f64 = 100.0;

/// Size of a freshly added game frame. Also its minimum size.
pub const DEFAULT_FRAME_WIDTH: f64 = 400.0;
pub const DEFAULT_FRAME_HEIGHT: f64 = 300.0;

/// Images cannot be resized below this edge length.
pub const MIN_IMAGE_SIZE: f64 = 10.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Edge length of the square resize handle at an image's bottom-right corner.
pub const RESIZE_HANDLE_PX: f64 = 10.0;

// ── Drawing ─────────────────────────────────────────────────────

/// Background color painted by the eraser.
pub const ERASER_COLOR: &str = "#ffffff";

pub const DEFAULT_PEN_COLOR: &str = "#000000";
pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

// ── Games ───────────────────────────────────────────────────────

/// Delay before a mismatched memory pair is turned face down again.
pub const FLIP_BACK_DELAY_MS: u64 = 1_000;

/// Puzzle grid edge lengths accepted from settings or the wire.
pub const MIN_GRID_SIZE: usize = 2;
pub const MAX_GRID_SIZE: usize = 8;
pub const DEFAULT_GRID_SIZE: usize = 2;

pub const DEFAULT_PAIR_COUNT: usize = 4;
