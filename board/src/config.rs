//! Engine tunables with the defaults the board ships with.

use std::time::Duration;

use crate::consts::{
    DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, DEFAULT_FRAME_X, DEFAULT_FRAME_Y, DEFAULT_GRID_SIZE, DEFAULT_IMAGE_SIZE,
    DEFAULT_IMAGE_X, DEFAULT_IMAGE_Y, DEFAULT_PAIR_COUNT, FLIP_BACK_DELAY_MS, MIN_IMAGE_SIZE, RESIZE_HANDLE_PX,
};
use crate::geom::Rect;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Geometry of a freshly uploaded image.
    pub image_rect: Rect,
    /// Geometry of a freshly added frame.
    pub frame_rect: Rect,
    pub min_image_size: f64,
    pub min_frame_width: f64,
    pub min_frame_height: f64,
    pub resize_handle: f64,
    /// How long a mismatched memory pair stays face up.
    pub flip_back_delay: Duration,
    /// Base URL that preset memory image paths are resolved against.
    pub preset_base_path: String,
    pub default_preset: String,
    pub default_pair_count: usize,
    pub default_memory_name: String,
    pub default_puzzle_image: String,
    pub default_grid_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            image_rect: Rect::new(DEFAULT_IMAGE_X, DEFAULT_IMAGE_Y, DEFAULT_IMAGE_SIZE, DEFAULT_IMAGE_SIZE),
            frame_rect: Rect::new(DEFAULT_FRAME_X, DEFAULT_FRAME_Y, DEFAULT_FRAME_WIDTH, DEFAULT_FRAME_HEIGHT),
            min_image_size: MIN_IMAGE_SIZE,
            min_frame_width: DEFAULT_FRAME_WIDTH,
            min_frame_height: DEFAULT_FRAME_HEIGHT,
            resize_handle: RESIZE_HANDLE_PX,
            flip_back_delay: Duration::from_millis(FLIP_BACK_DELAY_MS),
            preset_base_path: "/static/images/memory".to_owned(),
            default_preset: "fruits".to_owned(),
            default_pair_count: DEFAULT_PAIR_COUNT,
            default_memory_name: "My memory game".to_owned(),
            default_puzzle_image: "/static/images/puzzle_test.png".to_owned(),
            default_grid_size: DEFAULT_GRID_SIZE,
        }
    }
}
