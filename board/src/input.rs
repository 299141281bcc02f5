//! Pointer gesture state machine and pen settings.
//!
//! One `InputMode` per pointer replaces independent drawing, dragging and
//! resizing flags. Each active variant carries what the next pointer event
//! needs to compute absolute geometry.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

pub use wire::Tool;

use crate::consts::{DEFAULT_LINE_WIDTH, DEFAULT_PEN_COLOR, ERASER_COLOR};
use crate::geom::{Point, Rect};
use crate::hit::Target;

/// The active gesture between pointer-down and pointer-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputMode {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pen is down; each move emits one segment from `last`.
    Drawing { last: Point },
    /// Moving an image or frame.
    Dragging {
        target: Target,
        /// Pointer position minus the target's origin at grab time.
        grab_offset: Point,
    },
    /// Resizing an image or frame from its bottom-right handle.
    Resizing {
        target: Target,
        /// Pointer position at grab time.
        start: Point,
        /// Geometry at grab time.
        orig: Rect,
    },
}

impl InputMode {
    /// The entity a drag or resize is holding, if any.
    #[must_use]
    pub fn target(&self) -> Option<&Target> {
        match self {
            Self::Dragging { target, .. } | Self::Resizing { target, .. } => Some(target),
            Self::Idle | Self::Drawing { .. } => None,
        }
    }
}

/// Current pen tool, color and width.
#[derive(Debug, Clone, PartialEq)]
pub struct PenStyle {
    pub tool: Tool,
    /// Color used by the pen tool.
    pub color: String,
    pub line_width: f64,
}

impl Default for PenStyle {
    fn default() -> Self {
        Self { tool: Tool::Pen, color: DEFAULT_PEN_COLOR.to_owned(), line_width: DEFAULT_LINE_WIDTH }
    }
}

impl PenStyle {
    /// The color a stroke is painted in: the pen color, or the background
    /// for the eraser.
    #[must_use]
    pub fn stroke_color(&self) -> &str {
        stroke_color(self.tool, &self.color)
    }
}

/// Color for a stroke drawn with `tool` in `color`.
#[must_use]
pub fn stroke_color(tool: Tool, color: &str) -> &str {
    match tool {
        Tool::Pen => color,
        Tool::Eraser => ERASER_COLOR,
    }
}
