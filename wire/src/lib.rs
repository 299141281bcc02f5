//! Shared message catalogue and JSON codec for the board relay channels.
//!
//! This crate owns the wire representation used by the relay server, the
//! board engine, and the CLI participant. Every message is a JSON object
//! whose `type` field selects the variant; the remaining fields are the
//! payload. Three channel families exist:
//!
//! - **surface**: one per room; strokes, images, and game frame geometry.
//! - **puzzle**: one per puzzle frame; configuration and piece clicks.
//! - **memory**: one per memory frame; configuration and card clicks.
//!
//! Decoding distinguishes a missing `type`, an unknown `type`, and a known
//! `type` with malformed fields so receivers can log and drop precisely.

pub mod api;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a placed image. Allocated per client from a counter.
pub type ImageId = u64;

/// Error returned by [`decode`] and [`encode`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text is not valid JSON.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON value has no string `type` field.
    #[error("message has no `type` field")]
    MissingType,
    /// The `type` is not part of this channel's catalogue.
    #[error("unknown message type: {0}")]
    UnknownType(String),
    /// The `type` is known but its fields do not match the schema.
    #[error("malformed `{kind}` message: {source}")]
    Malformed {
        /// The message type that failed to decode.
        kind: String,
        /// Underlying serde failure.
        source: serde_json::Error,
    },
    /// Serialization failed.
    #[error("failed to encode message: {0}")]
    Encode(serde_json::Error),
}

/// A message family bound to one channel kind.
pub trait WireMessage: Serialize + DeserializeOwned {
    /// Every `type` tag this family accepts.
    const TYPES: &'static [&'static str];

    /// The `type` tag of this message.
    fn kind(&self) -> &'static str;
}

/// Encode a message to its JSON text form.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode<M: WireMessage>(message: &M) -> Result<String, CodecError> {
    serde_json::to_string(message).map_err(CodecError::Encode)
}

/// Decode a JSON text message for the channel family `M`.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for invalid JSON, [`CodecError::MissingType`]
/// when `type` is absent, [`CodecError::UnknownType`] for types outside the
/// catalogue, and [`CodecError::Malformed`] for bad payload fields.
pub fn decode<M: WireMessage>(text: &str) -> Result<M, CodecError> {
    let value: Value = serde_json::from_str(text)?;
    let Some(kind) = value.get("type").and_then(Value::as_str) else {
        return Err(CodecError::MissingType);
    };
    if !M::TYPES.contains(&kind) {
        return Err(CodecError::UnknownType(kind.to_owned()));
    }
    let kind = kind.to_owned();
    serde_json::from_value(value).map_err(|source| CodecError::Malformed { kind, source })
}

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a game frame, always of the form `game-<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(String);

impl FrameId {
    /// Prefix shared by every frame id; keeps frame ids disjoint from image ids.
    pub const PREFIX: &'static str = "game-";

    /// Build the id for counter value `n`.
    #[must_use]
    pub fn from_counter(n: u64) -> Self {
        Self(format!("{}{n}", Self::PREFIX))
    }

    /// The numeric counter embedded in the id, if it has the expected shape.
    #[must_use]
    pub fn counter(&self) -> Option<u64> {
        self.0.strip_prefix(Self::PREFIX)?.parse().ok()
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FrameId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for FrameId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Which embedded game a frame hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    /// Sliding-tile puzzle.
    #[serde(rename = "puzzles", alias = "puzzle")]
    Puzzle,
    /// Memory-match card game.
    #[serde(rename = "memory", alias = "memory_game")]
    Memory,
}

impl GameKind {
    /// The `gameName` string used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Puzzle => "puzzles",
            Self::Memory => "memory",
        }
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "puzzle" | "puzzles" => Ok(Self::Puzzle),
            "memory" | "memory_game" => Ok(Self::Memory),
            other => Err(format!("unknown game kind: {other}")),
        }
    }
}

// =============================================================================
// CHANNELS
// =============================================================================

/// The relay channel family a connection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Room-wide surface channel.
    Surface,
    /// Per-instance puzzle channel.
    Puzzle,
    /// Per-instance memory channel.
    Memory,
}

impl ChannelKind {
    /// The game channel kind for frames hosting `game`.
    #[must_use]
    pub fn for_game(game: GameKind) -> Self {
        match game {
            GameKind::Puzzle => Self::Puzzle,
            GameKind::Memory => Self::Memory,
        }
    }

    /// Whether the relay delivers a message back to its sender.
    ///
    /// Game channels echo so that every participant, the clicker included,
    /// applies clicks through one inbound code path in one relay order.
    #[must_use]
    pub fn echoes_sender(self) -> bool {
        !matches!(self, Self::Surface)
    }

    /// Route segment used by the relay for this channel family.
    #[must_use]
    pub fn route_segment(self) -> &'static str {
        match self {
            Self::Surface => "whiteboard",
            Self::Puzzle => "puzzle_on_board",
            Self::Memory => "memory_on_board",
        }
    }
}

/// Relay path of the surface channel for `room`.
#[must_use]
pub fn surface_path(room: &str) -> String {
    format!("/ws/{}/{room}", ChannelKind::Surface.route_segment())
}

/// Relay path of the game channel for frame `frame` in `room`.
#[must_use]
pub fn game_path(game: GameKind, room: &str, frame: &FrameId) -> String {
    format!("/ws/{}/{room}/{frame}", ChannelKind::for_game(game).route_segment())
}

// =============================================================================
// SURFACE CHANNEL
// =============================================================================

/// Drawing tool used for a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Draws in the selected color.
    #[default]
    Pen,
    /// Draws in the background color.
    Eraser,
}

/// One freehand stroke segment. Replayed once, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    /// CSS color string.
    pub color: String,
    pub line_width: f64,
    #[serde(default)]
    pub tool: Tool,
}

/// Messages carried on the room-wide surface channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceMessage {
    /// One pen segment.
    Draw(Stroke),
    /// A newly placed image.
    Image {
        id: ImageId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(rename = "dataURL")]
        data_url: String,
    },
    DeleteImage {
        id: ImageId,
    },
    /// Final position after a drag.
    MoveImage {
        id: ImageId,
        x: f64,
        y: f64,
        #[serde(rename = "dataURL", default, skip_serializing_if = "Option::is_none")]
        data_url: Option<String>,
    },
    /// Final geometry after a resize.
    ResizeImage {
        id: ImageId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(rename = "dataURL", default, skip_serializing_if = "Option::is_none")]
        data_url: Option<String>,
    },
    /// Interim position while dragging.
    ImageDragUpdate {
        id: ImageId,
        x: f64,
        y: f64,
    },
    /// Interim geometry while resizing.
    ImageResizeUpdate {
        id: ImageId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Remove every stroke, image, and frame.
    Clear {},
    AddGameElement {
        id: FrameId,
        #[serde(rename = "gameName")]
        game_name: GameKind,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    DeleteGameElement {
        id: FrameId,
    },
    MoveGameElement {
        id: FrameId,
        x: f64,
        y: f64,
    },
    GameElementDragUpdate {
        id: FrameId,
        x: f64,
        y: f64,
    },
    ResizeGameElement {
        id: FrameId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    GameElementResizeUpdate {
        id: FrameId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    GameElementFocus {
        id: FrameId,
    },
    GameElementBlur {
        id: FrameId,
    },
}

impl WireMessage for SurfaceMessage {
    const TYPES: &'static [&'static str] = &[
        "draw",
        "image",
        "delete_image",
        "move_image",
        "resize_image",
        "image_drag_update",
        "image_resize_update",
        "clear",
        "add_game_element",
        "delete_game_element",
        "move_game_element",
        "game_element_drag_update",
        "resize_game_element",
        "game_element_resize_update",
        "game_element_focus",
        "game_element_blur",
    ];

    fn kind(&self) -> &'static str {
        match self {
            Self::Draw(_) => "draw",
            Self::Image { .. } => "image",
            Self::DeleteImage { .. } => "delete_image",
            Self::MoveImage { .. } => "move_image",
            Self::ResizeImage { .. } => "resize_image",
            Self::ImageDragUpdate { .. } => "image_drag_update",
            Self::ImageResizeUpdate { .. } => "image_resize_update",
            Self::Clear {} => "clear",
            Self::AddGameElement { .. } => "add_game_element",
            Self::DeleteGameElement { .. } => "delete_game_element",
            Self::MoveGameElement { .. } => "move_game_element",
            Self::GameElementDragUpdate { .. } => "game_element_drag_update",
            Self::ResizeGameElement { .. } => "resize_game_element",
            Self::GameElementResizeUpdate { .. } => "game_element_resize_update",
            Self::GameElementFocus { .. } => "game_element_focus",
            Self::GameElementBlur { .. } => "game_element_blur",
        }
    }
}

// =============================================================================
// PUZZLE CHANNEL
// =============================================================================

/// Full configuration of one puzzle instance, replaced wholesale on change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleConfig {
    pub grid_size: usize,
    /// `piece_positions[slot]` is the solved-order index of the piece shown at `slot`.
    pub piece_positions: Vec<usize>,
    #[serde(default)]
    pub selected_image: Option<String>,
    #[serde(default)]
    pub is_preset: bool,
    #[serde(default)]
    pub name: String,
    /// Saved-game id, once persisted.
    #[serde(default)]
    pub id: Option<String>,
}

/// Messages carried on a puzzle instance channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PuzzleMessage {
    PuzzleStateChange(PuzzleConfig),
    PuzzlePieceClick {
        #[serde(rename = "pieceIndex")]
        piece_index: usize,
    },
    /// Asks configured participants to re-broadcast their configuration.
    PuzzleStateRequest {},
}

impl WireMessage for PuzzleMessage {
    const TYPES: &'static [&'static str] = &["puzzle_state_change", "puzzle_piece_click", "puzzle_state_request"];

    fn kind(&self) -> &'static str {
        match self {
            Self::PuzzleStateChange(_) => "puzzle_state_change",
            Self::PuzzlePieceClick { .. } => "puzzle_piece_click",
            Self::PuzzleStateRequest {} => "puzzle_state_request",
        }
    }
}

// =============================================================================
// MEMORY CHANNEL
// =============================================================================

/// Full configuration of one memory instance, replaced wholesale on change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryConfig {
    #[serde(default)]
    pub name: String,
    pub pair_count: usize,
    #[serde(default)]
    pub selected_image_set: Vec<String>,
    #[serde(default)]
    pub is_custom_set: bool,
    /// Dealt layout of image indices; empty until dealt.
    #[serde(rename = "card_layout", default)]
    pub card_layout: Vec<usize>,
    #[serde(default)]
    pub attempts: u32,
    /// Saved-game id, once persisted.
    #[serde(default)]
    pub id: Option<String>,
}

/// Messages carried on a memory instance channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MemoryMessage {
    GameStateChange {
        #[serde(rename = "gameState")]
        game_state: MemoryConfig,
    },
    CardClick {
        #[serde(rename = "cardDomIndex")]
        card_dom_index: usize,
    },
    /// Asks configured participants to re-broadcast their configuration.
    GameStateRequest {},
}

impl WireMessage for MemoryMessage {
    const TYPES: &'static [&'static str] = &["game_state_change", "card_click", "game_state_request"];

    fn kind(&self) -> &'static str {
        match self {
            Self::GameStateChange { .. } => "game_state_change",
            Self::CardClick { .. } => "card_click",
            Self::GameStateRequest {} => "game_state_request",
        }
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
