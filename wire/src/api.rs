//! JSON schema of the save/load HTTP collaborator.
//!
//! The API persists game *configuration* only. Live play state never leaves
//! the clients. Every response carries a `status` of `success` or `error`
//! and an optional human-readable `message`.

use serde::{Deserialize, Serialize};

use crate::{MemoryConfig, PuzzleConfig};

/// Outcome reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
}

/// Response envelope for endpoints without a payload (save, update, delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: ApiStatus,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ApiStatus::Success
    }
}

/// Response of `GET /games/puzzles/load/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleList {
    pub status: ApiStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub puzzles: Vec<SavedPuzzle>,
}

/// Response of `GET /games/memory/load/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryList {
    pub status: ApiStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub games: Vec<SavedMemoryGame>,
}

/// A persisted puzzle configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPuzzle {
    /// Server id of the form `GENRE-CODE`.
    pub id: String,
    pub name: String,
    pub grid_size: usize,
    pub piece_positions: Vec<usize>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_preset: bool,
}

impl SavedPuzzle {
    /// The live configuration this record restores to.
    #[must_use]
    pub fn to_config(&self) -> PuzzleConfig {
        PuzzleConfig {
            grid_size: self.grid_size,
            piece_positions: self.piece_positions.clone(),
            selected_image: self.image_url.clone(),
            is_preset: self.is_preset,
            name: self.name.clone(),
            id: Some(self.id.clone()),
        }
    }

    /// Build a record from a live configuration.
    #[must_use]
    pub fn from_config(id: String, config: &PuzzleConfig) -> Self {
        Self {
            id,
            name: config.name.clone(),
            grid_size: config.grid_size,
            piece_positions: config.piece_positions.clone(),
            image_url: config.selected_image.clone(),
            is_preset: config.is_preset,
        }
    }
}

/// Where a saved memory game takes its card faces from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageSource {
    /// A named built-in preset.
    Preset { preset_name: String },
    /// User-uploaded image URLs.
    Custom { custom_image_urls: Vec<String> },
}

/// A persisted memory game configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedMemoryGame {
    pub id: String,
    pub name: String,
    pub pair_count: usize,
    #[serde(default)]
    pub card_layout: Vec<usize>,
    #[serde(flatten)]
    pub source: ImageSource,
}

impl SavedMemoryGame {
    /// Build a record from a live configuration. `preset` names the preset
    /// the image set came from when the set is not custom.
    #[must_use]
    pub fn from_config(id: String, config: &MemoryConfig, preset: Option<&str>) -> Self {
        let source = match (config.is_custom_set, preset) {
            (false, Some(name)) => ImageSource::Preset { preset_name: name.to_owned() },
            _ => ImageSource::Custom { custom_image_urls: config.selected_image_set.clone() },
        };
        Self {
            id,
            name: config.name.clone(),
            pair_count: config.pair_count,
            card_layout: config.card_layout.clone(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
