//! Memory-match state for one frame.
//!
//! The shared part of the game is its [`MemoryConfig`]: settings plus the
//! dealt `card_layout`. Any settings change empties the layout; a deal fills
//! it with each image index exactly twice, in shuffled order. Flips are
//! applied in relay order on every participant, so faces, matches and
//! attempts follow from the layout and the click stream.
//!
//! A mismatched pair locks the board until [`MemoryGame::flip_back`] is
//! called with the turn token returned by the second flip. Tokens from an
//! earlier turn or an earlier deal are ignored. Flip-back timers fire at
//! slightly different moments on each participant, so a relayed flip that
//! lands on a still-locked board resolves the pending flip-back first.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use rand::Rng;
use rand::seq::SliceRandom;
use wire::MemoryConfig;
use wire::api::{ImageSource, SavedMemoryGame};

use crate::presets;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    #[error("pair count must be at least 1, got {0}")]
    InvalidPairCount(usize),
    #[error("{needed} pairs need {needed} images, only {available} available")]
    InsufficientImages { needed: usize, available: usize },
    #[error("card layout is not two of each index below {pair_count}")]
    InvalidLayout { pair_count: usize },
    #[error("card {0} does not exist")]
    UnknownCard(usize),
    #[error("unknown image preset: {0}")]
    UnknownPreset(String),
    #[error("memory game has not been configured")]
    Unconfigured,
}

/// Visible state of one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Down,
    Up,
    Matched,
}

/// Where card faces come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSet {
    Preset(String),
    Custom(Vec<String>),
}

/// Settings chosen in the settings panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySettings {
    pub name: String,
    pub pair_count: usize,
    pub images: ImageSet,
}

/// Effect of one flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Face-up card, finished game, or an undealt board.
    Ignored,
    /// First card of a turn is now face up.
    First(usize),
    /// The pair matched. `completed` is true when it was the last pair.
    Matched { completed: bool },
    /// The pair did not match; call `flip_back(turn)` after the delay.
    Mismatched { turn: u64 },
}

#[derive(Debug, Clone, Default)]
pub struct MemoryGame {
    config: Option<MemoryConfig>,
    preset: Option<String>,
    faces: Vec<CardFace>,
    first: Option<usize>,
    second: Option<usize>,
    matches_found: usize,
    locked: bool,
    turn: u64,
}

impl MemoryGame {
    /// A game whose configuration has not arrived yet.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// A configured, undealt game.
    ///
    /// # Errors
    ///
    /// See [`MemoryGame::configure`].
    pub fn with_settings(settings: MemorySettings, base_path: &str) -> Result<Self, MemoryError> {
        let mut game = Self::default();
        game.configure(settings, base_path)?;
        Ok(game)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    #[must_use]
    pub fn config(&self) -> Option<&MemoryConfig> {
        self.config.as_ref()
    }

    #[must_use]
    pub fn layout(&self) -> &[usize] {
        self.config.as_ref().map_or(&[], |c| c.card_layout.as_slice())
    }

    #[must_use]
    pub fn is_dealt(&self) -> bool {
        !self.layout().is_empty()
    }

    #[must_use]
    pub fn faces(&self) -> &[CardFace] {
        &self.faces
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.config.as_ref().map_or(0, |c| c.attempts)
    }

    #[must_use]
    pub fn matches_found(&self) -> usize {
        self.matches_found
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Name of the preset the image set came from, if any.
    #[must_use]
    pub fn preset_name(&self) -> Option<&str> {
        self.preset.as_deref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.config
            .as_ref()
            .is_some_and(|c| !c.card_layout.is_empty() && self.matches_found == c.pair_count)
    }

    /// Replace the settings. The layout is emptied until the next deal.
    ///
    /// # Errors
    ///
    /// Rejects a zero pair count and unknown preset names; the game is left
    /// unchanged.
    pub fn configure(&mut self, settings: MemorySettings, base_path: &str) -> Result<MemoryConfig, MemoryError> {
        if settings.pair_count == 0 {
            return Err(MemoryError::InvalidPairCount(0));
        }
        let (images, is_custom_set, preset) = match settings.images {
            ImageSet::Preset(name) => {
                let Some(found) = presets::find(&name) else {
                    return Err(MemoryError::UnknownPreset(name));
                };
                (found.image_urls(base_path), false, Some(name))
            }
            ImageSet::Custom(urls) => (urls, true, None),
        };
        let config = MemoryConfig {
            name: settings.name,
            pair_count: settings.pair_count,
            selected_image_set: images,
            is_custom_set,
            card_layout: Vec::new(),
            attempts: 0,
            id: self.config.as_ref().and_then(|c| c.id.clone()),
        };
        self.config = Some(config.clone());
        self.preset = preset;
        self.reset_play();
        Ok(config)
    }

    /// Shuffle `2 × pair_count` cards into a fresh layout.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::InsufficientImages`] when the image set is
    /// smaller than the pair count; the previous state is kept.
    pub fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<MemoryConfig, MemoryError> {
        let Some(config) = self.config.as_mut() else {
            return Err(MemoryError::Unconfigured);
        };
        let available = config.selected_image_set.len();
        if available < config.pair_count {
            return Err(MemoryError::InsufficientImages { needed: config.pair_count, available });
        }
        let mut layout: Vec<usize> = (0..config.pair_count).flat_map(|i| [i, i]).collect();
        layout.shuffle(rng);
        config.card_layout = layout;
        config.attempts = 0;
        let dealt = config.clone();
        self.reset_play();
        Ok(dealt)
    }

    /// Replace the whole configuration with one received from a peer.
    ///
    /// When the incoming layout is the board already in play, faces and
    /// matches are kept and only the metadata is refreshed.
    ///
    /// # Errors
    ///
    /// Rejects a zero pair count, a layout that is not exactly two of each
    /// index below the pair count, or a dealt layout with fewer images than
    /// pairs. The game is left unchanged.
    pub fn apply_config(&mut self, config: &MemoryConfig) -> Result<(), MemoryError> {
        if config.pair_count == 0 {
            return Err(MemoryError::InvalidPairCount(0));
        }
        check_layout(&config.card_layout, config.pair_count, config.selected_image_set.len())?;
        let same_board = self.config.as_ref().is_some_and(|c| {
            !c.card_layout.is_empty()
                && c.card_layout == config.card_layout
                && c.selected_image_set == config.selected_image_set
        });
        self.preset = if config.is_custom_set { None } else { preset_for(&config.selected_image_set) };
        self.config = Some(config.clone());
        if !same_board {
            self.reset_play();
        }
        Ok(())
    }

    /// Record the saved-game id assigned by the save API.
    pub fn set_saved_id(&mut self, id: String) {
        if let Some(config) = self.config.as_mut() {
            config.id = Some(id);
        }
    }

    /// Flip card `card` face up and resolve the turn if it is the second.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::UnknownCard`] for an index outside a dealt layout.
    pub fn flip(&mut self, card: usize) -> Result<FlipOutcome, MemoryError> {
        if !self.is_dealt() {
            return Ok(FlipOutcome::Ignored);
        }
        if card >= self.faces.len() {
            return Err(MemoryError::UnknownCard(card));
        }
        if self.locked {
            self.flip_back(self.turn);
        }
        if self.faces[card] != CardFace::Down || self.is_complete() {
            return Ok(FlipOutcome::Ignored);
        }
        self.faces[card] = CardFace::Up;

        let Some(first) = self.first else {
            self.first = Some(card);
            return Ok(FlipOutcome::First(card));
        };
        self.second = Some(card);
        self.locked = true;
        if let Some(config) = self.config.as_mut() {
            config.attempts = config.attempts.saturating_add(1);
        }

        let layout = self.layout();
        if layout.get(first) == layout.get(card) {
            self.faces[first] = CardFace::Matched;
            self.faces[card] = CardFace::Matched;
            self.matches_found += 1;
            self.end_turn();
            return Ok(FlipOutcome::Matched { completed: self.is_complete() });
        }
        Ok(FlipOutcome::Mismatched { turn: self.turn })
    }

    /// Turn a mismatched pair face down and unlock the board.
    ///
    /// Returns false for a stale `turn`.
    pub fn flip_back(&mut self, turn: u64) -> bool {
        if !self.locked || turn != self.turn {
            return false;
        }
        for card in [self.first, self.second].into_iter().flatten() {
            if let Some(face) = self.faces.get_mut(card) {
                *face = CardFace::Down;
            }
        }
        self.end_turn();
        true
    }

    fn end_turn(&mut self) {
        self.first = None;
        self.second = None;
        self.locked = false;
        self.turn = self.turn.wrapping_add(1);
    }

    fn reset_play(&mut self) {
        self.faces = vec![CardFace::Down; self.layout().len()];
        self.matches_found = 0;
        self.end_turn();
    }
}

/// Rebuild a live configuration from a saved game, keeping its layout.
///
/// # Errors
///
/// Fails for unknown presets and a zero pair count. A saved layout must be a
/// valid pair layout backed by at least `pair_count` images.
pub fn config_from_saved(saved: &SavedMemoryGame, base_path: &str) -> Result<MemoryConfig, MemoryError> {
    let (images, is_custom_set) = match &saved.source {
        ImageSource::Preset { preset_name } => {
            let Some(found) = presets::find(preset_name) else {
                return Err(MemoryError::UnknownPreset(preset_name.clone()));
            };
            (found.image_urls(base_path), false)
        }
        ImageSource::Custom { custom_image_urls } => (custom_image_urls.clone(), true),
    };
    if saved.pair_count == 0 {
        return Err(MemoryError::InvalidPairCount(0));
    }
    check_layout(&saved.card_layout, saved.pair_count, images.len())?;
    Ok(MemoryConfig {
        name: saved.name.clone(),
        pair_count: saved.pair_count,
        selected_image_set: images,
        is_custom_set,
        card_layout: saved.card_layout.clone(),
        attempts: 0,
        id: Some(saved.id.clone()),
    })
}

/// Rows and columns for `cards` cards: the most square factorization, rows ≤ cols.
#[must_use]
pub fn grid_dimensions(cards: usize) -> (usize, usize) {
    if cards == 0 {
        return (0, 0);
    }
    let mut rows = cards.isqrt();
    while cards % rows != 0 {
        rows -= 1;
    }
    (rows, cards / rows)
}

/// A dealt layout must be a pair layout over images that all exist.
/// An empty layout is an undealt board and always passes.
fn check_layout(layout: &[usize], pair_count: usize, available: usize) -> Result<(), MemoryError> {
    if layout.is_empty() {
        return Ok(());
    }
    if !is_pair_layout(layout, pair_count) {
        return Err(MemoryError::InvalidLayout { pair_count });
    }
    if available < pair_count {
        return Err(MemoryError::InsufficientImages { needed: pair_count, available });
    }
    Ok(())
}

fn is_pair_layout(layout: &[usize], pair_count: usize) -> bool {
    // Length first so an oversized count never reaches the allocation.
    if !layout.len().is_multiple_of(2) || layout.len() / 2 != pair_count {
        return false;
    }
    let mut counts = vec![0u8; pair_count];
    for &i in layout {
        match counts.get_mut(i) {
            Some(n) if *n < 2 => *n += 1,
            _ => return false,
        }
    }
    true
}

fn preset_for(images: &[String]) -> Option<String> {
    presets::PRESETS
        .iter()
        .find(|p| {
            p.files.len() == images.len() && p.files.iter().zip(images).all(|(file, url)| url.ends_with(file))
        })
        .map(|p| p.name.to_owned())
}
