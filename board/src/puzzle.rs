//! Sliding-tile puzzle state for one frame.
//!
//! `piece_positions` is a permutation of `0..grid_size²`. A swap exchanges
//! two entries; the puzzle is solved when every entry equals its index.
//!
//! Two selections are tracked. The *local* selection is this user's outline
//! only. The *remote* selection is driven exclusively by click messages that
//! came back through the relay, and it is the only path that swaps while a
//! channel is connected. Every participant, the clicker included, feeds the
//! same ordered clicks through [`PuzzleGame::apply_remote_interaction`], so
//! their permutations stay equal.

#[cfg(test)]
#[path = "puzzle_test.rs"]
mod puzzle_test;

use rand::Rng;
use rand::seq::SliceRandom;
use wire::PuzzleConfig;

use crate::consts::{MAX_GRID_SIZE, MIN_GRID_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("grid size {0} is outside 2..=8")]
    InvalidGridSize(usize),
    #[error("piece positions are not a permutation of 0..{expected}")]
    InvalidPermutation { expected: usize },
    #[error("piece {0} does not exist")]
    UnknownPiece(usize),
    #[error("puzzle has not been configured")]
    Unconfigured,
}

/// Effect of one click on the puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The piece became the pending selection.
    Selected(usize),
    /// The pending selection was cleared without a swap.
    Deselected,
    /// Two pieces were exchanged. `solved` is true only when this swap
    /// completed the picture.
    Swapped { solved: bool },
}

/// Puzzle settings chosen by the author before shuffling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleSettings {
    pub grid_size: usize,
    pub image: Option<String>,
    pub is_preset: bool,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct PuzzleGame {
    config: Option<PuzzleConfig>,
    local_selection: Option<usize>,
    remote_selection: Option<usize>,
}

impl PuzzleGame {
    /// A puzzle whose configuration has not arrived yet.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// A freshly shuffled puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::InvalidGridSize`] for sizes outside the allowed range.
    pub fn shuffled<R: Rng + ?Sized>(settings: PuzzleSettings, rng: &mut R) -> Result<Self, PuzzleError> {
        let mut game = Self::default();
        game.reconfigure(settings, rng)?;
        Ok(game)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    #[must_use]
    pub fn config(&self) -> Option<&PuzzleConfig> {
        self.config.as_ref()
    }

    #[must_use]
    pub fn piece_positions(&self) -> &[usize] {
        self.config.as_ref().map_or(&[], |c| c.piece_positions.as_slice())
    }

    #[must_use]
    pub fn local_selection(&self) -> Option<usize> {
        self.local_selection
    }

    #[must_use]
    pub fn remote_selection(&self) -> Option<usize> {
        self.remote_selection
    }

    /// Solved when every position holds its own piece.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let positions = self.piece_positions();
        !positions.is_empty() && positions.iter().enumerate().all(|(i, &p)| i == p)
    }

    /// Apply new settings and deal a fresh random permutation.
    ///
    /// An already solved arrangement is never dealt. The returned
    /// configuration is what the author broadcasts.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::InvalidGridSize`] and leaves the puzzle unchanged
    /// when the grid size is out of range.
    pub fn reconfigure<R: Rng + ?Sized>(&mut self, settings: PuzzleSettings, rng: &mut R) -> Result<PuzzleConfig, PuzzleError> {
        check_grid_size(settings.grid_size)?;
        let count = settings.grid_size * settings.grid_size;
        let mut positions: Vec<usize> = (0..count).collect();
        while positions.iter().enumerate().all(|(i, &p)| i == p) {
            positions.shuffle(rng);
        }
        let config = PuzzleConfig {
            grid_size: settings.grid_size,
            piece_positions: positions,
            selected_image: settings.image,
            is_preset: settings.is_preset,
            name: settings.name,
            id: self.config.as_ref().and_then(|c| c.id.clone()),
        };
        self.config = Some(config.clone());
        self.local_selection = None;
        self.remote_selection = None;
        Ok(config)
    }

    /// Replace the whole configuration with one received from a peer.
    ///
    /// Reapplying the arrangement already in place keeps both selections, so
    /// a duplicate broadcast does not disturb a swap in progress.
    ///
    /// # Errors
    ///
    /// Rejects out-of-range grid sizes and arrays that are not a permutation
    /// of `0..grid_size²`; the puzzle is left unchanged.
    pub fn apply_config(&mut self, config: &PuzzleConfig) -> Result<(), PuzzleError> {
        check_grid_size(config.grid_size)?;
        let expected = config.grid_size * config.grid_size;
        if !is_permutation(&config.piece_positions, expected) {
            return Err(PuzzleError::InvalidPermutation { expected });
        }
        let same_board = self
            .config
            .as_ref()
            .is_some_and(|c| c.grid_size == config.grid_size && c.piece_positions == config.piece_positions);
        if !same_board {
            self.local_selection = None;
            self.remote_selection = None;
        }
        self.config = Some(config.clone());
        Ok(())
    }

    /// Record the saved-game id assigned by the save API.
    pub fn set_saved_id(&mut self, id: String) {
        if let Some(config) = self.config.as_mut() {
            config.id = Some(id);
        }
    }

    /// A click made by this user.
    ///
    /// While `connected`, this only moves the local outline; the swap happens
    /// when the relayed click comes back. Offline, a second click on a
    /// different piece swaps immediately.
    ///
    /// # Errors
    ///
    /// Fails for an unconfigured puzzle or an out-of-range piece.
    pub fn click_local(&mut self, piece: usize, connected: bool) -> Result<ClickOutcome, PuzzleError> {
        self.check_piece(piece)?;
        match self.local_selection {
            None => {
                self.local_selection = Some(piece);
                Ok(ClickOutcome::Selected(piece))
            }
            Some(selected) if selected == piece => {
                self.local_selection = None;
                Ok(ClickOutcome::Deselected)
            }
            Some(selected) => {
                self.local_selection = None;
                if connected {
                    return Ok(ClickOutcome::Deselected);
                }
                Ok(self.swap(selected, piece))
            }
        }
    }

    /// A click that arrived through the relay, from any participant.
    ///
    /// # Errors
    ///
    /// Fails for an unconfigured puzzle or an out-of-range piece; the state is
    /// left unchanged.
    pub fn apply_remote_interaction(&mut self, piece: usize) -> Result<ClickOutcome, PuzzleError> {
        self.check_piece(piece)?;
        match self.remote_selection {
            None => {
                self.remote_selection = Some(piece);
                Ok(ClickOutcome::Selected(piece))
            }
            Some(selected) if selected == piece => {
                self.remote_selection = None;
                Ok(ClickOutcome::Deselected)
            }
            Some(selected) => {
                self.remote_selection = None;
                Ok(self.swap(selected, piece))
            }
        }
    }

    fn check_piece(&self, piece: usize) -> Result<(), PuzzleError> {
        let Some(config) = self.config.as_ref() else {
            return Err(PuzzleError::Unconfigured);
        };
        if piece >= config.piece_positions.len() {
            return Err(PuzzleError::UnknownPiece(piece));
        }
        Ok(())
    }

    fn swap(&mut self, a: usize, b: usize) -> ClickOutcome {
        if let Some(config) = self.config.as_mut() {
            config.piece_positions.swap(a, b);
        }
        ClickOutcome::Swapped { solved: self.is_solved() }
    }
}

fn check_grid_size(grid_size: usize) -> Result<(), PuzzleError> {
    if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid_size) {
        Ok(())
    } else {
        Err(PuzzleError::InvalidGridSize(grid_size))
    }
}

/// Whether `values` holds each of `0..len` exactly once.
fn is_permutation(values: &[usize], len: usize) -> bool {
    if values.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &v in values {
        match seen.get_mut(v) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}
