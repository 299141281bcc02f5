//! Game channel handlers for [`BoardSession`].
//!
//! Each frame has its own channel that echoes to the sender. Clicks made
//! while the channel is connected are only sent; the state changes when the
//! echo comes back, in the same order on every participant. Offline clicks
//! apply immediately.

#[cfg(test)]
#[path = "games_test.rs"]
mod games_test;

use tracing::{debug, info, warn};
use wire::api::{SavedMemoryGame, SavedPuzzle};
use wire::{FrameId, MemoryMessage, PuzzleMessage};

use crate::memory::{self, FlipOutcome, MemoryGame, MemorySettings};
use crate::puzzle::{ClickOutcome, PuzzleGame, PuzzleSettings};
use crate::session::{Action, BoardSession, Outbound};
use crate::store::{GameState, SurfaceStore};

fn puzzle_in<'a>(store: &'a mut SurfaceStore, frame: &FrameId) -> Option<&'a mut PuzzleGame> {
    match store.frame_mut(frame).map(|f| &mut f.game) {
        Some(GameState::Puzzle(game)) => Some(game),
        _ => None,
    }
}

fn memory_in<'a>(store: &'a mut SurfaceStore, frame: &FrameId) -> Option<&'a mut MemoryGame> {
    match store.frame_mut(frame).map(|f| &mut f.game) {
        Some(GameState::Memory(game)) => Some(game),
        _ => None,
    }
}

fn puzzle_out(frame: &FrameId, message: PuzzleMessage) -> Outbound {
    Outbound::Puzzle { frame: frame.clone(), message }
}

fn memory_out(frame: &FrameId, message: MemoryMessage) -> Outbound {
    Outbound::Memory { frame: frame.clone(), message }
}

fn notice(frame: &FrameId, message: String) -> Action {
    Action::Notice { frame: Some(frame.clone()), message }
}

impl BoardSession {
    // --- Channel lifecycle ---

    /// Host callback: the frame's game channel connected.
    ///
    /// A client without the game's configuration asks for it. The client that
    /// created the frame announces its configuration instead.
    pub fn game_channel_opened(&mut self, frame: &FrameId) -> Vec<Action> {
        let mut out = Vec::new();
        let Some(f) = self.store.frame(frame) else {
            debug!(%frame, "channel opened for a frame that no longer exists");
            return out;
        };
        self.open_games.insert(frame.clone());
        let message = match &f.game {
            GameState::Puzzle(game) => match game.config() {
                None => Some(puzzle_out(frame, PuzzleMessage::PuzzleStateRequest {})),
                Some(config) if f.authored => Some(puzzle_out(frame, PuzzleMessage::PuzzleStateChange(config.clone()))),
                Some(_) => None,
            },
            GameState::Memory(game) => match game.config() {
                None => Some(memory_out(frame, MemoryMessage::GameStateRequest {})),
                Some(config) if f.authored => {
                    Some(memory_out(frame, MemoryMessage::GameStateChange { game_state: config.clone() }))
                }
                Some(_) => None,
            },
        };
        if let Some(message) = message {
            self.send(message, &mut out);
        }
        out
    }

    /// Host callback: the frame's game channel dropped. Clicks apply locally
    /// until it reopens.
    pub fn game_channel_closed(&mut self, frame: &FrameId) {
        self.open_games.remove(frame);
    }

    // --- Puzzle ---

    /// A click on the piece at position `piece`.
    pub fn puzzle_click(&mut self, frame: &FrameId, piece: usize) -> Vec<Action> {
        let mut out = Vec::new();
        let connected = self.open_games.contains(frame);
        let Some(game) = puzzle_in(&mut self.store, frame) else {
            debug!(%frame, "puzzle click on a frame that is not a puzzle");
            return out;
        };
        let outcome = match game.click_local(piece, connected) {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(%frame, piece, %err, "puzzle click refused");
                return out;
            }
        };
        out.push(Action::RenderNeeded);
        if connected {
            self.send(puzzle_out(frame, PuzzleMessage::PuzzlePieceClick { piece_index: piece }), &mut out);
        } else if outcome == (ClickOutcome::Swapped { solved: true }) {
            info!(%frame, "puzzle solved");
            out.push(Action::PuzzleSolved { frame: frame.clone() });
        }
        out
    }

    /// Apply new settings, deal a fresh arrangement and broadcast it.
    pub fn puzzle_configure(&mut self, frame: &FrameId, settings: PuzzleSettings) -> Vec<Action> {
        let mut out = Vec::new();
        let Some(game) = puzzle_in(&mut self.store, frame) else {
            return out;
        };
        match game.reconfigure(settings, &mut self.rng) {
            Ok(config) => {
                out.push(Action::ClearCompletion { frame: frame.clone() });
                out.push(Action::RenderNeeded);
                self.send(puzzle_out(frame, PuzzleMessage::PuzzleStateChange(config)), &mut out);
            }
            Err(err) => {
                info!(%frame, %err, "puzzle settings refused");
                out.push(notice(frame, err.to_string()));
            }
        }
        out
    }

    /// Load a saved puzzle into the frame and broadcast it.
    pub fn puzzle_restore(&mut self, frame: &FrameId, saved: &SavedPuzzle) -> Vec<Action> {
        let mut out = Vec::new();
        let config = saved.to_config();
        let Some(game) = puzzle_in(&mut self.store, frame) else {
            return out;
        };
        if let Err(err) = game.apply_config(&config) {
            warn!(%frame, saved = %saved.id, %err, "saved puzzle is invalid");
            out.push(notice(frame, err.to_string()));
            return out;
        }
        let solved = game.is_solved();
        out.push(completion(frame, solved));
        out.push(Action::RenderNeeded);
        self.send(puzzle_out(frame, PuzzleMessage::PuzzleStateChange(config)), &mut out);
        out
    }

    /// A record for the save API, or `None` if the frame has no configured puzzle.
    #[must_use]
    pub fn saved_puzzle(&self, frame: &FrameId, id: impl Into<String>) -> Option<SavedPuzzle> {
        let GameState::Puzzle(game) = &self.store.frame(frame)?.game else {
            return None;
        };
        Some(SavedPuzzle::from_config(id.into(), game.config()?))
    }

    /// Decode and apply one message from a puzzle channel.
    pub fn receive_puzzle(&mut self, frame: &FrameId, text: &str) -> Vec<Action> {
        match wire::decode::<PuzzleMessage>(text) {
            Ok(message) => self.apply_puzzle(frame, message),
            Err(err) => {
                warn!(%frame, channel = "puzzle", %err, "dropping inbound message");
                Vec::new()
            }
        }
    }

    pub fn apply_puzzle(&mut self, frame: &FrameId, message: PuzzleMessage) -> Vec<Action> {
        let mut out = Vec::new();
        let Some(game) = puzzle_in(&mut self.store, frame) else {
            debug!(%frame, kind = "puzzle", "message for unknown frame");
            return out;
        };
        match message {
            PuzzleMessage::PuzzleStateChange(config) => match game.apply_config(&config) {
                Ok(()) => {
                    out.push(completion(frame, game.is_solved()));
                    out.push(Action::RenderNeeded);
                }
                Err(err) => warn!(%frame, %err, "rejecting puzzle state"),
            },
            PuzzleMessage::PuzzlePieceClick { piece_index } => match game.apply_remote_interaction(piece_index) {
                Ok(outcome) => {
                    out.push(Action::RenderNeeded);
                    if outcome == (ClickOutcome::Swapped { solved: true }) {
                        info!(%frame, "puzzle solved");
                        out.push(Action::PuzzleSolved { frame: frame.clone() });
                    }
                }
                Err(err) => warn!(%frame, piece_index, %err, "rejecting puzzle click"),
            },
            PuzzleMessage::PuzzleStateRequest {} => {
                let config = game.config().cloned();
                if let Some(config) = config {
                    self.send(puzzle_out(frame, PuzzleMessage::PuzzleStateChange(config)), &mut out);
                }
            }
        }
        out
    }

    // --- Memory ---

    /// Apply new settings and broadcast them with an empty layout.
    pub fn memory_configure(&mut self, frame: &FrameId, settings: MemorySettings) -> Vec<Action> {
        let mut out = Vec::new();
        let base_path = self.config().preset_base_path.clone();
        let Some(game) = memory_in(&mut self.store, frame) else {
            return out;
        };
        match game.configure(settings, &base_path) {
            Ok(config) => {
                out.push(Action::StopTimer { frame: frame.clone() });
                out.push(Action::ClearCompletion { frame: frame.clone() });
                out.push(Action::RenderNeeded);
                self.send(memory_out(frame, MemoryMessage::GameStateChange { game_state: config }), &mut out);
            }
            Err(err) => {
                info!(%frame, %err, "memory settings refused");
                out.push(notice(frame, err.to_string()));
            }
        }
        out
    }

    /// Shuffle a fresh layout and broadcast it.
    pub fn memory_deal(&mut self, frame: &FrameId) -> Vec<Action> {
        let mut out = Vec::new();
        self.deal_into(frame, &mut out);
        out
    }

    /// Deal a configured memory game that has no layout yet.
    pub(crate) fn deal_if_undealt(&mut self, frame: &FrameId, out: &mut Vec<Action>) {
        let undealt = matches!(
            self.store.frame(frame).map(|f| &f.game),
            Some(GameState::Memory(game)) if game.is_configured() && !game.is_dealt()
        );
        if undealt {
            self.deal_into(frame, out);
        }
    }

    fn deal_into(&mut self, frame: &FrameId, out: &mut Vec<Action>) {
        let Some(game) = memory_in(&mut self.store, frame) else {
            return;
        };
        match game.deal(&mut self.rng) {
            Ok(config) => {
                out.push(Action::ClearCompletion { frame: frame.clone() });
                out.push(Action::StartTimer { frame: frame.clone() });
                out.push(Action::RenderNeeded);
                self.send(memory_out(frame, MemoryMessage::GameStateChange { game_state: config }), out);
            }
            Err(err) => {
                info!(%frame, %err, "memory deal refused");
                out.push(notice(frame, err.to_string()));
            }
        }
    }

    /// A click on the card at `card`. Ignored while a mismatched pair is showing.
    pub fn memory_click(&mut self, frame: &FrameId, card: usize) -> Vec<Action> {
        let mut out = Vec::new();
        let Some(game) = memory_in(&mut self.store, frame) else {
            return out;
        };
        if !game.is_dealt() || game.is_locked() {
            return out;
        }
        if self.open_games.contains(frame) {
            self.send(memory_out(frame, MemoryMessage::CardClick { card_dom_index: card }), &mut out);
        } else {
            self.apply_flip(frame, card, &mut out);
        }
        out
    }

    fn apply_flip(&mut self, frame: &FrameId, card: usize, out: &mut Vec<Action>) {
        let delay = self.config().flip_back_delay;
        let Some(game) = memory_in(&mut self.store, frame) else {
            return;
        };
        match game.flip(card) {
            Ok(FlipOutcome::Ignored) => {}
            Ok(FlipOutcome::First(_)) => out.push(Action::RenderNeeded),
            Ok(FlipOutcome::Matched { completed }) => {
                out.push(Action::RenderNeeded);
                if completed {
                    let attempts = game.attempts();
                    info!(%frame, attempts, "memory game completed");
                    out.push(Action::MemoryCompleted { frame: frame.clone(), attempts });
                    out.push(Action::StopTimer { frame: frame.clone() });
                }
            }
            Ok(FlipOutcome::Mismatched { turn }) => {
                out.push(Action::RenderNeeded);
                out.push(Action::ScheduleFlipBack { frame: frame.clone(), turn, delay });
            }
            Err(err) => warn!(%frame, card, %err, "rejecting card flip"),
        }
    }

    /// Host callback: the flip-back delay for `turn` elapsed.
    pub fn memory_flip_back(&mut self, frame: &FrameId, turn: u64) -> Vec<Action> {
        match memory_in(&mut self.store, frame).map(|game| game.flip_back(turn)) {
            Some(true) => vec![Action::RenderNeeded],
            _ => Vec::new(),
        }
    }

    /// Load a saved memory game into the frame and broadcast it.
    pub fn memory_restore(&mut self, frame: &FrameId, saved: &SavedMemoryGame) -> Vec<Action> {
        let mut out = Vec::new();
        let config = match memory::config_from_saved(saved, &self.config().preset_base_path) {
            Ok(config) => config,
            Err(err) => {
                warn!(%frame, saved = %saved.id, %err, "saved memory game is invalid");
                out.push(notice(frame, err.to_string()));
                return out;
            }
        };
        let Some(game) = memory_in(&mut self.store, frame) else {
            return out;
        };
        if let Err(err) = game.apply_config(&config) {
            out.push(notice(frame, err.to_string()));
            return out;
        }
        out.push(timer(frame, game.is_dealt()));
        out.push(Action::ClearCompletion { frame: frame.clone() });
        out.push(Action::RenderNeeded);
        self.send(memory_out(frame, MemoryMessage::GameStateChange { game_state: config }), &mut out);
        out
    }

    /// A record for the save API, or `None` if the frame has no configured game.
    #[must_use]
    pub fn saved_memory(&self, frame: &FrameId, id: impl Into<String>) -> Option<SavedMemoryGame> {
        let GameState::Memory(game) = &self.store.frame(frame)?.game else {
            return None;
        };
        Some(SavedMemoryGame::from_config(id.into(), game.config()?, game.preset_name()))
    }

    /// Record the id the save API assigned and share it with the room.
    pub fn set_saved_id(&mut self, frame: &FrameId, id: impl Into<String>) -> Vec<Action> {
        let mut out = Vec::new();
        let id = id.into();
        let message = match self.store.frame_mut(frame).map(|f| &mut f.game) {
            Some(GameState::Puzzle(game)) => {
                game.set_saved_id(id);
                game.config().cloned().map(|c| puzzle_out(frame, PuzzleMessage::PuzzleStateChange(c)))
            }
            Some(GameState::Memory(game)) => {
                game.set_saved_id(id);
                game.config()
                    .cloned()
                    .map(|c| memory_out(frame, MemoryMessage::GameStateChange { game_state: c }))
            }
            None => None,
        };
        if let Some(message) = message {
            self.send(message, &mut out);
        }
        out
    }

    /// Decode and apply one message from a memory channel.
    pub fn receive_memory(&mut self, frame: &FrameId, text: &str) -> Vec<Action> {
        match wire::decode::<MemoryMessage>(text) {
            Ok(message) => self.apply_memory(frame, message),
            Err(err) => {
                warn!(%frame, channel = "memory", %err, "dropping inbound message");
                Vec::new()
            }
        }
    }

    pub fn apply_memory(&mut self, frame: &FrameId, message: MemoryMessage) -> Vec<Action> {
        let mut out = Vec::new();
        let Some(game) = memory_in(&mut self.store, frame) else {
            debug!(%frame, kind = "memory", "message for unknown frame");
            return out;
        };
        match message {
            MemoryMessage::GameStateChange { game_state } => {
                let previous = game.layout().to_vec();
                match game.apply_config(&game_state) {
                    Ok(()) => {
                        if previous != game_state.card_layout {
                            out.push(timer(frame, game.is_dealt()));
                            out.push(Action::ClearCompletion { frame: frame.clone() });
                        }
                        out.push(Action::RenderNeeded);
                    }
                    Err(err) => warn!(%frame, %err, "rejecting memory state"),
                }
            }
            MemoryMessage::CardClick { card_dom_index } => self.apply_flip(frame, card_dom_index, &mut out),
            MemoryMessage::GameStateRequest {} => {
                let config = game.config().cloned();
                if let Some(config) = config {
                    self.send(memory_out(frame, MemoryMessage::GameStateChange { game_state: config }), &mut out);
                }
            }
        }
        out
    }
}

fn completion(frame: &FrameId, solved: bool) -> Action {
    if solved {
        Action::PuzzleSolved { frame: frame.clone() }
    } else {
        Action::ClearCompletion { frame: frame.clone() }
    }
}

fn timer(frame: &FrameId, running: bool) -> Action {
    if running {
        Action::StartTimer { frame: frame.clone() }
    } else {
        Action::StopTimer { frame: frame.clone() }
    }
}
