//! Shared relay state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds one entry per live channel: the surface channel of a room, or the
//! game channel of one frame in a room. Each entry is the set of connected
//! clients and their outbound queues. The relay never looks inside the
//! messages it carries, so there is nothing else to keep.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::extract::ws::Utf8Bytes;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;
use wire::{ChannelKind, FrameId, GameKind};

// =============================================================================
// CHANNEL KEY
// =============================================================================

/// Routing key of one relay channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelKey {
    pub kind: ChannelKind,
    pub room: String,
    /// Frame id for game channels; `None` for the surface channel.
    pub game: Option<FrameId>,
}

impl ChannelKey {
    #[must_use]
    pub fn surface(room: impl Into<String>) -> Self {
        Self { kind: ChannelKind::Surface, room: room.into(), game: None }
    }

    #[must_use]
    pub fn game(game: GameKind, room: impl Into<String>, frame: FrameId) -> Self {
        Self { kind: ChannelKind::for_game(game), room: room.into(), game: Some(frame) }
    }

    /// Whether a message is also delivered back to its sender.
    #[must_use]
    pub fn echoes_sender(&self) -> bool {
        self.kind.echoes_sender()
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.route_segment(), self.room)?;
        if let Some(game) = &self.game {
            write!(f, "/{game}")?;
        }
        Ok(())
    }
}

// =============================================================================
// CHANNEL
// =============================================================================

/// Connected clients of one channel: `client_id` -> outbound queue.
#[derive(Debug, Default)]
pub struct Channel {
    pub clients: HashMap<Uuid, mpsc::Sender<Utf8Bytes>>,
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum; inner fields are
/// Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub channels: Arc<RwLock<HashMap<ChannelKey, Channel>>>,
    /// Outbound queue depth for each new connection.
    pub client_buffer: usize,
}

impl AppState {
    #[must_use]
    pub fn new(client_buffer: usize) -> Self {
        Self { channels: Arc::new(RwLock::new(HashMap::new())), client_buffer }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
