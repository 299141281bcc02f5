//! WebSocket handler: opaque text relay.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID, joins the channel named by the path
//! and enters a `select!` loop:
//! - Incoming client text → broadcast to the channel
//! - Text queued by peers → forward to the client
//!
//! Binary frames are ignored. Pings are answered by axum itself.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → join channel
//! 2. Client sends text → fan-out (sender excluded on the surface channel)
//! 3. Close or error → part (last client evicts the channel)

use axum::extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;
use wire::{FrameId, GameKind};

use crate::services::relay;
use crate::state::{AppState, ChannelKey};

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_surface(State(state): State<AppState>, Path(room): Path<String>, ws: WebSocketUpgrade) -> Response {
    let key = ChannelKey::surface(room);
    ws.on_upgrade(move |socket| run_ws(socket, state, key))
}

pub async fn handle_puzzle(
    State(state): State<AppState>,
    Path((room, game_id)): Path<(String, String)>,
    ws: WebSocketUpgrade,
) -> Response {
    let key = ChannelKey::game(GameKind::Puzzle, room, FrameId::from(game_id));
    ws.on_upgrade(move |socket| run_ws(socket, state, key))
}

pub async fn handle_memory(
    State(state): State<AppState>,
    Path((room, game_id)): Path<(String, String)>,
    ws: WebSocketUpgrade,
) -> Response {
    let key = ChannelKey::game(GameKind::Memory, room, FrameId::from(game_id));
    ws.on_upgrade(move |socket| run_ws(socket, state, key))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, key: ChannelKey) {
    let client_id = Uuid::new_v4();

    // Per-connection queue for text relayed from peers.
    let (client_tx, mut client_rx) = mpsc::channel::<Utf8Bytes>(state.client_buffer);
    let clients = relay::join(&state, &key, client_id, client_tx).await;

    info!(%client_id, room = %key.room, channel = %key, clients, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let delivered = relay::broadcast(&state, &key, &text, client_id).await;
                        debug!(%client_id, channel = %key, bytes = text.as_str().len(), delivered, "ws: relayed");
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(text) = client_rx.recv() => {
                if socket.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    }

    relay::part(&state, &key, client_id).await;
    info!(%client_id, room = %key.room, channel = %key, "ws: client disconnected");
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
