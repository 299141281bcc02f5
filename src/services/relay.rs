//! Relay service: channel membership and fan-out.
//!
//! DESIGN
//! ======
//! A channel exists while at least one client is connected to it. Joining
//! creates it, the last part evicts it. Messages are opaque text: the relay
//! never decodes them, it only decides who receives a copy.
//!
//! Fan-out is best-effort. A client whose outbound queue is full or closed
//! misses the message; the sender is never blocked by a slow peer.

use axum::extract::ws::Utf8Bytes;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::state::{AppState, ChannelKey};

/// Register `client_id` on a channel, creating the channel if needed.
/// Returns the number of clients now connected.
pub async fn join(state: &AppState, key: &ChannelKey, client_id: Uuid, tx: mpsc::Sender<Utf8Bytes>) -> usize {
    let mut channels = state.channels.write().await;
    let channel = channels.entry(key.clone()).or_default();
    channel.clients.insert(client_id, tx);
    channel.clients.len()
}

/// Remove `client_id` from a channel. The channel is evicted when empty.
pub async fn part(state: &AppState, key: &ChannelKey, client_id: Uuid) {
    let mut channels = state.channels.write().await;
    let Some(channel) = channels.get_mut(key) else {
        return;
    };
    channel.clients.remove(&client_id);
    let remaining = channel.clients.len();
    if remaining == 0 {
        channels.remove(key);
        info!(channel = %key, "channel evicted");
    } else {
        info!(channel = %key, %client_id, remaining, "client left channel");
    }
}

/// Fan `text` out to the channel's clients. The sender is skipped unless the
/// channel echoes. Returns how many queues accepted the message.
pub async fn broadcast(state: &AppState, key: &ChannelKey, text: &Utf8Bytes, from: Uuid) -> usize {
    let channels = state.channels.read().await;
    let Some(channel) = channels.get(key) else {
        return 0;
    };
    let echo = key.echoes_sender();
    let mut delivered = 0;
    for (client_id, tx) in &channel.clients {
        if *client_id == from && !echo {
            continue;
        }
        match tx.try_send(text.clone()) {
            Ok(()) => delivered += 1,
            Err(e) => debug!(channel = %key, %client_id, error = %e, "relay: dropped message"),
        }
    }
    delivered
}

/// Number of clients on a channel; zero when it does not exist.
pub async fn client_count(state: &AppState, key: &ChannelKey) -> usize {
    state.channels.read().await.get(key).map_or(0, |c| c.clients.len())
}

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;
