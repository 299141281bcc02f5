//! Headless host for a [`BoardSession`].
//!
//! Owns the websocket connections the session asks for and carries out its
//! actions: sends go to the matching socket, images are "decoded" by
//! validating their data URL, flip-back timers run as sleeping tasks and
//! animation frames are ticked every 16 ms. Everything that arrives (socket
//! text, socket close, timer expiry) is funneled through one event queue so
//! the session is only ever touched from the host loop.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use board::{Action, BoardSession, Outbound, SessionConfig};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};
use wire::{FrameId, GameKind};

use crate::CliError;

pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// Which connection an event came from.
#[derive(Debug, Clone)]
enum Link {
    Surface,
    Game { frame: FrameId, kind: GameKind, conn: u64 },
}

#[derive(Debug)]
enum Event {
    Text { link: Link, text: String },
    Closed(Link),
    FlipBack { frame: FrameId, turn: u64 },
}

struct GameLink {
    kind: GameKind,
    conn: u64,
    sink: WsSink,
}

pub struct Host {
    session: BoardSession,
    ws_base: String,
    surface: Option<WsSink>,
    games: HashMap<FrameId, GameLink>,
    next_conn: u64,
    events_tx: mpsc::Sender<Event>,
    events_rx: mpsc::Receiver<Event>,
    frame_requested: bool,
}

impl Host {
    /// Join `room` on the relay behind `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not http(s) or the surface
    /// channel cannot be opened.
    pub async fn connect(base_url: &str, room: &str, config: SessionConfig) -> Result<Self, CliError> {
        let ws_base = ws_base_url(base_url)?;
        let (events_tx, events_rx) = mpsc::channel(256);
        let mut host = Self {
            session: BoardSession::new(room, config),
            ws_base,
            surface: None,
            games: HashMap::new(),
            next_conn: 0,
            events_tx,
            events_rx,
            frame_requested: false,
        };

        let stream = host.open(&wire::surface_path(room)).await?;
        let (sink, stream) = stream.split();
        spawn_reader(stream, Link::Surface, host.events_tx.clone());
        host.surface = Some(sink);
        host.session.set_surface_open(true);
        info!(%room, "joined room");
        Ok(host)
    }

    #[must_use]
    pub fn session(&self) -> &BoardSession {
        &self.session
    }

    /// Run a local operation and carry out what it asks for.
    pub async fn act(&mut self, op: impl FnOnce(&mut BoardSession) -> Vec<Action>) {
        let actions = op(&mut self.session);
        self.execute(actions).await;
    }

    /// Process events until `duration` elapses (forever when `None`), the
    /// surface channel closes, or the user interrupts.
    pub async fn run_for(&mut self, duration: Option<Duration>) {
        let mut tick = tokio::time::interval(FRAME_INTERVAL);
        let deadline = async {
            match duration {
                Some(d) => tokio::time::sleep(d).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                Some(event) = self.events_rx.recv() => {
                    self.handle(event).await;
                    if self.surface.is_none() {
                        break;
                    }
                }
                _ = tick.tick() => {
                    if std::mem::take(&mut self.frame_requested) {
                        let actions = self.session.animation_frame();
                        self.execute(actions).await;
                    }
                }
                () = &mut deadline => break,
                _ = tokio::signal::ctrl_c() => break,
            }
        }
    }

    /// Close every connection.
    pub async fn shutdown(mut self) {
        if let Some(mut sink) = self.surface.take() {
            close_sink(&mut sink).await;
        }
        for (_, mut link) in self.games.drain() {
            close_sink(&mut link.sink).await;
        }
    }

    // --- Events ---

    async fn handle(&mut self, event: Event) {
        let actions = match event {
            Event::Text { link: Link::Surface, text } => self.session.receive_surface(&text),
            Event::Text { link: Link::Game { frame, kind, .. }, text } => match kind {
                GameKind::Puzzle => self.session.receive_puzzle(&frame, &text),
                GameKind::Memory => self.session.receive_memory(&frame, &text),
            },
            Event::Closed(Link::Surface) => {
                warn!(room = self.session.room(), "surface channel closed");
                self.surface = None;
                self.session.set_surface_open(false);
                Vec::new()
            }
            Event::Closed(Link::Game { frame, conn, .. }) => {
                // A close from a connection that was already replaced is stale.
                if self.games.get(&frame).is_some_and(|l| l.conn == conn) {
                    self.games.remove(&frame);
                    self.session.game_channel_closed(&frame);
                    info!(%frame, "game channel closed");
                }
                Vec::new()
            }
            Event::FlipBack { frame, turn } => self.session.memory_flip_back(&frame, turn),
        };
        self.execute(actions).await;
    }

    // --- Actions ---

    async fn execute(&mut self, actions: Vec<Action>) {
        let mut queue: VecDeque<Action> = actions.into();
        while let Some(action) = queue.pop_front() {
            let more = match action {
                Action::Send(out) => {
                    self.transmit(out).await;
                    Vec::new()
                }
                Action::DecodeImage { id, data_url } => {
                    if is_decodable_data_url(&data_url) {
                        self.session.image_decoded(id)
                    } else {
                        self.session.image_decode_failed(id)
                    }
                }
                Action::RequestAnimationFrame => {
                    self.frame_requested = true;
                    Vec::new()
                }
                Action::OpenGameChannel { frame, kind } => self.open_game(frame, kind).await,
                Action::CloseGameChannel { frame } => {
                    if let Some(mut link) = self.games.remove(&frame) {
                        close_sink(&mut link.sink).await;
                    }
                    self.session.game_channel_closed(&frame);
                    Vec::new()
                }
                Action::ScheduleFlipBack { frame, turn, delay } => {
                    let tx = self.events_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        if tx.send(Event::FlipBack { frame, turn }).await.is_err() {
                            debug!("host gone before flip-back fired");
                        }
                    });
                    Vec::new()
                }
                Action::RenderNeeded => Vec::new(),
                other => {
                    info!(room = self.session.room(), action = ?other, "board");
                    Vec::new()
                }
            };
            queue.extend(more);
        }
    }

    async fn transmit(&mut self, out: Outbound) {
        let text = match out.encode() {
            Ok(text) => text,
            Err(e) => {
                warn!(kind = out.kind(), error = %e, "encode failed");
                return;
            }
        };
        let sink = match &out {
            Outbound::Surface(_) => self.surface.as_mut(),
            Outbound::Puzzle { frame, .. } | Outbound::Memory { frame, .. } => {
                self.games.get_mut(frame).map(|l| &mut l.sink)
            }
        };
        let Some(sink) = sink else {
            debug!(kind = out.kind(), "no connection; message dropped");
            return;
        };
        if let Err(e) = sink.send(Message::Text(text.into())).await {
            warn!(kind = out.kind(), error = %e, "send failed");
        } else {
            debug!(kind = out.kind(), "sent");
        }
    }

    async fn open_game(&mut self, frame: FrameId, kind: GameKind) -> Vec<Action> {
        let path = wire::game_path(kind, self.session.room(), &frame);
        let stream = match self.open(&path).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(%frame, error = %e, "game channel unavailable; playing offline");
                return Vec::new();
            }
        };
        self.next_conn += 1;
        let conn = self.next_conn;
        let (sink, stream) = stream.split();
        spawn_reader(stream, Link::Game { frame: frame.clone(), kind, conn }, self.events_tx.clone());
        if let Some(mut old) = self.games.insert(frame.clone(), GameLink { kind, conn, sink }) {
            close_sink(&mut old.sink).await;
        }
        debug!(%frame, kind = kind.as_str(), "game channel open");
        self.session.game_channel_opened(&frame)
    }

    async fn open(&self, path: &str) -> Result<WsStream, CliError> {
        let url = format!("{}{path}", self.ws_base);
        let (stream, _) = connect_async(url)
            .await
            .map_err(|error| CliError::WsConnect(Box::new(error)))?;
        Ok(stream)
    }

    /// Game kinds of the currently connected game channels.
    #[must_use]
    pub fn open_games(&self) -> Vec<(FrameId, GameKind)> {
        let mut games: Vec<_> = self.games.iter().map(|(f, l)| (f.clone(), l.kind)).collect();
        games.sort_by(|a, b| a.0.cmp(&b.0));
        games
    }
}

fn spawn_reader(mut stream: SplitStream<WsStream>, link: Link, tx: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        while let Some(message) = stream.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let event = Event::Text { link: link.clone(), text: text.as_str().to_owned() };
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    debug!(error = %e, "websocket read failed");
                    break;
                }
            }
        }
        if tx.send(Event::Closed(link)).await.is_err() {
            debug!("host gone before close was reported");
        }
    });
}

async fn close_sink(sink: &mut WsSink) {
    if let Err(e) = sink.close().await {
        debug!(error = %e, "websocket close failed");
    }
}

/// `http://host` → `ws://host`, `https://host` → `wss://host`.
///
/// # Errors
///
/// Returns [`CliError::InvalidBaseUrl`] for any other scheme.
pub fn ws_base_url(base_url: &str) -> Result<String, CliError> {
    let trimmed = base_url.trim_end_matches('/');
    if let Some(rest) = trimmed.strip_prefix("http://") {
        return Ok(format!("ws://{rest}"));
    }
    if let Some(rest) = trimmed.strip_prefix("https://") {
        return Ok(format!("wss://{rest}"));
    }
    Err(CliError::InvalidBaseUrl(base_url.to_owned()))
}

/// Stand-in for bitmap decoding: accept a well-formed `data:image/...` URL.
/// Base64 payloads must use the standard alphabet with valid padding.
#[must_use]
pub fn is_decodable_data_url(url: &str) -> bool {
    let Some(rest) = url.strip_prefix("data:") else {
        return false;
    };
    let Some((header, payload)) = rest.split_once(',') else {
        return false;
    };
    if !header.starts_with("image/") || payload.is_empty() {
        return false;
    }
    if !header.ends_with(";base64") {
        return true;
    }
    let body = payload.trim_end_matches('=');
    payload.len().is_multiple_of(4)
        && payload.len() - body.len() <= 2
        && body.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}

#[cfg(test)]
#[path = "host_test.rs"]
mod tests;
