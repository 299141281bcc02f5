//! Per-room replicated board session.
//!
//! `BoardSession` is the single owner of everything one client knows about a
//! room: the surface store, the focus arbitrator, the pointer gesture, the
//! throttler and the per-frame game channels. It performs no I/O. Every
//! handler takes an input (a pointer event, a host callback, or an inbound
//! message) and returns the [`Action`]s the host must carry out: send a
//! message, decode an image, redraw, open a channel, start a timer.
//!
//! Local edits and inbound messages go through the same store mutators, so
//! optimistic local state and applied remote state cannot drift apart in
//! how they are computed.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};
use wire::{
    CodecError, FrameId, GameKind, ImageId, MemoryMessage, PuzzleMessage, Stroke, SurfaceMessage, WireMessage,
    game_path, surface_path,
};

use crate::config::SessionConfig;
use crate::focus::{FocusArbitrator, SettingsChange};
use crate::geom::{Point, Rect};
use crate::hit::{Hit, HitPart, Target, hit_test};
use crate::input::{InputMode, PenStyle, Tool, stroke_color};
use crate::memory::{ImageSet, MemoryGame, MemorySettings};
use crate::puzzle::{PuzzleGame, PuzzleSettings};
use crate::store::{GameFrame, GameState, SurfaceStore};
use crate::throttle::Throttler;

/// A message bound for one of the session's channels.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Surface(SurfaceMessage),
    Puzzle { frame: FrameId, message: PuzzleMessage },
    Memory { frame: FrameId, message: MemoryMessage },
}

impl Outbound {
    /// JSON text for the wire.
    ///
    /// # Errors
    ///
    /// Propagates [`CodecError::Encode`].
    pub fn encode(&self) -> Result<String, CodecError> {
        match self {
            Self::Surface(message) => wire::encode(message),
            Self::Puzzle { message, .. } => wire::encode(message),
            Self::Memory { message, .. } => wire::encode(message),
        }
    }

    /// Relay path of the channel this message belongs on.
    #[must_use]
    pub fn path(&self, room: &str) -> String {
        match self {
            Self::Surface(_) => surface_path(room),
            Self::Puzzle { frame, .. } => game_path(GameKind::Puzzle, room, frame),
            Self::Memory { frame, .. } => game_path(GameKind::Memory, room, frame),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Surface(message) => message.kind(),
            Self::Puzzle { message, .. } => message.kind(),
            Self::Memory { message, .. } => message.kind(),
        }
    }
}

/// Work for the host to carry out, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Put a message on its channel.
    Send(Outbound),
    /// Stroke one segment onto the raster.
    StrokeSegment(Stroke),
    /// Wipe every stroke from the raster.
    ClearStrokes,
    /// Decode `data_url`, then call `image_decoded(id)` or `image_decode_failed(id)`.
    DecodeImage { id: ImageId, data_url: String },
    RenderNeeded,
    /// Call `animation_frame()` on the next display refresh.
    RequestAnimationFrame,
    /// Connect the frame's game channel, then call `game_channel_opened`.
    OpenGameChannel { frame: FrameId, kind: GameKind },
    CloseGameChannel { frame: FrameId },
    ShowSettings { frame: FrameId, kind: GameKind },
    ClearSettings,
    PuzzleSolved { frame: FrameId },
    MemoryCompleted { frame: FrameId, attempts: u32 },
    /// Hide any completion banner on the frame.
    ClearCompletion { frame: FrameId },
    /// Call `memory_flip_back(frame, turn)` after `delay`.
    ScheduleFlipBack { frame: FrameId, turn: u64, delay: Duration },
    StartTimer { frame: FrameId },
    StopTimer { frame: FrameId },
    /// A refused local operation, for the user to read.
    Notice { frame: Option<FrameId>, message: String },
}

/// An image between its `image` message (or upload) and decode completion.
#[derive(Debug, Clone)]
struct PendingImage {
    rect: Rect,
    data_url: String,
    /// Uploaded here; announce to the room once decoded.
    local: bool,
}

pub struct BoardSession {
    room: String,
    config: SessionConfig,
    pub(crate) store: SurfaceStore,
    pub(crate) focus: FocusArbitrator,
    input: InputMode,
    pen: PenStyle,
    throttle: Throttler,
    pending_images: HashMap<ImageId, PendingImage>,
    surface_open: bool,
    pub(crate) open_games: HashSet<FrameId>,
    pub(crate) rng: StdRng,
}

impl BoardSession {
    /// A session seeded from the thread RNG.
    #[must_use]
    pub fn new(room: impl Into<String>, config: SessionConfig) -> Self {
        Self::with_rng(room, config, StdRng::from_rng(&mut rand::rng()))
    }

    /// A session with reproducible shuffles.
    #[must_use]
    pub fn with_seed(room: impl Into<String>, config: SessionConfig, seed: u64) -> Self {
        Self::with_rng(room, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(room: impl Into<String>, config: SessionConfig, rng: StdRng) -> Self {
        Self {
            room: room.into(),
            config,
            store: SurfaceStore::new(),
            focus: FocusArbitrator::new(),
            input: InputMode::Idle,
            pen: PenStyle::default(),
            throttle: Throttler::new(),
            pending_images: HashMap::new(),
            surface_open: false,
            open_games: HashSet::new(),
            rng,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn room(&self) -> &str {
        &self.room
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &SurfaceStore {
        &self.store
    }

    #[must_use]
    pub fn input_mode(&self) -> &InputMode {
        &self.input
    }

    #[must_use]
    pub fn pen(&self) -> &PenStyle {
        &self.pen
    }

    #[must_use]
    pub fn focused_frame(&self) -> Option<&FrameId> {
        FocusArbitrator::focused(&self.store)
    }

    #[must_use]
    pub fn is_image_pending(&self, id: ImageId) -> bool {
        self.pending_images.contains_key(&id)
    }

    #[must_use]
    pub fn is_surface_open(&self) -> bool {
        self.surface_open
    }

    #[must_use]
    pub fn is_game_channel_open(&self, frame: &FrameId) -> bool {
        self.open_games.contains(frame)
    }

    // --- Pen ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.pen.tool = tool;
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.pen.color = color.into();
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.pen.line_width = width;
    }

    // --- Transport ---

    /// Record whether the surface channel is connected. Reopening does not
    /// replay anything missed while closed.
    pub fn set_surface_open(&mut self, open: bool) {
        self.surface_open = open;
    }

    pub(crate) fn send_surface(&self, message: SurfaceMessage, out: &mut Vec<Action>) {
        self.send(Outbound::Surface(message), out);
    }

    /// Queue `message` if its channel is connected, else drop it.
    pub(crate) fn send(&self, message: Outbound, out: &mut Vec<Action>) {
        let open = match &message {
            Outbound::Surface(_) => self.surface_open,
            Outbound::Puzzle { frame, .. } | Outbound::Memory { frame, .. } => self.open_games.contains(frame),
        };
        if open {
            out.push(Action::Send(message));
        } else {
            debug!(room = %self.room, kind = message.kind(), "channel closed; dropping outbound message");
        }
    }

    // --- Pointer input ---

    /// Start a gesture at `p`.
    ///
    /// Frames are grabbed (and focused) first, then images; empty surface
    /// starts a stroke. Anything other than a frame blurs the focused frame.
    pub fn pointer_down(&mut self, p: Point) -> Vec<Action> {
        let mut out = Vec::new();
        self.throttle.reset();
        match hit_test(&self.store, p, self.config.resize_handle) {
            Some(Hit { target: Target::Frame(id), part }) => {
                self.focus_local(&id, &mut out);
                self.begin_grab(Target::Frame(id), part, p);
            }
            hit => {
                if let Some(focused) = self.focused_frame().cloned() {
                    self.blur_local(&focused, &mut out);
                }
                match hit {
                    Some(Hit { target, part }) => self.begin_grab(target, part, p),
                    None => self.input = InputMode::Drawing { last: p },
                }
            }
        }
        out
    }

    /// Continue the gesture.
    ///
    /// Strokes are sent segment by segment. Drags and resizes apply locally
    /// at once and coalesce their interim messages to one per animation frame.
    pub fn pointer_move(&mut self, p: Point) -> Vec<Action> {
        let mut out = Vec::new();
        if let InputMode::Drawing { last } = self.input {
            let stroke = Stroke {
                x0: last.x,
                y0: last.y,
                x1: p.x,
                y1: p.y,
                color: self.pen.stroke_color().to_owned(),
                line_width: self.pen.line_width,
                tool: self.pen.tool,
            };
            out.push(Action::StrokeSegment(stroke.clone()));
            self.send_surface(SurfaceMessage::Draw(stroke), &mut out);
            self.input = InputMode::Drawing { last: p };
            return out;
        }
        if let Some(interim) = self.track(p) {
            out.push(Action::RenderNeeded);
            if self.throttle.schedule(interim) {
                out.push(Action::RequestAnimationFrame);
            }
        }
        out
    }

    /// End the gesture. Drags and resizes always send one final message
    /// carrying the released geometry.
    pub fn pointer_up(&mut self, p: Point) -> Vec<Action> {
        let mut out = Vec::new();
        if self.track(p).is_some() {
            out.push(Action::RenderNeeded);
        }
        let mode = std::mem::take(&mut self.input);
        let last = match &mode {
            InputMode::Dragging { target, .. } => self.final_message(target, false),
            InputMode::Resizing { target, .. } => self.final_message(target, true),
            InputMode::Idle | InputMode::Drawing { .. } => None,
        };
        match last {
            Some(last) => {
                let last = self.throttle.finish(last);
                self.send_surface(last, &mut out);
            }
            None => self.throttle.reset(),
        }
        out
    }

    /// Flush the coalesced interim message, if any.
    pub fn animation_frame(&mut self) -> Vec<Action> {
        let mut out = Vec::new();
        if let Some(interim) = self.throttle.take_frame() {
            self.send_surface(interim, &mut out);
        }
        out
    }

    fn begin_grab(&mut self, target: Target, part: HitPart, p: Point) {
        let Some(rect) = self.target_rect(&target) else {
            return;
        };
        self.input = match part {
            HitPart::Body => InputMode::Dragging { target, grab_offset: p.offset_from(rect.origin()) },
            HitPart::ResizeHandle => InputMode::Resizing { target, start: p, orig: rect },
        };
    }

    fn target_rect(&self, target: &Target) -> Option<Rect> {
        match target {
            Target::Image(id) => self.store.image(*id).map(|i| i.rect),
            Target::Frame(id) => self.store.frame(id).map(|f| f.rect),
        }
    }

    /// Apply the active drag or resize at `p`. Returns the interim message
    /// when geometry changed.
    fn track(&mut self, p: Point) -> Option<SurfaceMessage> {
        match self.input.clone() {
            InputMode::Dragging { target, grab_offset } => {
                let origin = p.offset_from(grab_offset);
                match target {
                    Target::Image(id) => self
                        .store
                        .move_image(id, origin.x, origin.y)
                        .then_some(SurfaceMessage::ImageDragUpdate { id, x: origin.x, y: origin.y }),
                    Target::Frame(id) => self
                        .store
                        .move_game_frame(&id, origin.x, origin.y)
                        .then(|| SurfaceMessage::GameElementDragUpdate { id, x: origin.x, y: origin.y }),
                }
            }
            InputMode::Resizing { target, start, orig } => {
                let delta = p.offset_from(start);
                match target {
                    Target::Image(id) => {
                        let min = self.config.min_image_size;
                        let r = orig.resized_by(delta, min, min);
                        self.store.resize_image(id, r).then_some(SurfaceMessage::ImageResizeUpdate {
                            id,
                            x: r.x,
                            y: r.y,
                            width: r.width,
                            height: r.height,
                        })
                    }
                    Target::Frame(id) => {
                        let r = orig.resized_by(delta, self.config.min_frame_width, self.config.min_frame_height);
                        self.store.resize_game_frame(&id, r).then(|| SurfaceMessage::GameElementResizeUpdate {
                            id,
                            x: r.x,
                            y: r.y,
                            width: r.width,
                            height: r.height,
                        })
                    }
                }
            }
            InputMode::Idle | InputMode::Drawing { .. } => None,
        }
    }

    /// The final message for a released drag or resize, from current geometry.
    fn final_message(&self, target: &Target, resized: bool) -> Option<SurfaceMessage> {
        match target {
            Target::Image(id) => {
                let image = self.store.image(*id)?;
                let r = image.rect;
                let data_url = Some(image.data_url.clone());
                Some(if resized {
                    SurfaceMessage::ResizeImage { id: *id, x: r.x, y: r.y, width: r.width, height: r.height, data_url }
                } else {
                    SurfaceMessage::MoveImage { id: *id, x: r.x, y: r.y, data_url }
                })
            }
            Target::Frame(id) => {
                let r = self.store.frame(id)?.rect;
                let id = id.clone();
                Some(if resized {
                    SurfaceMessage::ResizeGameElement { id, x: r.x, y: r.y, width: r.width, height: r.height }
                } else {
                    SurfaceMessage::MoveGameElement { id, x: r.x, y: r.y }
                })
            }
        }
    }

    // --- Images ---

    /// Place an uploaded image. It is announced once decoded.
    pub fn upload_image(&mut self, data_url: impl Into<String>) -> Vec<Action> {
        let data_url = data_url.into();
        let id = self.store.ids_mut().next_image_id();
        self.pending_images
            .insert(id, PendingImage { rect: self.config.image_rect, data_url: data_url.clone(), local: true });
        vec![Action::DecodeImage { id, data_url }]
    }

    /// Host callback: the bitmap for `id` is ready.
    pub fn image_decoded(&mut self, id: ImageId) -> Vec<Action> {
        let mut out = Vec::new();
        let Some(pending) = self.pending_images.remove(&id) else {
            debug!(id, "decode finished for an image no longer pending");
            return out;
        };
        let r = pending.rect;
        self.store.put_image(id, r, pending.data_url.clone());
        out.push(Action::RenderNeeded);
        if pending.local {
            let message = SurfaceMessage::Image {
                id,
                x: r.x,
                y: r.y,
                width: r.width,
                height: r.height,
                data_url: pending.data_url,
            };
            self.send_surface(message, &mut out);
        }
        out
    }

    /// Host callback: the bitmap for `id` could not be decoded. The creation
    /// is dropped and the store is untouched.
    pub fn image_decode_failed(&mut self, id: ImageId) -> Vec<Action> {
        if self.pending_images.remove(&id).is_some() {
            warn!(room = %self.room, id, "image decode failed; dropping image");
        }
        Vec::new()
    }

    pub fn delete_image(&mut self, id: ImageId) -> Vec<Action> {
        let mut out = Vec::new();
        if self.remove_image(id) {
            out.push(Action::RenderNeeded);
            self.send_surface(SurfaceMessage::DeleteImage { id }, &mut out);
        }
        out
    }

    fn remove_image(&mut self, id: ImageId) -> bool {
        let pending = self.pending_images.remove(&id).is_some();
        let stored = self.store.delete_image(id).is_some();
        if self.input.target() == Some(&Target::Image(id)) {
            self.input = InputMode::Idle;
            self.throttle.reset();
        }
        pending || stored
    }

    /// Start decoding an image received from a peer.
    fn receive_image(&mut self, id: ImageId, rect: Rect, data_url: String) -> Vec<Action> {
        self.store.ids_mut().observe_image(id);
        self.pending_images.insert(id, PendingImage { rect, data_url: data_url.clone(), local: false });
        vec![Action::DecodeImage { id, data_url }]
    }

    /// Geometry for an image that is stored, still decoding, or unknown.
    ///
    /// An unknown image is created from `data_url` when one is present, so a
    /// client that missed the `image` message still converges.
    fn place_image(&mut self, id: ImageId, rect: Rect, data_url: Option<String>) -> Vec<Action> {
        if self.store.image(id).is_some() {
            return if self.store.resize_image(id, rect) { vec![Action::RenderNeeded] } else { Vec::new() };
        }
        if let Some(pending) = self.pending_images.get_mut(&id) {
            pending.rect = rect;
            return Vec::new();
        }
        match data_url {
            Some(data_url) => self.receive_image(id, rect, data_url),
            None => Vec::new(),
        }
    }

    fn image_rect_or_default(&self, id: ImageId, x: f64, y: f64) -> Rect {
        let size = self
            .store
            .image(id)
            .map(|i| i.rect)
            .or_else(|| self.pending_images.get(&id).map(|p| p.rect))
            .unwrap_or(self.config.image_rect);
        size.moved_to(Point::new(x, y))
    }

    // --- Board ---

    /// Wipe the board for everyone.
    pub fn clear(&mut self) -> Vec<Action> {
        let mut out = Vec::new();
        self.send_surface(SurfaceMessage::Clear {}, &mut out);
        self.apply_clear(&mut out);
        out
    }

    fn apply_clear(&mut self, out: &mut Vec<Action>) {
        for frame in self.store.clear_all() {
            self.release_frame(&frame, out);
        }
        self.pending_images.clear();
        self.input = InputMode::Idle;
        self.throttle.reset();
        push_settings(self.focus.reset(), out);
        out.push(Action::ClearStrokes);
        out.push(Action::RenderNeeded);
    }

    /// Close a removed frame's channel and stop its timer.
    fn release_frame(&mut self, frame: &GameFrame, out: &mut Vec<Action>) {
        self.open_games.remove(&frame.id);
        if matches!(frame.game, GameState::Memory(_)) {
            out.push(Action::StopTimer { frame: frame.id.clone() });
        }
        out.push(Action::CloseGameChannel { frame: frame.id.clone() });
        if self.input.target() == Some(&Target::Frame(frame.id.clone())) {
            self.input = InputMode::Idle;
            self.throttle.reset();
        }
    }

    // --- Frames ---

    /// Create a game frame at the default position, configured with the
    /// default settings, and focus it.
    pub fn add_game(&mut self, kind: GameKind) -> Vec<Action> {
        let mut out = Vec::new();
        let game = match self.default_game(kind) {
            Ok(game) => game,
            Err(message) => {
                out.push(Action::Notice { frame: None, message });
                return out;
            }
        };
        let id = self.store.ids_mut().next_frame_id();
        let r = self.config.frame_rect;
        self.store.put_game_frame(id.clone(), r, game, true);
        out.push(Action::RenderNeeded);
        let message = SurfaceMessage::AddGameElement {
            id: id.clone(),
            game_name: kind,
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        };
        self.send_surface(message, &mut out);
        out.push(Action::OpenGameChannel { frame: id.clone(), kind });
        self.focus_local(&id, &mut out);
        out
    }

    fn default_game(&mut self, kind: GameKind) -> Result<GameState, String> {
        match kind {
            GameKind::Puzzle => {
                let settings = PuzzleSettings {
                    grid_size: self.config.default_grid_size,
                    image: Some(self.config.default_puzzle_image.clone()),
                    is_preset: true,
                    name: String::new(),
                };
                PuzzleGame::shuffled(settings, &mut self.rng).map(GameState::Puzzle).map_err(|e| e.to_string())
            }
            GameKind::Memory => {
                let settings = MemorySettings {
                    name: self.config.default_memory_name.clone(),
                    pair_count: self.config.default_pair_count,
                    images: ImageSet::Preset(self.config.default_preset.clone()),
                };
                MemoryGame::with_settings(settings, &self.config.preset_base_path)
                    .map(GameState::Memory)
                    .map_err(|e| e.to_string())
            }
        }
    }

    pub fn delete_game(&mut self, frame: &FrameId) -> Vec<Action> {
        let mut out = Vec::new();
        if self.remove_frame(frame, &mut out) {
            self.send_surface(SurfaceMessage::DeleteGameElement { id: frame.clone() }, &mut out);
        }
        out
    }

    fn remove_frame(&mut self, id: &FrameId, out: &mut Vec<Action>) -> bool {
        let Some(frame) = self.store.delete_game_frame(id) else {
            return false;
        };
        self.release_frame(&frame, out);
        push_settings(self.focus.forget(&self.store, id), out);
        out.push(Action::RenderNeeded);
        true
    }

    /// Focus a frame from this client.
    pub fn focus_frame(&mut self, frame: &FrameId) -> Vec<Action> {
        let mut out = Vec::new();
        self.focus_local(frame, &mut out);
        out
    }

    /// Blur a frame from this client.
    pub fn blur_frame(&mut self, frame: &FrameId) -> Vec<Action> {
        let mut out = Vec::new();
        self.blur_local(frame, &mut out);
        out
    }

    fn focus_local(&mut self, id: &FrameId, out: &mut Vec<Action>) {
        if self.store.frame(id).is_none_or(|f| f.focused) {
            return;
        }
        let Some(change) = self.focus.focus(&mut self.store, id) else {
            return;
        };
        self.send_surface(SurfaceMessage::GameElementFocus { id: id.clone() }, out);
        push_settings(change, out);
        out.push(Action::RenderNeeded);
        self.deal_if_undealt(id, out);
    }

    fn blur_local(&mut self, id: &FrameId, out: &mut Vec<Action>) {
        if !self.store.frame(id).is_some_and(|f| f.focused) {
            return;
        }
        let Some(change) = self.focus.blur(&mut self.store, id) else {
            return;
        };
        self.send_surface(SurfaceMessage::GameElementBlur { id: id.clone() }, out);
        push_settings(change, out);
        out.push(Action::RenderNeeded);
    }

    // --- Inbound surface ---

    /// Decode and apply one message from the surface channel.
    ///
    /// Malformed messages are logged and dropped.
    pub fn receive_surface(&mut self, text: &str) -> Vec<Action> {
        match wire::decode::<SurfaceMessage>(text) {
            Ok(message) => self.apply_surface(message),
            Err(err) => {
                warn!(room = %self.room, channel = "surface", %err, "dropping inbound message");
                Vec::new()
            }
        }
    }

    /// Apply one decoded surface message from a peer.
    pub fn apply_surface(&mut self, message: SurfaceMessage) -> Vec<Action> {
        let mut out = Vec::new();
        match message {
            SurfaceMessage::Draw(mut stroke) => {
                stroke.color = stroke_color(stroke.tool, &stroke.color).to_owned();
                out.push(Action::StrokeSegment(stroke));
            }
            SurfaceMessage::Image { id, x, y, width, height, data_url } => {
                return self.receive_image(id, Rect::new(x, y, width, height), data_url);
            }
            SurfaceMessage::DeleteImage { id } => {
                if self.remove_image(id) {
                    out.push(Action::RenderNeeded);
                }
            }
            SurfaceMessage::MoveImage { id, x, y, data_url } => {
                let rect = self.image_rect_or_default(id, x, y);
                return self.place_image(id, rect, data_url);
            }
            SurfaceMessage::ResizeImage { id, x, y, width, height, data_url } => {
                return self.place_image(id, Rect::new(x, y, width, height), data_url);
            }
            SurfaceMessage::ImageDragUpdate { id, x, y } => {
                let rect = self.image_rect_or_default(id, x, y);
                return self.place_image(id, rect, None);
            }
            SurfaceMessage::ImageResizeUpdate { id, x, y, width, height } => {
                return self.place_image(id, Rect::new(x, y, width, height), None);
            }
            SurfaceMessage::Clear {} => self.apply_clear(&mut out),
            SurfaceMessage::AddGameElement { id, game_name, x, y, width, height } => {
                if let Some(previous) = self.store.frame(&id).cloned() {
                    self.release_frame(&previous, &mut out);
                }
                self.store.put_game_frame(
                    id.clone(),
                    Rect::new(x, y, width, height),
                    GameState::unconfigured(game_name),
                    false,
                );
                out.push(Action::OpenGameChannel { frame: id, kind: game_name });
                out.push(Action::RenderNeeded);
            }
            SurfaceMessage::DeleteGameElement { id } => {
                self.remove_frame(&id, &mut out);
            }
            SurfaceMessage::MoveGameElement { id, x, y } | SurfaceMessage::GameElementDragUpdate { id, x, y } => {
                if self.store.move_game_frame(&id, x, y) {
                    out.push(Action::RenderNeeded);
                }
            }
            SurfaceMessage::ResizeGameElement { id, x, y, width, height }
            | SurfaceMessage::GameElementResizeUpdate { id, x, y, width, height } => {
                if self.store.resize_game_frame(&id, Rect::new(x, y, width, height)) {
                    out.push(Action::RenderNeeded);
                }
            }
            SurfaceMessage::GameElementFocus { id } => match self.focus.focus(&mut self.store, &id) {
                Some(change) => {
                    push_settings(change, &mut out);
                    out.push(Action::RenderNeeded);
                }
                None => debug!(room = %self.room, frame = %id, "focus for unknown frame"),
            },
            SurfaceMessage::GameElementBlur { id } => match self.focus.blur(&mut self.store, &id) {
                Some(change) => {
                    push_settings(change, &mut out);
                    out.push(Action::RenderNeeded);
                }
                None => debug!(room = %self.room, frame = %id, "blur for unknown frame"),
            },
        }
        out
    }
}

fn push_settings(change: SettingsChange, out: &mut Vec<Action>) {
    match change {
        SettingsChange::Show { frame, kind } => out.push(Action::ShowSettings { frame, kind }),
        SettingsChange::Clear => out.push(Action::ClearSettings),
        SettingsChange::Unchanged => {}
    }
}
