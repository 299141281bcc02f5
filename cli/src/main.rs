mod host;

use std::time::Duration;

use board::SessionConfig;
use board::geom::Point;
use clap::{Args, Parser, Subcommand, ValueEnum};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use wire::GameKind;
use wire::api::{MemoryList, PuzzleList, StatusResponse};

use crate::host::Host;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing session token; pass --session-token or set BOARDROOM_SESSION_TOKEN")]
    MissingSessionToken,
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("server returned {status}: {message}")]
    ServerError { status: String, message: String },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "boardroom-cli", about = "Headless boardroom participant and save/load API client")]
struct Cli {
    #[arg(long, env = "BOARDROOM_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "BOARDROOM_SESSION_TOKEN")]
    session_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    session_token: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the relay answers its health probe.
    Ping,
    /// Saved game configurations.
    Games(GamesCommand),
    /// Join a room and log everything that happens on it.
    Watch(WatchArgs),
    /// Draw one pen stroke through the given points.
    Draw(DrawArgs),
    /// Add a game frame to the room and serve its configuration.
    AddGame(AddGameArgs),
    /// Clear the room for everyone.
    Clear(RoomArgs),
}

#[derive(Args, Debug)]
struct GamesCommand {
    #[command(subcommand)]
    command: GamesSubcommand,
}

#[derive(Subcommand, Debug)]
enum GamesSubcommand {
    List {
        #[arg(long, value_enum, default_value_t = SavedKind::Puzzle)]
        kind: SavedKind,
    },
    Delete {
        id: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SavedKind {
    Puzzle,
    Memory,
}

#[derive(Args, Debug)]
struct RoomArgs {
    #[arg(long)]
    room: String,
}

#[derive(Args, Debug)]
struct WatchArgs {
    #[arg(long)]
    room: String,

    #[arg(long, help = "Stop after this many seconds; runs until Ctrl-C when absent")]
    seconds: Option<u64>,
}

#[derive(Args, Debug)]
struct DrawArgs {
    #[arg(long)]
    room: String,

    #[arg(long, default_value = "#000000")]
    color: String,

    #[arg(long, default_value_t = 2.0)]
    line_width: f64,

    #[arg(long, default_value_t = false)]
    eraser: bool,

    #[arg(required = true, num_args = 2.., value_parser = parse_point, help = "Points as x,y")]
    points: Vec<Point>,
}

#[derive(Args, Debug)]
struct AddGameArgs {
    #[arg(long)]
    room: String,

    #[arg(long, value_parser = parse_game_kind)]
    kind: GameKind,

    #[arg(long, default_value_t = 5, help = "Seconds to stay and answer state requests")]
    linger: u64,
}

/// Time given to the relay to flush what a one-shot command sent.
const SETTLE: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let ctx = CliContext { base_url: cli.base_url, session_token: cli.session_token };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Games(games) => run_games(&ctx, games).await,
        Command::Watch(args) => run_watch(&ctx, args).await,
        Command::Draw(args) => run_draw(&ctx, args).await,
        Command::AddGame(args) => run_add_game(&ctx, args).await,
        Command::Clear(args) => run_clear(&ctx, args).await,
    }
}

async fn run_ping(cli: &CliContext) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let url = format!("{}/healthz", cli.base_url.trim_end_matches('/'));
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError {
            status: format!("HTTP {}", status.as_u16()),
            message: "health check failed".to_owned(),
        });
    }
    println!("ok");
    Ok(())
}

// =============================================================================
// SAVE/LOAD API
// =============================================================================

async fn run_games(cli: &CliContext, games: GamesCommand) -> Result<(), CliError> {
    match games.command {
        GamesSubcommand::List { kind: SavedKind::Puzzle } => {
            let json = api_request(cli, reqwest::Method::GET, "/games/puzzles/load/").await?;
            let list: PuzzleList = serde_json::from_value(json)?;
            ensure_success(list.status, list.message.as_deref())?;
            print_json(&serde_json::to_value(&list.puzzles)?)
        }
        GamesSubcommand::List { kind: SavedKind::Memory } => {
            let json = api_request(cli, reqwest::Method::GET, "/games/memory/load/").await?;
            let list: MemoryList = serde_json::from_value(json)?;
            ensure_success(list.status, list.message.as_deref())?;
            print_json(&serde_json::to_value(&list.games)?)
        }
        GamesSubcommand::Delete { id } => {
            let path = format!("/games/delete/{id}/");
            let json = api_request(cli, reqwest::Method::DELETE, &path).await?;
            // 204 carries no body and counts as success.
            if !json.is_null() {
                let response: StatusResponse = serde_json::from_value(json)?;
                ensure_success(response.status, response.message.as_deref())?;
            }
            println!("deleted {id}");
            Ok(())
        }
    }
}

async fn api_request(cli: &CliContext, method: reqwest::Method, path: &str) -> Result<Value, CliError> {
    let session_token = cli.session_token.as_deref().ok_or(CliError::MissingSessionToken)?;

    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_str(&format!("sessionid={session_token}"))?);

    let client = reqwest::Client::builder().default_headers(headers).build()?;
    let url = format!("{}{}", cli.base_url.trim_end_matches('/'), path);

    let response = client.request(method, &url).send().await?;
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or(Value::Null);

    if !status.is_success() {
        return Err(CliError::ServerError { status: format!("HTTP {}", status.as_u16()), message: value.to_string() });
    }
    Ok(value)
}

fn ensure_success(status: wire::api::ApiStatus, message: Option<&str>) -> Result<(), CliError> {
    if status == wire::api::ApiStatus::Success {
        return Ok(());
    }
    Err(CliError::ServerError {
        status: "error".to_owned(),
        message: message.unwrap_or("request failed").to_owned(),
    })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

// =============================================================================
// ROOM COMMANDS
// =============================================================================

async fn run_watch(cli: &CliContext, args: WatchArgs) -> Result<(), CliError> {
    let mut host = Host::connect(&cli.base_url, &args.room, SessionConfig::default()).await?;
    host.run_for(args.seconds.map(Duration::from_secs)).await;
    let store = host.session().store();
    eprintln!(
        "watch complete: room={} images={} frames={} game_channels={}",
        args.room,
        store.images().len(),
        store.frames().count(),
        host.open_games().len()
    );
    host.shutdown().await;
    Ok(())
}

async fn run_draw(cli: &CliContext, args: DrawArgs) -> Result<(), CliError> {
    let mut host = Host::connect(&cli.base_url, &args.room, SessionConfig::default()).await?;
    host.act(|s| {
        s.set_color(args.color.clone());
        s.set_line_width(args.line_width);
        s.set_tool(if args.eraser { wire::Tool::Eraser } else { wire::Tool::Pen });
        Vec::new()
    })
    .await;

    if let Some((first, rest)) = args.points.split_first() {
        host.act(|s| s.pointer_down(*first)).await;
        for p in rest {
            host.act(|s| s.pointer_move(*p)).await;
        }
        let last = rest.last().unwrap_or(first);
        host.act(|s| s.pointer_up(*last)).await;
    }

    host.run_for(Some(SETTLE)).await;
    eprintln!("draw complete: room={} segments={}", args.room, args.points.len().saturating_sub(1));
    host.shutdown().await;
    Ok(())
}

async fn run_add_game(cli: &CliContext, args: AddGameArgs) -> Result<(), CliError> {
    let mut host = Host::connect(&cli.base_url, &args.room, SessionConfig::default()).await?;
    host.act(|s| s.add_game(args.kind)).await;
    let frame = host.session().focused_frame().cloned();
    host.run_for(Some(Duration::from_secs(args.linger))).await;
    if let Some(frame) = frame {
        eprintln!("add-game complete: room={} frame={frame} kind={}", args.room, args.kind.as_str());
    }
    host.shutdown().await;
    Ok(())
}

async fn run_clear(cli: &CliContext, args: RoomArgs) -> Result<(), CliError> {
    let mut host = Host::connect(&cli.base_url, &args.room, SessionConfig::default()).await?;
    host.act(board::BoardSession::clear).await;
    host.run_for(Some(SETTLE)).await;
    eprintln!("clear complete: room={}", args.room);
    host.shutdown().await;
    Ok(())
}

// =============================================================================
// ARGUMENT PARSING
// =============================================================================

fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw.split_once(',').ok_or_else(|| format!("expected x,y, got {raw:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in {raw:?}: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in {raw:?}: {e}"))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(format!("non-finite point {raw:?}"));
    }
    Ok(Point::new(x, y))
}

fn parse_game_kind(raw: &str) -> Result<GameKind, String> {
    raw.parse()
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
