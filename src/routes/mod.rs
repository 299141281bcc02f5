//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One websocket route per channel family plus a health probe. Room and game
//! segments are taken verbatim from the path; the relay has no notion of
//! which rooms or frames exist beyond who is connected right now.

pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/ws/whiteboard/{room}", get(ws::handle_surface))
        .route("/ws/puzzle_on_board/{room}/{game_id}", get(ws::handle_puzzle))
        .route("/ws/memory_on_board/{room}/{game_id}", get(ws::handle_memory))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
