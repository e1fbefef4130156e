//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the websocket endpoints, the read-only state snapshot, and the
//! health check under one Axum router. The browser client connects to
//! `/parties/globe/{room}`; `/ws` is the same endpoint without the room
//! segment. Every room shares the one coordinator. When `STATIC_DIR` is
//! configured, unmatched paths serve the client assets from it.

pub mod status;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        .route("/ws", get(ws::handle_ws))
        .route("/parties/globe/{room}", get(ws::handle_ws))
        .route("/api/state", get(status::get_state))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state);

    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => router.fallback(not_found),
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
