//! WebSocket handler — transport for the coordinator.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID, registers an outbound queue with the
//! coordinator, and enters a `select!` loop:
//! - Incoming client frames → coordinator message handling
//! - Queued server messages → serialize and forward to the socket
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → resolve location hint from query/headers → `connect`
//! 2. Client frames → `handle_text` / `handle_binary`
//! 3. Close, socket error, or failed socket write → `disconnect`
//! 4. Queue closed by the coordinator (eviction) → close frame, `disconnect` no-op

use std::collections::HashMap;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use tracing::{debug, info};
use uuid::Uuid;

use crate::message::ServerMessage;
use crate::services::coordinator;
use crate::services::location::LocationHint;
use crate::state::AppState;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let hint = LocationHint::from_request(&params, &headers);
    ws.on_upgrade(move |socket| run_ws(socket, state, hint))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, hint: LocationHint) {
    let client_id = Uuid::new_v4();

    info!(%client_id, lat = ?hint.lat, lng = ?hint.lng, "ws: client connected");
    // Per-connection queue; the coordinator holds the sender.
    let mut client_rx = coordinator::connect(&state, client_id, hint, state.config.client_queue_capacity).await;

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(e) => {
                        debug!(%client_id, error = %e, "ws: receive error");
                        break;
                    }
                };
                match msg {
                    Message::Text(text) => coordinator::handle_text(&state, client_id, text.as_str()).await,
                    Message::Binary(bytes) => coordinator::handle_binary(&state, client_id, &bytes).await,
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            outbound = client_rx.recv() => {
                let Some(message) = outbound else {
                    // Evicted after a failed send.
                    let _ = socket.send(Message::Close(None)).await;
                    break;
                };
                if let Err(e) = send_message(&mut socket, &message).await {
                    debug!(%client_id, error = %e, kind = message.kind(), "ws: send failed");
                    break;
                }
            }
        }
    }

    coordinator::disconnect(&state, client_id).await;
    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// HELPERS
// =============================================================================

#[derive(Debug, thiserror::Error)]
enum SendError {
    #[error("failed to serialize message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("socket write failed: {0}")]
    Socket(#[from] axum::Error),
}

async fn send_message(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), SendError> {
    let json = serde_json::to_string(message)?;
    socket.send(Message::Text(json.into())).await?;
    Ok(())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
