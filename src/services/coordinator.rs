//! Coordinator — connection lifecycle, inbound dispatch, and fan-out.
//!
//! DESIGN
//! ======
//! Every entry point takes the hub write lock for its whole duration, so
//! connect, message, disconnect, and the throttle flush never interleave.
//! Sends are `try_send` into per-connection queues and never block.
//!
//! LIFECYCLE
//! =========
//! 1. Connect → register sender; if a position resolves, store it, exchange
//!    markers with every known position, then sync counter and game state
//! 2. Message → increment (throttled broadcast) or game move (broadcast to all)
//! 3. Close/error → unregister, broadcast `remove-marker` to the rest
//!
//! ERROR HANDLING
//! ==============
//! A failed send marks the target as failed instead of aborting the loop.
//! Once the loop finishes, each failed connection goes through the same
//! removal path as a close. Removal broadcasts can fail in turn; the work
//! list keeps going until no failures remain. Each connection is removed at
//! most once because removal drops its sender from the registry.

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::message::{ClientMessage, DecodeError, Position, ServerMessage};
use crate::services::location::LocationHint;
use crate::services::throttle;
use crate::state::{AppState, Hub};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("connection {0} is not registered")]
    Unknown(Uuid),
    #[error("connection {0} is closed")]
    Closed(Uuid),
    #[error("connection {0} outbound queue is full")]
    Full(Uuid),
}

/// Point-in-time view of the hub, served by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub counter: u64,
    pub fen: String,
    pub connections: usize,
    pub markers: Vec<Position>,
}

/// Collects connections whose sends failed during one handler run.
#[derive(Debug, Default)]
struct Outbox {
    failed: Vec<Uuid>,
}

impl Outbox {
    fn send(&mut self, hub: &Hub, client_id: Uuid, message: &ServerMessage) {
        if self.failed.contains(&client_id) {
            return;
        }
        match deliver(hub, client_id, message) {
            Ok(()) | Err(DeliveryError::Unknown(_)) => {}
            Err(e) => {
                warn!(error = %e, kind = message.kind(), "send failed; treating connection as closed");
                self.failed.push(client_id);
            }
        }
    }

    fn broadcast(&mut self, hub: &Hub, message: &ServerMessage, exclude: Option<Uuid>) {
        for client_id in hub.clients.keys() {
            if exclude == Some(*client_id) {
                continue;
            }
            self.send(hub, *client_id, message);
        }
    }

    /// Remove every failed connection, including ones that fail while the
    /// removals are being announced.
    fn settle(&mut self, hub: &mut Hub) {
        while let Some(client_id) = self.failed.pop() {
            self.remove(hub, client_id);
        }
    }

    /// Unregister one connection and tell everyone else. Returns `false` if
    /// it was already gone.
    fn remove(&mut self, hub: &mut Hub, client_id: Uuid) -> bool {
        if hub.clients.remove(&client_id).is_none() {
            return false;
        }
        hub.sessions.remove(client_id);
        info!(%client_id, remaining = hub.clients.len(), "client removed");
        self.broadcast(hub, &ServerMessage::RemoveMarker { id: client_id }, Some(client_id));
        true
    }
}

fn deliver(hub: &Hub, client_id: Uuid, message: &ServerMessage) -> Result<(), DeliveryError> {
    let Some(tx) = hub.clients.get(&client_id) else {
        return Err(DeliveryError::Unknown(client_id));
    };
    tx.try_send(message.clone()).map_err(|e| match e {
        TrySendError::Full(_) => DeliveryError::Full(client_id),
        TrySendError::Closed(_) => DeliveryError::Closed(client_id),
    })
}

// =============================================================================
// CONNECT
// =============================================================================

/// Register a new connection, bring it up to date, and hand back its queue.
///
/// The queue holds at least `capacity` messages and is grown to fit the
/// whole connect sync, so the newcomer cannot overflow before its socket
/// loop starts draining. Without a resolvable location the connection is
/// registered for broadcasts only and nothing is sent to it here.
pub async fn connect(
    state: &AppState,
    client_id: Uuid,
    hint: LocationHint,
    capacity: usize,
) -> mpsc::Receiver<ServerMessage> {
    let mut guard = state.hub.write().await;
    let hub = &mut *guard;

    let Some(position) = hint.resolve(client_id) else {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        hub.clients.insert(client_id, tx);
        warn!(%client_id, "missing position information; registered without marker");
        return rx;
    };
    hub.sessions.insert(position.clone());

    // One marker per stored position, then counter and game state.
    let (tx, rx) = mpsc::channel(capacity.max(hub.sessions.len() + 2));
    hub.clients.insert(client_id, tx);

    let mut outbox = Outbox::default();
    let announce = ServerMessage::AddMarker { position };
    for peer in hub.sessions.snapshot() {
        let peer_id = peer.id;
        outbox.send(hub, client_id, &ServerMessage::AddMarker { position: peer });
        if peer_id != client_id {
            outbox.send(hub, peer_id, &announce);
        }
    }

    outbox.send(hub, client_id, &ServerMessage::CounterUpdate { value: hub.shared.counter() });
    outbox.send(hub, client_id, &ServerMessage::GameSync { fen: hub.shared.game_state().to_owned() });

    info!(%client_id, markers = hub.sessions.len(), clients = hub.clients.len(), "client synced");
    outbox.settle(hub);
    rx
}

// =============================================================================
// MESSAGE
// =============================================================================

/// Decode and handle a text payload. Undecodable payloads are dropped.
pub async fn handle_text(state: &AppState, client_id: Uuid, text: &str) {
    dispatch(state, client_id, ClientMessage::decode(text)).await;
}

/// Decode and handle a binary payload. Undecodable payloads are dropped.
pub async fn handle_binary(state: &AppState, client_id: Uuid, bytes: &[u8]) {
    dispatch(state, client_id, ClientMessage::decode_bytes(bytes)).await;
}

async fn dispatch(state: &AppState, client_id: Uuid, decoded: Result<ClientMessage, DecodeError>) {
    match decoded {
        Ok(message) => handle_message(state, client_id, message).await,
        Err(e) => debug!(%client_id, error = %e, "discarding inbound message"),
    }
}

/// Apply one decoded client message.
pub async fn handle_message(state: &AppState, client_id: Uuid, message: ClientMessage) {
    let mut guard = state.hub.write().await;
    let hub = &mut *guard;

    if !hub.clients.contains_key(&client_id) {
        debug!(%client_id, "ignoring message from unregistered connection");
        return;
    }

    match message {
        ClientMessage::IncrementCounter => {
            let value = hub.shared.increment();
            if hub.throttle.arm() {
                debug!(value, window = ?hub.throttle.window(), "counter flush scheduled");
                throttle::spawn_flush(state.clone(), hub.throttle.window());
            }
        }
        ClientMessage::GameMove { from, to, fen } => {
            hub.shared.set_game_state(fen.clone());
            info!(%client_id, %from, %to, "game move relayed");
            let mut outbox = Outbox::default();
            outbox.broadcast(hub, &ServerMessage::GameMove { from, to, fen }, None);
            outbox.settle(hub);
        }
    }
}

// =============================================================================
// DISCONNECT
// =============================================================================

/// Close or error on a connection. Safe to call more than once.
pub async fn disconnect(state: &AppState, client_id: Uuid) {
    let mut guard = state.hub.write().await;
    let hub = &mut *guard;

    let mut outbox = Outbox::default();
    if !outbox.remove(hub, client_id) {
        debug!(%client_id, "disconnect for unknown connection");
        return;
    }
    outbox.settle(hub);
}

// =============================================================================
// THROTTLE FLUSH
// =============================================================================

/// Timer body: re-arm the throttle and broadcast the counter as it is now.
pub async fn flush_counter(state: &AppState) {
    let mut guard = state.hub.write().await;
    let hub = &mut *guard;

    hub.throttle.fire();
    let value = hub.shared.counter();
    debug!(value, clients = hub.clients.len(), "counter flush");

    let mut outbox = Outbox::default();
    outbox.broadcast(hub, &ServerMessage::CounterUpdate { value }, None);
    outbox.settle(hub);
}

// =============================================================================
// SNAPSHOT
// =============================================================================

pub async fn snapshot(state: &AppState) -> StateSnapshot {
    let hub = state.hub.read().await;
    StateSnapshot {
        counter: hub.shared.counter(),
        fen: hub.shared.game_state().to_owned(),
        connections: hub.clients.len(),
        markers: hub.sessions.snapshot(),
    }
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod tests;
