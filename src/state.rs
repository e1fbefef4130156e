//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. All
//! coordinator-owned data sits in one `Hub` behind a single `RwLock`, so
//! connect, message, disconnect, and throttle flush are serialized against
//! each other. Sends never block (`try_send`), so the lock is never held
//! across socket I/O.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::config::Config;
use crate::message::ServerMessage;
use crate::services::session::SessionStore;
use crate::services::shared::SharedState;
use crate::services::throttle::Throttle;

// =============================================================================
// HUB
// =============================================================================

/// Everything the coordinator owns.
pub struct Hub {
    /// Live connections: `client_id` -> sender for outgoing messages.
    /// Includes connections without a resolved position.
    pub clients: HashMap<Uuid, mpsc::Sender<ServerMessage>>,
    /// Resolved positions for the subset of clients that have one.
    pub sessions: SessionStore,
    /// Global counter and game state.
    pub shared: SharedState,
    /// Counter broadcast throttle.
    pub throttle: Throttle,
}

impl Hub {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            clients: HashMap::new(),
            sessions: SessionStore::new(),
            shared: SharedState::new(config.initial_game_state.clone()),
            throttle: Throttle::new(config.counter_throttle),
        }
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum; inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<RwLock<Hub>>,
    pub config: Arc<Config>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { hub: Arc::new(RwLock::new(Hub::new(&config))), config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use std::time::Duration;

    /// `AppState` with default config.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(Config::default())
    }

    /// `AppState` with a custom throttle window.
    #[must_use]
    pub fn test_app_state_with_throttle(window: Duration) -> AppState {
        AppState::new(Config { counter_throttle: window, ..Config::default() })
    }

    /// Drain every message currently queued on a receiver.
    pub fn drain(rx: &mut mpsc::Receiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }
}
