//! Broadcast throttle — collapses counter bursts into one update per window.
//!
//! DESIGN
//! ======
//! Two states. `Idle` arms on the first increment and a one-shot timer task
//! is spawned; further increments while `Scheduled` do nothing. When the
//! timer fires the flush runs under the hub lock, returns the throttle to
//! `Idle`, and broadcasts the counter value as of that moment. The timer is
//! never cancelled.

use std::time::Duration;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    Idle,
    Scheduled,
}

#[derive(Debug)]
pub struct Throttle {
    window: Duration,
    state: ThrottleState,
}

impl Throttle {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self { window, state: ThrottleState::Idle }
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    #[must_use]
    pub fn state(&self) -> ThrottleState {
        self.state
    }

    /// Move `Idle` → `Scheduled`. Returns `true` if the caller must start the timer.
    pub fn arm(&mut self) -> bool {
        match self.state {
            ThrottleState::Idle => {
                self.state = ThrottleState::Scheduled;
                true
            }
            ThrottleState::Scheduled => false,
        }
    }

    /// Timer fired: back to `Idle`.
    pub fn fire(&mut self) {
        self.state = ThrottleState::Idle;
    }
}

/// Spawn the one-shot timer that flushes the counter after `window`.
pub fn spawn_flush(state: AppState, window: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(window).await;
        crate::services::coordinator::flush_counter(&state).await;
    });
}
