//! Process-wide shared values: the global counter and the game state.
//!
//! Both live for the lifetime of the process and reset on restart. The
//! coordinator is the single writer; broadcasts read them under the hub lock.

/// Global counter plus latest game state.
#[derive(Debug)]
pub struct SharedState {
    counter: u64,
    game_state: String,
}

impl SharedState {
    #[must_use]
    pub fn new(initial_game_state: impl Into<String>) -> Self {
        Self { counter: 0, game_state: initial_game_state.into() }
    }

    /// Add one to the counter and return the new value.
    pub fn increment(&mut self) -> u64 {
        self.counter = self.counter.saturating_add(1);
        self.counter
    }

    #[must_use]
    pub fn counter(&self) -> u64 {
        self.counter
    }

    #[must_use]
    pub fn game_state(&self) -> &str {
        &self.game_state
    }

    /// Replace the game state wholesale.
    pub fn set_game_state(&mut self, state: impl Into<String>) {
        self.game_state = state.into();
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_GAME_STATE)
    }
}
