//! Runtime configuration loaded from environment variables.
//!
//! Every knob has a typed default. A variable that is set but does not parse
//! is a startup error rather than a silent fallback.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_COUNTER_THROTTLE_MS: u64 = 50;
const DEFAULT_CLIENT_QUEUE_CAPACITY: usize = 256;
pub const DEFAULT_GAME_STATE: &str = "start";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TCP port bound on all interfaces.
    pub port: u16,
    /// Broadcast window for coalesced counter updates.
    pub counter_throttle: Duration,
    /// Outbound queue depth per connection. A full queue counts as a failed send.
    pub client_queue_capacity: usize,
    /// Shared game state before any move arrives.
    pub initial_game_state: String,
    /// Optional directory of static client assets.
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            counter_throttle: Duration::from_millis(DEFAULT_COUNTER_THROTTLE_MS),
            client_queue_capacity: DEFAULT_CLIENT_QUEUE_CAPACITY,
            initial_game_state: DEFAULT_GAME_STATE.to_owned(),
            static_dir: None,
        }
    }
}

impl Config {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_var(&lookup, "PORT", DEFAULT_PORT)?;
        let throttle_ms = parse_var(&lookup, "COUNTER_THROTTLE_MS", DEFAULT_COUNTER_THROTTLE_MS)?;
        let capacity = parse_var(&lookup, "CLIENT_QUEUE_CAPACITY", DEFAULT_CLIENT_QUEUE_CAPACITY)?;

        Ok(Self {
            port,
            counter_throttle: Duration::from_millis(throttle_ms),
            // mpsc::channel panics on zero capacity.
            client_queue_capacity: capacity.max(1),
            initial_game_state: lookup("INITIAL_GAME_STATE").unwrap_or_else(|| DEFAULT_GAME_STATE.to_owned()),
            static_dir: lookup("STATIC_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
