//! Message — wire types exchanged with globe clients.
//!
//! DESIGN
//! ======
//! Every frame on the socket is a JSON object tagged by `type`. Outbound
//! traffic is a `ServerMessage`, inbound traffic a `ClientMessage`. Decoding
//! fails closed: unknown tags and malformed payloads surface as a
//! `DecodeError` and the caller discards them.
//!
//! Game payloads (`from`, `to`, `fen`) are opaque strings. The relay never
//! interprets them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// POSITION
// =============================================================================

/// Resolved location of one live connection. `id` is always the owning
/// connection's identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
    pub id: Uuid,
}

// =============================================================================
// OUTBOUND
// =============================================================================

/// Server → client messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    AddMarker { position: Position },
    RemoveMarker { id: Uuid },
    CounterUpdate { value: u64 },
    GameMove { from: String, to: String, fen: String },
    GameSync { fen: String },
}

impl ServerMessage {
    /// Wire tag, used for log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddMarker { .. } => "add-marker",
            Self::RemoveMarker { .. } => "remove-marker",
            Self::CounterUpdate { .. } => "counter-update",
            Self::GameMove { .. } => "game-move",
            Self::GameSync { .. } => "game-sync",
        }
    }
}

// =============================================================================
// INBOUND
// =============================================================================

/// Client → server messages.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    IncrementCounter,
    #[serde(alias = "chess-move")]
    GameMove { from: String, to: String, fen: String },
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("payload is not valid utf-8")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("unrecognized or malformed message: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientMessage {
    /// Decode a text payload.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Json` for invalid JSON, a missing or unknown
    /// `type`, or missing fields.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Decode a binary payload as UTF-8 JSON.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Utf8` if the bytes are not UTF-8, otherwise the
    /// same errors as [`ClientMessage::decode`].
    pub fn decode_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(std::str::from_utf8(bytes)?)
    }
}

#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
