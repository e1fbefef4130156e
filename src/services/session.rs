//! Session store — resolved positions keyed by connection.
//!
//! DESIGN
//! ======
//! Only connections whose location resolved at connect time have an entry.
//! Entries are immutable once inserted and removed on disconnect. The store
//! is owned by the `Hub` and never written from outside the coordinator.

use std::collections::HashMap;

use uuid::Uuid;

use crate::message::Position;

#[derive(Debug, Default)]
pub struct SessionStore {
    positions: HashMap<Uuid, Position>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a position under its own id. Returns the previous entry, if any.
    pub fn insert(&mut self, position: Position) -> Option<Position> {
        self.positions.insert(position.id, position)
    }

    /// Remove an entry. No-op if absent.
    pub fn remove(&mut self, id: Uuid) -> Option<Position> {
        self.positions.remove(&id)
    }

    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool {
        self.positions.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Owned copy of every stored position, in no particular order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Position> {
        self.positions.values().cloned().collect()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
