//! Domain services used by the websocket and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! The coordinator owns every decision about who receives what. The other
//! modules are the pieces it composes: the session store, the shared
//! counter and game state, the broadcast throttle, and location resolution.

pub mod coordinator;
pub mod location;
pub mod session;
pub mod shared;
pub mod throttle;
