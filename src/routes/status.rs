//! Read-only snapshot of the coordinator state.

use axum::extract::State;
use axum::response::Json;

use crate::services::coordinator::{self, StateSnapshot};
use crate::state::AppState;

pub async fn get_state(State(state): State<AppState>) -> Json<StateSnapshot> {
    Json(coordinator::snapshot(&state).await)
}
