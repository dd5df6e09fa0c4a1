//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::websocket::SessionStateDto, ui::state::AppState};
use kotatsu_shared::time::get_unix_timestamp;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok", "timestamp": get_unix_timestamp()}))
}

/// Debug endpoint to inspect the current session state (for testing purposes)
pub async fn debug_session_state(State(state): State<Arc<AppState>>) -> Json<SessionStateDto> {
    let snapshot = state.sync_session_usecase.execute().await;
    Json(SessionStateDto::from(snapshot))
}
