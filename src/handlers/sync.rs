use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;

use crate::services::SyncStatus;
use crate::AppState;

#[derive(Serialize)]
pub struct SyncStatusResponse {
    #[serde(flatten)]
    pub status: SyncStatus,
    pub stored_events: usize,
}

/// GET /sync/status - state of the background sync and size of the store
pub async fn get_sync_status(
    State(state): State<AppState>,
) -> Result<Json<SyncStatusResponse>, (StatusCode, Json<serde_json::Value>)> {
    let stored_events = state.store.len().await.map_err(|e| {
        tracing::error!("Error counting events: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": "Database error"})),
        )
    })?;

    Ok(Json(SyncStatusResponse {
        status: state.sync.status().await,
        stored_events,
    }))
}
