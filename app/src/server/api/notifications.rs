use axum::extract::{Path, State};
use serde_json::json;

use crate::app::SharedState;

use super::{ApiResult, ok_json, watch_error};

/// POST /api/notifications/{id}/click
pub async fn click(State(state): State<SharedState>, Path(id): Path<String>) -> ApiResult {
    state
        .engine()
        .open_notification(&id)
        .await
        .map_err(watch_error)?;
    Ok(ok_json(json!({ "id": id })))
}
