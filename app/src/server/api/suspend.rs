//! GET|PUT /api/suspend – pause auto-open without stopping notifications.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use crate::app::SharedState;

use super::{ApiResult, ok_json, watch_error};

/// GET /api/suspend
pub async fn get_suspend(State(state): State<SharedState>) -> ApiResult {
    let since = state
        .engine()
        .suspend_controller()
        .suspended_since()
        .await
        .map_err(watch_error)?;
    Ok(ok_json(json!({
        "suspended": since.is_some(),
        "since": since,
    })))
}

#[derive(Debug, Deserialize)]
pub struct SuspendBody {
    pub suspended: bool,
}

/// PUT /api/suspend
pub async fn set_suspend(
    State(state): State<SharedState>,
    Json(body): Json<SuspendBody>,
) -> ApiResult {
    let popup = state.popup();
    popup
        .set_suspended(body.suspended)
        .await
        .map_err(watch_error)?;
    let suspended = popup.is_suspended().await.map_err(watch_error)?;
    Ok(ok_json(json!({ "suspended": suspended })))
}
