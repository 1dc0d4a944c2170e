//! Auto-open roster:
//!   GET    /api/auto-open            – roster, most recently added first
//!   GET    /api/auto-open/{user_id}  – membership
//!   PUT    /api/auto-open/{user_id}  – add
//!   DELETE /api/auto-open/{user_id}  – remove

use axum::extract::{Path, State};
use serde_json::json;

use crate::app::SharedState;

use super::{ApiResult, ok_json, watch_error};

/// GET /api/auto-open
pub async fn list(State(state): State<SharedState>) -> ApiResult {
    let ids = state
        .options()
        .auto_open_user_ids()
        .await
        .map_err(watch_error)?;
    Ok(ok_json(json!({ "userIds": ids })))
}

/// GET /api/auto-open/{user_id}
pub async fn get_member(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> ApiResult {
    let enabled = state
        .popup()
        .is_auto_open_user(&user_id)
        .await
        .map_err(watch_error)?;
    Ok(ok_json(json!({ "userId": user_id, "enabled": enabled })))
}

/// PUT /api/auto-open/{user_id}
pub async fn enable(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> ApiResult {
    state
        .popup()
        .set_auto_open_user(&user_id, true)
        .await
        .map_err(watch_error)?;
    Ok(ok_json(json!({ "userId": user_id, "enabled": true })))
}

/// DELETE /api/auto-open/{user_id}
pub async fn disable(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> ApiResult {
    state
        .options()
        .disable_auto_open(&user_id)
        .await
        .map_err(watch_error)?;
    Ok(ok_json(json!({ "userId": user_id, "enabled": false })))
}
