use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use crate::app::SharedState;

use super::{ApiResult, ok_json, watch_error};

#[derive(Debug, Deserialize)]
pub struct BadgeBody {
    pub count: usize,
}

/// PUT /api/badge
pub async fn set_badge(
    State(state): State<SharedState>,
    Json(body): Json<BadgeBody>,
) -> ApiResult {
    state
        .popup()
        .set_badge_number(body.count)
        .await
        .map_err(watch_error)?;
    Ok(ok_json(json!({ "count": body.count })))
}
