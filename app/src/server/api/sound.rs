use axum::extract::State;
use serde_json::json;

use crate::app::SharedState;

use super::{ApiResult, ok_json, watch_error};

/// POST /api/sound/test
pub async fn play_test_sound(State(state): State<SharedState>) -> ApiResult {
    state
        .options()
        .play_test_sound()
        .await
        .map_err(watch_error)?;
    Ok(ok_json(json!({ "played": true })))
}
