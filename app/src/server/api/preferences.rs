//! GET|PUT /api/preferences – notification flag and alert volume.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::WatchResult;
use crate::app::SharedState;
use crate::usecase::OptionsUseCase;

use super::{ApiResult, err_json, ok_json, watch_error};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesBody {
    pub show_notification: Option<bool>,
    pub sound_volume: Option<f32>,
}

async fn snapshot(options: &OptionsUseCase) -> WatchResult<Value> {
    Ok(json!({
        "showNotification": options.show_notification().await?,
        "soundVolume": options.sound_volume().await?,
    }))
}

/// GET /api/preferences
pub async fn get_preferences(State(state): State<SharedState>) -> ApiResult {
    let prefs = snapshot(state.options()).await.map_err(watch_error)?;
    Ok(ok_json(prefs))
}

/// PUT /api/preferences
pub async fn update_preferences(
    State(state): State<SharedState>,
    Json(body): Json<PreferencesBody>,
) -> ApiResult {
    let options = state.options();
    if let Some(volume) = body.sound_volume {
        if !(0.0..=1.0).contains(&volume) {
            return Err(err_json(400, "soundVolume must be between 0.0 and 1.0"));
        }
        options.set_sound_volume(volume).await.map_err(watch_error)?;
    }
    if let Some(enabled) = body.show_notification {
        options
            .set_show_notification(enabled)
            .await
            .map_err(watch_error)?;
    }
    let prefs = snapshot(options).await.map_err(watch_error)?;
    Ok(ok_json(prefs))
}
