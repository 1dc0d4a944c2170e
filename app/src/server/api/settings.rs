//! Settings management API:
//!   GET /api/settings – all settings (secrets masked) + feature status
//!   PUT /api/settings – validate and store a batch, then reload config.
//!     `SUSPEND_FROM_DATE` goes through the suspend toggle so the badge
//!     colour follows it.

use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::app::SharedState;
use crate::config::SettingsManager;
use crate::config::validation::validate_setting;

use super::{ApiResult, err_json, watch_error};

/// Value the GET endpoint shows in place of a stored secret.
const MASKED_SECRET: &str = "********";
const SUSPEND_KEY: &str = "SUSPEND_FROM_DATE";

fn settings_payload(sm: &SettingsManager) -> ApiResult {
    let all = sm
        .get_all_settings()
        .map_err(|e| err_json(500, &format!("Failed to get settings: {e}")))?;
    let status = sm
        .check_feature_status()
        .map_err(|e| err_json(500, &format!("Failed to check status: {e}")))?;

    Ok(Json(json!({
        "settings": all,
        "status": status,
    })))
}

/// GET /api/settings
pub async fn get_settings(State(state): State<SharedState>) -> ApiResult {
    settings_payload(state.settings())
}

/// PUT /api/settings
pub async fn update_settings(
    State(state): State<SharedState>,
    Json(body): Json<HashMap<String, String>>,
) -> ApiResult {
    let sm = state.settings();
    let mut updates = without_masked_secrets(body);
    let suspend = take_suspend_update(&mut updates)
        .map_err(|e| err_json(400, &format!("{SUSPEND_KEY}: {e}")))?;

    sm.set_settings(&updates)
        .map_err(|e| err_json(400, &e.to_string()))?;
    let mut count = updates.len();
    if let Some(suspended) = suspend {
        state
            .engine()
            .suspend_controller()
            .set_suspended(suspended)
            .await
            .map_err(watch_error)?;
        count += 1;
    }
    tracing::info!(count, "Settings updated");

    state
        .reload_config()
        .await
        .map_err(|e| err_json(500, &format!("Failed to reload config: {e}")))?;

    let Json(mut payload) = settings_payload(sm)?;
    if let Value::Object(map) = &mut payload {
        map.insert(
            "message".into(),
            json!(format!("Updated {count} setting(s) successfully")),
        );
    }
    Ok(Json(payload))
}

/// A client echoing back the masked value means "unchanged".
fn without_masked_secrets(body: HashMap<String, String>) -> HashMap<String, String> {
    body.into_iter()
        .filter(|(_, value)| value != MASKED_SECRET)
        .collect()
}

/// Pull the suspend date out of the batch. Any valid timestamp means
/// "suspend now", empty means "resume".
fn take_suspend_update(updates: &mut HashMap<String, String>) -> Result<Option<bool>, String> {
    let Some(value) = updates.remove(SUSPEND_KEY) else {
        return Ok(None);
    };
    validate_setting(SUSPEND_KEY, &value)?;
    Ok(Some(!value.is_empty()))
}
