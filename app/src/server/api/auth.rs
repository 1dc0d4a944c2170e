//! Account connection:
//!   POST /api/connect – run the authorization flow through the engine
//!   GET  /callback    – OAuth redirect target

use axum::Json;
use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;
use serde_json::json;

use crate::app::SharedState;

use super::{ApiError, ApiResult, err_json, ok_json, watch_error};

/// POST /api/connect
///
/// Resolves once the user finished (or abandoned) authorization.
pub async fn connect(State(state): State<SharedState>) -> ApiResult {
    state.popup().connect_to_twitch().await.map_err(watch_error)?;
    Ok(ok_json(json!({ "connected": true })))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// GET /callback
pub async fn callback(
    State(state): State<SharedState>,
    Query(q): Query<CallbackQuery>,
) -> Result<Html<String>, ApiError> {
    let callback_state = q
        .state
        .filter(|s| !s.is_empty())
        .ok_or_else(|| err_json(400, "OAuth state missing"))?;

    let outcome = match (q.error, q.code.filter(|c| !c.is_empty())) {
        (Some(error), _) => {
            let desc = q.error_description.unwrap_or_default();
            Err(format!("{error}: {desc}"))
        }
        (None, Some(code)) => Ok(code),
        (None, None) => return Err(err_json(400, "OAuth code missing")),
    };
    let failed = outcome.as_ref().err().cloned();

    state
        .auth_flow()
        .complete(&callback_state, outcome)
        .await
        .map_err(|e| err_json(400, &e.to_string()))?;

    Ok(Html(callback_page(failed.as_deref())))
}

fn callback_page(error: Option<&str>) -> String {
    match error {
        Some(error) => format!(
            r#"<!DOCTYPE html><html><body><h2>Authorization failed</h2><p>{}</p>
            <script>setTimeout(()=>window.close(),5000)</script></body></html>"#,
            escape_html(error)
        ),
        None => r#"<!DOCTYPE html><html><body><h2>Connected to Twitch</h2>
            <p>You can close this window.</p>
            <script>setTimeout(()=>window.close(),3000)</script></body></html>"#
            .to_string(),
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
