//! Live listings:
//!   GET /api/streams/following    – followed live sessions (with avatars)
//!   GET /api/streams?languages=   – top sessions by language
//!   GET /api/streamers/following  – followed broadcasters

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::json;

use crate::app::SharedState;
use crate::config::validation::validate_setting;

use super::{ApiError, ApiResult, err_json, ok_json, watch_error};

/// GET /api/streams/following
pub async fn following_streams(State(state): State<SharedState>) -> ApiResult {
    let sessions = state
        .popup()
        .following_streams()
        .await
        .map_err(watch_error)?;
    Ok(ok_json(json!(sessions)))
}

#[derive(Debug, Deserialize)]
pub struct StreamsQuery {
    /// Comma separated language codes; the stored trending languages
    /// when absent.
    pub languages: Option<String>,
}

/// GET /api/streams
pub async fn streams(
    State(state): State<SharedState>,
    Query(q): Query<StreamsQuery>,
) -> ApiResult {
    let popup = state.popup();
    let languages = match q.languages {
        Some(raw) => split_languages(&raw)?,
        None => popup.trending_languages().await.map_err(watch_error)?,
    };
    let sessions = popup.streams(&languages).await.map_err(watch_error)?;
    Ok(ok_json(json!(sessions)))
}

/// GET /api/streamers/following
pub async fn following_streamers(State(state): State<SharedState>) -> ApiResult {
    let streamers = state
        .popup()
        .following_streamers()
        .await
        .map_err(watch_error)?;
    Ok(ok_json(json!(streamers)))
}

/// Split a comma separated list, rejecting anything that is not a
/// language code.
pub(super) fn split_languages(raw: &str) -> Result<Vec<String>, ApiError> {
    let languages: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    validate_setting("TRENDING_LANGUAGES", &languages.join(","))
        .map_err(|e| err_json(400, &format!("languages {e}")))?;
    Ok(languages)
}
