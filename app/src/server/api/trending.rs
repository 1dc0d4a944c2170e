//! GET|PUT /api/trending-languages

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use crate::app::SharedState;

use super::{ApiResult, ok_json, watch_error};

/// GET /api/trending-languages
pub async fn get_trending_languages(State(state): State<SharedState>) -> ApiResult {
    let languages = state
        .popup()
        .trending_languages()
        .await
        .map_err(watch_error)?;
    Ok(ok_json(json!({ "languages": languages })))
}

#[derive(Debug, Deserialize)]
pub struct TrendingLanguagesBody {
    pub languages: Vec<String>,
}

/// PUT /api/trending-languages
pub async fn set_trending_languages(
    State(state): State<SharedState>,
    Json(body): Json<TrendingLanguagesBody>,
) -> ApiResult {
    state
        .popup()
        .set_trending_languages(&body.languages)
        .await
        .map_err(watch_error)?;
    Ok(ok_json(json!({ "languages": body.languages })))
}
