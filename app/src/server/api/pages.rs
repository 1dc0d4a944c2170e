use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use crate::app::SharedState;

use super::{ApiResult, ok_json, watch_error};

#[derive(Debug, Deserialize)]
pub struct PagesBody {
    pub urls: Vec<String>,
}

/// PUT /api/pages – the front-end's currently open page URLs.
pub async fn report_pages(
    State(state): State<SharedState>,
    Json(body): Json<PagesBody>,
) -> ApiResult {
    let count = body.urls.len();
    state.pages().replace(body.urls).map_err(watch_error)?;
    Ok(ok_json(json!({ "count": count })))
}
