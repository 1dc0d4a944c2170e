//! REST API handlers grouped by domain.

pub mod auth;
pub mod auto_open;
pub mod badge;
pub mod notifications;
pub mod pages;
pub mod preferences;
pub mod settings;
pub mod sound;
pub mod streams;
pub mod suspend;
pub mod trending;

use axum::Json;
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::WatchError;

pub type ApiError = (StatusCode, Json<Value>);
pub type ApiResult = Result<Json<Value>, ApiError>;

/// Standard success response.
pub fn ok_json(data: Value) -> Json<Value> {
    Json(json!({ "status": "ok", "data": data }))
}

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> ApiError {
    err_json_with_code(status, "failed", message)
}

pub fn err_json_with_code(status: u16, code: &str, message: &str) -> ApiError {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "status": "error", "error": message, "code": code })),
    )
}

/// Missing or rejected credentials ask the front-end to (re)connect;
/// everything else is a generic failure.
pub fn watch_error(err: WatchError) -> ApiError {
    match &err {
        WatchError::MissingCredential(_) => {
            err_json_with_code(401, "not_connected", &err.to_string())
        }
        WatchError::InvalidCredential => {
            err_json_with_code(401, "reauth_required", &err.to_string())
        }
        _ => {
            tracing::warn!("Request failed: {err}");
            err_json(500, &err.to_string())
        }
    }
}
