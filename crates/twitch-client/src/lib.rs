//! Twitch integration client library.
//!
//! Provides OAuth authentication and a typed Helix REST client for the
//! followed-streams, streams, users and followed-channels endpoints.

pub mod api;
pub mod auth;

use serde::{Deserialize, Serialize};

/// Token data for OAuth authentication.
///
/// The caller is responsible for persisting this (e.g. via watch-db).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_at: i64,
}

impl Token {
    /// Token carrying only an access token (implicit grant or manual entry).
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: String::new(),
            scope: SCOPES.join(" "),
            expires_at: 0,
        }
    }
}

/// Unified error type for the twitch-client crate.
#[derive(Debug, thiserror::Error)]
pub enum TwitchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication required: no valid token")]
    AuthRequired,

    #[error("Access token rejected by Twitch")]
    InvalidToken,

    #[error("Token exchange failed: {0}")]
    TokenRefreshFailed(String),

    #[error("Twitch API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// OAuth scopes required by this application.
pub const SCOPES: &[&str] = &["user:read:follows"];
