//! OAuth token management for Twitch authentication.
//!
//! Handles OAuth URL generation, authorization code exchange,
//! token refresh, and automatic token renewal.

use chrono::Utc;
use serde::Deserialize;
use url::Url;

use crate::{SCOPES, Token, TwitchError};

const AUTHORIZE_URL: &str = "https://id.twitch.tv/oauth2/authorize";
const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Refresh when the token expires within this many seconds.
const REFRESH_MARGIN_SECS: i64 = 30 * 60;

/// Twitch OAuth token response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    expires_in: i64,
    scope: Option<Vec<String>>,
}

/// Twitch OAuth error response.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "status")]
    error: Option<serde_json::Value>,
    #[serde(alias = "message")]
    error_description: Option<String>,
}

/// Manages Twitch OAuth authentication.
///
/// The caller is responsible for persisting tokens.
/// This struct does not depend on watch-db directly.
#[derive(Clone)]
pub struct TwitchAuth {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    http: reqwest::Client,
}

impl TwitchAuth {
    /// Create a new auth manager.
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            http: reqwest::Client::new(),
        }
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Generate the OAuth authorization URL with required scopes.
    pub fn get_auth_url(&self) -> Result<String, TwitchError> {
        self.get_auth_url_with_state(None)
    }

    /// Generate the OAuth authorization URL, binding an opaque CSRF `state`.
    pub fn get_auth_url_with_state(&self, state: Option<&str>) -> Result<String, TwitchError> {
        let scope_str = SCOPES.join(" ");
        let mut url = Url::parse(AUTHORIZE_URL)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.client_id)
                .append_pair("redirect_uri", &self.redirect_uri)
                .append_pair("scope", &scope_str);
            if let Some(state) = state.filter(|s| !s.is_empty()) {
                pairs.append_pair("state", state);
            }
        }
        Ok(url.to_string())
    }

    /// Exchange an authorization code for access and refresh tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<Token, TwitchError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let resp = self.http.post(TOKEN_URL).form(&params).send().await?;

        self.parse_token_response(resp).await
    }

    /// Refresh an expired token using the refresh token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token, TwitchError> {
        tracing::info!("Refreshing Twitch OAuth token");

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let resp = self.http.post(TOKEN_URL).form(&params).send().await?;

        self.parse_token_response(resp).await
    }

    /// Get a valid token, auto-refreshing if it expires within 30 minutes.
    ///
    /// Returns `Ok(None)` if refresh is not needed (token is still valid, or
    /// carries no expiry at all).
    /// Returns `Ok(Some(token))` with the refreshed token if a refresh was performed.
    /// The caller should persist the new token when `Some` is returned.
    pub async fn get_or_refresh_token(
        &self,
        current: &Token,
    ) -> Result<Option<Token>, TwitchError> {
        if current.expires_at <= 0 {
            return Ok(None);
        }

        let now = Utc::now().timestamp();
        if now < current.expires_at - REFRESH_MARGIN_SECS {
            return Ok(None);
        }

        if current.refresh_token.is_empty() {
            return Err(TwitchError::AuthRequired);
        }

        tracing::info!(
            expires_in_secs = current.expires_at - now,
            "Token expiring soon, refreshing"
        );

        let new_token = self.refresh_token(&current.refresh_token).await?;
        Ok(Some(new_token))
    }

    /// Parse the token endpoint response into a `Token`.
    async fn parse_token_response(&self, resp: reqwest::Response) -> Result<Token, TwitchError> {
        let status = resp.status();
        let body = resp.text().await?;
        parse_token_body(status, &body)
    }
}

fn parse_token_body(status: reqwest::StatusCode, body: &str) -> Result<Token, TwitchError> {
    if !status.is_success() {
        let err: ErrorResponse = serde_json::from_str(body).unwrap_or(ErrorResponse {
            error: Some(serde_json::Value::String(status.to_string())),
            error_description: Some(body.to_string()),
        });
        let error = match err.error {
            Some(serde_json::Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        return Err(TwitchError::TokenRefreshFailed(format!(
            "{}: {}",
            error,
            err.error_description.unwrap_or_default()
        )));
    }

    let token_resp: TokenResponse = serde_json::from_str(body)
        .map_err(|e| TwitchError::TokenRefreshFailed(format!("failed to parse response: {e}")))?;

    let scope = token_resp
        .scope
        .map(|s| s.join(" "))
        .unwrap_or_else(|| SCOPES.join(" "));

    let expires_at = Utc::now().timestamp() + token_resp.expires_in;

    Ok(Token {
        access_token: token_resp.access_token,
        refresh_token: token_resp.refresh_token,
        scope,
        expires_at,
    })
}
