use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use super::*;

impl TwitchApiClient {
    pub fn new(client_id: String) -> Self {
        Self::with_base_url(client_id, HELIX_BASE.to_string())
    }

    /// Client pointed at a different Helix root (mock servers, proxies).
    pub fn with_base_url(client_id: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub(super) fn url(&self, path_and_query: &str) -> String {
        format!("{}{path_and_query}", self.base_url)
    }

    /// Build auth headers from the given token.
    fn auth_headers(&self, token: &Token) -> Result<HeaderMap, TwitchError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", token.access_token);
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&bearer)?);
        headers.insert("Client-Id", HeaderValue::from_str(&self.client_id)?);
        Ok(headers)
    }

    /// Execute a GET request with auth headers.
    pub(super) async fn authenticated_get(
        &self,
        url: &str,
        token: &Token,
    ) -> Result<String, TwitchError> {
        let headers = self.auth_headers(token)?;
        let resp = self.http.get(url).headers(headers).send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        check_status(status, body).inspect_err(|e| {
            if matches!(e, TwitchError::InvalidToken) {
                tracing::warn!(url, "Got 401, token must be re-authorized");
            }
        })
    }
}

/// Map a Helix response status to the body or a typed error.
pub(super) fn check_status(status: StatusCode, body: String) -> Result<String, TwitchError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(TwitchError::InvalidToken);
    }

    if !status.is_success() {
        return Err(TwitchError::ApiError {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(body)
}
