use super::*;

impl TwitchApiClient {
    /// Get live streams of channels followed by the specified user (one page of up to 100).
    pub async fn get_followed_streams(
        &self,
        token: &Token,
        user_id: &str,
    ) -> Result<Vec<StreamData>, TwitchError> {
        let url = self.url(&format!(
            "/streams/followed?user_id={user_id}&first={PAGE_SIZE}"
        ));
        let body = self.authenticated_get(&url, token).await?;
        let resp: HelixResponse<StreamData> = serde_json::from_str(&body)?;
        Ok(resp.data)
    }

    /// Get the top live streams broadcasting in any of the given languages.
    ///
    /// An empty language list returns the top streams across all languages.
    pub async fn get_streams_by_language(
        &self,
        token: &Token,
        languages: &[String],
    ) -> Result<Vec<StreamData>, TwitchError> {
        let query = build_language_query(languages);
        let url = self.url(&format!("/streams?{query}"));
        let body = self.authenticated_get(&url, token).await?;
        let resp: HelixResponse<StreamData> = serde_json::from_str(&body)?;
        Ok(resp.data)
    }
}

/// Helix accepts at most 100 `language` parameters. Values are
/// form-encoded, so a code can never add parameters of its own.
pub(super) fn build_language_query(languages: &[String]) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for lang in languages.iter().filter(|lang| !lang.is_empty()).take(100) {
        query.append_pair("language", lang);
    }
    query.append_pair("first", &PAGE_SIZE.to_string());
    query.finish()
}
