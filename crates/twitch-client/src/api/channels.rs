use super::*;

/// Hard stop for cursor walking so a misbehaving API cannot loop forever.
const FOLLOWED_CHANNELS_SCAN_LIMIT: usize = 5000;

impl TwitchApiClient {
    /// Get every channel followed by the specified user, walking all pages.
    pub async fn get_followed_channels(
        &self,
        token: &Token,
        user_id: &str,
    ) -> Result<Vec<FollowedChannel>, TwitchError> {
        let mut followed = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let (mut rows, next_cursor) = self
                .get_followed_channels_page(token, user_id, PAGE_SIZE, after.as_deref())
                .await?;
            followed.append(&mut rows);
            if followed.len() >= FOLLOWED_CHANNELS_SCAN_LIMIT {
                tracing::warn!(
                    count = followed.len(),
                    "Followed channel scan limit reached, stopping pagination"
                );
                break;
            }
            let Some(cursor) = next_cursor.filter(|cursor| !cursor.is_empty()) else {
                break;
            };
            after = Some(cursor);
        }
        Ok(followed)
    }

    /// Get one page of channels followed by the specified user.
    pub async fn get_followed_channels_page(
        &self,
        token: &Token,
        user_id: &str,
        first: u32,
        after: Option<&str>,
    ) -> Result<(Vec<FollowedChannel>, Option<String>), TwitchError> {
        let clamped = first.clamp(1, PAGE_SIZE);
        let mut url = self.url(&format!(
            "/channels/followed?user_id={user_id}&first={clamped}"
        ));
        if let Some(cursor) = after.filter(|v| !v.is_empty()) {
            url.push_str("&after=");
            url.push_str(cursor);
        }
        let body = self.authenticated_get(&url, token).await?;
        let resp: HelixPaginatedResponse<FollowedChannel> = serde_json::from_str(&body)?;
        let next_cursor = resp.pagination.and_then(|p| p.cursor);
        Ok((resp.data, next_cursor))
    }
}
