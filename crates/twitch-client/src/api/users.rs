use super::*;

impl TwitchApiClient {
    /// Get the currently authenticated user.
    pub async fn get_current_user(&self, token: &Token) -> Result<TwitchUser, TwitchError> {
        let url = self.url("/users");
        let body = self.authenticated_get(&url, token).await?;
        let resp: HelixResponse<TwitchUser> = serde_json::from_str(&body)?;

        resp.data
            .into_iter()
            .next()
            .ok_or_else(|| TwitchError::ApiError {
                status: 404,
                message: "Authenticated user not found".into(),
            })
    }

    /// Get users by user IDs (up to 100).
    pub async fn get_users_by_ids(
        &self,
        token: &Token,
        user_ids: &[String],
    ) -> Result<Vec<TwitchUser>, TwitchError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = user_ids
            .iter()
            .take(100)
            .map(|id| format!("id={id}"))
            .collect::<Vec<_>>()
            .join("&");
        let url = self.url(&format!("/users?{query}"));
        let body = self.authenticated_get(&url, token).await?;
        let resp: HelixResponse<TwitchUser> = serde_json::from_str(&body)?;
        Ok(resp.data)
    }

    /// Get users for any number of IDs, issuing one request per 100 IDs.
    pub async fn get_users_chunked(
        &self,
        token: &Token,
        user_ids: &[String],
    ) -> Result<Vec<TwitchUser>, TwitchError> {
        let mut all_users = Vec::with_capacity(user_ids.len());
        for chunk in user_ids.chunks(PAGE_SIZE as usize) {
            let mut rows = self.get_users_by_ids(token, chunk).await?;
            all_users.append(&mut rows);
        }
        Ok(all_users)
    }
}
