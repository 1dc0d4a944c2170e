//! [`LiveSessionSource`] backed by the Twitch Helix API.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use twitch_client::Token;
use twitch_client::api::{FollowedChannel, StreamData, TwitchApiClient, TwitchUser};

use crate::WatchResult;
use crate::config::AppConfig;
use crate::model::{LiveSession, Streamer, parse_timestamp};
use crate::ports::LiveSessionSource;

/// Builds a client from the current `CLIENT_ID` on every call, so a
/// settings change applies without a restart.
#[derive(Clone)]
pub struct HelixSource {
    config: Arc<RwLock<AppConfig>>,
}

impl HelixSource {
    pub fn new(config: Arc<RwLock<AppConfig>>) -> Self {
        Self { config }
    }

    async fn client(&self) -> TwitchApiClient {
        TwitchApiClient::new(self.config.read().await.client_id.clone())
    }
}

/// user id → avatar url, for the owners of `ids`.
async fn avatars(
    client: &TwitchApiClient,
    token: &Token,
    ids: Vec<String>,
) -> WatchResult<HashMap<String, String>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = client.get_users_chunked(token, &ids).await?;
    Ok(avatar_map(users))
}

fn avatar_map(users: Vec<TwitchUser>) -> HashMap<String, String> {
    users
        .into_iter()
        .filter(|u| !u.profile_image_url.is_empty())
        .map(|u| (u.id, u.profile_image_url))
        .collect()
}

fn to_session(stream: StreamData, avatars: &HashMap<String, String>) -> LiveSession {
    LiveSession {
        avatar_url: avatars.get(&stream.user_id).cloned(),
        started_at: stream.started_at.as_deref().and_then(parse_timestamp),
        id: stream.id,
        owner_id: stream.user_id,
        owner_login: stream.user_login,
        owner_display_name: stream.user_name,
        title: stream.title,
        thumbnail_url_template: stream.thumbnail_url,
        viewer_count: stream.viewer_count,
        language: stream.language,
        category_id: stream.game_id,
        category_name: stream.game_name,
        tag_ids: stream.tag_ids,
        tags: stream.tags,
    }
}

fn to_streamer(channel: FollowedChannel, avatars: &HashMap<String, String>) -> Streamer {
    Streamer {
        avatar_url: avatars.get(&channel.broadcaster_id).cloned(),
        followed_at: parse_timestamp(&channel.followed_at),
        id: channel.broadcaster_id,
        login: channel.broadcaster_login,
        name: channel.broadcaster_name,
    }
}

fn owner_ids(streams: &[StreamData]) -> Vec<String> {
    streams.iter().map(|s| s.user_id.clone()).collect()
}

#[async_trait]
impl LiveSessionSource for HelixSource {
    async fn followed_live_sessions(
        &self,
        token: &Token,
        user_id: &str,
        with_avatars: bool,
    ) -> WatchResult<Vec<LiveSession>> {
        let client = self.client().await;
        let streams = client.get_followed_streams(token, user_id).await?;
        let avatars = if with_avatars {
            avatars(&client, token, owner_ids(&streams)).await?
        } else {
            HashMap::new()
        };
        Ok(streams
            .into_iter()
            .map(|s| to_session(s, &avatars))
            .collect())
    }

    async fn live_sessions_by_language(
        &self,
        token: &Token,
        languages: &[String],
    ) -> WatchResult<Vec<LiveSession>> {
        let client = self.client().await;
        let streams = client.get_streams_by_language(token, languages).await?;
        let avatars = avatars(&client, token, owner_ids(&streams)).await?;
        Ok(streams
            .into_iter()
            .map(|s| to_session(s, &avatars))
            .collect())
    }

    async fn followed_streamers(&self, token: &Token, user_id: &str) -> WatchResult<Vec<Streamer>> {
        let client = self.client().await;
        let channels = client.get_followed_channels(token, user_id).await?;
        let ids = channels.iter().map(|c| c.broadcaster_id.clone()).collect();
        let avatars = avatars(&client, token, ids).await?;
        tracing::debug!(count = channels.len(), "Fetched followed channels");
        Ok(channels
            .into_iter()
            .map(|c| to_streamer(c, &avatars))
            .collect())
    }

    async fn current_user_id(&self, token: &Token) -> WatchResult<String> {
        Ok(self.client().await.get_current_user(token).await?.id)
    }
}
