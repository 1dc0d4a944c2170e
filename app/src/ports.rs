//! Collaborator traits the engine and the use cases depend on.
//!
//! Production implementations live in [`crate::infra`]; tests swap in
//! in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use twitch_client::Token;

use crate::WatchResult;
use crate::model::{LiveSession, Notification, SoundKind, Streamer};

/// Called by a [`NotificationSink`] with the id it assigned.
pub type OnCreated = Box<dyn FnOnce(String) + Send>;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn token(&self) -> WatchResult<Option<Token>>;
    async fn set_token(&self, token: &Token) -> WatchResult<()>;
    async fn user_id(&self) -> WatchResult<Option<String>>;
    async fn set_user_id(&self, user_id: &str) -> WatchResult<()>;
}

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn show_notification(&self) -> WatchResult<bool>;
    async fn set_show_notification(&self, enabled: bool) -> WatchResult<()>;
    async fn sound_volume(&self) -> WatchResult<f32>;
    async fn set_sound_volume(&self, volume: f32) -> WatchResult<()>;
    async fn is_auto_open_user(&self, user_id: &str) -> WatchResult<bool>;
    async fn set_auto_open_user(&self, user_id: &str, enabled: bool) -> WatchResult<()>;
    /// Roster in insertion order.
    async fn auto_open_user_ids(&self) -> WatchResult<Vec<String>>;
    async fn suspend_from(&self) -> WatchResult<Option<DateTime<Utc>>>;
    async fn set_suspend_from(&self, at: Option<DateTime<Utc>>) -> WatchResult<()>;
    async fn trending_languages(&self) -> WatchResult<Vec<String>>;
    async fn set_trending_languages(&self, languages: &[String]) -> WatchResult<()>;
}

/// Upstream live data. A rejected token surfaces as
/// [`crate::WatchError::InvalidCredential`].
#[async_trait]
pub trait LiveSessionSource: Send + Sync {
    async fn followed_live_sessions(
        &self,
        token: &Token,
        user_id: &str,
        with_avatars: bool,
    ) -> WatchResult<Vec<LiveSession>>;
    async fn live_sessions_by_language(
        &self,
        token: &Token,
        languages: &[String],
    ) -> WatchResult<Vec<LiveSession>>;
    async fn followed_streamers(&self, token: &Token, user_id: &str)
    -> WatchResult<Vec<Streamer>>;
    async fn current_user_id(&self, token: &Token) -> WatchResult<String>;
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn show(&self, notification: Notification, on_created: OnCreated) -> WatchResult<()>;
}

#[async_trait]
pub trait PageCollaborator: Send + Sync {
    async fn open_page(&self, url: &str) -> WatchResult<()>;
    async fn open_page_urls(&self) -> WatchResult<Vec<String>>;
}

#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, kind: SoundKind, volume: f32) -> WatchResult<()>;
}

#[async_trait]
pub trait BadgeSink: Send + Sync {
    async fn set_count(&self, count: usize) -> WatchResult<()>;
    async fn set_warning(&self) -> WatchResult<()>;
    async fn set_background_color(&self, color: &str) -> WatchResult<()>;
}

pub trait KeepAlive: Send + Sync {
    fn start(&self) -> WatchResult<()>;
}

/// Interactive authorization ending in a usable token.
#[async_trait]
pub trait AuthFlow: Send + Sync {
    async fn launch(&self) -> WatchResult<Token>;
}

/// Everything the engine and the use cases talk to.
#[derive(Clone)]
pub struct Collaborators {
    pub credentials: Arc<dyn CredentialStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub source: Arc<dyn LiveSessionSource>,
    pub notifications: Arc<dyn NotificationSink>,
    pub pages: Arc<dyn PageCollaborator>,
    pub audio: Arc<dyn AudioSink>,
    pub badge: Arc<dyn BadgeSink>,
    pub keep_alive: Arc<dyn KeepAlive>,
    pub auth: Arc<dyn AuthFlow>,
}

impl Collaborators {
    /// Token and owner id, or the matching `MissingCredential`.
    pub async fn require_credentials(&self) -> WatchResult<(Token, String)> {
        let token = self
            .credentials
            .token()
            .await?
            .ok_or_else(crate::WatchError::no_token)?;
        let user_id = self
            .credentials
            .user_id()
            .await?
            .ok_or_else(crate::WatchError::no_user_id)?;
        Ok((token, user_id))
    }

    pub async fn require_token(&self) -> WatchResult<Token> {
        self.credentials
            .token()
            .await?
            .ok_or_else(crate::WatchError::no_token)
    }
}
