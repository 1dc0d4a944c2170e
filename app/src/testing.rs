//! In-memory collaborators for engine and use-case tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use twitch_client::Token;

use crate::engine::{EngineOptions, PollEngine};
use crate::model::{LiveSession, Notification, SoundKind, Streamer};
use crate::ports::{
    AudioSink, AuthFlow, BadgeSink, Collaborators, CredentialStore, KeepAlive, LiveSessionSource,
    NotificationSink, OnCreated, PageCollaborator, PreferenceStore,
};
use crate::{WatchError, WatchResult};

#[derive(Default)]
pub struct FakeCredentials {
    pub token: Mutex<Option<Token>>,
    pub user_id: Mutex<Option<String>>,
}

#[async_trait]
impl CredentialStore for FakeCredentials {
    async fn token(&self) -> WatchResult<Option<Token>> {
        Ok(self.token.lock().unwrap().clone())
    }

    async fn set_token(&self, token: &Token) -> WatchResult<()> {
        *self.token.lock().unwrap() = Some(token.clone());
        Ok(())
    }

    async fn user_id(&self) -> WatchResult<Option<String>> {
        Ok(self.user_id.lock().unwrap().clone())
    }

    async fn set_user_id(&self, user_id: &str) -> WatchResult<()> {
        *self.user_id.lock().unwrap() = Some(user_id.to_string());
        Ok(())
    }
}

pub struct FakePreferences {
    pub show_notification: Mutex<bool>,
    pub volume: Mutex<f32>,
    pub roster: Mutex<Vec<String>>,
    pub suspend_from: Mutex<Option<DateTime<Utc>>>,
    pub languages: Mutex<Vec<String>>,
}

impl Default for FakePreferences {
    fn default() -> Self {
        Self {
            show_notification: Mutex::new(true),
            volume: Mutex::new(1.0),
            roster: Mutex::new(Vec::new()),
            suspend_from: Mutex::new(None),
            languages: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PreferenceStore for FakePreferences {
    async fn show_notification(&self) -> WatchResult<bool> {
        Ok(*self.show_notification.lock().unwrap())
    }

    async fn set_show_notification(&self, enabled: bool) -> WatchResult<()> {
        *self.show_notification.lock().unwrap() = enabled;
        Ok(())
    }

    async fn sound_volume(&self) -> WatchResult<f32> {
        Ok(*self.volume.lock().unwrap())
    }

    async fn set_sound_volume(&self, volume: f32) -> WatchResult<()> {
        *self.volume.lock().unwrap() = volume;
        Ok(())
    }

    async fn is_auto_open_user(&self, user_id: &str) -> WatchResult<bool> {
        Ok(self.roster.lock().unwrap().iter().any(|id| id == user_id))
    }

    async fn set_auto_open_user(&self, user_id: &str, enabled: bool) -> WatchResult<()> {
        let mut roster = self.roster.lock().unwrap();
        roster.retain(|id| id != user_id);
        if enabled {
            roster.push(user_id.to_string());
        }
        Ok(())
    }

    async fn auto_open_user_ids(&self) -> WatchResult<Vec<String>> {
        Ok(self.roster.lock().unwrap().clone())
    }

    async fn suspend_from(&self) -> WatchResult<Option<DateTime<Utc>>> {
        Ok(*self.suspend_from.lock().unwrap())
    }

    async fn set_suspend_from(&self, at: Option<DateTime<Utc>>) -> WatchResult<()> {
        *self.suspend_from.lock().unwrap() = at;
        Ok(())
    }

    async fn trending_languages(&self) -> WatchResult<Vec<String>> {
        Ok(self.languages.lock().unwrap().clone())
    }

    async fn set_trending_languages(&self, languages: &[String]) -> WatchResult<()> {
        *self.languages.lock().unwrap() = languages.to_vec();
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSource {
    pub followed: Mutex<Vec<LiveSession>>,
    pub by_language: Mutex<Vec<LiveSession>>,
    pub streamers: Mutex<Vec<Streamer>>,
    pub current_user: Mutex<String>,
    pub reject_token: AtomicBool,
    pub fetches: AtomicUsize,
    pub last_with_avatars: AtomicBool,
    pub last_languages: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn set_followed(&self, sessions: Vec<LiveSession>) {
        *self.followed.lock().unwrap() = sessions;
    }

    fn check_token(&self) -> WatchResult<()> {
        if self.reject_token.load(Ordering::SeqCst) {
            return Err(WatchError::InvalidCredential);
        }
        Ok(())
    }
}

#[async_trait]
impl LiveSessionSource for FakeSource {
    async fn followed_live_sessions(
        &self,
        _token: &Token,
        _user_id: &str,
        with_avatars: bool,
    ) -> WatchResult<Vec<LiveSession>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.last_with_avatars.store(with_avatars, Ordering::SeqCst);
        self.check_token()?;
        Ok(self.followed.lock().unwrap().clone())
    }

    async fn live_sessions_by_language(
        &self,
        _token: &Token,
        languages: &[String],
    ) -> WatchResult<Vec<LiveSession>> {
        self.check_token()?;
        *self.last_languages.lock().unwrap() = languages.to_vec();
        Ok(self.by_language.lock().unwrap().clone())
    }

    async fn followed_streamers(
        &self,
        _token: &Token,
        _user_id: &str,
    ) -> WatchResult<Vec<Streamer>> {
        self.check_token()?;
        Ok(self.streamers.lock().unwrap().clone())
    }

    async fn current_user_id(&self, _token: &Token) -> WatchResult<String> {
        self.check_token()?;
        Ok(self.current_user.lock().unwrap().clone())
    }
}

/// Everything pushed to the front-end, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Notification { id: String, title: String },
    OpenPage(String),
    Sound(SoundKind, f32),
    BadgeCount(usize),
    BadgeWarning,
    BadgeColor(String),
    KeepAliveStarted,
}

#[derive(Default)]
pub struct Recorder {
    pub effects: Mutex<Vec<Effect>>,
    pub open_urls: Mutex<Vec<String>>,
    next_id: AtomicUsize,
}

impl Recorder {
    fn push(&self, effect: Effect) {
        self.effects.lock().unwrap().push(effect);
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.effects.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.effects.lock().unwrap().clear();
    }

    pub fn notification_ids(&self) -> Vec<String> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                Effect::Notification { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn opened(&self) -> Vec<String> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                Effect::OpenPage(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn sounds(&self) -> Vec<SoundKind> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                Effect::Sound(kind, _) => Some(kind),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl NotificationSink for Recorder {
    async fn show(&self, notification: Notification, on_created: OnCreated) -> WatchResult<()> {
        let id = format!("n{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        on_created(id.clone());
        self.push(Effect::Notification {
            id,
            title: notification.title,
        });
        Ok(())
    }
}

#[async_trait]
impl PageCollaborator for Recorder {
    async fn open_page(&self, url: &str) -> WatchResult<()> {
        self.push(Effect::OpenPage(url.to_string()));
        Ok(())
    }

    async fn open_page_urls(&self) -> WatchResult<Vec<String>> {
        Ok(self.open_urls.lock().unwrap().clone())
    }
}

#[async_trait]
impl AudioSink for Recorder {
    async fn play(&self, kind: SoundKind, volume: f32) -> WatchResult<()> {
        self.push(Effect::Sound(kind, volume));
        Ok(())
    }
}

#[async_trait]
impl BadgeSink for Recorder {
    async fn set_count(&self, count: usize) -> WatchResult<()> {
        self.push(Effect::BadgeCount(count));
        Ok(())
    }

    async fn set_warning(&self) -> WatchResult<()> {
        self.push(Effect::BadgeWarning);
        Ok(())
    }

    async fn set_background_color(&self, color: &str) -> WatchResult<()> {
        self.push(Effect::BadgeColor(color.to_string()));
        Ok(())
    }
}

impl KeepAlive for Recorder {
    fn start(&self) -> WatchResult<()> {
        self.push(Effect::KeepAliveStarted);
        Ok(())
    }
}

/// Succeeds with `token` when set, fails with an auth error otherwise.
#[derive(Default)]
pub struct FakeAuth {
    pub token: Mutex<Option<Token>>,
    pub launches: AtomicUsize,
}

#[async_trait]
impl AuthFlow for FakeAuth {
    async fn launch(&self) -> WatchResult<Token> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        self.token
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| WatchError::AuthFlow("access_denied".into()))
    }
}

pub struct Harness {
    pub credentials: Arc<FakeCredentials>,
    pub preferences: Arc<FakePreferences>,
    pub source: Arc<FakeSource>,
    pub effects: Arc<Recorder>,
    pub auth: Arc<FakeAuth>,
}

impl Harness {
    /// Connected as user `u0` with no live sessions.
    pub fn connected() -> Self {
        let harness = Self::disconnected();
        *harness.credentials.token.lock().unwrap() = Some(Token::bearer("tok"));
        *harness.credentials.user_id.lock().unwrap() = Some("u0".into());
        harness
    }

    pub fn disconnected() -> Self {
        Self {
            credentials: Arc::new(FakeCredentials::default()),
            preferences: Arc::new(FakePreferences::default()),
            source: Arc::new(FakeSource::default()),
            effects: Arc::new(Recorder::default()),
            auth: Arc::new(FakeAuth::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            credentials: self.credentials.clone(),
            preferences: self.preferences.clone(),
            source: self.source.clone(),
            notifications: self.effects.clone(),
            pages: self.effects.clone(),
            audio: self.effects.clone(),
            badge: self.effects.clone(),
            keep_alive: self.effects.clone(),
            auth: self.auth.clone(),
        }
    }

    /// Engine with no inter-session delay and a long poll interval, so
    /// only explicitly requested cycles run.
    pub fn engine(&self) -> Arc<PollEngine> {
        let options = EngineOptions {
            poll_interval: Duration::from_secs(3600),
            open_delay: Duration::ZERO,
            ..EngineOptions::default()
        };
        Arc::new(PollEngine::new(
            self.collaborators(),
            options,
            CancellationToken::new(),
        ))
    }

    pub fn add_to_roster(&self, user_id: &str) {
        self.preferences.roster.lock().unwrap().push(user_id.to_string());
    }
}
