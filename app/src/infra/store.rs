//! SQLite-backed credential and preference stores.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::{Mutex, RwLock};
use twitch_client::auth::TwitchAuth;
use twitch_client::{Token, TwitchError};
use watch_db::Database;

use crate::config::{AppConfig, SettingsManager};
use crate::ports::{CredentialStore, PreferenceStore};
use crate::{WatchError, WatchResult};

const USER_ID_KEY: &str = "TWITCH_USER_ID";
const SHOW_NOTIFICATION_KEY: &str = "SHOW_NOTIFICATION";
const SOUND_VOLUME_KEY: &str = "SOUND_VOLUME";
const SUSPEND_FROM_KEY: &str = "SUSPEND_FROM_DATE";
const TRENDING_LANGUAGES_KEY: &str = "TRENDING_LANGUAGES";

fn to_twitch_token(db: &watch_db::tokens::Token) -> Token {
    Token {
        access_token: db.access_token.clone(),
        refresh_token: db.refresh_token.clone(),
        scope: db.scope.clone(),
        expires_at: db.expires_at,
    }
}

fn to_db_token(t: &Token) -> watch_db::tokens::Token {
    watch_db::tokens::Token {
        access_token: t.access_token.clone(),
        refresh_token: t.refresh_token.clone(),
        scope: t.scope.clone(),
        expires_at: t.expires_at,
    }
}

fn settings_error(e: anyhow::Error) -> WatchError {
    WatchError::Storage(e.to_string())
}

/// Token in the `tokens` table, owner id in the `TWITCH_USER_ID` setting.
///
/// Tokens about to expire are refreshed on read when client credentials
/// are configured.
pub struct DbCredentialStore {
    db: Database,
    settings: SettingsManager,
    config: Arc<RwLock<AppConfig>>,
    refresh_lock: Mutex<()>,
}

impl DbCredentialStore {
    pub fn new(db: Database, config: Arc<RwLock<AppConfig>>) -> Self {
        Self {
            settings: SettingsManager::new(db.clone()),
            db,
            config,
            refresh_lock: Mutex::new(()),
        }
    }

    async fn auth(&self) -> Option<TwitchAuth> {
        let config = self.config.read().await;
        if !config.twitch_configured() {
            return None;
        }
        Some(TwitchAuth::new(
            config.client_id.clone(),
            config.client_secret.clone(),
            config.redirect_uri(),
        ))
    }

    async fn refresh_if_needed(&self, current: Token) -> WatchResult<Token> {
        let Some(auth) = self.auth().await else {
            return Ok(current);
        };
        let _guard = self.refresh_lock.lock().await;

        // another caller may have refreshed while we waited
        let current = match self.db.get_latest_token()? {
            Some(latest) => to_twitch_token(&latest),
            None => current,
        };

        match auth.get_or_refresh_token(&current).await {
            Ok(Some(refreshed)) => {
                self.db.save_token(&to_db_token(&refreshed))?;
                tracing::info!(expires_at = refreshed.expires_at, "Token auto-refreshed");
                Ok(refreshed)
            }
            Ok(None) => Ok(current),
            Err(TwitchError::AuthRequired) => Ok(current),
            Err(e) => {
                tracing::warn!("Token refresh failed, keeping current token: {e}");
                Ok(current)
            }
        }
    }
}

#[async_trait]
impl CredentialStore for DbCredentialStore {
    async fn token(&self) -> WatchResult<Option<Token>> {
        let Some(stored) = self.db.get_latest_token()? else {
            return Ok(None);
        };
        let token = self.refresh_if_needed(to_twitch_token(&stored)).await?;
        Ok(Some(token))
    }

    async fn set_token(&self, token: &Token) -> WatchResult<()> {
        self.db.save_token(&to_db_token(token))?;
        tracing::info!(expires_at = token.expires_at, "OAuth token saved");
        Ok(())
    }

    async fn user_id(&self) -> WatchResult<Option<String>> {
        let id = self
            .settings
            .get_setting(USER_ID_KEY)
            .map_err(settings_error)?;
        Ok(Some(id).filter(|v| !v.is_empty()))
    }

    async fn set_user_id(&self, user_id: &str) -> WatchResult<()> {
        self.settings
            .set_setting(USER_ID_KEY, user_id)
            .map_err(settings_error)
    }
}

/// User preferences in the `settings` table; roster in `auto_open_users`.
pub struct DbPreferenceStore {
    db: Database,
    settings: SettingsManager,
}

impl DbPreferenceStore {
    pub fn new(db: Database) -> Self {
        Self {
            settings: SettingsManager::new(db.clone()),
            db,
        }
    }

    fn get(&self, key: &str) -> WatchResult<String> {
        self.settings.get_setting(key).map_err(settings_error)
    }

    fn set(&self, key: &str, value: &str) -> WatchResult<()> {
        self.settings.set_setting(key, value).map_err(settings_error)
    }
}

#[async_trait]
impl PreferenceStore for DbPreferenceStore {
    async fn show_notification(&self) -> WatchResult<bool> {
        Ok(self.get(SHOW_NOTIFICATION_KEY)? != "false")
    }

    async fn set_show_notification(&self, enabled: bool) -> WatchResult<()> {
        self.set(SHOW_NOTIFICATION_KEY, if enabled { "true" } else { "false" })
    }

    async fn sound_volume(&self) -> WatchResult<f32> {
        let raw = self.get(SOUND_VOLUME_KEY)?;
        Ok(raw.parse::<f32>().map(|v| v.clamp(0.0, 1.0)).unwrap_or(1.0))
    }

    async fn set_sound_volume(&self, volume: f32) -> WatchResult<()> {
        self.set(SOUND_VOLUME_KEY, &volume.to_string())
    }

    async fn is_auto_open_user(&self, user_id: &str) -> WatchResult<bool> {
        Ok(self.db.is_auto_open_user(user_id)?)
    }

    async fn set_auto_open_user(&self, user_id: &str, enabled: bool) -> WatchResult<()> {
        Ok(self.db.set_auto_open_user(user_id, enabled)?)
    }

    async fn auto_open_user_ids(&self) -> WatchResult<Vec<String>> {
        Ok(self.db.get_auto_open_user_ids()?)
    }

    async fn suspend_from(&self) -> WatchResult<Option<DateTime<Utc>>> {
        let raw = self.get(SUSPEND_FROM_KEY)?;
        if raw.is_empty() {
            return Ok(None);
        }
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(dt) => Ok(Some(dt.with_timezone(&Utc))),
            Err(e) => {
                tracing::warn!(value = %raw, "Unreadable suspend timestamp, treating as suspended: {e}");
                Ok(Some(Utc::now()))
            }
        }
    }

    async fn set_suspend_from(&self, at: Option<DateTime<Utc>>) -> WatchResult<()> {
        let value = at
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default();
        self.set(SUSPEND_FROM_KEY, &value)
    }

    async fn trending_languages(&self) -> WatchResult<Vec<String>> {
        Ok(self
            .get(TRENDING_LANGUAGES_KEY)?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect())
    }

    async fn set_trending_languages(&self, languages: &[String]) -> WatchResult<()> {
        self.set(TRENDING_LANGUAGES_KEY, &languages.join(","))
    }
}
