//! SettingsManager: DB-backed settings with defaults, migration, and feature status.

use std::collections::HashMap;

use watch_db::Database;

use super::defaults::DEFAULT_SETTINGS;
use super::validation::validate_setting;
use super::{FeatureStatus, SettingInfo, SettingType};

/// Wraps [`Database`] to provide high-level settings operations.
#[derive(Clone)]
pub struct SettingsManager {
    db: Database,
}

impl SettingsManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get a setting value. Falls back to default if not in DB.
    pub fn get_setting(&self, key: &str) -> Result<String, anyhow::Error> {
        if let Some(val) = self.db.get_setting(key)? {
            return Ok(val);
        }
        if let Some(def) = DEFAULT_SETTINGS.get(key) {
            return Ok(def.default.to_string());
        }
        anyhow::bail!("setting not found: {key}");
    }

    /// Set a setting value with validation.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        let def = DEFAULT_SETTINGS
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("unknown setting key: {key}"))?;

        validate_setting(key, value)
            .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;

        let type_str = if def.secret { "secret" } else { "normal" };
        self.db.set_setting(key, value, type_str)?;
        Ok(())
    }

    /// Validate every entry first, then write them in one transaction.
    pub fn set_settings(&self, settings: &HashMap<String, String>) -> Result<(), anyhow::Error> {
        let mut entries = Vec::with_capacity(settings.len());
        for (key, value) in settings {
            let def = DEFAULT_SETTINGS
                .get(key.as_str())
                .ok_or_else(|| anyhow::anyhow!("unknown setting key: {key}"))?;
            validate_setting(key, value)
                .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;
            let type_str = if def.secret { "secret" } else { "normal" };
            entries.push((key.as_str(), value.as_str(), type_str));
        }
        self.db.set_settings(entries)?;
        Ok(())
    }

    /// Get all settings, filling in defaults for missing keys. Secret values
    /// are masked.
    pub fn get_all_settings(&self) -> Result<HashMap<String, SettingInfo>, anyhow::Error> {
        let db_settings = self.db.get_all_settings()?;
        let mut result = HashMap::new();

        for (key, def) in DEFAULT_SETTINGS.iter() {
            let value = db_settings
                .get(*key)
                .cloned()
                .unwrap_or_else(|| def.default.to_string());
            let has_value = !value.is_empty();
            let (setting_type, value) = if def.secret {
                let masked = if has_value { "********".to_string() } else { String::new() };
                (SettingType::Secret, masked)
            } else {
                (SettingType::Normal, value)
            };
            result.insert(
                key.to_string(),
                SettingInfo {
                    key: key.to_string(),
                    value,
                    setting_type,
                    required: def.required,
                    description: def.description.to_string(),
                    has_value,
                },
            );
        }

        Ok(result)
    }

    /// Initialize default settings in DB (skip existing).
    pub fn initialize_defaults(&self) -> Result<(), anyhow::Error> {
        for (key, def) in DEFAULT_SETTINGS.iter() {
            if self.db.get_setting(key)?.is_some() {
                continue;
            }
            let type_str = if def.secret { "secret" } else { "normal" };
            self.db.set_setting(key, def.default, type_str)?;
        }
        Ok(())
    }

    /// Migrate settings from environment variables to DB (one-time).
    pub fn migrate_from_env(&self) -> Result<u32, anyhow::Error> {
        let mut migrated = 0u32;
        for (key, def) in DEFAULT_SETTINGS.iter() {
            if self.db.get_setting(key)?.is_some() {
                continue;
            }
            let Ok(env_val) = std::env::var(key) else {
                continue;
            };
            if env_val.is_empty() {
                continue;
            }
            if let Err(e) = validate_setting(key, &env_val) {
                tracing::warn!("Ignoring invalid env value for {key}: {e}");
                continue;
            }
            let type_str = if def.secret { "secret" } else { "normal" };
            self.db.set_setting(key, &env_val, type_str)?;
            tracing::info!("Migrated setting from env: {key}");
            migrated += 1;
        }
        if migrated > 0 {
            tracing::info!("Migration completed: {migrated} settings migrated");
            if has_secret_in_env() {
                tracing::warn!(
                    "SECURITY WARNING: Sensitive data in env vars. \
                     Remove from .env after confirming migration."
                );
            }
        }
        Ok(migrated)
    }

    /// Check which features are properly configured.
    pub fn check_feature_status(&self) -> Result<FeatureStatus, anyhow::Error> {
        let mut status = FeatureStatus {
            twitch_configured: true,
            account_connected: false,
            missing_settings: Vec::new(),
            warnings: Vec::new(),
        };

        for key in ["CLIENT_ID", "CLIENT_SECRET"] {
            if self.get_setting(key).unwrap_or_default().is_empty() {
                status.missing_settings.push(key.to_string());
                status.twitch_configured = false;
            }
        }

        let has_token = self.db.get_latest_token()?.is_some();
        let has_user = !self.get_setting("TWITCH_USER_ID").unwrap_or_default().is_empty();
        status.account_connected = has_token && has_user;
        if !status.account_connected {
            status
                .warnings
                .push("Twitch account not connected - polling is idle".into());
        }

        Ok(status)
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}

fn has_secret_in_env() -> bool {
    ["CLIENT_SECRET"]
        .iter()
        .any(|k| std::env::var(k).is_ok_and(|v| !v.is_empty()))
}
