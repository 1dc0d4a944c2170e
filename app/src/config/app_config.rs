//! Runtime application configuration loaded from DB + environment overrides.

use std::time::Duration;

use super::manager::SettingsManager;
use crate::engine::EngineOptions;

/// Runtime configuration populated from the settings DB.
///
/// User preferences (notification flag, volume, suspend state, languages)
/// are not cached here; they are read from the store on every use.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
    pub server_port: u16,
    pub poll_interval_secs: u64,
    pub open_delay_secs: u64,
    pub notification_cache_size: usize,
    pub keep_alive_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            server_port: 8787,
            poll_interval_secs: 60,
            open_delay_secs: 5,
            notification_cache_size: 500,
            keep_alive_interval_secs: 20,
        }
    }
}

impl AppConfig {
    /// Load configuration from the settings manager (DB-first, env overrides).
    pub fn load(sm: &SettingsManager) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> String { sm.get_setting(key).unwrap_or_default() };
        let defaults = Self::default();

        let mut server_port = parse_or(&g("SERVER_PORT"), defaults.server_port);

        // Environment variable override
        if let Ok(v) = std::env::var("SERVER_PORT") {
            if let Ok(p) = v.parse::<u16>() {
                server_port = p;
            }
        }

        Ok(Self {
            client_id: g("CLIENT_ID"),
            client_secret: g("CLIENT_SECRET"),
            server_port,
            poll_interval_secs: parse_or(&g("POLL_INTERVAL_SECS"), defaults.poll_interval_secs),
            open_delay_secs: parse_or(&g("OPEN_DELAY_SECS"), defaults.open_delay_secs),
            notification_cache_size: parse_or(
                &g("NOTIFICATION_CACHE_SIZE"),
                defaults.notification_cache_size,
            ),
            keep_alive_interval_secs: parse_or(
                &g("KEEP_ALIVE_INTERVAL_SECS"),
                defaults.keep_alive_interval_secs,
            ),
        })
    }

    /// Reload config from the settings manager.
    pub fn reload(&mut self, sm: &SettingsManager) -> Result<(), anyhow::Error> {
        *self = Self::load(sm)?;
        Ok(())
    }

    pub fn twitch_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// OAuth redirect target served by this process.
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.server_port)
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            open_delay: Duration::from_secs(self.open_delay_secs),
            notification_capacity: self.notification_cache_size,
        }
    }

    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_secs(self.keep_alive_interval_secs.max(1))
    }
}

fn parse_or<T: std::str::FromStr>(s: &str, default: T) -> T {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
