//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, bool, bool, &'static str);

// (key, default, secret, required, description)
const DEFS: &[DefTuple] = &[
    ("CLIENT_ID", "", false, true, "Twitch application client ID"),
    ("CLIENT_SECRET", "", true, true, "Twitch application client secret"),
    ("TWITCH_USER_ID", "", false, false, "ID of the connected Twitch account"),
    ("SERVER_PORT", "8787", false, false, "HTTP/WebSocket server port"),
    ("POLL_INTERVAL_SECS", "60", false, false, "Seconds between followed-stream polls"),
    ("OPEN_DELAY_SECS", "5", false, false, "Seconds between two new streams in one poll"),
    ("NOTIFICATION_CACHE_SIZE", "500", false, false, "Notifications remembered for click-to-open"),
    ("KEEP_ALIVE_INTERVAL_SECS", "20", false, false, "Seconds between keep-alive pings to the front-end"),
    ("SHOW_NOTIFICATION", "true", false, false, "Show a notification when a followed channel goes live"),
    ("SOUND_VOLUME", "1.0", false, false, "Alert sound volume (0.0-1.0)"),
    ("SUSPEND_FROM_DATE", "", false, false, "Auto-open suspended since (RFC 3339), empty when active"),
    ("TRENDING_LANGUAGES", "", false, false, "Comma separated language codes for trending streams"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub secret: bool,
    pub required: bool,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, secret, required, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    secret,
                    required,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
