//! Domain types shared by the engine, the use cases and the HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const CHANNEL_BASE_URL: &str = "https://www.twitch.tv";

pub const THUMBNAIL_WIDTH: u32 = 1280;
pub const THUMBNAIL_HEIGHT: u32 = 720;

/// Badge background while auto-open is active.
pub const DEFAULT_BADGE_COLOR: &str = "#9146FF";
/// Badge background while auto-open is suspended.
pub const SUSPENDED_BADGE_COLOR: &str = "#737373";

/// A broadcast that is currently live. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSession {
    pub id: String,
    pub owner_id: String,
    pub owner_login: String,
    pub owner_display_name: String,
    pub title: String,
    pub thumbnail_url_template: String,
    pub viewer_count: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub language: String,
    pub category_id: String,
    pub category_name: String,
    pub tag_ids: Vec<String>,
    pub tags: Vec<String>,
    pub avatar_url: Option<String>,
}

impl LiveSession {
    /// Thumbnail template resolved to 1280x720.
    pub fn thumbnail_url(&self) -> String {
        resolve_thumbnail(&self.thumbnail_url_template)
    }

    pub fn stream_url(&self) -> String {
        stream_url(&self.owner_login)
    }
}

/// A broadcaster the user follows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streamer {
    pub id: String,
    pub login: String,
    pub name: String,
    pub followed_at: Option<DateTime<Utc>>,
    pub avatar_url: Option<String>,
}

/// Desktop notification request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub icon_url: String,
}

impl Notification {
    pub fn went_live(session: &LiveSession) -> Self {
        Self {
            title: format!("{} started streaming", session.owner_display_name),
            message: session.title.clone(),
            icon_url: session.thumbnail_url(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundKind {
    /// A page was opened automatically.
    Primary,
    /// Someone went live but nothing was opened.
    Secondary,
}

/// Canonical channel page for a login handle.
pub fn stream_url(login: &str) -> String {
    format!("{CHANNEL_BASE_URL}/{login}")
}

pub fn resolve_thumbnail(template: &str) -> String {
    template
        .replace("{width}", &THUMBNAIL_WIDTH.to_string())
        .replace("{height}", &THUMBNAIL_HEIGHT.to_string())
}

/// Parse an RFC 3339 timestamp as sent by Helix; empty or malformed is `None`.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
pub(crate) fn session(id: &str, owner_id: &str, login: &str) -> LiveSession {
    LiveSession {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        owner_login: login.to_string(),
        owner_display_name: login.to_uppercase(),
        title: format!("{login} live"),
        thumbnail_url_template: format!(
            "https://static-cdn.jtvnw.net/previews-ttv/live_user_{login}-{{width}}x{{height}}.jpg"
        ),
        viewer_count: 1,
        started_at: None,
        language: "en".into(),
        category_id: String::new(),
        category_name: String::new(),
        tag_ids: Vec::new(),
        tags: Vec::new(),
        avatar_url: None,
    }
}
