//! WebSocket event names and payloads pushed to the browser front-end.
//!
//! Every message is `{"type": <event>, "data": <payload>}`.

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast;

use crate::model::{Notification, SoundKind};

// -- Event name constants --

pub const SHOW_NOTIFICATION: &str = "show_notification";
pub const OPEN_PAGE: &str = "open_page";
pub const PLAY_SOUND: &str = "play_sound";
pub const BADGE_TEXT: &str = "badge_text";
pub const BADGE_COLOR: &str = "badge_color";
pub const KEEP_ALIVE: &str = "keep_alive";
pub const AUTHORIZE: &str = "authorize";
pub const AUTH_SUCCESS: &str = "auth_success";

/// Badge text shown when the account is not connected.
pub const WARNING_BADGE_TEXT: &str = "!";

// -- Payload types --

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub notification: &'a Notification,
}

#[derive(Debug, Clone, Serialize)]
pub struct UrlPayload<'a> {
    pub url: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SoundPayload {
    pub kind: SoundKind,
    pub volume: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BadgeTextPayload {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BadgeColorPayload<'a> {
    pub color: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeepAlivePayload {
    pub timestamp: i64,
}

impl KeepAlivePayload {
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now().timestamp(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthSuccessPayload {
    pub authenticated: bool,
}

/// Serialize and broadcast an event. Returns the number of receivers.
pub fn broadcast<T: Serialize>(tx: &broadcast::Sender<String>, event: &str, payload: &T) -> usize {
    let message = json!({ "type": event, "data": payload }).to_string();
    match tx.send(message) {
        Ok(receivers) => receivers,
        Err(_) => {
            tracing::debug!(event, "No WebSocket clients connected, event dropped");
            0
        }
    }
}
