//! Side effects relayed to the browser front-end over the WebSocket
//! broadcast channel.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::background;
use crate::config::AppConfig;
use crate::events::{self, BadgeColorPayload, BadgeTextPayload, NotificationPayload, SoundPayload, UrlPayload};
use crate::model::{Notification, SoundKind};
use crate::ports::{AudioSink, BadgeSink, KeepAlive, NotificationSink, OnCreated, PageCollaborator};
use crate::{WatchError, WatchResult};

/// Page URLs the front-end reported as open.
#[derive(Default)]
pub struct OpenPages {
    urls: RwLock<Vec<String>>,
}

impl OpenPages {
    pub fn replace(&self, urls: Vec<String>) -> WatchResult<()> {
        let mut guard = self.urls.write().map_err(|_| poisoned())?;
        *guard = urls;
        Ok(())
    }

    pub fn push(&self, url: String) -> WatchResult<()> {
        let mut guard = self.urls.write().map_err(|_| poisoned())?;
        if !guard.contains(&url) {
            guard.push(url);
        }
        Ok(())
    }

    pub fn snapshot(&self) -> WatchResult<Vec<String>> {
        Ok(self.urls.read().map_err(|_| poisoned())?.clone())
    }
}

fn poisoned() -> WatchError {
    WatchError::SideEffect("open page list lock poisoned".into())
}

#[derive(Clone)]
pub struct FrontendBridge {
    ws_tx: broadcast::Sender<String>,
    pages: Arc<OpenPages>,
    shutdown: CancellationToken,
    config: Arc<tokio::sync::RwLock<AppConfig>>,
}

impl FrontendBridge {
    pub fn new(
        ws_tx: broadcast::Sender<String>,
        pages: Arc<OpenPages>,
        shutdown: CancellationToken,
        config: Arc<tokio::sync::RwLock<AppConfig>>,
    ) -> Self {
        Self {
            ws_tx,
            pages,
            shutdown,
            config,
        }
    }
}

#[async_trait]
impl NotificationSink for FrontendBridge {
    async fn show(&self, notification: Notification, on_created: OnCreated) -> WatchResult<()> {
        let id = uuid::Uuid::new_v4().to_string();
        on_created(id.clone());
        let payload = NotificationPayload {
            id: &id,
            notification: &notification,
        };
        events::broadcast(&self.ws_tx, events::SHOW_NOTIFICATION, &payload);
        Ok(())
    }
}

#[async_trait]
impl PageCollaborator for FrontendBridge {
    async fn open_page(&self, url: &str) -> WatchResult<()> {
        tracing::info!(url, "Opening page");
        events::broadcast(&self.ws_tx, events::OPEN_PAGE, &UrlPayload { url });
        // the next report from the front-end overwrites this
        self.pages.push(url.to_string())
    }

    async fn open_page_urls(&self) -> WatchResult<Vec<String>> {
        self.pages.snapshot()
    }
}

#[async_trait]
impl AudioSink for FrontendBridge {
    async fn play(&self, kind: SoundKind, volume: f32) -> WatchResult<()> {
        events::broadcast(&self.ws_tx, events::PLAY_SOUND, &SoundPayload { kind, volume });
        Ok(())
    }
}

#[async_trait]
impl BadgeSink for FrontendBridge {
    async fn set_count(&self, count: usize) -> WatchResult<()> {
        let text = if count == 0 { String::new() } else { count.to_string() };
        events::broadcast(&self.ws_tx, events::BADGE_TEXT, &BadgeTextPayload { text });
        Ok(())
    }

    async fn set_warning(&self) -> WatchResult<()> {
        let text = events::WARNING_BADGE_TEXT.to_string();
        events::broadcast(&self.ws_tx, events::BADGE_TEXT, &BadgeTextPayload { text });
        Ok(())
    }

    async fn set_background_color(&self, color: &str) -> WatchResult<()> {
        events::broadcast(&self.ws_tx, events::BADGE_COLOR, &BadgeColorPayload { color });
        Ok(())
    }
}

impl KeepAlive for FrontendBridge {
    fn start(&self) -> WatchResult<()> {
        tokio::spawn(background::keep_alive_loop(
            self.ws_tx.clone(),
            self.shutdown.clone(),
            self.config.clone(),
        ));
        tracing::info!("Keep-alive started");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use serde_json::Value;

    fn bridge() -> (FrontendBridge, broadcast::Receiver<String>) {
        let (tx, rx) = broadcast::channel(16);
        let bridge = FrontendBridge::new(
            tx,
            Arc::new(OpenPages::default()),
            CancellationToken::new(),
            Arc::new(tokio::sync::RwLock::new(AppConfig::default())),
        );
        (bridge, rx)
    }

    fn next(rx: &mut broadcast::Receiver<String>) -> Value {
        serde_json::from_str(&rx.try_recv().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn notification_id_reaches_callback_and_event() {
        let (bridge, mut rx) = bridge();
        let seen = Arc::new(Mutex::new(None));
        let seen_cb = Arc::clone(&seen);

        bridge
            .show(
                Notification {
                    title: "t".into(),
                    message: "m".into(),
                    icon_url: "i".into(),
                },
                Box::new(move |id| *seen_cb.lock().unwrap() = Some(id)),
            )
            .await
            .unwrap();

        let msg = next(&mut rx);
        assert_eq!(msg["type"], "show_notification");
        let id = seen.lock().unwrap().clone().unwrap();
        assert_eq!(msg["data"]["id"], id.as_str());
    }

    #[tokio::test]
    async fn opened_page_is_tracked_until_next_report() {
        let (bridge, mut rx) = bridge();
        bridge.open_page("https://www.twitch.tv/foo").await.unwrap();

        assert_eq!(next(&mut rx)["data"]["url"], "https://www.twitch.tv/foo");
        assert_eq!(
            bridge.open_page_urls().await.unwrap(),
            vec!["https://www.twitch.tv/foo"]
        );

        bridge.pages.replace(Vec::new()).unwrap();
        assert!(bridge.open_page_urls().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn badge_events_carry_text_and_color() {
        let (bridge, mut rx) = bridge();
        bridge.set_count(3).await.unwrap();
        bridge.set_warning().await.unwrap();
        bridge.set_background_color("#737373").await.unwrap();

        assert_eq!(next(&mut rx)["data"]["text"], "3");
        assert_eq!(next(&mut rx)["data"]["text"], "!");
        assert_eq!(next(&mut rx)["data"]["color"], "#737373");
    }

    #[tokio::test]
    async fn sound_event_carries_kind_and_volume() {
        let (bridge, mut rx) = bridge();
        bridge.play(SoundKind::Secondary, 0.5).await.unwrap();
        let msg = next(&mut rx);
        assert_eq!(msg["type"], "play_sound");
        assert_eq!(msg["data"]["kind"], "secondary");
        assert_eq!(msg["data"]["volume"], 0.5);
    }
}
