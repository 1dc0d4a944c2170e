use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::{RwLock, broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use watch_db::Database;

use crate::config::{AppConfig, SettingsManager};
use crate::engine::PollEngine;
use crate::infra::{
    CallbackAuthFlow, DbCredentialStore, DbPreferenceStore, FrontendBridge, HelixSource, OpenPages,
};
use crate::messaging::{Envelope, MessageBus};
use crate::ports::Collaborators;
use crate::usecase::{OptionsUseCase, PopupUseCase};

const WS_CHANNEL_CAPACITY: usize = 2048;

/// Application shared state accessible from the axum handlers and the
/// background tasks.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Broadcast channel for WebSocket messages
    ws_tx: broadcast::Sender<String>,
    /// Application configuration (reloadable)
    config: Arc<RwLock<AppConfig>>,
    db: Database,
    data_dir: PathBuf,
    shutdown_token: CancellationToken,
    settings: SettingsManager,
    pages: Arc<OpenPages>,
    auth_flow: Arc<CallbackAuthFlow>,
    engine: Arc<PollEngine>,
    popup: PopupUseCase,
    options: OptionsUseCase,
    /// Taken once by the message worker.
    message_rx: Mutex<Option<mpsc::Receiver<Envelope>>>,
}

impl SharedState {
    /// Wire the production collaborators around an opened database and
    /// loaded config.
    pub fn new(db: Database, config: AppConfig, data_dir: PathBuf) -> Self {
        let (ws_tx, _) = broadcast::channel(WS_CHANNEL_CAPACITY);
        let shutdown_token = CancellationToken::new();
        let engine_options = config.engine_options();
        let config = Arc::new(RwLock::new(config));

        let pages = Arc::new(OpenPages::default());
        let bridge = Arc::new(FrontendBridge::new(
            ws_tx.clone(),
            pages.clone(),
            shutdown_token.clone(),
            config.clone(),
        ));
        let auth_flow = Arc::new(CallbackAuthFlow::new(config.clone(), ws_tx.clone()));

        let deps = Collaborators {
            credentials: Arc::new(DbCredentialStore::new(db.clone(), config.clone())),
            preferences: Arc::new(DbPreferenceStore::new(db.clone())),
            source: Arc::new(HelixSource::new(config.clone())),
            notifications: bridge.clone(),
            pages: bridge.clone(),
            audio: bridge.clone(),
            badge: bridge.clone(),
            keep_alive: bridge,
            auth: auth_flow.clone(),
        };

        let engine = Arc::new(PollEngine::new(
            deps.clone(),
            engine_options,
            shutdown_token.clone(),
        ));
        let (bus, message_rx) = MessageBus::channel();
        let popup = PopupUseCase::new(deps.clone(), engine.suspend_controller().clone(), bus);
        let options = OptionsUseCase::new(deps);

        Self {
            inner: Arc::new(SharedStateInner {
                ws_tx,
                config,
                settings: SettingsManager::new(db.clone()),
                db,
                data_dir,
                shutdown_token,
                pages,
                auth_flow,
                engine,
                popup,
                options,
                message_rx: Mutex::new(Some(message_rx)),
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner
            .config
            .try_read()
            .map(|c| c.server_port)
            .unwrap_or(8787)
    }

    pub fn ws_sender(&self) -> &broadcast::Sender<String> {
        &self.inner.ws_tx
    }

    pub fn subscribe_ws(&self) -> broadcast::Receiver<String> {
        self.inner.ws_tx.subscribe()
    }

    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.inner.data_dir
    }

    pub fn settings(&self) -> &SettingsManager {
        &self.inner.settings
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }

    pub fn engine(&self) -> &Arc<PollEngine> {
        &self.inner.engine
    }

    pub fn popup(&self) -> &PopupUseCase {
        &self.inner.popup
    }

    pub fn options(&self) -> &OptionsUseCase {
        &self.inner.options
    }

    pub fn pages(&self) -> &OpenPages {
        &self.inner.pages
    }

    pub fn auth_flow(&self) -> &CallbackAuthFlow {
        &self.inner.auth_flow
    }

    /// Receiver for the message worker. `None` after the first call.
    pub fn take_message_receiver(&self) -> Option<mpsc::Receiver<Envelope>> {
        match self.inner.message_rx.lock() {
            Ok(mut rx) => rx.take(),
            Err(_) => {
                tracing::error!("Message receiver lock poisoned");
                None
            }
        }
    }

    /// Get a read lock on the current config.
    pub async fn config(&self) -> tokio::sync::RwLockReadGuard<'_, AppConfig> {
        self.inner.config.read().await
    }

    /// Reload config from the database and hand the new timings to the
    /// engine. The keep-alive loop reads the config itself.
    pub async fn reload_config(&self) -> Result<(), anyhow::Error> {
        let mut config = self.inner.config.write().await;
        config.reload(&self.inner.settings)?;
        self.inner.engine.apply_options(config.engine_options())?;
        Ok(())
    }
}
