//! Interactive OAuth authorization-code flow.
//!
//! `launch` publishes the authorize URL to the front-end and waits for
//! `/callback` to hand the code back through [`CallbackAuthFlow::complete`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock, broadcast, oneshot};
use twitch_client::Token;
use twitch_client::auth::TwitchAuth;

use crate::config::AppConfig;
use crate::events::{self, AuthSuccessPayload, UrlPayload};
use crate::ports::AuthFlow;
use crate::{WatchError, WatchResult};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Code on success, provider error text otherwise.
pub type CallbackOutcome = Result<String, String>;

struct PendingAuth {
    state: String,
    tx: oneshot::Sender<CallbackOutcome>,
}

pub struct CallbackAuthFlow {
    config: Arc<RwLock<AppConfig>>,
    ws_tx: broadcast::Sender<String>,
    pending: Mutex<Option<PendingAuth>>,
    timeout: Duration,
}

impl CallbackAuthFlow {
    pub fn new(config: Arc<RwLock<AppConfig>>, ws_tx: broadcast::Sender<String>) -> Self {
        Self {
            config,
            ws_tx,
            pending: Mutex::new(None),
            timeout: CALLBACK_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn auth(&self) -> WatchResult<TwitchAuth> {
        let config = self.config.read().await;
        if config.client_id.is_empty() {
            return Err(WatchError::MissingCredential("client id"));
        }
        if config.client_secret.is_empty() {
            return Err(WatchError::MissingCredential("client secret"));
        }
        Ok(TwitchAuth::new(
            config.client_id.clone(),
            config.client_secret.clone(),
            config.redirect_uri(),
        ))
    }

    /// Register a new pending authorization. Any earlier one is dropped.
    async fn begin(&self) -> (String, oneshot::Receiver<CallbackOutcome>) {
        let state = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = oneshot::channel();
        let previous = self.pending.lock().await.replace(PendingAuth {
            state: state.clone(),
            tx,
        });
        if previous.is_some() {
            tracing::info!("Superseding an unfinished authorization");
        }
        (state, rx)
    }

    async fn wait_for_code(
        &self,
        state: &str,
        rx: oneshot::Receiver<CallbackOutcome>,
    ) -> WatchResult<String> {
        let outcome = match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => return Err(WatchError::AuthFlow("authorization was superseded".into())),
            Err(_) => {
                let mut pending = self.pending.lock().await;
                if pending.as_ref().is_some_and(|p| p.state == state) {
                    pending.take();
                }
                return Err(WatchError::AuthFlow("timed out waiting for authorization".into()));
            }
        };
        outcome.map_err(WatchError::AuthFlow)
    }

    /// Deliver the `/callback` result to the waiting `launch`.
    pub async fn complete(&self, state: &str, outcome: CallbackOutcome) -> WatchResult<()> {
        let mut pending = self.pending.lock().await;
        match pending.as_ref() {
            None => return Err(WatchError::AuthFlow("no authorization in progress".into())),
            Some(p) if p.state != state => {
                return Err(WatchError::AuthFlow("OAuth state mismatch".into()));
            }
            Some(_) => {}
        }
        let Some(PendingAuth { tx, .. }) = pending.take() else {
            return Err(WatchError::AuthFlow("no authorization in progress".into()));
        };
        tx.send(outcome)
            .map_err(|_| WatchError::AuthFlow("authorization is no longer awaited".into()))
    }
}

#[async_trait]
impl AuthFlow for CallbackAuthFlow {
    async fn launch(&self) -> WatchResult<Token> {
        let auth = self.auth().await?;
        let (state, rx) = self.begin().await;
        let url = auth.get_auth_url_with_state(Some(state.as_str()))?;

        tracing::info!(%url, "Open this URL to authorize the Twitch account");
        events::broadcast(&self.ws_tx, events::AUTHORIZE, &UrlPayload { url: &url });

        let code = self.wait_for_code(&state, rx).await?;
        let token = auth.exchange_code(&code).await.map_err(|e| match e {
            twitch_client::TwitchError::TokenRefreshFailed(msg) => WatchError::AuthFlow(msg),
            other => WatchError::AuthFlow(other.to_string()),
        })?;

        events::broadcast(
            &self.ws_tx,
            events::AUTH_SUCCESS,
            &AuthSuccessPayload { authenticated: true },
        );
        Ok(token)
    }
}
