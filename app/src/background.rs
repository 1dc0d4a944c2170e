//! Background task loops: poll scheduling, the foreground message worker
//! and the keep-alive ping.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, broadcast, mpsc};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::engine::PollEngine;
use crate::events;
use crate::messaging::{Envelope, Message};

pub async fn sleep_or_cancel(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => true,
        _ = sleep(duration) => false,
    }
}

/// Periodic poll cycles after the immediate first one. The interval is
/// re-read before every sleep.
pub async fn poll_loop(engine: Arc<PollEngine>, shutdown_token: CancellationToken) {
    loop {
        let interval = engine.options().poll_interval;
        if sleep_or_cancel(&shutdown_token, interval).await {
            tracing::info!("Poll loop stopped (shutdown)");
            return;
        }
        engine.request_streams_ignoring_error().await;
    }
}

/// Serve foreground requests. Each one runs in its own task, so a newer
/// connect attempt can supersede one still waiting for its callback.
pub async fn message_worker_loop(
    engine: Arc<PollEngine>,
    mut rx: mpsc::Receiver<Envelope>,
    shutdown_token: CancellationToken,
) {
    tracing::info!("Message worker started");
    loop {
        let envelope = tokio::select! {
            _ = shutdown_token.cancelled() => {
                tracing::info!("Message worker stopped (shutdown)");
                return;
            }
            next = rx.recv() => match next {
                Some(envelope) => envelope,
                None => {
                    tracing::info!("Message worker stopped (channel closed)");
                    return;
                }
            },
        };

        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            let Envelope { message, reply } = envelope;
            let result = match message {
                Message::RequestConnectToTwitch => engine.handle_connect_request().await,
            };
            if reply.send(result).is_err() {
                tracing::debug!(?message, "Requester went away before the reply");
            }
        });
    }
}

/// Ping connected front-ends so they stay awake. The interval follows the
/// current config.
pub async fn keep_alive_loop(
    ws_tx: broadcast::Sender<String>,
    shutdown_token: CancellationToken,
    config: Arc<RwLock<AppConfig>>,
) {
    loop {
        let interval = config.read().await.keep_alive_interval();
        if sleep_or_cancel(&shutdown_token, interval).await {
            tracing::info!("Keep-alive loop stopped (shutdown)");
            return;
        }
        events::broadcast(&ws_tx, events::KEEP_ALIVE, &events::KeepAlivePayload::now());
    }
}
