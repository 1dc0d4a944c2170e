use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::app::SharedState;

/// Messages the front-end sends up the socket.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
enum ClientMessage {
    Ping,
    /// Full list of page URLs currently open in the browser.
    OpenPages { urls: Vec<String> },
    NotificationClicked { id: String },
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.subscribe_ws();

    let client_id = uuid::Uuid::new_v4().to_string();
    let welcome = serde_json::json!({
        "type": "connected",
        "data": { "clientId": client_id }
    });
    if sender
        .send(Message::Text(welcome.to_string().into()))
        .await
        .is_err()
    {
        return;
    }

    tracing::info!("WebSocket client connected: {}", client_id);

    // Replies meant for this client only
    let (reply_tx, mut reply_rx) = mpsc::channel::<String>(16);

    // Forward broadcast messages and direct replies to this client
    let mut send_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                broadcast = rx.recv() => match broadcast {
                    Ok(msg) => msg,
                    Err(_) => break,
                },
                reply = reply_rx.recv() => match reply {
                    Some(msg) => msg,
                    None => break,
                },
            };
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    let cid = client_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if let Some(reply) = handle_client_message(&text, &state).await {
                        if reply_tx.send(reply).await.is_err() {
                            break;
                        }
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        tracing::info!("WebSocket client disconnected: {}", cid);
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

/// Apply one client message. Returns the reply for the sending client,
/// if any.
async fn handle_client_message(text: &str, state: &SharedState) -> Option<String> {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::debug!("Ignoring unrecognized client message: {e}");
            return None;
        }
    };

    match msg {
        ClientMessage::Ping => {
            return Some(serde_json::json!({ "type": "pong" }).to_string());
        }
        ClientMessage::OpenPages { urls } => {
            tracing::debug!(count = urls.len(), "Open pages reported");
            if let Err(e) = state.pages().replace(urls) {
                tracing::warn!("Failed to store open pages: {e}");
            }
        }
        ClientMessage::NotificationClicked { id } => {
            if let Err(e) = state.engine().open_notification(&id).await {
                tracing::warn!(notification_id = %id, "Failed to open notification page: {e}");
            }
        }
    }
    None
}
