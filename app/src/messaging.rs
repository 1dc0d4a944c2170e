//! Foreground → engine message channel. The engine owns the connect
//! flow; callers wait for its outcome on a oneshot reply.

use tokio::sync::{mpsc, oneshot};

use crate::{WatchError, WatchResult};

const QUEUE_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    RequestConnectToTwitch,
}

#[derive(Debug)]
pub struct Envelope {
    pub message: Message,
    pub reply: oneshot::Sender<WatchResult<()>>,
}

#[derive(Clone)]
pub struct MessageBus {
    tx: mpsc::Sender<Envelope>,
}

impl MessageBus {
    pub fn channel() -> (Self, mpsc::Receiver<Envelope>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        (Self { tx }, rx)
    }

    /// Send `message` and wait for the worker's result.
    pub async fn request(&self, message: Message) -> WatchResult<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { message, reply })
            .await
            .map_err(|_| WatchError::SideEffect("message worker is not running".into()))?;
        rx.await
            .map_err(|_| WatchError::SideEffect("message worker dropped the request".into()))?
    }
}
