//! Outbound side of a connection
//!
//! Each accepted connection gets a writer task that owns the socket's write
//! half and drains an unbounded channel of pre-serialized frames. Senders
//! never block on a slow peer; a peer whose writer has died simply refuses
//! further frames, which is how broadcasters detect dead recipients.

use std::sync::Arc;

use log::{debug, error};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::wire::{write_frame, Message};

/// Identifier assigned to every accepted connection
pub type PeerId = u64;

/// One serialized message, shared between all recipients of a broadcast
pub type Frame = Arc<str>;

/// Handle used to queue frames for one connection
#[derive(Debug, Clone)]
pub struct PeerHandle {
    id: PeerId,
    tx: mpsc::UnboundedSender<Frame>,
}

impl PeerHandle {
    /// Handle plus the receiving end of its queue, without a writer task
    pub fn channel(id: PeerId) -> (Self, mpsc::UnboundedReceiver<Frame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { id, tx }, rx)
    }

    /// Spawn a writer task for `writer` and return its handle
    pub fn spawn<W>(id: PeerId, writer: W) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (handle, rx) = Self::channel(id);
        tokio::spawn(write_task(id, writer, rx));
        handle
    }

    pub fn id(&self) -> PeerId {
        self.id
    }

    /// Queue a frame; false once the writer task has stopped
    pub fn send(&self, frame: Frame) -> bool {
        self.tx.send(frame).is_ok()
    }
}

async fn write_task<W>(id: PeerId, mut writer: W, mut rx: mpsc::UnboundedReceiver<Frame>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = rx.recv().await {
        if let Err(e) = write_frame(&mut writer, frame.as_bytes()).await {
            debug!("peer {} writer stopped: {}", id, e);
            break;
        }
    }
    let _ = writer.shutdown().await;
}

/// Serialize a message once for any number of recipients
pub fn encode_frame(message: &Message) -> Option<Frame> {
    match message.encode() {
        Ok(text) => Some(Arc::from(text)),
        Err(e) => {
            error!("failed to encode {}: {}", message.kind(), e);
            None
        }
    }
}
