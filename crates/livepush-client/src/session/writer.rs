use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::SinkExt;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use livepush_core::error::{LivePushError, Result};
use livepush_core::protocol::PushFrame;

use crate::transport::{codec, WsStream};

/// Serialized write access to the socket, shared by the heartbeat and ack paths.
#[derive(Clone)]
pub struct FrameWriter {
    sink: Arc<Mutex<SplitSink<WsStream, Message>>>,
    cancel: CancellationToken,
}

impl FrameWriter {
    pub(crate) fn new(sink: SplitSink<WsStream, Message>, cancel: CancellationToken) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
            cancel,
        }
    }

    /// Write one frame. A write stuck on a peer that stopped reading is
    /// abandoned with `Closed` as soon as the session is cancelled.
    pub async fn send_frame(&self, frame: &PushFrame) -> Result<()> {
        let msg = codec::encode(frame);
        tokio::select! {
            _ = self.cancel.cancelled() => Err(LivePushError::Closed),
            res = async { self.sink.lock().await.send(msg).await } => {
                res.map_err(|e| LivePushError::Io(e.to_string()))
            }
        }
    }

    /// Send a close frame and shut the write half, giving up after `grace`.
    pub(crate) async fn close_within(&self, grace: Duration) -> Result<()> {
        let closing = async { self.sink.lock().await.close().await };
        match tokio::time::timeout(grace, closing).await {
            Ok(res) => res.map_err(|e| LivePushError::Io(e.to_string())),
            Err(_) => Err(LivePushError::Io("close handshake timed out".into())),
        }
    }
}
