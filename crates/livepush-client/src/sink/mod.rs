//! Event sink capability.
//!
//! The session hands every decoded chat event to an `EventSink`. Handoff is
//! synchronous and must return immediately: implementations that do I/O
//! (see `HttpSink`) spawn the delivery so a slow consumer never stalls the
//! receive loop or the heartbeat.

pub mod http;

use tokio::sync::mpsc;

use livepush_core::ChatEvent;

pub use http::HttpSink;

/// Downstream consumer of chat events.
pub trait EventSink: Send + Sync {
    /// Hand off one event without blocking.
    fn submit(&self, event: ChatEvent);
}

/// Logs events and drops them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn submit(&self, event: ChatEvent) {
        tracing::info!(
            live_id = %event.live_id,
            user_id = event.user_id,
            content = %event.content,
            "chat event"
        );
    }
}

/// Forwards events into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ChatEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ChatEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn submit(&self, event: ChatEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("chat event receiver dropped");
        }
    }
}
