use std::sync::Arc;

use livepush_core::protocol::{LiveMessage, Method, WireMessage};

use crate::obs::ClientMetrics;
use crate::sink::EventSink;

/// What happened to one wire message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Chat forwarded to the sink.
    Forwarded,
    /// Known method, decoded but not acted upon.
    Observed(Method),
    /// Unknown method, skipped.
    Skipped,
    /// Payload did not decode for its method.
    Malformed,
}

/// Per-session router from wire messages to the event sink.
#[derive(Clone)]
pub struct Dispatcher {
    room_id: String,
    live_id: String,
    sink: Arc<dyn EventSink>,
    metrics: Arc<ClientMetrics>,
}

impl Dispatcher {
    pub fn new(
        room_id: impl Into<String>,
        live_id: impl Into<String>,
        sink: Arc<dyn EventSink>,
        metrics: Arc<ClientMetrics>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            live_id: live_id.into(),
            sink,
            metrics,
        }
    }

    /// Dispatch one message. Never blocks on the sink.
    pub fn dispatch(&self, msg: &WireMessage) -> Dispatched {
        let decoded = match LiveMessage::decode(msg) {
            Ok(m) => m,
            Err(e) => {
                self.metrics.decode_errors.inc(&[("stage", "message")]);
                tracing::debug!(method = %msg.method, error = %e, "message decode failed");
                return Dispatched::Malformed;
            }
        };
        self.metrics.messages.inc(&[("method", decoded.method().as_str())]);

        match decoded {
            LiveMessage::Chat(chat) => {
                tracing::info!("[chat] {}: {}", chat.nickname(), chat.content);
                self.metrics.chat_events.inc(&[]);
                self.sink.submit(chat.to_event(&self.room_id, &self.live_id));
                Dispatched::Forwarded
            }
            LiveMessage::Gift(gift) => {
                let nickname = gift.user.as_ref().map(|u| u.nickname.as_str()).unwrap_or_default();
                tracing::debug!("[gift] {}: {} x{}", nickname, gift.gift_name(), gift.combo_count);
                Dispatched::Observed(Method::Gift)
            }
            LiveMessage::Like(like) => {
                let nickname = like.user.as_ref().map(|u| u.nickname.as_str()).unwrap_or_default();
                tracing::debug!("[like] {} x{}", nickname, like.count);
                Dispatched::Observed(Method::Like)
            }
            LiveMessage::Member(member) => {
                let nickname = member
                    .user
                    .as_ref()
                    .map(|u| u.nickname.as_str())
                    .unwrap_or_default();
                tracing::debug!("[enter] {}", nickname);
                Dispatched::Observed(Method::Member)
            }
            LiveMessage::Unhandled(method) => {
                tracing::trace!(%method, "unhandled method");
                Dispatched::Skipped
            }
        }
    }
}
