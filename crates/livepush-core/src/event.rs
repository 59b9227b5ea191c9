//! The decoded chat event handed to the event sink.

use serde::Serialize;

/// One chat message, flattened for downstream consumers.
///
/// Serializes as `{"user_id", "room_id", "live_id", "content"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatEvent {
    /// Platform user id of the sender.
    pub user_id: u64,
    /// Internal room id the session is connected to.
    pub room_id: String,
    /// Public live/channel id (the path segment of the room page).
    pub live_id: String,
    /// Message text.
    pub content: String,
}
