//! Typed sub-message payloads and method dispatch.
//!
//! Only the fields the client reads are declared; protobuf skips the rest, so
//! newer peers with richer schemas still decode.

use bytes::Bytes;
use prost::Message;

use crate::error::{LivePushError, Result};
use crate::event::ChatEvent;
use crate::protocol::response::WireMessage;

pub const METHOD_CHAT: &str = "WebcastChatMessage";
pub const METHOD_GIFT: &str = "WebcastGiftMessage";
pub const METHOD_LIKE: &str = "WebcastLikeMessage";
pub const METHOD_MEMBER: &str = "WebcastMemberMessage";

#[derive(Clone, PartialEq, Message)]
pub struct User {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(uint64, tag = "2")]
    pub short_id: u64,
    #[prost(string, tag = "3")]
    pub nickname: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct Common {
    #[prost(string, tag = "1")]
    pub method: String,
    #[prost(uint64, tag = "2")]
    pub msg_id: u64,
    #[prost(uint64, tag = "3")]
    pub room_id: u64,
    #[prost(uint64, tag = "4")]
    pub create_time: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct ChatMessage {
    #[prost(message, optional, tag = "1")]
    pub common: Option<Common>,
    #[prost(message, optional, tag = "2")]
    pub user: Option<User>,
    #[prost(string, tag = "3")]
    pub content: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct GiftStruct {
    #[prost(string, tag = "2")]
    pub describe: String,
    #[prost(uint64, tag = "5")]
    pub id: u64,
    #[prost(string, tag = "16")]
    pub name: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct GiftMessage {
    #[prost(message, optional, tag = "1")]
    pub common: Option<Common>,
    #[prost(uint64, tag = "2")]
    pub gift_id: u64,
    #[prost(uint64, tag = "4")]
    pub group_count: u64,
    #[prost(uint64, tag = "5")]
    pub repeat_count: u64,
    #[prost(uint64, tag = "6")]
    pub combo_count: u64,
    #[prost(message, optional, tag = "7")]
    pub user: Option<User>,
    #[prost(message, optional, tag = "15")]
    pub gift: Option<GiftStruct>,
}

#[derive(Clone, PartialEq, Message)]
pub struct LikeMessage {
    #[prost(message, optional, tag = "1")]
    pub common: Option<Common>,
    #[prost(uint64, tag = "2")]
    pub count: u64,
    #[prost(uint64, tag = "3")]
    pub total: u64,
    #[prost(message, optional, tag = "5")]
    pub user: Option<User>,
}

#[derive(Clone, PartialEq, Message)]
pub struct MemberMessage {
    #[prost(message, optional, tag = "1")]
    pub common: Option<Common>,
    #[prost(message, optional, tag = "2")]
    pub user: Option<User>,
    #[prost(uint64, tag = "3")]
    pub member_count: u64,
}

impl ChatMessage {
    pub fn nickname(&self) -> &str {
        self.user.as_ref().map(|u| u.nickname.as_str()).unwrap_or_default()
    }

    /// Flatten into the sink-facing event for the given session.
    pub fn to_event(&self, room_id: &str, live_id: &str) -> ChatEvent {
        ChatEvent {
            user_id: self.user.as_ref().map(|u| u.id).unwrap_or_default(),
            room_id: room_id.to_string(),
            live_id: live_id.to_string(),
            content: self.content.clone(),
        }
    }
}

impl GiftMessage {
    pub fn gift_name(&self) -> &str {
        self.gift.as_ref().map(|g| g.name.as_str()).unwrap_or_default()
    }
}

/// Known method discriminators. Anything else is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Chat,
    Gift,
    Like,
    Member,
    Unknown,
}

impl Method {
    pub fn from_wire(method: &str) -> Self {
        match method {
            METHOD_CHAT => Method::Chat,
            METHOD_GIFT => Method::Gift,
            METHOD_LIKE => Method::Like,
            METHOD_MEMBER => Method::Member,
            _ => Method::Unknown,
        }
    }

    /// Label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Chat => "chat",
            Method::Gift => "gift",
            Method::Like => "like",
            Method::Member => "member",
            Method::Unknown => "unknown",
        }
    }
}

/// A decoded sub-message.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveMessage {
    Chat(ChatMessage),
    Gift(GiftMessage),
    Like(LikeMessage),
    Member(MemberMessage),
    /// Method this client does not know; payload left undecoded.
    Unhandled(String),
}

impl LiveMessage {
    /// Decode a wire message according to its method name.
    pub fn decode(msg: &WireMessage) -> Result<Self> {
        let payload = msg.payload.clone();
        Ok(match Method::from_wire(&msg.method) {
            Method::Chat => LiveMessage::Chat(decode_chat(payload)?),
            Method::Gift => LiveMessage::Gift(GiftMessage::decode(payload)?),
            Method::Like => LiveMessage::Like(LikeMessage::decode(payload)?),
            Method::Member => LiveMessage::Member(MemberMessage::decode(payload)?),
            Method::Unknown => LiveMessage::Unhandled(msg.method.clone()),
        })
    }

    pub fn method(&self) -> Method {
        match self {
            LiveMessage::Chat(_) => Method::Chat,
            LiveMessage::Gift(_) => Method::Gift,
            LiveMessage::Like(_) => Method::Like,
            LiveMessage::Member(_) => Method::Member,
            LiveMessage::Unhandled(_) => Method::Unknown,
        }
    }
}

/// Decode a chat payload. A chat without a sender is rejected.
pub fn decode_chat(buf: Bytes) -> Result<ChatMessage> {
    let chat = ChatMessage::decode(buf)?;
    if chat.user.is_none() {
        return Err(LivePushError::Decode("chat message without user".into()));
    }
    Ok(chat)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use super::*;
    use crate::error::ErrorKind;

    fn user(id: u64, nickname: &str) -> Option<User> {
        Some(User {
            id,
            nickname: nickname.into(),
            ..Default::default()
        })
    }

    fn wire(method: &str, payload: Vec<u8>) -> WireMessage {
        WireMessage {
            method: method.into(),
            payload: Bytes::from(payload),
            ..Default::default()
        }
    }

    #[test]
    fn chat_becomes_event() {
        let chat = ChatMessage {
            user: user(1001, "Alice"),
            content: "hello".into(),
            ..Default::default()
        };
        let decoded = decode_chat(Bytes::from(chat.encode_to_vec())).unwrap();
        assert_eq!(decoded.nickname(), "Alice");

        let ev = decoded.to_event("7100", "88");
        assert_eq!(ev.user_id, 1001);
        assert_eq!(ev.content, "hello");
        assert_eq!(ev.room_id, "7100");
        assert_eq!(ev.live_id, "88");
    }

    #[test]
    fn chat_without_user_is_rejected() {
        let chat = ChatMessage {
            content: "orphan".into(),
            ..Default::default()
        };
        let err = decode_chat(Bytes::from(chat.encode_to_vec())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn dispatches_known_methods() {
        let gift = GiftMessage {
            user: user(5, "Bob"),
            combo_count: 3,
            gift: Some(GiftStruct {
                name: "Rose".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let like = LikeMessage {
            user: user(6, "Carol"),
            count: 12,
            ..Default::default()
        };
        let member = MemberMessage {
            user: user(7, "Dave"),
            member_count: 1200,
            ..Default::default()
        };

        match LiveMessage::decode(&wire(METHOD_GIFT, gift.encode_to_vec())).unwrap() {
            LiveMessage::Gift(g) => {
                assert_eq!(g.gift_name(), "Rose");
                assert_eq!(g.combo_count, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
        match LiveMessage::decode(&wire(METHOD_LIKE, like.encode_to_vec())).unwrap() {
            LiveMessage::Like(l) => assert_eq!(l.count, 12),
            other => panic!("unexpected {other:?}"),
        }
        match LiveMessage::decode(&wire(METHOD_MEMBER, member.encode_to_vec())).unwrap() {
            LiveMessage::Member(m) => assert_eq!(m.user.unwrap().nickname, "Dave"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_method_is_unhandled_not_error() {
        let msg = wire("WebcastRoomRankMessage", vec![0xff, 0xff, 0xff]);
        let decoded = LiveMessage::decode(&msg).unwrap();
        assert_eq!(decoded, LiveMessage::Unhandled("WebcastRoomRankMessage".into()));
        assert_eq!(decoded.method(), Method::Unknown);
    }

    #[test]
    fn malformed_chat_payload_is_decode_error() {
        let err = LiveMessage::decode(&wire(METHOD_CHAT, vec![0x12, 0x09, 0x08])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
