//! End-to-end decode of a data frame: frame -> gunzip -> response -> messages.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bytes::Bytes;
use prost::Message;

use livepush_core::protocol::frame::{
    compress_payload, decode_frame, decompress_payload, encode_frame,
};
use livepush_core::protocol::message::{ChatMessage, LikeMessage, User, METHOD_CHAT, METHOD_LIKE};
use livepush_core::protocol::{decode_response, LiveMessage, PushFrame, Response, WireMessage};

fn chat(id: u64, nickname: &str, content: &str) -> WireMessage {
    let chat = ChatMessage {
        user: Some(User {
            id,
            nickname: nickname.into(),
            ..Default::default()
        }),
        content: content.into(),
        ..Default::default()
    };
    WireMessage {
        method: METHOD_CHAT.into(),
        payload: Bytes::from(chat.encode_to_vec()),
        ..Default::default()
    }
}

fn data_frame(log_id: u64, resp: &Response) -> Vec<u8> {
    let frame = PushFrame {
        log_id,
        payload: Bytes::from(compress_payload(&resp.encode_to_vec()).unwrap()),
        ..Default::default()
    };
    encode_frame(&frame)
}

#[test]
fn chat_frame_decodes_to_event() {
    let resp = Response {
        messages: vec![chat(1001, "Alice", "hello")],
        internal_ext: "ext-7".into(),
        need_ack: true,
        ..Default::default()
    };

    let frame = decode_frame(Bytes::from(data_frame(42, &resp))).unwrap();
    assert_eq!(frame.log_id, 42);
    assert!(frame.payload_type.is_empty());

    let inner = decompress_payload(&frame.payload).unwrap();
    let back = decode_response(inner).unwrap();
    assert!(back.need_ack);
    assert_eq!(back.internal_ext, "ext-7");

    let ack = PushFrame::ack(frame.log_id, back.internal_ext.clone());
    assert_eq!(ack.log_id, 42);
    assert_eq!(ack.payload_type, "ext-7");

    let LiveMessage::Chat(msg) = LiveMessage::decode(&back.messages[0]).unwrap() else {
        panic!("expected chat");
    };
    assert_eq!(msg.nickname(), "Alice");
    let ev = msg.to_event("7100", "live-1");
    assert_eq!(ev.user_id, 1001);
    assert_eq!(ev.content, "hello");
}

#[test]
fn mixed_messages_keep_wire_order() {
    let like = LikeMessage {
        count: 3,
        ..Default::default()
    };
    let resp = Response {
        messages: vec![
            chat(1, "a", "first"),
            WireMessage {
                method: METHOD_LIKE.into(),
                payload: Bytes::from(like.encode_to_vec()),
                ..Default::default()
            },
            chat(2, "b", "second"),
            WireMessage {
                method: "WebcastSomethingNew".into(),
                payload: Bytes::from_static(b"\xff"),
                ..Default::default()
            },
            chat(3, "c", "third"),
        ],
        ..Default::default()
    };

    let frame = decode_frame(Bytes::from(data_frame(1, &resp))).unwrap();
    let back = decode_response(decompress_payload(&frame.payload).unwrap()).unwrap();
    assert!(!back.need_ack);

    let contents: Vec<String> = back
        .messages
        .iter()
        .filter_map(|m| match LiveMessage::decode(m).unwrap() {
            LiveMessage::Chat(c) => Some(c.content),
            _ => None,
        })
        .collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
}
