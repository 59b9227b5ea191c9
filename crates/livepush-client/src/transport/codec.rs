//! Decode-once codec between socket messages and push frames.
//!
//! - Binary messages => `PushFrame` (panic-free protobuf parsing)
//! - Close ends the session
//! - Ping/Pong are answered by tungstenite; text is not part of the push protocol

use tokio_tungstenite::tungstenite::Message;

use livepush_core::error::Result;
use livepush_core::protocol::frame::{self, PushFrame};

#[derive(Debug)]
pub enum Inbound {
    Frame(PushFrame),
    Close,
    Other,
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Binary(b) => Ok(Inbound::Frame(frame::decode_frame(b)?)),
        Message::Close(_) => Ok(Inbound::Close),
        Message::Ping(_) | Message::Pong(_) | Message::Text(_) | Message::Frame(_) => {
            Ok(Inbound::Other)
        }
    }
}

pub fn encode(frame: &PushFrame) -> Message {
    Message::binary(frame::encode_frame(frame))
}
