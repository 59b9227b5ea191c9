//! Protocol modules (push frame + response envelope + typed messages).
//!
//! The live push channel layers three wire formats:
//! - `frame`: the outer `PushFrame` exchanged as binary WebSocket messages,
//!   carrying control metadata and an optional gzip-compressed payload.
//! - `response`: the decompressed inner envelope (`Response`) with the ack
//!   flag, the internal-extension string and the ordered message list.
//! - `message`: typed sub-message payloads keyed by their method name.
//!
//! All decoders are panic-free: malformed input is reported as
//! `LivePushError` so the receive loop can drop the frame and keep going.

pub mod frame;
pub mod message;
pub mod response;

pub use frame::{decode_frame, decompress_payload, encode_frame, PushFrame};
pub use message::{decode_chat, LiveMessage, Method};
pub use response::{decode_response, Response, WireMessage};
