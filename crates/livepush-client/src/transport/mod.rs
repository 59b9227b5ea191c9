//! Transport layer (WebSocket client).
//!
//! Opens the push socket and converts socket messages to and from push frames
//! so the session loops only ever see decoded frames.

pub mod codec;
pub mod connect;

pub use connect::WsStream;
