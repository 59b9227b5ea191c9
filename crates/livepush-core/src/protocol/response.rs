//! Response envelope (decompressed inner payload of a push frame).

use bytes::Bytes;
use prost::Message;

use crate::error::Result;

/// One typed sub-message. `payload` is interpreted according to `method`.
#[derive(Clone, PartialEq, Message)]
pub struct WireMessage {
    #[prost(string, tag = "1")]
    pub method: String,
    #[prost(bytes = "bytes", tag = "2")]
    pub payload: Bytes,
    #[prost(int64, tag = "3")]
    pub msg_id: i64,
    #[prost(int32, tag = "4")]
    pub msg_type: i32,
    #[prost(int64, tag = "5")]
    pub offset: i64,
}

/// Inner envelope. `messages` keeps wire order.
#[derive(Clone, PartialEq, Message)]
pub struct Response {
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<WireMessage>,
    #[prost(string, tag = "2")]
    pub cursor: String,
    #[prost(uint64, tag = "3")]
    pub fetch_interval: u64,
    #[prost(uint64, tag = "4")]
    pub now: u64,
    /// Opaque string echoed verbatim as the ack's payload-type.
    #[prost(string, tag = "5")]
    pub internal_ext: String,
    #[prost(uint32, tag = "6")]
    pub fetch_type: u32,
    #[prost(uint64, tag = "8")]
    pub heartbeat_duration: u64,
    #[prost(bool, tag = "9")]
    pub need_ack: bool,
    #[prost(string, tag = "10")]
    pub push_server: String,
}

/// Decode a decompressed response envelope.
pub fn decode_response(buf: Bytes) -> Result<Response> {
    Ok(Response::decode(buf)?)
}
