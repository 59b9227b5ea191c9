//! Push frame codec (outer envelope) and payload (de)compression.
//!
//! Parsing rules:
//! - Never trust lengths from the peer: protobuf decoding is bounds-checked and
//!   the decompressed payload is capped at `MAX_DECOMPRESSED_BYTES`.
//! - Never `unwrap()` / `expect()` / `panic!()` in production paths.

use std::io::{Read, Write};

use bytes::Bytes;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use prost::Message;

use crate::error::{LivePushError, Result};

/// Reserved payload-type of the client heartbeat frame.
pub const HEARTBEAT_PAYLOAD_TYPE: &str = "bh";

/// Upper bound for one decompressed response envelope (16 MiB).
pub const MAX_DECOMPRESSED_BYTES: u64 = 16 * 1024 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Key/value header carried by a push frame.
#[derive(Clone, PartialEq, Message)]
pub struct HeaderEntry {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

/// Outer wire envelope.
#[derive(Clone, PartialEq, Message)]
pub struct PushFrame {
    #[prost(uint64, tag = "1")]
    pub seq_id: u64,
    /// Correlation id echoed back in acknowledgments.
    #[prost(uint64, tag = "2")]
    pub log_id: u64,
    #[prost(uint64, tag = "3")]
    pub service: u64,
    #[prost(uint64, tag = "4")]
    pub method: u64,
    #[prost(message, repeated, tag = "5")]
    pub headers: Vec<HeaderEntry>,
    #[prost(string, tag = "6")]
    pub payload_encoding: String,
    /// Protocol signal (heartbeat tag) or, on acks, the echoed internal-extension.
    #[prost(string, tag = "7")]
    pub payload_type: String,
    /// Gzip-compressed `Response`; empty on control frames.
    #[prost(bytes = "bytes", tag = "8")]
    pub payload: Bytes,
}

impl PushFrame {
    /// Client keep-alive frame.
    pub fn heartbeat() -> Self {
        Self {
            payload_type: HEARTBEAT_PAYLOAD_TYPE.to_string(),
            ..Default::default()
        }
    }

    /// Acknowledgment for the frame identified by `log_id`.
    pub fn ack(log_id: u64, internal_ext: impl Into<String>) -> Self {
        Self {
            log_id,
            payload_type: internal_ext.into(),
            ..Default::default()
        }
    }

    /// Whether this frame carries a response envelope.
    pub fn has_payload(&self) -> bool {
        !self.payload.is_empty()
    }

    pub fn is_heartbeat(&self) -> bool {
        self.payload_type == HEARTBEAT_PAYLOAD_TYPE && !self.has_payload()
    }
}

/// Decode a push frame from one binary socket message.
pub fn decode_frame(buf: Bytes) -> Result<PushFrame> {
    if buf.is_empty() {
        return Err(LivePushError::Decode("empty frame".into()));
    }
    Ok(PushFrame::decode(buf)?)
}

/// Encode a frame for the wire.
pub fn encode_frame(frame: &PushFrame) -> Vec<u8> {
    frame.encode_to_vec()
}

/// Check for the gzip magic bytes.
#[inline]
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Initial output buffer for a gzip body of `compressed_len` bytes; never above the cap.
fn inflate_capacity(compressed_len: usize) -> usize {
    compressed_len
        .saturating_mul(4)
        .min(MAX_DECOMPRESSED_BYTES as usize)
}

/// Gunzip a frame payload.
pub fn decompress_payload(data: &[u8]) -> Result<Bytes> {
    if !is_gzip(data) {
        return Err(LivePushError::Decompress("missing gzip magic".into()));
    }

    let mut out = Vec::with_capacity(inflate_capacity(data.len()));
    GzDecoder::new(data)
        .take(MAX_DECOMPRESSED_BYTES + 1)
        .read_to_end(&mut out)
        .map_err(|e| LivePushError::Decompress(e.to_string()))?;

    if out.len() as u64 > MAX_DECOMPRESSED_BYTES {
        return Err(LivePushError::Decompress(format!(
            "payload exceeds {MAX_DECOMPRESSED_BYTES} bytes"
        )));
    }
    Ok(Bytes::from(out))
}

/// Gzip a payload (the peer side of `decompress_payload`).
pub fn compress_payload(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| LivePushError::Internal(format!("gzip write failed: {e}")))?;
    encoder
        .finish()
        .map_err(|e| LivePushError::Internal(format!("gzip finish failed: {e}")))
}
