//! Shared error type across livepush crates.

use thiserror::Error;

/// Stable error categories (used as metric labels and in logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed frame, envelope or message bytes.
    Decode,
    /// Payload could not be gunzipped.
    Decompress,
    /// Socket or handshake failure while connecting.
    Connect,
    /// Socket read/write failure on a live session.
    Io,
    /// Session already closed.
    Closed,
    /// Invalid configuration.
    Config,
    /// Unsupported config/protocol version.
    UnsupportedVersion,
    /// Room page could not be resolved.
    Discovery,
    /// Event sink delivery failed.
    Sink,
    /// Internal error.
    Internal,
}

impl ErrorKind {
    /// String representation used in metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Decode => "DECODE",
            ErrorKind::Decompress => "DECOMPRESS",
            ErrorKind::Connect => "CONNECT",
            ErrorKind::Io => "IO",
            ErrorKind::Closed => "CLOSED",
            ErrorKind::Config => "CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorKind::Discovery => "DISCOVERY",
            ErrorKind::Sink => "SINK",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, LivePushError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum LivePushError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("decompress failed: {0}")]
    Decompress(String),
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("socket io: {0}")]
    Io(String),
    #[error("session closed")]
    Closed,
    #[error("invalid config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("room discovery failed: {0}")]
    Discovery(String),
    #[error("sink delivery failed: {0}")]
    Sink(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl LivePushError {
    /// Map the error to its stable category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LivePushError::Decode(_) => ErrorKind::Decode,
            LivePushError::Decompress(_) => ErrorKind::Decompress,
            LivePushError::Connect(_) => ErrorKind::Connect,
            LivePushError::Io(_) => ErrorKind::Io,
            LivePushError::Closed => ErrorKind::Closed,
            LivePushError::Config(_) => ErrorKind::Config,
            LivePushError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
            LivePushError::Discovery(_) => ErrorKind::Discovery,
            LivePushError::Sink(_) => ErrorKind::Sink,
            LivePushError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<prost::DecodeError> for LivePushError {
    fn from(e: prost::DecodeError) -> Self {
        LivePushError::Decode(e.to_string())
    }
}
