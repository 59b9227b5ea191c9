//! Live push session.
//!
//! One `Session` owns one socket and two background activities:
//! - the receive loop: decode frame -> gunzip -> response -> ack -> dispatch
//! - the heartbeat loop: one `bh` control frame per interval
//!
//! Both loops share a cancellation token; whichever stops first stops the
//! other. A supervisor task waits for both, flips the state to
//! `Disconnected` and fires the disconnect callback exactly once. Socket
//! writes go through `FrameWriter`, a mutex around the sink half.

mod client;
mod heartbeat;
mod receive;
mod writer;

use std::time::Duration;

use crate::config::schema::ClientSection;
use crate::discovery::RoomInfo;

pub use client::{DisconnectCallback, Session, SessionBuilder};
pub use receive::unpack_frame;
pub use writer::FrameWriter;

/// Session-level knobs.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Push url template; `{room_id}` is substituted.
    pub push_endpoint: String,
    pub heartbeat_interval: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from(&ClientSection::default())
    }
}

impl From<&ClientSection> for ClientConfig {
    fn from(s: &ClientSection) -> Self {
        Self {
            push_endpoint: s.push_endpoint.clone(),
            heartbeat_interval: Duration::from_millis(s.heartbeat_interval_ms),
            connect_timeout: Duration::from_millis(s.connect_timeout_ms),
            user_agent: s.user_agent.clone(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at a custom endpoint, other knobs at their defaults.
    pub fn with_endpoint(push_endpoint: impl Into<String>) -> Self {
        Self {
            push_endpoint: push_endpoint.into(),
            ..Self::default()
        }
    }
}

/// Identity and credential of the room to join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
    pub room_id: String,
    pub live_id: String,
    /// Platform-issued session token (the `ttwid` cookie value).
    pub token: String,
}

impl From<&RoomInfo> for ConnectParams {
    fn from(info: &RoomInfo) -> Self {
        Self {
            room_id: info.room_id.clone(),
            live_id: info.live_id.clone(),
            token: info.ttwid.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Disconnected,
}
