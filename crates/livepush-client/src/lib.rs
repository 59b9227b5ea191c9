//! livepush client library entry.
//!
//! This crate wires room discovery, the push socket transport, the session
//! loops, message dispatch, and the event sinks into a client stack. It is
//! consumed by the binary (`main.rs`) and by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod obs;
pub mod rooms;
pub mod session;
pub mod sink;
pub mod transport;

pub use session::{ClientConfig, ConnectParams, Session, SessionBuilder, SessionState};
pub use sink::{ChannelSink, EventSink, HttpSink, LogSink};
