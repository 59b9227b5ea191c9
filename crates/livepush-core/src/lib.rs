//! livepush core: transport-agnostic protocol primitives, error types, and the
//! decoded chat event.
//!
//! This crate defines the wire-level contracts of the live push channel (outer
//! push frames, the gzip-compressed response envelope, typed sub-messages) and
//! the error surface shared with the session client. It carries no socket or
//! runtime dependencies so it can be reused by tooling and tests.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! Every fallible path surfaces as `LivePushError`/`Result`, so a hostile or
//! corrupt frame from the peer can never take down the receive loop.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod event;
pub mod protocol;

/// Shared result type.
pub use error::{ErrorKind, LivePushError, Result};
pub use event::ChatEvent;
