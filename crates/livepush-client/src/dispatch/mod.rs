//! Dispatcher module exports.
//!
//! Routes decoded wire messages by method; only chat reaches the event sink.

pub mod dispatcher;

pub use dispatcher::{Dispatched, Dispatcher};
