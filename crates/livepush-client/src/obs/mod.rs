//! Lightweight in-process metrics.
//!
//! Counters are stored as atomics keyed by label sets and rendered in
//! Prometheus text format, which the binary logs on shutdown.

pub mod metrics;

pub use metrics::ClientMetrics;
