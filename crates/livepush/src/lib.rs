//! Top-level facade crate for livepush.
//!
//! Re-exports the protocol core and the session client so users can depend on a single crate.

pub mod core {
    pub use livepush_core::*;
}

pub mod client {
    pub use livepush_client::*;
}
