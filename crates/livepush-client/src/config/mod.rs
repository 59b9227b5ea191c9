//! Client config loader (strict parsing).

pub mod schema;

use std::fs;

use livepush_core::error::{LivePushError, Result};

pub use schema::{ClientSection, LivePushConfig, RoomConfig, SinkSection};

pub fn load_from_file(path: &str) -> Result<LivePushConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| LivePushError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<LivePushConfig> {
    let cfg: LivePushConfig = serde_yaml::from_str(s)
        .map_err(|e| LivePushError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
