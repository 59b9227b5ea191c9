use serde::Deserialize;
use livepush_core::error::{LivePushError, Result};

/// Placeholder substituted with the room id in `client.push_endpoint`.
pub const ROOM_ID_PLACEHOLDER: &str = "{room_id}";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LivePushConfig {
    pub version: u32,

    #[serde(default)]
    pub client: ClientSection,

    #[serde(default)]
    pub sink: SinkSection,

    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
}

impl LivePushConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(LivePushError::UnsupportedVersion);
        }
        if self.rooms.is_empty() {
            return Err(LivePushError::Config("rooms must not be empty".into()));
        }
        for room in &self.rooms {
            if !room.url.starts_with("http://") && !room.url.starts_with("https://") {
                return Err(LivePushError::Config(format!(
                    "rooms[].url must be an http(s) url: {}",
                    room.url
                )));
            }
        }

        self.client.validate()?;
        self.sink.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    #[serde(default = "default_push_endpoint")]
    pub push_endpoint: String,

    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            push_endpoint: default_push_endpoint(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientSection {
    pub fn validate(&self) -> Result<()> {
        if !self.push_endpoint.starts_with("ws://") && !self.push_endpoint.starts_with("wss://") {
            return Err(LivePushError::Config(
                "client.push_endpoint must be a ws:// or wss:// url".into(),
            ));
        }
        if !self.push_endpoint.contains(ROOM_ID_PLACEHOLDER) {
            return Err(LivePushError::Config(format!(
                "client.push_endpoint must contain {ROOM_ID_PLACEHOLDER}"
            )));
        }
        if !(10..=120000).contains(&self.heartbeat_interval_ms) {
            return Err(LivePushError::Config(
                "client.heartbeat_interval_ms must be between 10 and 120000".into(),
            ));
        }
        if !(1000..=60000).contains(&self.connect_timeout_ms) {
            return Err(LivePushError::Config(
                "client.connect_timeout_ms must be between 1000 and 60000".into(),
            ));
        }
        Ok(())
    }
}

fn default_push_endpoint() -> String {
    concat!(
        "wss://webcast3-ws-web-lq.douyin.com/webcast/im/push/v2/",
        "?app_name=douyin_web&version_code=180800&webcast_sdk_version=1.3.0",
        "&update_version_code=1.3.0&compress=gzip",
        "&internal_ext=internal_src:dim|wss_push_room_id:{room_id}|wss_push_did:{room_id}",
        "|dim_log_id:202302171547011A160A7BAA76660E13ED|fetch_time:1676620021641|seq:1",
        "|wss_info:0-1676620021641-0-0",
        "&cursor=t-1676620021641_r-1_d-1_u-1_h-1",
        "&host=https://live.douyin.com&aid=6383&live_id=1&did_rule=3&debug=false",
        "&endpoint=live_pc&support_wrds=1&im_path=/webcast/im/fetch/",
        "&user_unique_id={room_id}&device_platform=web&cookie_enabled=true",
        "&browser_language=zh&browser_platform=MacIntel&browser_name=Mozilla",
        "&browser_online=true&tz_name=Asia/Shanghai&identity=audience",
        "&room_id={room_id}&heartbeatDuration=0&signature=00000000",
    )
    .to_string()
}
fn default_heartbeat_interval_ms() -> u64 {
    10000
}
fn default_connect_timeout_ms() -> u64 {
    10000
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SinkSection {
    /// Chat events are POSTed here; when absent they are only logged.
    #[serde(default)]
    pub report_url: Option<String>,

    #[serde(default = "default_sink_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SinkSection {
    fn default() -> Self {
        Self {
            report_url: None,
            timeout_ms: default_sink_timeout_ms(),
        }
    }
}

impl SinkSection {
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.report_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(LivePushError::Config(
                    "sink.report_url must be an http(s) url".into(),
                ));
            }
        }
        if self.timeout_ms == 0 {
            return Err(LivePushError::Config("sink.timeout_ms must be > 0".into()));
        }
        Ok(())
    }
}

fn default_sink_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoomConfig {
    /// Live page url, e.g. `https://live.douyin.com/123456`.
    pub url: String,
}
