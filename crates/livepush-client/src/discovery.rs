//! Room discovery: resolve a live page url into push connection parameters.
//!
//! The page embeds its initial state as percent-encoded JSON inside a
//! `RENDER_DATA` script tag, and the response sets the `ttwid` cookie that the
//! push socket later presents as its session token.

use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::header::{ACCEPT, COOKIE, SET_COOKIE, USER_AGENT};
use serde_json::Value;

use livepush_core::error::{LivePushError, Result};

const PAGE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9";
const NONCE_COOKIE: &str = "__ac_nonce=0638733a400869171be51";
const RENDER_DATA_PATTERN: &str = r#"(?s)<script id="RENDER_DATA" type="application/json">(.*?)</script>"#;

/// Everything needed to open a push session for one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub url: String,
    /// Session token issued with the page.
    pub ttwid: String,
    pub room_id: String,
    pub live_id: String,
    pub title: String,
}

/// Fetch a live page and resolve its room.
pub async fn fetch_room(
    http: &reqwest::Client,
    page_url: &str,
    user_agent: &str,
) -> Result<RoomInfo> {
    let resp = http
        .get(page_url)
        .header(ACCEPT, PAGE_ACCEPT)
        .header(USER_AGENT, user_agent)
        .header(COOKIE, NONCE_COOKIE)
        .send()
        .await
        .map_err(|e| LivePushError::Discovery(format!("GET {page_url}: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(LivePushError::Discovery(format!("GET {page_url} answered {status}")));
    }

    let ttwid = resp
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(cookie_value("ttwid"))
        .unwrap_or_default();
    if ttwid.is_empty() {
        tracing::warn!(url = %page_url, "room page set no ttwid cookie");
    }

    let html = resp
        .text()
        .await
        .map_err(|e| LivePushError::Discovery(format!("read {page_url}: {e}")))?;
    parse_room_page(&html, page_url, &ttwid)
}

fn cookie_value(name: &'static str) -> impl Fn(&str) -> Option<String> {
    move |set_cookie: &str| {
        let pair = set_cookie.split(';').next()?;
        let (k, v) = pair.split_once('=')?;
        (k.trim() == name).then(|| v.trim().to_string())
    }
}

/// Extract room identity from page html.
pub fn parse_room_page(html: &str, page_url: &str, ttwid: &str) -> Result<RoomInfo> {
    let re = Regex::new(RENDER_DATA_PATTERN)
        .map_err(|e| LivePushError::Internal(format!("render data pattern: {e}")))?;
    let raw = re
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| LivePushError::Discovery("RENDER_DATA block not found".into()))?;

    let json = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|e| LivePushError::Discovery(format!("RENDER_DATA not utf-8: {e}")))?;
    let data: Value = serde_json::from_str(&json)
        .map_err(|e| LivePushError::Discovery(format!("RENDER_DATA invalid json: {e}")))?;

    let room_store = data
        .pointer("/app/initialState/roomStore")
        .ok_or_else(|| LivePushError::Discovery("roomStore missing".into()))?;
    let room_id = room_store
        .pointer("/roomInfo/roomId")
        .and_then(json_string)
        .ok_or_else(|| LivePushError::Discovery("roomInfo.roomId missing".into()))?;
    let title = room_store
        .pointer("/roomInfo/room/title")
        .and_then(json_string)
        .ok_or_else(|| LivePushError::Discovery("roomInfo.room.title missing".into()))?;

    Ok(RoomInfo {
        url: page_url.to_string(),
        ttwid: ttwid.to_string(),
        room_id,
        live_id: live_id_from_url(page_url),
        title,
    })
}

/// Ids come as strings or numbers; empty strings count as missing.
fn json_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Last path segment of a page url (`https://live.douyin.com/123?x=1` -> `123`).
pub fn live_id_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}
