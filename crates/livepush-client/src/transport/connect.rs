//! Push socket establishment.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::{header, HeaderValue};
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use livepush_core::error::{LivePushError, Result};

use crate::config::schema::ROOM_ID_PLACEHOLDER;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Substitute the room id into the endpoint template.
pub fn push_url(template: &str, room_id: &str) -> String {
    template.replace(ROOM_ID_PLACEHOLDER, room_id)
}

/// Build the upgrade request carrying the session token as a `ttwid` cookie.
pub fn build_request(url: &str, token: &str, user_agent: &str) -> Result<Request> {
    let mut request = url
        .into_client_request()
        .map_err(|e| LivePushError::Connect(format!("invalid push url: {e}")))?;

    let cookie = HeaderValue::from_str(&format!("ttwid={token}"))
        .map_err(|e| LivePushError::Connect(format!("invalid session token: {e}")))?;
    let agent = HeaderValue::from_str(user_agent)
        .map_err(|e| LivePushError::Connect(format!("invalid user agent: {e}")))?;

    let headers = request.headers_mut();
    headers.insert(header::COOKIE, cookie);
    headers.insert(header::USER_AGENT, agent);
    Ok(request)
}

/// Open the socket, failing with `Connect` on handshake error or timeout.
pub async fn open(request: Request, timeout: Duration) -> Result<WsStream> {
    let uri = request.uri().to_string();
    match tokio::time::timeout(timeout, connect_async(request)).await {
        Ok(Ok((stream, response))) => {
            tracing::debug!(status = %response.status(), "push socket upgraded");
            Ok(stream)
        }
        Ok(Err(WsError::Http(response))) => Err(LivePushError::Connect(format!(
            "push endpoint answered HTTP {}",
            response.status().as_u16()
        ))),
        Ok(Err(e)) => Err(LivePushError::Connect(e.to_string())),
        Err(_) => Err(LivePushError::Connect(format!(
            "timed out after {}ms connecting to {uri}",
            timeout.as_millis()
        ))),
    }
}
