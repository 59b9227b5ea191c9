#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use livepush_client::discovery::fetch_room;
use livepush_client::ConnectParams;
use livepush_core::ErrorKind;

const RENDER_DATA: &str = "%7B%22app%22%3A%7B%22initialState%22%3A%7B%22roomStore%22%3A%7B%22roomInfo%22%3A%7B%22roomId%22%3A%227180000000000000001%22%2C%22room%22%3A%7B%22title%22%3A%22evening%20stream%22%7D%7D%7D%7D%7D%7D";

fn page() -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>live</title></head><body><div id="root"></div><script id="RENDER_DATA" type="application/json">{RENDER_DATA}</script></body></html>"#
    )
}

#[tokio::test]
async fn resolves_room_and_session_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/123456"))
        .and(header("user-agent", "livepush-test"))
        .and(header("cookie", "__ac_nonce=0638733a400869171be51"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "ttwid=1%7Cabc; Path=/; HttpOnly")
                .set_body_string(page()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let http = reqwest::Client::new();
    let url = format!("{}/123456", server.uri());
    let info = fetch_room(&http, &url, "livepush-test").await.unwrap();

    assert_eq!(info.room_id, "7180000000000000001");
    assert_eq!(info.title, "evening stream");
    assert_eq!(info.live_id, "123456");
    assert_eq!(info.ttwid, "1%7Cabc");
    assert_eq!(info.url, url);

    let params = ConnectParams::from(&info);
    assert_eq!(params.room_id, "7180000000000000001");
    assert_eq!(params.live_id, "123456");
    assert_eq!(params.token, "1%7Cabc");
}

#[tokio::test]
async fn page_without_render_data_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>offline</html>"))
        .mount(&server)
        .await;

    let err = fetch_room(&reqwest::Client::new(), &format!("{}/1", server.uri()), "ua")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Discovery);
}

#[tokio::test]
async fn error_status_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetch_room(&reqwest::Client::new(), &format!("{}/1", server.uri()), "ua")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Discovery);
    assert!(err.to_string().contains("404"));
}
