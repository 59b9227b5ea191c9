#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use livepush_client::obs::ClientMetrics;
use livepush_client::{EventSink, HttpSink};
use livepush_core::{ChatEvent, ErrorKind};

fn event() -> ChatEvent {
    ChatEvent {
        user_id: 1001,
        room_id: "7100".into(),
        live_id: "live-88".into(),
        content: "hello".into(),
    }
}

async fn wait_until(mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn report_posts_event_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/danmu"))
        .and(body_json(json!({
            "user_id": 1001,
            "room_id": "7100",
            "live_id": "live-88",
            "content": "hello"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = HttpSink::new(format!("{}/danmu", server.uri()), Duration::from_secs(2)).unwrap();
    sink.report(&event()).await.unwrap();
}

#[tokio::test]
async fn non_success_status_is_sink_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let sink = HttpSink::new(format!("{}/danmu", server.uri()), Duration::from_secs(2)).unwrap();
    let err = sink.report(&event()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Sink);
}

#[tokio::test]
async fn submit_does_not_wait_for_delivery() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(800)))
        .mount(&server)
        .await;

    let sink = HttpSink::new(format!("{}/danmu", server.uri()), Duration::from_secs(5)).unwrap();
    let started = Instant::now();
    sink.submit(event());
    assert!(started.elapsed() < Duration::from_millis(200));

    let mut seen = 0;
    let deadline = Instant::now() + Duration::from_secs(5);
    while seen == 0 {
        assert!(Instant::now() < deadline, "report never arrived");
        tokio::time::sleep(Duration::from_millis(20)).await;
        seen = server.received_requests().await.map(|r| r.len()).unwrap_or(0);
    }
}

#[tokio::test]
async fn failed_submit_is_counted_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let metrics = Arc::new(ClientMetrics::default());
    let sink = HttpSink::new(format!("{}/danmu", server.uri()), Duration::from_secs(2))
        .unwrap()
        .with_metrics(Arc::clone(&metrics));

    sink.submit(event());
    sink.submit(event());
    wait_until(|| metrics.sink_errors.total() == 2).await;
}
