//! livepush binary
//!
//! - Load `livepush.yaml` (or the path given as first argument)
//! - Resolve each configured room page into push parameters
//! - Open one session per room, forward chat to the configured sink
//! - Run until Ctrl-C or until every room has disconnected (no reconnect)

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};

use livepush_core::error::{LivePushError, Result};

use livepush_client::obs::ClientMetrics;
use livepush_client::rooms::RoomRegistry;
use livepush_client::{config, discovery};
use livepush_client::{ClientConfig, ConnectParams, EventSink, HttpSink, LogSink, Session};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, kind = e.kind().as_str(), "livepush exited");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "livepush.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let client_cfg = ClientConfig::from(&cfg.client);
    let metrics = Arc::new(ClientMetrics::default());

    let sink: Arc<dyn EventSink> = match &cfg.sink.report_url {
        Some(url) => Arc::new(
            HttpSink::new(url.clone(), Duration::from_millis(cfg.sink.timeout_ms))?
                .with_metrics(Arc::clone(&metrics)),
        ),
        None => Arc::new(LogSink),
    };

    let http = reqwest::Client::builder()
        .timeout(client_cfg.connect_timeout)
        .build()
        .map_err(|e| LivePushError::Internal(format!("http client build failed: {e}")))?;

    let registry = RoomRegistry::new();
    let (gone_tx, mut gone_rx) = mpsc::unbounded_channel::<String>();

    for room in &cfg.rooms {
        let info = match discovery::fetch_room(&http, &room.url, &client_cfg.user_agent).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(url = %room.url, error = %e, "room discovery failed");
                continue;
            }
        };
        tracing::info!(
            room_id = %info.room_id,
            live_id = %info.live_id,
            title = %info.title,
            "room resolved"
        );

        let gone = gone_tx.clone();
        let connected = Session::builder(client_cfg.clone(), ConnectParams::from(&info))
            .sink(Arc::clone(&sink))
            .metrics(Arc::clone(&metrics))
            .on_disconnect(move |live_id| {
                let _ = gone.send(live_id);
            })
            .connect()
            .await;

        match connected {
            Ok(session) => {
                registry.insert(session);
            }
            Err(e) => tracing::warn!(live_id = %info.live_id, error = %e, "room connect failed"),
        }
    }
    drop(gone_tx);

    if registry.is_empty() {
        return Err(LivePushError::Connect("no room could be connected".into()));
    }
    tracing::info!(rooms = ?registry.live_ids(), "livepush running");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                break;
            }
            gone = gone_rx.recv() => {
                let Some(live_id) = gone else { break; };
                registry.remove(&live_id);
                registry.prune();
                tracing::warn!(%live_id, remaining = registry.len(), "room disconnected");
                if registry.is_empty() {
                    break;
                }
            }
        }
    }

    registry.close_all().await;
    tracing::info!("final metrics:\n{}", metrics.render());
    Ok(())
}
