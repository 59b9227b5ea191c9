//! Fire-and-forget HTTP reporting of chat events.

use std::sync::Arc;
use std::time::Duration;

use livepush_core::error::{LivePushError, Result};
use livepush_core::ChatEvent;

use crate::obs::ClientMetrics;
use crate::sink::EventSink;

/// POSTs each chat event as JSON to a report url.
///
/// Failures are logged and counted, never retried, and never reach the session.
#[derive(Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    report_url: String,
    metrics: Option<Arc<ClientMetrics>>,
}

impl HttpSink {
    pub fn new(report_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LivePushError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self {
            client,
            report_url: report_url.into(),
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<ClientMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Deliver one event and report the outcome as a value.
    pub async fn report(&self, event: &ChatEvent) -> Result<()> {
        let resp = self
            .client
            .post(&self.report_url)
            .json(event)
            .send()
            .await
            .map_err(|e| LivePushError::Sink(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LivePushError::Sink(format!("report endpoint answered {status}")));
        }
        Ok(())
    }
}

impl EventSink for HttpSink {
    fn submit(&self, event: ChatEvent) {
        let sink = self.clone();
        tokio::spawn(async move {
            if let Err(e) = sink.report(&event).await {
                if let Some(m) = &sink.metrics {
                    m.sink_errors.inc(&[]);
                }
                tracing::warn!(
                    live_id = %event.live_id,
                    content = %event.content,
                    error = %e,
                    "chat report failed"
                );
            }
        });
    }
}
