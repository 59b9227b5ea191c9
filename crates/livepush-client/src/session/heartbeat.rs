use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use livepush_core::protocol::PushFrame;

use crate::obs::ClientMetrics;
use crate::session::FrameWriter;

/// Send a heartbeat every `every` until cancelled or a write fails.
pub(crate) async fn run(
    writer: FrameWriter,
    every: Duration,
    metrics: Arc<ClientMetrics>,
    cancel: CancellationToken,
) {
    let mut tick = tokio::time::interval(every);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let frame = PushFrame::heartbeat();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tick.tick() => {
                if let Err(e) = writer.send_frame(&frame).await {
                    tracing::debug!(error = %e, "heartbeat write failed");
                    break;
                }
                metrics.heartbeats_sent.inc(&[]);
                tracing::trace!("heartbeat sent");
            }
        }
    }

    cancel.cancel();
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::session::writer::tests::silent_peer_writer;

    #[tokio::test]
    async fn write_failure_cancels_session() {
        let cancel = CancellationToken::new();
        let (writer, _done) = silent_peer_writer(cancel.clone()).await;
        writer.close_within(Duration::from_secs(1)).await.unwrap();

        let metrics = Arc::new(ClientMetrics::default());
        tokio::time::timeout(
            Duration::from_secs(2),
            run(writer, Duration::from_millis(10), Arc::clone(&metrics), cancel.clone()),
        )
        .await
        .unwrap();

        assert!(cancel.is_cancelled());
        assert_eq!(metrics.heartbeats_sent.total(), 0);
    }

    #[tokio::test]
    async fn cancel_stops_beating() {
        let cancel = CancellationToken::new();
        let (writer, _done) = silent_peer_writer(cancel.clone()).await;
        let metrics = Arc::new(ClientMetrics::default());

        let task = tokio::spawn(run(
            writer,
            Duration::from_millis(10),
            Arc::clone(&metrics),
            cancel.clone(),
        ));
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), task).await.unwrap().unwrap();

        let beats = metrics.heartbeats_sent.total();
        assert!(beats >= 1);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(metrics.heartbeats_sent.total(), beats);
    }
}
