use std::sync::Arc;

use futures_util::stream::SplitStream;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use livepush_core::error::{ErrorKind, Result};
use livepush_core::protocol::frame::decompress_payload;
use livepush_core::protocol::{decode_response, PushFrame, Response};

use crate::dispatch::Dispatcher;
use crate::obs::ClientMetrics;
use crate::session::FrameWriter;
use crate::transport::codec::{self, Inbound};
use crate::transport::WsStream;

/// Open a frame's payload. `Ok(None)` for control frames without payload.
pub fn unpack_frame(frame: &PushFrame) -> Result<Option<Response>> {
    if !frame.has_payload() {
        return Ok(None);
    }
    let inner = decompress_payload(&frame.payload)?;
    Ok(Some(decode_response(inner)?))
}

/// Per-frame pipeline: unpack, ack, dispatch in wire order.
pub(crate) struct FrameProcessor {
    writer: FrameWriter,
    dispatcher: Dispatcher,
    metrics: Arc<ClientMetrics>,
}

impl FrameProcessor {
    pub(crate) fn new(
        writer: FrameWriter,
        dispatcher: Dispatcher,
        metrics: Arc<ClientMetrics>,
    ) -> Self {
        Self {
            writer,
            dispatcher,
            metrics,
        }
    }

    /// Handle one inbound frame. Fails only when the ack cannot be written.
    async fn process(&self, frame: PushFrame) -> Result<()> {
        self.metrics.frames.inc(&[]);

        let mut resp = match unpack_frame(&frame) {
            Ok(Some(resp)) => resp,
            Ok(None) => return Ok(()),
            Err(e) => {
                let stage = match e.kind() {
                    ErrorKind::Decompress => "decompress",
                    _ => "response",
                };
                self.metrics.decode_errors.inc(&[("stage", stage)]);
                tracing::debug!(log_id = frame.log_id, stage, error = %e, "frame payload dropped");
                return Ok(());
            }
        };

        // ack before dispatch so downstream work never delays it
        if resp.need_ack {
            let ext = std::mem::take(&mut resp.internal_ext);
            self.writer.send_frame(&PushFrame::ack(frame.log_id, ext)).await?;
            self.metrics.acks_sent.inc(&[]);
            tracing::trace!(log_id = frame.log_id, "ack sent");
        }

        for msg in &resp.messages {
            self.dispatcher.dispatch(msg);
        }
        Ok(())
    }
}

/// Read until the socket fails, the peer closes, or the session is cancelled.
pub(crate) async fn run(
    mut stream: SplitStream<WsStream>,
    processor: FrameProcessor,
    cancel: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => break,
            next = stream.next() => next,
        };

        let msg = match next {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "socket read failed");
                break;
            }
            None => {
                tracing::debug!("socket stream ended");
                break;
            }
        };

        match codec::decode(msg) {
            Ok(Inbound::Frame(frame)) => {
                if let Err(e) = processor.process(frame).await {
                    tracing::debug!(error = %e, "ack write abandoned");
                    break;
                }
            }
            Ok(Inbound::Close) => {
                tracing::debug!("peer sent close");
                break;
            }
            Ok(Inbound::Other) => {}
            Err(e) => {
                processor.metrics.decode_errors.inc(&[("stage", "frame")]);
                tracing::debug!(error = %e, "frame dropped");
            }
        }
    }

    cancel.cancel();
}
