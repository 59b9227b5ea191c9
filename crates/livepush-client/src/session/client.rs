use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use livepush_core::error::Result;

use crate::dispatch::Dispatcher;
use crate::obs::ClientMetrics;
use crate::session::receive::FrameProcessor;
use crate::session::{heartbeat, receive, ClientConfig, ConnectParams, FrameWriter, SessionState};
use crate::sink::{EventSink, LogSink};
use crate::transport::connect;

/// Upper bound on the close handshake once both loops have stopped.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Invoked once per session with its live id, after the session is `Disconnected`.
pub type DisconnectCallback = Box<dyn FnOnce(String) + Send + 'static>;

/// Configures and opens a `Session`.
pub struct SessionBuilder {
    cfg: ClientConfig,
    params: ConnectParams,
    sink: Arc<dyn EventSink>,
    metrics: Arc<ClientMetrics>,
    on_disconnect: Option<DisconnectCallback>,
}

impl SessionBuilder {
    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn metrics(mut self, metrics: Arc<ClientMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn on_disconnect(mut self, f: impl FnOnce(String) + Send + 'static) -> Self {
        self.on_disconnect = Some(Box::new(f));
        self
    }

    /// Open the socket and start both loops. On error no task is spawned.
    pub async fn connect(self) -> Result<Session> {
        let SessionBuilder {
            cfg,
            params,
            sink,
            metrics,
            on_disconnect,
        } = self;

        let url = connect::push_url(&cfg.push_endpoint, &params.room_id);
        let request = connect::build_request(&url, &params.token, &cfg.user_agent)?;
        let stream = connect::open(request, cfg.connect_timeout).await?;

        let span = tracing::info_span!(
            "session",
            room_id = %params.room_id,
            live_id = %params.live_id
        );
        span.in_scope(|| tracing::info!("push socket connected"));

        let (ws_tx, ws_rx) = stream.split();
        let cancel = CancellationToken::new();
        let writer = FrameWriter::new(ws_tx, cancel.clone());
        let (state_tx, state_rx) = watch::channel(SessionState::Connected);

        let dispatcher = Dispatcher::new(
            params.room_id.clone(),
            params.live_id.clone(),
            sink,
            Arc::clone(&metrics),
        );
        let processor = FrameProcessor::new(writer.clone(), dispatcher, Arc::clone(&metrics));

        let recv_task = tokio::spawn(
            receive::run(ws_rx, processor, cancel.clone()).instrument(span.clone()),
        );
        let hb_task = tokio::spawn(
            heartbeat::run(
                writer.clone(),
                cfg.heartbeat_interval,
                Arc::clone(&metrics),
                cancel.clone(),
            )
            .instrument(span.clone()),
        );

        metrics.sessions_active.inc(&[]);

        // supervisor: the only place the terminal transition happens
        let live_id = params.live_id.clone();
        let sup_writer = writer;
        let sup_metrics = Arc::clone(&metrics);
        tokio::spawn(
            async move {
                let (recv, hb) = tokio::join!(recv_task, hb_task);
                if let Err(e) = recv.and(hb) {
                    tracing::warn!(error = %e, "session loop aborted");
                }
                if let Err(e) = sup_writer.close_within(CLOSE_GRACE).await {
                    tracing::debug!(error = %e, "socket close incomplete");
                }
                // last handle on the write half; the socket is released here
                drop(sup_writer);

                state_tx.send_replace(SessionState::Disconnected);
                sup_metrics.sessions_active.dec(&[]);
                sup_metrics.sessions_closed.inc(&[]);
                tracing::info!("session disconnected");

                if let Some(cb) = on_disconnect {
                    cb(live_id);
                }
            }
            .instrument(span),
        );

        Ok(Session {
            room_id: params.room_id,
            live_id: params.live_id,
            cancel,
            state: state_rx,
        })
    }
}

/// One live connection to a room's push channel.
pub struct Session {
    room_id: String,
    live_id: String,
    cancel: CancellationToken,
    state: watch::Receiver<SessionState>,
}

impl Session {
    pub fn builder(cfg: ClientConfig, params: ConnectParams) -> SessionBuilder {
        SessionBuilder {
            cfg,
            params,
            sink: Arc::new(LogSink),
            metrics: Arc::new(ClientMetrics::default()),
            on_disconnect: None,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn live_id(&self) -> &str {
        &self.live_id
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Stop both loops, close the socket, and wait for `Disconnected`.
    /// Repeated calls are no-ops.
    pub async fn close(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Ok(());
        }
        self.cancel.cancel();
        self.closed().await;
        Ok(())
    }

    /// Wait until the session is `Disconnected` (both loops exited).
    pub async fn closed(&self) {
        let mut state = self.state.clone();
        let _ = state.wait_for(|s| *s == SessionState::Disconnected).await;
    }
}
