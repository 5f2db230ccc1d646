//! Connection workers: one simulated game client per persistent connection
//!
//! A worker connects to the endpoint, then multiplexes three event sources
//! until it is closed:
//! - its send timer, emitting one Move and one State request per tick
//! - inbound frames, which are classified and matched against the last send
//! - a close request from the orchestrator
//!
//! Errors never leave the worker: they are counted in the shared aggregator
//! and logged with the worker's id.

pub mod lifecycle;

pub use lifecycle::{LatencyTracker, Lifecycle};

use crate::{
    error::{AppError, Result},
    logging::Logger,
    models::Config,
    protocol::{decode_kind, encode_move, encode_state_request},
    stats::StatsAggregator,
    types::{TrackedKind, WorkerState},
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use rand::{distr::Alphanumeric, Rng};
use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, Interval, MissedTickBehavior};
use tokio_tungstenite::{connect_async_with_config, tungstenite::{Error as WsError, Message}};
use url::Url;

/// Periodic send timer. Missed ticks are skipped so later ticks stay on the
/// original schedule without bursting after a stall.
pub fn send_ticker(period: Duration) -> Interval {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Length of the random per-worker identity
pub const IDENTITY_LEN: usize = 8;

/// Settings shared by every worker of a run
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub endpoint: Url,
    /// Query parameter to carry the worker identity, if any
    pub identity_param: Option<String>,
    pub send_interval: Duration,
    pub close_timeout: Duration,
}

impl WorkerConfig {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            endpoint: config.endpoint_url()?,
            identity_param: config.identity_param.clone(),
            send_interval: config.send_interval(),
            close_timeout: config.close_timeout(),
        })
    }
}

/// Random alphanumeric client identity
pub fn generate_identity() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(IDENTITY_LEN)
        .map(char::from)
        .collect()
}

/// Orchestrator-side view of a running worker
#[derive(Debug)]
pub struct WorkerHandle {
    id: String,
    state: Arc<AtomicU8>,
    close_tx: watch::Sender<bool>,
}

impl WorkerHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_open(&self) -> bool {
        self.state() == WorkerState::Open
    }

    /// Ask the worker to close gracefully.
    ///
    /// Only has an effect while the worker is `Open`; returns whether the
    /// request was delivered. Does not wait for the worker to close.
    pub fn request_close(&self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.close_tx.send(true).is_ok()
    }
}

/// Why a worker's event loop stopped
#[derive(Debug)]
enum LoopExit {
    CloseRequested,
    RemoteClosed,
    Failed(AppError),
}

/// One simulated client connection
pub struct ConnectionWorker {
    id: String,
    config: Arc<WorkerConfig>,
    stats: Arc<StatsAggregator>,
    logger: Arc<Logger>,
    lifecycle: Lifecycle,
    latency: LatencyTracker,
    close_rx: watch::Receiver<bool>,
}

impl ConnectionWorker {
    /// Create a worker in `Connecting` together with its handle
    pub fn new(
        config: Arc<WorkerConfig>,
        stats: Arc<StatsAggregator>,
        logger: Arc<Logger>,
    ) -> (Self, WorkerHandle) {
        let id = generate_identity();
        let lifecycle = Lifecycle::new(stats.clone());
        let (close_tx, close_rx) = watch::channel(false);

        let handle = WorkerHandle {
            id: id.clone(),
            state: lifecycle.shared_state(),
            close_tx,
        };

        let worker = Self {
            id,
            config,
            stats,
            logger,
            lifecycle,
            latency: LatencyTracker::new(),
            close_rx,
        };

        (worker, handle)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> WorkerState {
        self.lifecycle.state()
    }

    /// Run the worker on the tokio runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Endpoint URL for this worker, with its identity appended when enabled
    pub fn connect_url(&self) -> Url {
        let mut url = self.config.endpoint.clone();
        if let Some(param) = &self.config.identity_param {
            url.query_pairs_mut().append_pair(param, &self.id);
        }
        url
    }

    /// Drive the full lifecycle: connect, exchange traffic, close
    pub async fn run(mut self) {
        let url = self.connect_url();
        self.logger.debug("Connecting").worker(&self.id).field("url", url.as_str()).log().await;

        // Move and State go out back to back; Nagle would hold the State frame
        // until the unanswered Move is acked
        let ws = match connect_async_with_config(url.as_str(), None, true).await {
            Ok((ws, _response)) => ws,
            Err(e) => {
                let error = AppError::from(e);
                self.stats.record_error();
                self.logger.error("Connection failed").worker(&self.id).error_info(&error).log().await;
                self.lifecycle.close();
                return;
            }
        };

        self.lifecycle.open();
        self.logger.debug("Connection open").worker(&self.id).log().await;

        self.drive(ws).await;

        self.lifecycle.close();
        self.logger.debug("Connection closed").worker(&self.id).log().await;
    }

    async fn drive<S>(&mut self, ws: S)
    where
        S: Sink<Message, Error = WsError> + Stream<Item = std::result::Result<Message, WsError>> + Unpin,
    {
        let (mut sink, mut stream) = ws.split();
        let mut close_rx = self.close_rx.clone();

        let mut ticker = send_ticker(self.config.send_interval);

        let exit = loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.send_tick(&mut sink).await {
                        break LoopExit::Failed(e);
                    }
                }
                inbound = stream.next() => match inbound {
                    Some(Ok(Message::Binary(data))) => self.on_binary(&data).await,
                    Some(Ok(Message::Close(_))) | None => break LoopExit::RemoteClosed,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        self.stats.record_error();
                        break LoopExit::Failed(e.into());
                    }
                },
                // A dropped handle also ends the run for this worker
                _ = close_rx.changed() => break LoopExit::CloseRequested,
            }
        };
        drop(ticker);

        match exit {
            LoopExit::CloseRequested => {
                if self.lifecycle.begin_closing() {
                    self.close_gracefully(&mut sink, &mut stream).await;
                }
            }
            LoopExit::RemoteClosed => {
                self.logger.info("Server closed the connection").worker(&self.id).log().await;
            }
            LoopExit::Failed(error) => {
                self.logger.error("Transport error").worker(&self.id).error_info(&error).log().await;
            }
        }
    }

    /// Send one Move and one State request
    async fn send_tick<K>(&mut self, sink: &mut K) -> Result<()>
    where
        K: Sink<Message, Error = WsError> + Unpin,
    {
        self.send_frame(sink, TrackedKind::Move, encode_move()).await?;
        self.send_frame(sink, TrackedKind::State, encode_state_request()).await
    }

    async fn send_frame<K>(&mut self, sink: &mut K, kind: TrackedKind, frame: Vec<u8>) -> Result<()>
    where
        K: Sink<Message, Error = WsError> + Unpin,
    {
        match sink.send(Message::Binary(frame.into())).await {
            Ok(()) => {
                self.latency.record_send(kind, Instant::now());
                self.stats.record_sent(kind);
                Ok(())
            }
            Err(e) => {
                self.stats.record_error();
                Err(e.into())
            }
        }
    }

    async fn on_binary(&mut self, data: &[u8]) {
        if let Err(error) = self.handle_inbound(data, Instant::now()) {
            self.stats.record_error();
            self.logger.warn("Dropped inbound frame").worker(&self.id).error_info(&error).log().await;
        }
    }

    /// Account for one inbound frame received at `now`
    pub fn handle_inbound(&mut self, data: &[u8], now: Instant) -> Result<TrackedKind> {
        let kind = TrackedKind::from_tag(decode_kind(data)?);
        self.stats.record_received(kind);
        if let Some(latency) = self.latency.latency_since(kind, now) {
            self.stats.record_latency(kind, latency);
        }
        Ok(kind)
    }

    /// Record a send of `kind` at `at` without touching the transport
    pub fn note_sent(&mut self, kind: TrackedKind, at: Instant) {
        self.latency.record_send(kind, at);
    }

    /// Send a Close frame and wait, bounded, for the server's reply
    async fn close_gracefully<K, R>(&mut self, sink: &mut K, stream: &mut R)
    where
        K: Sink<Message, Error = WsError> + Unpin,
        R: Stream<Item = std::result::Result<Message, WsError>> + Unpin,
    {
        if let Err(e) = sink.send(Message::Close(None)).await {
            self.stats.record_error();
            let error = AppError::from(e);
            self.logger.error("Close handshake failed").worker(&self.id).error_info(&error).log().await;
            return;
        }

        let close_timeout = self.config.close_timeout;
        let drain = async {
            while let Some(inbound) = stream.next().await {
                match inbound {
                    Ok(Message::Binary(data)) => self.on_binary(&data).await,
                    Ok(Message::Close(_)) => break,
                    Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => break,
                    Err(e) => {
                        self.stats.record_error();
                        let error = AppError::from(e);
                        self.logger.error("Transport error while closing").worker(&self.id).error_info(&error).log().await;
                        break;
                    }
                    Ok(_) => {}
                }
            }
        };

        if timeout(close_timeout, drain).await.is_err() {
            self.logger.warn("Close reply timed out").worker(&self.id).log().await;
        }
    }
}
