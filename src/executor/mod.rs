//! Test orchestration
//!
//! The executor resolves the endpoint, spawns one worker per configured
//! client, lets them run for the configured wall-clock window and then asks
//! every open worker to close. Shutdown is best-effort: the report is built
//! from the aggregator as it stands right after the close requests.

use crate::{
    error::{AppError, Result},
    logging::Logger,
    models::{Config, RunReport},
    stats::{StatsAggregator, StatsSnapshot},
    worker::{ConnectionWorker, WorkerConfig, WorkerHandle},
};
use async_trait::async_trait;
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use url::{Host, Url};

/// High-level load executor interface
#[async_trait]
pub trait LoadExecutor {
    /// Run the whole load test and return its report
    async fn execute(&self) -> Result<RunReport>;

    /// Current counters of the run
    fn statistics(&self) -> StatsSnapshot;
}

/// Executor driving a fixed number of connection workers for a fixed time
pub struct LoadTestExecutor {
    config: Config,
    worker_config: Arc<WorkerConfig>,
    stats: Arc<StatsAggregator>,
    logger: Arc<Logger>,
}

impl LoadTestExecutor {
    pub fn new(config: Config, logger: Arc<Logger>) -> Result<Self> {
        let worker_config = Arc::new(WorkerConfig::from_config(&config)?);
        Ok(Self {
            config,
            worker_config,
            stats: Arc::new(StatsAggregator::new()),
            logger,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Aggregator shared with every worker of this executor
    pub fn aggregator(&self) -> Arc<StatsAggregator> {
        self.stats.clone()
    }

    /// Resolve the endpoint host before any worker is started
    pub async fn resolve_endpoint(&self) -> Result<Vec<SocketAddr>> {
        resolve_url(&self.worker_config.endpoint).await
    }

    /// Spawn one worker per configured client, fire-and-forget
    pub fn spawn_workers(&self) -> Vec<WorkerHandle> {
        (0..self.config.clients)
            .map(|_| {
                let (worker, handle) = ConnectionWorker::new(
                    self.worker_config.clone(),
                    self.stats.clone(),
                    self.logger.clone(),
                );
                worker.spawn();
                handle
            })
            .collect()
    }

    /// Ask every open worker to close. Returns how many requests were delivered.
    pub fn request_close_all(handles: &[WorkerHandle]) -> usize {
        handles.iter().filter(|handle| handle.request_close()).count()
    }
}

#[async_trait]
impl LoadExecutor for LoadTestExecutor {
    async fn execute(&self) -> Result<RunReport> {
        let addrs = self.resolve_endpoint().await?;
        self.logger
            .debug("Endpoint resolved")
            .field("endpoint", &self.config.endpoint)
            .field("addresses", addrs.iter().map(|a| a.to_string()).collect::<Vec<_>>())
            .log()
            .await;

        let started_at = Utc::now();
        let start = Instant::now();

        let handles = self.spawn_workers();
        self.logger
            .info("Workers started")
            .field("clients", self.config.clients)
            .field("rate", self.config.rate)
            .field("duration_secs", self.config.duration_secs)
            .log()
            .await;

        tokio::time::sleep(self.config.duration()).await;

        let requested = Self::request_close_all(&handles);
        let elapsed = start.elapsed();
        let snapshot = self.stats.snapshot();

        self.logger
            .info("Run window elapsed")
            .field("close_requests", requested)
            .counters(&snapshot)
            .log()
            .await;

        Ok(RunReport::from_snapshot(
            self.config.endpoint.clone(),
            started_at,
            elapsed,
            self.config.clients,
            &snapshot,
        ))
    }

    fn statistics(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

/// Resolve the socket addresses of a WebSocket URL
pub async fn resolve_url(url: &Url) -> Result<Vec<SocketAddr>> {
    let port = url
        .port_or_known_default()
        .ok_or_else(|| AppError::dns_resolution(format!("No port for endpoint {}", url)))?;

    let addrs: Vec<SocketAddr> = match url.host() {
        Some(Host::Ipv4(ip)) => vec![SocketAddr::new(ip.into(), port)],
        Some(Host::Ipv6(ip)) => vec![SocketAddr::new(ip.into(), port)],
        Some(Host::Domain(domain)) => tokio::net::lookup_host((domain, port))
            .await
            .map_err(|e| AppError::dns_resolution(format!("Failed to resolve {}: {}", domain, e)))?
            .collect(),
        None => return Err(AppError::dns_resolution(format!("Endpoint has no host: {}", url))),
    };

    if addrs.is_empty() {
        return Err(AppError::dns_resolution(format!("No addresses found for {}", url)));
    }
    Ok(addrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use crate::types::{TrackedKind, WorkerState};

    fn quiet_logger() -> Arc<Logger> {
        let mut logger = Logger::new("executor-test".to_string());
        logger.set_level(LogLevel::Fatal);
        Arc::new(logger)
    }

    fn config(endpoint: &str) -> Config {
        Config {
            endpoint: endpoint.to_string(),
            clients: 2,
            duration_secs: 1,
            rate: 5,
            close_timeout_ms: 100,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_resolve_ip_literals() {
        let v4 = resolve_url(&Url::parse("ws://127.0.0.1:9001").unwrap()).await.unwrap();
        assert_eq!(v4, vec!["127.0.0.1:9001".parse::<SocketAddr>().unwrap()]);

        let v6 = resolve_url(&Url::parse("ws://[::1]/").unwrap()).await.unwrap();
        assert_eq!(v6, vec!["[::1]:80".parse::<SocketAddr>().unwrap()]);
    }

    #[tokio::test]
    async fn test_resolve_failure_is_dns_error() {
        let result = resolve_url(&Url::parse("ws://no-such-host.invalid:8080").unwrap()).await;
        match result {
            Err(e) => {
                assert_eq!(e.category(), "DNS");
                assert_eq!(e.exit_code(), 2);
            }
            Ok(addrs) => panic!("expected resolution failure, got {:?}", addrs),
        }
    }

    #[tokio::test]
    async fn test_spawns_exactly_configured_workers() {
        let executor = LoadTestExecutor::new(config("ws://127.0.0.1:9"), quiet_logger()).unwrap();
        let handles = executor.spawn_workers();
        assert_eq!(handles.len(), 2);
    }

    #[tokio::test]
    async fn test_close_requests_skip_workers_that_never_opened() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let executor = LoadTestExecutor::new(config(&format!("ws://127.0.0.1:{}", port)), quiet_logger()).unwrap();
        let handles = executor.spawn_workers();

        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        assert!(handles.iter().all(|h| h.state() == WorkerState::Closed));
        assert_eq!(LoadTestExecutor::request_close_all(&handles), 0);
    }

    #[tokio::test]
    async fn test_run_against_closed_port_reports_errors() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let executor = LoadTestExecutor::new(config(&format!("ws://127.0.0.1:{}", port)), quiet_logger()).unwrap();
        let report = executor.execute().await.unwrap();

        assert_eq!(report.errors, 2);
        assert_eq!(report.final_connections, 0);
        assert_eq!(report.peak_connections, 2);
        assert_eq!(report.total_sent(), 0);
        assert_eq!(report.moves.avg_latency_ms, 0.0);
        assert_eq!(report.states.avg_latency_ms, 0.0);
        assert_eq!(report.throughput, 0.0);
        assert!(report.elapsed >= std::time::Duration::from_secs(1));
        assert_eq!(executor.statistics().sent(TrackedKind::Move), 0);
    }

    #[tokio::test]
    async fn test_unresolvable_endpoint_fails_before_spawning() {
        let executor = LoadTestExecutor::new(config("ws://no-such-host.invalid:8080"), quiet_logger()).unwrap();
        assert!(executor.execute().await.is_err());
        assert_eq!(executor.statistics().errors, 0);
    }
}
