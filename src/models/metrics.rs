//! Run report data model derived from the final statistics snapshot

use crate::{stats::StatsSnapshot, types::TrackedKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sent/received counters and average latency for one message kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindSummary {
    pub sent: u64,
    pub received: u64,
    /// Average round-trip latency in milliseconds
    pub avg_latency_ms: f64,
}

impl KindSummary {
    fn from_snapshot(snapshot: &StatsSnapshot, kind: TrackedKind) -> Self {
        Self {
            sent: snapshot.sent(kind),
            received: snapshot.received(kind),
            avg_latency_ms: snapshot.average_latency_ms(kind),
        }
    }
}

/// Final summary of a load test run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Endpoint the run targeted
    pub endpoint: String,
    /// Wall-clock time when the run started
    pub started_at: DateTime<Utc>,
    /// Elapsed time from run start to snapshot
    pub elapsed: Duration,
    /// Configured number of concurrent clients
    pub peak_connections: u32,
    /// Live connection counter at snapshot time
    pub final_connections: i64,
    pub moves: KindSummary,
    pub states: KindSummary,
    /// Combined responses per second over the elapsed time
    pub throughput: f64,
    pub errors: u64,
}

impl RunReport {
    /// Derive the report metrics from a statistics snapshot
    pub fn from_snapshot(
        endpoint: impl Into<String>,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        peak_connections: u32,
        snapshot: &StatsSnapshot,
    ) -> Self {
        let elapsed_secs = elapsed.as_secs_f64();
        let throughput = if elapsed_secs > 0.0 {
            snapshot.total_received() as f64 / elapsed_secs
        } else {
            0.0
        };

        Self {
            endpoint: endpoint.into(),
            started_at,
            elapsed,
            peak_connections,
            final_connections: snapshot.connections,
            moves: KindSummary::from_snapshot(snapshot, TrackedKind::Move),
            states: KindSummary::from_snapshot(snapshot, TrackedKind::State),
            throughput,
            errors: snapshot.errors,
        }
    }

    pub fn total_sent(&self) -> u64 {
        self.moves.sent + self.states.sent
    }

    pub fn total_received(&self) -> u64 {
        self.moves.received + self.states.received
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> StatsSnapshot {
        StatsSnapshot {
            connections: 2,
            sent_move: 30,
            sent_state: 30,
            received_move: 0,
            received_state: 20,
            move_latency_us: 0,
            state_latency_us: 40_000,
            errors: 1,
        }
    }

    #[test]
    fn test_report_derives_averages_and_throughput() {
        let report = RunReport::from_snapshot("ws://127.0.0.1:8080", Utc::now(), Duration::from_secs(2), 3, &snapshot());

        assert_eq!(report.peak_connections, 3);
        assert_eq!(report.final_connections, 2);
        assert_eq!(report.states.sent, 30);
        assert_eq!(report.states.received, 20);
        assert!((report.states.avg_latency_ms - 2.0).abs() < 1e-9);
        assert_eq!(report.moves.avg_latency_ms, 0.0);
        assert!((report.throughput - 10.0).abs() < 1e-9);
        assert_eq!(report.total_sent(), 60);
        assert_eq!(report.total_received(), 20);
        assert_eq!(report.errors, 1);
    }

    #[test]
    fn test_zero_elapsed_has_zero_throughput() {
        let report = RunReport::from_snapshot("ws://h", Utc::now(), Duration::ZERO, 1, &snapshot());
        assert_eq!(report.throughput, 0.0);
    }

    #[test]
    fn test_report_serializes() {
        let report = RunReport::from_snapshot("ws://h", Utc::now(), Duration::from_secs(1), 1, &StatsSnapshot::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["moves"]["avg_latency_ms"], 0.0);
        assert_eq!(json["peak_connections"], 1);
    }
}
