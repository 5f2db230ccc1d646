//! Concurrent statistics aggregation for load test runs
//!
//! [`StatsAggregator`] is the only mutable state shared between connection
//! workers. Every update is a single atomic read-modify-write so concurrent
//! workers never lose increments, and [`StatsAggregator::snapshot`] gives the
//! orchestrator a plain value to derive the report from.

use crate::types::TrackedKind;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

/// Shared counter set written by every connection worker
#[derive(Debug, Default)]
pub struct StatsAggregator {
    connections: AtomicI64,
    sent_move: AtomicU64,
    sent_state: AtomicU64,
    received_move: AtomicU64,
    received_state: AtomicU64,
    move_latency_us: AtomicU64,
    state_latency_us: AtomicU64,
    errors: AtomicU64,
}

impl StatsAggregator {
    /// Create an aggregator with every counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// A worker reached `Open`
    pub fn connection_opened(&self) {
        self.connections.fetch_add(1, Ordering::AcqRel);
    }

    /// A worker that had opened reached `Closed`
    pub fn connection_closed(&self) {
        self.connections.fetch_sub(1, Ordering::AcqRel);
    }

    /// Count one successfully sent message of the given kind
    pub fn record_sent(&self, kind: TrackedKind) {
        self.sent_counter(kind).fetch_add(1, Ordering::AcqRel);
    }

    /// Count one received response of the given kind
    pub fn record_received(&self, kind: TrackedKind) {
        self.received_counter(kind).fetch_add(1, Ordering::AcqRel);
    }

    /// Add one round-trip sample to the latency sum of the given kind
    pub fn record_latency(&self, kind: TrackedKind, latency: Duration) {
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        let sum = match kind {
            TrackedKind::Move => &self.move_latency_us,
            TrackedKind::State => &self.state_latency_us,
        };
        sum.fetch_add(micros, Ordering::AcqRel);
    }

    /// Count one worker-level error
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::AcqRel);
    }

    /// Current number of open connections
    pub fn open_connections(&self) -> i64 {
        self.connections.load(Ordering::Acquire)
    }

    /// Read every counter
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            connections: self.connections.load(Ordering::Acquire),
            sent_move: self.sent_move.load(Ordering::Acquire),
            sent_state: self.sent_state.load(Ordering::Acquire),
            received_move: self.received_move.load(Ordering::Acquire),
            received_state: self.received_state.load(Ordering::Acquire),
            move_latency_us: self.move_latency_us.load(Ordering::Acquire),
            state_latency_us: self.state_latency_us.load(Ordering::Acquire),
            errors: self.errors.load(Ordering::Acquire),
        }
    }

    fn sent_counter(&self, kind: TrackedKind) -> &AtomicU64 {
        match kind {
            TrackedKind::Move => &self.sent_move,
            TrackedKind::State => &self.sent_state,
        }
    }

    fn received_counter(&self, kind: TrackedKind) -> &AtomicU64 {
        match kind {
            TrackedKind::Move => &self.received_move,
            TrackedKind::State => &self.received_state,
        }
    }
}

/// Point-in-time copy of every aggregator counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub connections: i64,
    pub sent_move: u64,
    pub sent_state: u64,
    pub received_move: u64,
    pub received_state: u64,
    pub move_latency_us: u64,
    pub state_latency_us: u64,
    pub errors: u64,
}

impl StatsSnapshot {
    pub fn sent(&self, kind: TrackedKind) -> u64 {
        match kind {
            TrackedKind::Move => self.sent_move,
            TrackedKind::State => self.sent_state,
        }
    }

    pub fn received(&self, kind: TrackedKind) -> u64 {
        match kind {
            TrackedKind::Move => self.received_move,
            TrackedKind::State => self.received_state,
        }
    }

    pub fn latency_sum_us(&self, kind: TrackedKind) -> u64 {
        match kind {
            TrackedKind::Move => self.move_latency_us,
            TrackedKind::State => self.state_latency_us,
        }
    }

    /// Total responses of both kinds
    pub fn total_received(&self) -> u64 {
        self.received_move + self.received_state
    }

    /// Total sent messages of both kinds
    pub fn total_sent(&self) -> u64 {
        self.sent_move + self.sent_state
    }

    /// Average round-trip latency in milliseconds.
    ///
    /// The divisor is floored at 1 so a kind with no responses averages to
    /// its (zero) sum instead of NaN.
    pub fn average_latency_ms(&self, kind: TrackedKind) -> f64 {
        let count = self.received(kind).max(1);
        self.latency_sum_us(kind) as f64 / count as f64 / 1000.0
    }
}
