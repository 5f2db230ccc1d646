//! Per-worker lifecycle and latency bookkeeping

use crate::{
    stats::StatsAggregator,
    types::{TrackedKind, WorkerState},
};
use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

/// Lifecycle state machine of one connection worker.
///
/// Owns the worker's side of the open-connection counter: the counter is
/// incremented once when the worker reaches `Open` and decremented once when
/// a worker that had opened reaches `Closed`, whichever path leads there.
/// Dropping the lifecycle closes it.
#[derive(Debug)]
pub struct Lifecycle {
    state: Arc<AtomicU8>,
    opened: bool,
    stats: Arc<StatsAggregator>,
}

impl Lifecycle {
    /// Start in `Connecting`
    pub fn new(stats: Arc<StatsAggregator>) -> Self {
        Self {
            state: Arc::new(AtomicU8::new(WorkerState::Connecting as u8)),
            opened: false,
            stats,
        }
    }

    /// State cell shared with the worker's handle
    pub fn shared_state(&self) -> Arc<AtomicU8> {
        self.state.clone()
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// `Connecting → Open`. Returns false if the worker was not connecting.
    pub fn open(&mut self) -> bool {
        if self.transition(WorkerState::Connecting, WorkerState::Open) {
            self.opened = true;
            self.stats.connection_opened();
            true
        } else {
            false
        }
    }

    /// `Open → Closing`. Returns false if the worker was not open.
    pub fn begin_closing(&mut self) -> bool {
        self.transition(WorkerState::Open, WorkerState::Closing)
    }

    /// Move to `Closed` from any state. Only the first call has an effect.
    pub fn close(&mut self) {
        let previous = self.state.swap(WorkerState::Closed as u8, Ordering::AcqRel);
        if WorkerState::from_u8(previous) != WorkerState::Closed && self.opened {
            self.stats.connection_closed();
        }
    }

    fn transition(&self, from: WorkerState, to: WorkerState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        self.close();
    }
}

/// Most recent send instant per tracked kind.
///
/// One slot per kind: a new send overwrites the previous instant, so latency
/// is always measured against the latest send rather than a queue of them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LatencyTracker {
    last_move: Option<Instant>,
    last_state: Option<Instant>,
}

impl LatencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_send(&mut self, kind: TrackedKind, at: Instant) {
        *self.slot(kind) = Some(at);
    }

    pub fn last_sent(&self, kind: TrackedKind) -> Option<Instant> {
        match kind {
            TrackedKind::Move => self.last_move,
            TrackedKind::State => self.last_state,
        }
    }

    /// Time elapsed since the last send of `kind`, or None if nothing was sent
    pub fn latency_since(&self, kind: TrackedKind, now: Instant) -> Option<Duration> {
        self.last_sent(kind).map(|sent| now.saturating_duration_since(sent))
    }

    fn slot(&mut self, kind: TrackedKind) -> &mut Option<Instant> {
        match kind {
            TrackedKind::Move => &mut self.last_move,
            TrackedKind::State => &mut self.last_state,
        }
    }
}
