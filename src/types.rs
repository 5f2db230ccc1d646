//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Kind tags of the game server's binary protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageKind {
    Ping = 0,
    Pong = 1,
    /// State request (outbound) and state snapshot (inbound)
    State = 2,
    /// Directional move input
    Move = 3,
}

impl MessageKind {
    /// Get the wire tag for this kind
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(MessageKind::Ping),
            1 => Ok(MessageKind::Pong),
            2 => Ok(MessageKind::State),
            3 => Ok(MessageKind::Move),
            other => Err(AppError::parse(format!("Unknown message kind tag: {}", other))),
        }
    }
}

impl From<MessageKind> for u8 {
    fn from(value: MessageKind) -> u8 {
        value as u8
    }
}

/// The two message kinds the harness sends and keeps statistics for.
///
/// On the inbound side only tag 2 is a state response; every other tag
/// counts as a move-class response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackedKind {
    Move,
    State,
}

impl TrackedKind {
    /// Classify an inbound kind tag
    pub fn from_tag(tag: u8) -> Self {
        if tag == MessageKind::State.tag() {
            Self::State
        } else {
            Self::Move
        }
    }

    /// Lower-case label used in log fields and reports
    pub fn label(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::State => "state",
        }
    }
}

/// Connection worker lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum WorkerState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl WorkerState {
    /// Decode the value stored in a worker's shared state cell
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Connecting,
            1 => Self::Open,
            2 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_kind_tags() {
        assert_eq!(MessageKind::Ping.tag(), 0);
        assert_eq!(MessageKind::Pong.tag(), 1);
        assert_eq!(MessageKind::State.tag(), 2);
        assert_eq!(MessageKind::Move.tag(), 3);
        assert_eq!(u8::from(MessageKind::Move), 3);
    }

    #[test]
    fn test_message_kind_try_from() {
        assert_eq!(MessageKind::try_from(2).unwrap(), MessageKind::State);
        assert_eq!(MessageKind::try_from(3).unwrap(), MessageKind::Move);
        assert!(MessageKind::try_from(42).is_err());
    }

    #[test]
    fn test_response_classification() {
        assert_eq!(TrackedKind::from_tag(2), TrackedKind::State);
        assert_eq!(TrackedKind::from_tag(3), TrackedKind::Move);
        assert_eq!(TrackedKind::from_tag(0), TrackedKind::Move);
        assert_eq!(TrackedKind::from_tag(255), TrackedKind::Move);
    }

    #[test]
    fn test_worker_state_round_trip_through_u8() {
        for state in [WorkerState::Connecting, WorkerState::Open, WorkerState::Closing, WorkerState::Closed] {
            assert_eq!(WorkerState::from_u8(state as u8), state);
        }
        assert_eq!(WorkerState::Open.to_string(), "open");
    }
}
