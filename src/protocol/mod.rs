//! Binary message codec for the game server protocol
//!
//! Every frame starts with a one-byte kind tag. Outbound traffic consists of
//! two fixed-size kinds:
//!
//! - Move: `[3][vx: f32 LE][vy: f32 LE][action: u8]` (the action byte is optional)
//! - State request: `[2]`
//!
//! The Move body mirrors the server's `{ vx: f32, vy: f32, target: u8 }`
//! layout, so field widths here must not drift from the server's decoder.

use crate::{
    error::{AppError, Result},
    types::MessageKind,
};
use rand::Rng;

/// Number of distinct action codes a Move may carry (`0..MOVE_ACTION_COUNT`)
pub const MOVE_ACTION_COUNT: u8 = 5;

/// Encoded size of a Move frame with the action byte
pub const MOVE_FRAME_LEN: usize = 1 + 4 + 4 + 1;

/// Encoded size of a State request frame
pub const STATE_REQUEST_FRAME_LEN: usize = 1;

/// Synthetic directional input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveMessage {
    pub vx: f32,
    pub vy: f32,
    pub action: Option<u8>,
}

impl MoveMessage {
    /// Draw a random move: both components uniform in `[-1, 1]`, action uniform
    /// over `0..MOVE_ACTION_COUNT`
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            vx: rng.random_range(-1.0f32..=1.0),
            vy: rng.random_range(-1.0f32..=1.0),
            action: Some(rng.random_range(0..MOVE_ACTION_COUNT)),
        }
    }

    /// Encode as a wire frame
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(MOVE_FRAME_LEN);
        bytes.push(MessageKind::Move.tag());
        bytes.extend_from_slice(&self.vx.to_le_bytes());
        bytes.extend_from_slice(&self.vy.to_le_bytes());
        if let Some(action) = self.action {
            bytes.push(action);
        }
        bytes
    }

    /// Parse a Move frame, tag included
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let tag = decode_kind(bytes)?;
        if tag != MessageKind::Move.tag() {
            return Err(AppError::parse(format!("Expected move tag {}, got {}", MessageKind::Move.tag(), tag)));
        }

        let body = &bytes[1..];
        if body.len() < 8 {
            return Err(AppError::parse(format!("Move body too short: {} bytes", body.len())));
        }

        let component = |offset: usize| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&body[offset..offset + 4]);
            f32::from_le_bytes(raw)
        };

        Ok(Self {
            vx: component(0),
            vy: component(4),
            action: body.get(8).copied(),
        })
    }
}

/// Build a random Move frame using the thread-local RNG
pub fn encode_move() -> Vec<u8> {
    encode_move_with(&mut rand::rng())
}

/// Build a random Move frame from the given RNG
pub fn encode_move_with<R: Rng>(rng: &mut R) -> Vec<u8> {
    MoveMessage::random(rng).to_bytes()
}

/// Build a State request frame
pub fn encode_state_request() -> Vec<u8> {
    vec![MessageKind::State.tag()]
}

/// Read the kind tag of an inbound frame
pub fn decode_kind(bytes: &[u8]) -> Result<u8> {
    bytes.first().copied().ok_or(AppError::EmptyPayload)
}
