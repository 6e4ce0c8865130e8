//! # Movement & Input Validator
//!
//! Decides, one movement-class packet at a time, whether a connection may
//! continue. Rules run in order and the first violation wins:
//!
//! 1. **Bounds** (move + input): any coordinate beyond the position bound, or
//!    not finite
//! 2. **Flood** (move): less than the minimum interval since the last
//!    accepted move
//! 3. **Plausibility** (move): vertical or horizontal change from the last
//!    known position above the configured maximum
//! 4. **Jump spam** (input): more jumps inside the rolling window than the
//!    limit; stair/slab steps are exempt
//!
//! A violation always terminates the connection. Nothing is clamped or
//! silently corrected.
//!
//! State lives in [`ConnectionMovementState`], owned by the connection it
//! describes. The validator itself holds only configuration and a clock, so
//! one instance can be shared by every connection.

use crate::config::MovementConfig;
use crate::core::math::Vec3;
use crate::error::constants;
use crate::packets::{MovePlayerPacket, Packet, PlayerAuthInputPacket};
use crate::utils::time::{elapsed_between, Clock, SystemClock};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

/// Why the validator closed a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    InvalidPosition,
    Flooding,
    ExcessiveVerticalMovement,
    ExcessiveHorizontalMovement,
    JumpSpam,
}

impl TerminationReason {
    /// Human-readable message sent with the close.
    pub fn message(self) -> &'static str {
        match self {
            TerminationReason::InvalidPosition => constants::REASON_INVALID_POSITION,
            TerminationReason::Flooding => constants::REASON_FLOODING,
            TerminationReason::ExcessiveVerticalMovement => constants::REASON_VERTICAL_MOVEMENT,
            TerminationReason::ExcessiveHorizontalMovement => {
                constants::REASON_HORIZONTAL_MOVEMENT
            }
            TerminationReason::JumpSpam => constants::REASON_JUMP_SPAM,
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of validating one packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Verdict {
    Accept,
    Terminate(TerminationReason),
}

impl Verdict {
    pub fn is_accept(self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Per-connection movement history.
///
/// Starts empty; each field is filled by the first packet that needs it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionMovementState {
    last_accepted_move: Option<Instant>,
    last_known_position: Option<Vec3>,
    jump_window_start: Option<Instant>,
    jump_count: u32,
}

impl ConnectionMovementState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_accepted_move(&self) -> Option<Instant> {
        self.last_accepted_move
    }

    pub fn last_known_position(&self) -> Option<Vec3> {
        self.last_known_position
    }

    pub fn jump_window_start(&self) -> Option<Instant> {
        self.jump_window_start
    }

    /// Jumps counted in the current window.
    pub fn jump_count(&self) -> u32 {
        self.jump_count
    }
}

/// Stateless rule engine; state is passed in per call.
#[derive(Clone)]
pub struct MovementValidator {
    config: MovementConfig,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for MovementValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovementValidator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for MovementValidator {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}

impl MovementValidator {
    pub fn new(config: MovementConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: MovementConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Validate any packet. Non-movement packets are always accepted.
    pub fn validate(&self, state: &mut ConnectionMovementState, packet: &Packet) -> Verdict {
        match packet {
            Packet::MovePlayer(p) => self.check_move(state, p),
            Packet::PlayerAuthInput(p) => self.check_auth_input(state, p),
            Packet::BookEdit(_) | Packet::MobEffect(_) => Verdict::Accept,
        }
    }

    /// Bounds, flood and plausibility rules for a move packet.
    pub fn check_move(
        &self,
        state: &mut ConnectionMovementState,
        packet: &MovePlayerPacket,
    ) -> Verdict {
        if let Verdict::Terminate(reason) = self.check_bounds(packet.position) {
            return Verdict::Terminate(reason);
        }

        let now = self.clock.now();
        if let Some(last) = state.last_accepted_move {
            if elapsed_between(last, now) < self.config.min_move_interval {
                return Verdict::Terminate(TerminationReason::Flooding);
            }
        }
        state.last_accepted_move = Some(now);

        if let Some(last) = state.last_known_position {
            let position = packet.position;
            if (position.y - last.y).abs() > self.config.max_vertical_change {
                return Verdict::Terminate(TerminationReason::ExcessiveVerticalMovement);
            }
            if (position.x - last.x).abs() > self.config.max_horizontal_change
                || (position.z - last.z).abs() > self.config.max_horizontal_change
            {
                return Verdict::Terminate(TerminationReason::ExcessiveHorizontalMovement);
            }
        }
        state.last_known_position = Some(packet.position);

        Verdict::Accept
    }

    /// Bounds and jump-spam rules for an input packet.
    pub fn check_auth_input(
        &self,
        state: &mut ConnectionMovementState,
        packet: &PlayerAuthInputPacket,
    ) -> Verdict {
        if let Verdict::Terminate(reason) = self.check_bounds(packet.position) {
            return Verdict::Terminate(reason);
        }

        let rise = packet.delta.y;
        if rise > 0.0 && rise <= self.config.slab_step_height {
            trace!(rise, "step-up movement, not counted as a jump");
            return Verdict::Accept;
        }

        if packet.input_flags.is_jumping() && rise > self.config.jump_min_rise {
            let now = self.clock.now();
            let window_open = state
                .jump_window_start
                .is_some_and(|start| elapsed_between(start, now) <= self.config.jump_window);
            if !window_open {
                if state.jump_count > 0 {
                    debug!(previous = state.jump_count, "jump window elapsed, counter reset");
                }
                state.jump_count = 0;
                state.jump_window_start = Some(now);
            }

            state.jump_count = state.jump_count.saturating_add(1);
            if state.jump_count > self.config.jump_limit {
                return Verdict::Terminate(TerminationReason::JumpSpam);
            }
        }

        Verdict::Accept
    }

    /// Reseed the last known position from the server's own record.
    ///
    /// Called after server-initiated teleports and respawns so the next move
    /// is measured from where the server put the player.
    pub fn resync_position(&self, state: &mut ConnectionMovementState, position: Vec3) {
        state.last_known_position = Some(position);
    }

    fn check_bounds(&self, position: Vec3) -> Verdict {
        if !position.is_finite() || position.max_abs() > self.config.position_bound {
            Verdict::Terminate(TerminationReason::InvalidPosition)
        } else {
            Verdict::Accept
        }
    }
}
