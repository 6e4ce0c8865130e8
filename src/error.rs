//! # Error Types
//!
//! Error handling for the packet codec and the movement validator.
//!
//! Two classes of failure never mix:
//! - **Decode errors**: the bytes are malformed. The whole packet is rejected
//!   before it reaches validation or a handler.
//! - **Validation rejections**: the packet decoded fine but the movement it
//!   describes is not admissible. These are not errors at all from the codec's
//!   point of view; they surface as a [`TerminationReason`](crate::protocol::validator::TerminationReason)
//!   in the dispatch outcome.
//!
//! ## Example Usage
//! ```rust
//! use bedrock_protocol_core::error::{DecodeError, ProtocolError, Result};
//! use tracing::{debug, info};
//!
//! fn check(bytes: &[u8]) -> Result<()> {
//!     if bytes.is_empty() {
//!         return Err(DecodeError::Truncated { needed: 1, remaining: 0 }.into());
//!     }
//!     Ok(())
//! }
//!
//! match check(&[]) {
//!     Ok(()) => info!("frame ok"),
//!     Err(e) => debug!(error = %e, "frame rejected"),
//! }
//! ```

use crate::protocol::connection::ConnectionId;
use std::io;
use thiserror::Error;

/// Static messages shared across the crate.
pub mod constants {
    /// Connection table errors
    pub const ERR_TABLE_WRITE_LOCK: &str = "Failed to acquire write lock on connection table";
    pub const ERR_TABLE_READ_LOCK: &str = "Failed to acquire read lock on connection table";
    pub const ERR_STATE_LOCK: &str = "Movement state lock poisoned";

    /// Validator termination reasons (sent to the client as the close message)
    pub const REASON_INVALID_POSITION: &str = "invalid position data detected";
    pub const REASON_FLOODING: &str = "flooding detected";
    pub const REASON_VERTICAL_MOVEMENT: &str = "excessive vertical movement detected";
    pub const REASON_HORIZONTAL_MOVEMENT: &str = "excessive horizontal movement detected";
    pub const REASON_JUMP_SPAM: &str = "bot detected (excessive jump packets)";

    /// Close message for malformed packets
    pub const REASON_PROTOCOL_VIOLATION: &str = "protocol violation";
}

/// A malformed packet payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Buffer truncated: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("VarInt too long")]
    VarIntTooLong,

    #[error("VarLong too long")]
    VarLongTooLong,

    #[error("String is not valid UTF-8")]
    InvalidUtf8,

    #[error("Invalid {kind} value: {value}")]
    InvalidDiscriminant { kind: &'static str, value: u64 },

    #[error("Page number out of range: {page}")]
    PageOutOfRange { page: u8 },

    #[error("{field} too long: {len} bytes (max {max})")]
    StringTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Unsupported packet: 0x{0:02X}")]
    UnsupportedPacket(u32),

    #[error("{packet} has {remaining} trailing bytes")]
    TrailingBytes {
        packet: &'static str,
        remaining: usize,
    },
}

/// A packet value that violates an invariant at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("Gaze direction must be provided for VR play mode")]
    MissingGazeDirection,

    #[error("Page number out of range: {0}")]
    PageOutOfRange(u8),
}

// ProtocolError is the primary error type for all crate operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Construction error: {0}")]
    Construction(#[from] ConstructionError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Unknown connection: {0}")]
    UnknownConnection(ConnectionId),

    #[error("Custom error: {0}")]
    Custom(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Result of a raw decode step.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
