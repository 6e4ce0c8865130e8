//! # Bedrock Protocol Core
//!
//! Codec for a subset of Bedrock client-protocol game packets, with movement
//! and input validation run inline between decode and game logic.
//!
//! ## Pipeline
//! ```text
//! bytes → PacketRegistry (id lookup) → codec → MovementValidator → PacketHandler
//! ```
//! Only movement-class packets (`MovePlayerPacket`, `PlayerAuthInputPacket`)
//! pass through the validator. A validator violation closes the connection
//! and the packet never reaches a handler.
//!
//! ## Modules
//! - [`core`]: binary primitives and vector types
//! - [`packets`]: one codec per packet kind plus the [`Packet`] union
//! - [`protocol`]: registry, dispatcher, validator and connection arena
//! - [`config`]: validator thresholds and logging, from TOML or environment
//! - [`utils`]: logging, metrics and clocks
//!
//! ## Example
//! ```rust
//! use bedrock_protocol_core::core::math::Vec3;
//! use bedrock_protocol_core::packets::{GamePacket, MovePlayerPacket, Packet};
//! use bedrock_protocol_core::protocol::decode_packet;
//!
//! let packet = MovePlayerPacket::new(1, Vec3::new(0.5, 64.0, 0.5));
//! let bytes = packet.encode();
//! let decoded = decode_packet(MovePlayerPacket::ID, &bytes).unwrap();
//! assert_eq!(decoded, Packet::MovePlayer(packet));
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod packets;
pub mod protocol;
pub mod utils;

pub use config::{LoggingConfig, MovementConfig, ProtocolConfig};
pub use error::{ConstructionError, DecodeError, ProtocolError, Result};
pub use packets::{GamePacket, Packet};
pub use protocol::{
    CloseCode, ConnectionControl, DispatchOutcome, Dispatcher, MovementValidator, PacketHandler,
};
