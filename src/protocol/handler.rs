//! Capabilities the dispatcher consumes from the session layer.
//!
//! The session owns game logic and the transport. This crate only needs two
//! things from it: somewhere to hand accepted packets, and a way to close the
//! connection.

use crate::packets::{BookEditPacket, MobEffectPacket, MovePlayerPacket, PlayerAuthInputPacket};
use std::fmt;

/// Game-logic handlers, one per packet kind.
///
/// The returned flag says whether game logic accepted the packet. It feeds
/// metrics only; a `false` never closes the connection.
pub trait PacketHandler {
    fn handle_book_edit(&mut self, packet: &BookEditPacket) -> bool;

    fn handle_mob_effect(&mut self, packet: &MobEffectPacket) -> bool;

    fn handle_move_player(&mut self, packet: &MovePlayerPacket) -> bool;

    fn handle_player_auth_input(&mut self, packet: &PlayerAuthInputPacket) -> bool;
}

/// Why a connection is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseCode {
    /// The client sent bytes that do not decode.
    ProtocolViolation,
    /// The validator rejected the client's movement.
    Kicked,
}

impl fmt::Display for CloseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseCode::ProtocolViolation => f.write_str("protocol violation"),
            CloseCode::Kicked => f.write_str("kicked"),
        }
    }
}

/// Close capability of the owning session.
pub trait ConnectionControl {
    fn close(&mut self, code: CloseCode, message: &str);
}
