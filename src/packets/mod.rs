//! # Packet Variant Codecs
//!
//! One module per client-protocol packet kind. Each kind implements
//! [`GamePacket`]: a fixed identifier plus a payload decoder and encoder built
//! on [`BinaryReader`]/[`BinaryWriter`].
//!
//! ## Rules shared by every codec
//! - Discriminants are read first; an unknown value rejects the packet and
//!   names the kind and raw value
//! - Over-length strings are rejected on decode and truncated on encode
//! - Conditional fields (teleport data, VR gaze) are read and written only
//!   when their discriminant matches, on both paths
//! - A payload must be consumed exactly; trailing bytes are an error
//!
//! Decoding is pure: no I/O, no session lookups, no side effects.

pub mod book_edit;
pub mod mob_effect;
pub mod move_player;
pub mod player_auth_input;

pub use book_edit::{BookEditAction, BookEditKind, BookEditPacket, PageNumber};
pub use mob_effect::{MobEffectEvent, MobEffectPacket};
pub use move_player::{MoveMode, MovePlayerPacket};
pub use player_auth_input::{InputFlag, InputFlags, InputMode, PlayMode, PlayerAuthInputPacket};

use crate::core::binary::{BinaryReader, BinaryWriter};
use crate::error::DecodeResult;
use bytes::Bytes;

/// Numeric packet identifiers.
pub mod ids {
    pub const MOVE_PLAYER: u32 = 0x13;
    pub const MOB_EFFECT: u32 = 0x1c;
    pub const BOOK_EDIT: u32 = 0x61;
    pub const PLAYER_AUTH_INPUT: u32 = 0x90;
}

/// A packet kind with a fixed identifier and wire layout.
pub trait GamePacket: Sized {
    /// The packet identifier.
    const ID: u32;

    /// Name used in logs and errors.
    const NAME: &'static str;

    /// Read the payload fields from the cursor.
    fn decode_payload(reader: &mut BinaryReader<'_>) -> DecodeResult<Self>;

    /// Write the payload fields.
    fn encode_payload(&self, writer: &mut BinaryWriter);

    /// Decode a complete payload, rejecting trailing bytes.
    fn decode(buf: &[u8]) -> DecodeResult<Self> {
        let mut reader = BinaryReader::new(buf);
        let packet = Self::decode_payload(&mut reader)?;
        reader.finish(Self::NAME)?;
        Ok(packet)
    }

    /// Encode the payload into a fresh buffer.
    fn encode(&self) -> Bytes {
        let mut writer = BinaryWriter::with_capacity(64);
        self.encode_payload(&mut writer);
        writer.into_bytes()
    }
}

/// Every packet kind this crate understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    BookEdit(BookEditPacket),
    MobEffect(MobEffectPacket),
    MovePlayer(MovePlayerPacket),
    PlayerAuthInput(PlayerAuthInputPacket),
}

impl Packet {
    pub fn id(&self) -> u32 {
        match self {
            Packet::BookEdit(_) => BookEditPacket::ID,
            Packet::MobEffect(_) => MobEffectPacket::ID,
            Packet::MovePlayer(_) => MovePlayerPacket::ID,
            Packet::PlayerAuthInput(_) => PlayerAuthInputPacket::ID,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Packet::BookEdit(_) => BookEditPacket::NAME,
            Packet::MobEffect(_) => MobEffectPacket::NAME,
            Packet::MovePlayer(_) => MovePlayerPacket::NAME,
            Packet::PlayerAuthInput(_) => PlayerAuthInputPacket::NAME,
        }
    }

    /// Whether the movement validator must see this packet before a handler does.
    pub fn is_movement_class(&self) -> bool {
        matches!(self, Packet::MovePlayer(_) | Packet::PlayerAuthInput(_))
    }

    pub fn encode_payload(&self, writer: &mut BinaryWriter) {
        match self {
            Packet::BookEdit(p) => p.encode_payload(writer),
            Packet::MobEffect(p) => p.encode_payload(writer),
            Packet::MovePlayer(p) => p.encode_payload(writer),
            Packet::PlayerAuthInput(p) => p.encode_payload(writer),
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut writer = BinaryWriter::with_capacity(64);
        self.encode_payload(&mut writer);
        writer.into_bytes()
    }
}

macro_rules! impl_from_packet {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Packet {
                fn from(packet: $ty) -> Self {
                    Packet::$variant(packet)
                }
            }
        )*
    };
}

impl_from_packet!(
    BookEdit(BookEditPacket),
    MobEffect(MobEffectPacket),
    MovePlayer(MovePlayerPacket),
    PlayerAuthInput(PlayerAuthInputPacket),
);
