use crate::error::{DecodeError, DecodeResult, Result};
use crate::packets::{
    BookEditPacket, GamePacket, MobEffectPacket, MovePlayerPacket, Packet, PlayerAuthInputPacket,
};
use crate::protocol::handler::{CloseCode, ConnectionControl, PacketHandler};
use crate::protocol::validator::{
    ConnectionMovementState, MovementValidator, TerminationReason, Verdict,
};
use crate::utils::metrics::{global_metrics, Metrics};
use bytes::Bytes;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

type DecodeFn = fn(&[u8]) -> DecodeResult<Packet>;

/// Codec and handler capability registered for one packet identifier.
#[derive(Clone, Copy)]
pub struct RegistryEntry {
    pub name: &'static str,
    /// Name of the [`PacketHandler`] method that receives this kind.
    pub capability: &'static str,
    pub movement_class: bool,
    decode: DecodeFn,
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("capability", &self.capability)
            .field("movement_class", &self.movement_class)
            .finish()
    }
}

impl RegistryEntry {
    pub fn decode(&self, buf: &[u8]) -> DecodeResult<Packet> {
        (self.decode)(buf)
    }
}

fn decode_as<P>(buf: &[u8]) -> DecodeResult<Packet>
where
    P: GamePacket + Into<Packet>,
{
    P::decode(buf).map(Into::into)
}

/// Static identifier → codec table.
#[derive(Debug)]
pub struct PacketRegistry {
    entries: HashMap<u32, RegistryEntry>,
}

impl PacketRegistry {
    /// Registry holding every packet kind this crate understands.
    pub fn standard() -> Self {
        let mut registry = Self {
            entries: HashMap::with_capacity(4),
        };
        registry.register::<BookEditPacket>("handle_book_edit", false);
        registry.register::<MobEffectPacket>("handle_mob_effect", false);
        registry.register::<MovePlayerPacket>("handle_move_player", true);
        registry.register::<PlayerAuthInputPacket>("handle_player_auth_input", true);
        registry
    }

    fn register<P>(&mut self, capability: &'static str, movement_class: bool)
    where
        P: GamePacket + Into<Packet>,
    {
        self.entries.insert(
            P::ID,
            RegistryEntry {
                name: P::NAME,
                capability,
                movement_class,
                decode: decode_as::<P>,
            },
        );
    }

    pub fn get(&self, id: u32) -> Option<&RegistryEntry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode `buf` with the codec registered for `id`.
    pub fn decode(&self, id: u32, buf: &[u8]) -> DecodeResult<Packet> {
        self.get(id)
            .ok_or(DecodeError::UnsupportedPacket(id))?
            .decode(buf)
    }
}

static REGISTRY: Lazy<PacketRegistry> = Lazy::new(PacketRegistry::standard);

/// The process-wide packet registry.
pub fn registry() -> &'static PacketRegistry {
    &REGISTRY
}

/// Decode a payload by packet identifier. Pure: no metrics, no logging.
pub fn decode_packet(id: u32, buf: &[u8]) -> DecodeResult<Packet> {
    REGISTRY.decode(id, buf)
}

/// What happened to one inbound packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The packet reached its handler.
    Handled { packet: &'static str, accepted: bool },
    /// The validator closed the connection; no handler ran.
    Terminated(TerminationReason),
}

/// Runs decode → validate → handle for inbound payloads.
///
/// Shared by every connection; per-connection history is passed in.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    validator: MovementValidator,
    metrics: Arc<Metrics>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(MovementValidator::default())
    }
}

impl Dispatcher {
    pub fn new(validator: MovementValidator) -> Self {
        Self::with_parts(validator, global_metrics())
    }

    pub fn with_parts(validator: MovementValidator, metrics: Arc<Metrics>) -> Self {
        Self { validator, metrics }
    }

    pub fn validator(&self) -> &MovementValidator {
        &self.validator
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Decode a payload, recording the result.
    pub fn decode_packet(&self, id: u32, buf: &[u8]) -> DecodeResult<Packet> {
        match decode_packet(id, buf) {
            Ok(packet) => {
                self.metrics.packet_decoded(buf.len() as u64);
                Ok(packet)
            }
            Err(e) => {
                self.metrics.decode_error();
                debug!(packet_id = id, len = buf.len(), error = %e, "Packet decode failed");
                Err(e)
            }
        }
    }

    /// Encode an outbound packet, returning its identifier and payload.
    pub fn encode_packet(&self, packet: &Packet) -> (u32, Bytes) {
        let payload = packet.encode();
        self.metrics.packet_encoded(payload.len() as u64);
        (packet.id(), payload)
    }

    /// Decode `buf` as packet `id` and dispatch it.
    ///
    /// A decode error is returned untouched and the session is not closed;
    /// the caller decides how to report it.
    pub fn decode_and_dispatch<S>(
        &self,
        id: u32,
        buf: &[u8],
        state: &mut ConnectionMovementState,
        session: &mut S,
    ) -> Result<DispatchOutcome>
    where
        S: PacketHandler + ConnectionControl + ?Sized,
    {
        let packet = self.decode_packet(id, buf)?;
        Ok(self.dispatch(&packet, state, session))
    }

    /// Validate a decoded packet when it is movement-class, then hand it
    /// to its handler.
    pub fn dispatch<S>(
        &self,
        packet: &Packet,
        state: &mut ConnectionMovementState,
        session: &mut S,
    ) -> DispatchOutcome
    where
        S: PacketHandler + ConnectionControl + ?Sized,
    {
        if packet.is_movement_class() {
            if let Verdict::Terminate(reason) = self.validator.validate(state, packet) {
                warn!(packet = packet.name(), %reason, "Movement rejected, closing connection");
                self.metrics.termination(reason);
                session.close(CloseCode::Kicked, reason.message());
                return DispatchOutcome::Terminated(reason);
            }
        }

        let accepted = match packet {
            Packet::BookEdit(p) => session.handle_book_edit(p),
            Packet::MobEffect(p) => session.handle_mob_effect(p),
            Packet::MovePlayer(p) => session.handle_move_player(p),
            Packet::PlayerAuthInput(p) => session.handle_player_auth_input(p),
        };
        self.metrics.handler_result(accepted);
        trace!(packet = packet.name(), accepted, "Packet dispatched");

        DispatchOutcome::Handled {
            packet: packet.name(),
            accepted,
        }
    }
}
