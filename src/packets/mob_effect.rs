//! Status effect add/modify/remove notifications.

use crate::core::binary::{BinaryReader, BinaryWriter};
use crate::error::{DecodeError, DecodeResult};
use crate::packets::{ids, GamePacket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MobEffectEvent {
    Add = 1,
    Modify = 2,
    Remove = 3,
}

impl TryFrom<u8> for MobEffectEvent {
    type Error = DecodeError;

    fn try_from(value: u8) -> DecodeResult<Self> {
        match value {
            1 => Ok(Self::Add),
            2 => Ok(Self::Modify),
            3 => Ok(Self::Remove),
            _ => Err(DecodeError::InvalidDiscriminant {
                kind: "mob effect event",
                value: u64::from(value),
            }),
        }
    }
}

#[doc(alias = "StatusEffectPacket")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobEffectPacket {
    pub entity_runtime_id: u64,
    pub event: MobEffectEvent,
    pub effect_id: i32,
    pub amplifier: i32,
    pub particles: bool,
    /// Remaining duration in ticks.
    pub duration: i32,
    pub tick: u64,
}

impl MobEffectPacket {
    pub fn add(
        entity_runtime_id: u64,
        replace: bool,
        effect_id: i32,
        amplifier: i32,
        particles: bool,
        duration: i32,
    ) -> Self {
        Self {
            entity_runtime_id,
            event: if replace {
                MobEffectEvent::Modify
            } else {
                MobEffectEvent::Add
            },
            effect_id,
            amplifier,
            particles,
            duration,
            tick: 0,
        }
    }

    pub fn remove(entity_runtime_id: u64, effect_id: i32) -> Self {
        Self {
            entity_runtime_id,
            event: MobEffectEvent::Remove,
            effect_id,
            amplifier: 0,
            particles: false,
            duration: 0,
            tick: 0,
        }
    }

    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }
}

impl GamePacket for MobEffectPacket {
    const ID: u32 = ids::MOB_EFFECT;
    const NAME: &'static str = "MobEffectPacket";

    fn decode_payload(reader: &mut BinaryReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            entity_runtime_id: reader.get_entity_runtime_id()?,
            event: MobEffectEvent::try_from(reader.get_byte()?)?,
            effect_id: reader.get_varint()?,
            amplifier: reader.get_varint()?,
            particles: reader.get_bool()?,
            duration: reader.get_varint()?,
            tick: reader.get_unsigned_varlong()?,
        })
    }

    fn encode_payload(&self, writer: &mut BinaryWriter) {
        writer.put_entity_runtime_id(self.entity_runtime_id);
        writer.put_byte(self.event as u8);
        writer.put_varint(self.effect_id);
        writer.put_varint(self.amplifier);
        writer.put_bool(self.particles);
        writer.put_varint(self.duration);
        writer.put_unsigned_varlong(self.tick);
    }
}
