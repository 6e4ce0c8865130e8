//! Player movement updates.
//!
//! ```text
//! runtimeId entity, vec3 position, f32 pitch, f32 yaw, f32 headYaw,
//! byte mode, bool onGround, runtimeId riding,
//! [mode == Teleport: i32 cause, i32 item], uvarlong tick
//! ```

use crate::core::binary::{BinaryReader, BinaryWriter};
use crate::core::math::Vec3;
use crate::error::{DecodeError, DecodeResult};
use crate::packets::{ids, GamePacket};

pub const MODE_NORMAL: u8 = 0;
pub const MODE_RESET: u8 = 1;
pub const MODE_TELEPORT: u8 = 2;
pub const MODE_PITCH: u8 = 3;

/// Movement mode. Teleport data only exists on the wire for `Teleport`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveMode {
    #[default]
    Normal,
    Reset,
    Teleport {
        cause: i32,
        item: i32,
    },
    PitchOnly,
}

impl MoveMode {
    pub fn discriminant(&self) -> u8 {
        match self {
            MoveMode::Normal => MODE_NORMAL,
            MoveMode::Reset => MODE_RESET,
            MoveMode::Teleport { .. } => MODE_TELEPORT,
            MoveMode::PitchOnly => MODE_PITCH,
        }
    }
}

#[doc(alias = "MovePacket")]
#[derive(Debug, Clone, PartialEq)]
pub struct MovePlayerPacket {
    pub entity_runtime_id: u64,
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
    pub mode: MoveMode,
    pub on_ground: bool,
    pub riding_entity_runtime_id: u64,
    pub tick: u64,
}

impl MovePlayerPacket {
    /// A normal-mode update with no rotation, not riding anything.
    pub fn new(entity_runtime_id: u64, position: Vec3) -> Self {
        Self {
            entity_runtime_id,
            position,
            pitch: 0.0,
            yaw: 0.0,
            head_yaw: 0.0,
            mode: MoveMode::Normal,
            on_ground: false,
            riding_entity_runtime_id: 0,
            tick: 0,
        }
    }

    pub fn with_rotation(mut self, pitch: f32, yaw: f32, head_yaw: f32) -> Self {
        self.pitch = pitch;
        self.yaw = yaw;
        self.head_yaw = head_yaw;
        self
    }

    pub fn with_mode(mut self, mode: MoveMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_on_ground(mut self, on_ground: bool) -> Self {
        self.on_ground = on_ground;
        self
    }

    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }
}

impl GamePacket for MovePlayerPacket {
    const ID: u32 = ids::MOVE_PLAYER;
    const NAME: &'static str = "MovePlayerPacket";

    fn decode_payload(reader: &mut BinaryReader<'_>) -> DecodeResult<Self> {
        let entity_runtime_id = reader.get_entity_runtime_id()?;
        let position = reader.get_vec3()?;
        let pitch = reader.get_lfloat()?;
        let yaw = reader.get_lfloat()?;
        let head_yaw = reader.get_lfloat()?;
        let raw_mode = reader.get_byte()?;
        let on_ground = reader.get_bool()?;
        let riding_entity_runtime_id = reader.get_entity_runtime_id()?;

        let mode = match raw_mode {
            MODE_NORMAL => MoveMode::Normal,
            MODE_RESET => MoveMode::Reset,
            MODE_TELEPORT => MoveMode::Teleport {
                cause: reader.get_lint()?,
                item: reader.get_lint()?,
            },
            MODE_PITCH => MoveMode::PitchOnly,
            other => {
                return Err(DecodeError::InvalidDiscriminant {
                    kind: "move mode",
                    value: u64::from(other),
                })
            }
        };

        let tick = reader.get_unsigned_varlong()?;

        Ok(Self {
            entity_runtime_id,
            position,
            pitch,
            yaw,
            head_yaw,
            mode,
            on_ground,
            riding_entity_runtime_id,
            tick,
        })
    }

    fn encode_payload(&self, writer: &mut BinaryWriter) {
        writer.put_entity_runtime_id(self.entity_runtime_id);
        writer.put_vec3(self.position);
        writer.put_lfloat(self.pitch);
        writer.put_lfloat(self.yaw);
        writer.put_lfloat(self.head_yaw);
        writer.put_byte(self.mode.discriminant());
        writer.put_bool(self.on_ground);
        writer.put_entity_runtime_id(self.riding_entity_runtime_id);
        if let MoveMode::Teleport { cause, item } = self.mode {
            writer.put_lint(cause);
            writer.put_lint(item);
        }
        writer.put_unsigned_varlong(self.tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MovePlayerPacket {
        MovePlayerPacket::new(1, Vec3::new(10.5, 64.0, -3.25))
            .with_rotation(12.0, 90.0, 91.0)
            .with_on_ground(true)
            .with_tick(1000)
    }

    #[test]
    fn test_roundtrip_every_mode() {
        for mode in [
            MoveMode::Normal,
            MoveMode::Reset,
            MoveMode::Teleport { cause: 2, item: 368 },
            MoveMode::PitchOnly,
        ] {
            let packet = sample().with_mode(mode);
            assert_eq!(MovePlayerPacket::decode(&packet.encode()).unwrap(), packet);
        }
    }

    #[test]
    fn test_teleport_fields_only_on_teleport() {
        let normal = sample().encode();
        let teleport = sample()
            .with_mode(MoveMode::Teleport { cause: 0, item: 0 })
            .encode();
        assert_eq!(teleport.len(), normal.len() + 8);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let mut bytes = sample().encode().to_vec();
        // runtime id (1) + vec3 (12) + three floats (12)
        bytes[25] = 9;
        assert_eq!(
            MovePlayerPacket::decode(&bytes),
            Err(DecodeError::InvalidDiscriminant {
                kind: "move mode",
                value: 9
            })
        );
    }

    #[test]
    fn test_teleport_missing_fields_is_truncated() {
        let mut bytes = sample().encode().to_vec();
        bytes[25] = MODE_TELEPORT;
        assert!(matches!(
            MovePlayerPacket::decode(&bytes),
            Err(DecodeError::Truncated { .. })
        ));
    }
}
