//! Server-authoritative movement input, sent by the client every tick.
//!
//! ```text
//! f32 pitch, f32 yaw, vec3 position, f32 moveX, f32 moveZ, f32 headYaw,
//! uvarlong inputFlags, uvarint inputMode, uvarint playMode,
//! uvarint interactionMode, [playMode == VR: vec3 gaze], uvarlong tick,
//! vec3 delta
//! ```

use crate::core::binary::{BinaryReader, BinaryWriter};
use crate::core::math::{Vec2, Vec3};
use crate::error::{ConstructionError, DecodeError, DecodeResult};
use crate::packets::{ids, GamePacket};

/// Bit positions within the input flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InputFlag {
    Ascend = 0,
    Descend = 1,
    NorthJump = 2,
    JumpDown = 3,
    SprintDown = 4,
    ChangeHeight = 5,
    Jumping = 6,
    AutoJumpingInWater = 7,
    Sneaking = 8,
    SneakDown = 9,
    Up = 10,
    Down = 11,
    Left = 12,
    Right = 13,
    UpLeft = 14,
    UpRight = 15,
    WantUp = 16,
    WantDown = 17,
    WantDownSlow = 18,
    WantUpSlow = 19,
    Sprinting = 20,
    AscendScaffolding = 21,
    DescendScaffolding = 22,
    SneakToggleDown = 23,
    PersistSneak = 24,
}

/// 64-bit input flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct InputFlags(pub u64);

impl InputFlags {
    pub const EMPTY: InputFlags = InputFlags(0);

    #[inline]
    pub fn contains(self, flag: InputFlag) -> bool {
        self.0 & (1u64 << flag as u8) != 0
    }

    #[must_use]
    pub fn with(self, flag: InputFlag) -> Self {
        Self(self.0 | (1u64 << flag as u8))
    }

    /// Whether the jump key went down this tick.
    #[inline]
    pub fn is_jumping(self) -> bool {
        self.contains(InputFlag::JumpDown)
    }
}

impl FromIterator<InputFlag> for InputFlags {
    fn from_iter<I: IntoIterator<Item = InputFlag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, InputFlags::with)
    }
}

/// Device the client plays with. Unknown values are kept raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    MouseKeyboard,
    Touch,
    GamePad,
    MotionController,
    Other(u32),
}

impl From<u32> for InputMode {
    fn from(value: u32) -> Self {
        match value {
            1 => InputMode::MouseKeyboard,
            2 => InputMode::Touch,
            3 => InputMode::GamePad,
            4 => InputMode::MotionController,
            other => InputMode::Other(other),
        }
    }
}

impl From<InputMode> for u32 {
    fn from(mode: InputMode) -> Self {
        match mode {
            InputMode::MouseKeyboard => 1,
            InputMode::Touch => 2,
            InputMode::GamePad => 3,
            InputMode::MotionController => 4,
            InputMode::Other(other) => other,
        }
    }
}

/// Play mode; `Vr` adds a gaze vector to the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PlayMode {
    Normal = 0,
    Teacher = 1,
    Screen = 2,
    Viewer = 3,
    Vr = 4,
    Placement = 5,
    LivingRoom = 6,
    ExitLevel = 7,
    ExitLevelLivingRoom = 8,
}

impl TryFrom<u32> for PlayMode {
    type Error = DecodeError;

    fn try_from(value: u32) -> DecodeResult<Self> {
        Ok(match value {
            0 => PlayMode::Normal,
            1 => PlayMode::Teacher,
            2 => PlayMode::Screen,
            3 => PlayMode::Viewer,
            4 => PlayMode::Vr,
            5 => PlayMode::Placement,
            6 => PlayMode::LivingRoom,
            7 => PlayMode::ExitLevel,
            8 => PlayMode::ExitLevelLivingRoom,
            _ => {
                return Err(DecodeError::InvalidDiscriminant {
                    kind: "play mode",
                    value: u64::from(value),
                })
            }
        })
    }
}

#[doc(alias = "AuthoritativeInputPacket")]
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerAuthInputPacket {
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
    pub move_vec: Vec2,
    pub input_flags: InputFlags,
    pub input_mode: u32,
    pub interaction_mode: u32,
    pub tick: u64,
    /// Movement applied this tick.
    pub delta: Vec3,
    // play_mode == Vr iff vr_gaze_direction.is_some()
    play_mode: PlayMode,
    vr_gaze_direction: Option<Vec3>,
}

impl PlayerAuthInputPacket {
    /// Build an input packet.
    ///
    /// # Errors
    ///
    /// [`ConstructionError::MissingGazeDirection`] when `play_mode` is VR and
    /// no gaze direction is given. A gaze direction passed with any other play
    /// mode is dropped, since it never reaches the wire.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position: Vec3,
        pitch: f32,
        yaw: f32,
        head_yaw: f32,
        move_vec: Vec2,
        input_flags: InputFlags,
        input_mode: u32,
        play_mode: PlayMode,
        interaction_mode: u32,
        vr_gaze_direction: Option<Vec3>,
        tick: u64,
        delta: Vec3,
    ) -> Result<Self, ConstructionError> {
        let vr_gaze_direction = gaze_for(play_mode, vr_gaze_direction)?;
        Ok(Self {
            position,
            pitch,
            yaw,
            head_yaw,
            move_vec,
            input_flags,
            input_mode,
            interaction_mode,
            tick,
            delta,
            play_mode,
            vr_gaze_direction,
        })
    }

    /// Input with only position, flags and delta set; everything else neutral.
    pub fn movement(position: Vec3, input_flags: InputFlags, delta: Vec3, tick: u64) -> Self {
        Self {
            position,
            pitch: 0.0,
            yaw: 0.0,
            head_yaw: 0.0,
            move_vec: Vec2::default(),
            input_flags,
            input_mode: InputMode::MouseKeyboard.into(),
            interaction_mode: 0,
            tick,
            delta,
            play_mode: PlayMode::Normal,
            vr_gaze_direction: None,
        }
    }

    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    pub fn vr_gaze_direction(&self) -> Option<Vec3> {
        self.vr_gaze_direction
    }

    pub fn input_mode(&self) -> InputMode {
        InputMode::from(self.input_mode)
    }

    /// Change play mode, keeping the gaze invariant.
    pub fn set_play_mode(
        &mut self,
        play_mode: PlayMode,
        vr_gaze_direction: Option<Vec3>,
    ) -> Result<(), ConstructionError> {
        self.vr_gaze_direction = gaze_for(play_mode, vr_gaze_direction)?;
        self.play_mode = play_mode;
        Ok(())
    }
}

fn gaze_for(play_mode: PlayMode, gaze: Option<Vec3>) -> Result<Option<Vec3>, ConstructionError> {
    match (play_mode, gaze) {
        (PlayMode::Vr, None) => Err(ConstructionError::MissingGazeDirection),
        (PlayMode::Vr, Some(gaze)) => Ok(Some(gaze)),
        _ => Ok(None),
    }
}

impl GamePacket for PlayerAuthInputPacket {
    const ID: u32 = ids::PLAYER_AUTH_INPUT;
    const NAME: &'static str = "PlayerAuthInputPacket";

    fn decode_payload(reader: &mut BinaryReader<'_>) -> DecodeResult<Self> {
        let pitch = reader.get_lfloat()?;
        let yaw = reader.get_lfloat()?;
        let position = reader.get_vec3()?;
        let move_vec = Vec2::new(reader.get_lfloat()?, reader.get_lfloat()?);
        let head_yaw = reader.get_lfloat()?;
        let input_flags = InputFlags(reader.get_unsigned_varlong()?);
        let input_mode = reader.get_unsigned_varint()?;
        let play_mode = PlayMode::try_from(reader.get_unsigned_varint()?)?;
        let interaction_mode = reader.get_unsigned_varint()?;
        let vr_gaze_direction = if play_mode == PlayMode::Vr {
            Some(reader.get_vec3()?)
        } else {
            None
        };
        let tick = reader.get_unsigned_varlong()?;
        let delta = reader.get_vec3()?;

        Ok(Self {
            position,
            pitch,
            yaw,
            head_yaw,
            move_vec,
            input_flags,
            input_mode,
            interaction_mode,
            tick,
            delta,
            play_mode,
            vr_gaze_direction,
        })
    }

    fn encode_payload(&self, writer: &mut BinaryWriter) {
        writer.put_lfloat(self.pitch);
        writer.put_lfloat(self.yaw);
        writer.put_vec3(self.position);
        writer.put_lfloat(self.move_vec.x);
        writer.put_lfloat(self.move_vec.z);
        writer.put_lfloat(self.head_yaw);
        writer.put_unsigned_varlong(self.input_flags.0);
        writer.put_unsigned_varint(self.input_mode);
        writer.put_unsigned_varint(self.play_mode as u32);
        writer.put_unsigned_varint(self.interaction_mode);
        if let (PlayMode::Vr, Some(gaze)) = (self.play_mode, self.vr_gaze_direction) {
            writer.put_vec3(gaze);
        }
        writer.put_unsigned_varlong(self.tick);
        writer.put_vec3(self.delta);
    }
}
