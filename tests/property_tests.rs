//! Property-based tests using proptest
//!
//! These tests check codec and validator invariants across randomly
//! generated packets and byte strings.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bedrock_protocol_core::config::MovementConfig;
use bedrock_protocol_core::core::binary::{BinaryReader, BinaryWriter};
use bedrock_protocol_core::core::math::{Vec2, Vec3};
use bedrock_protocol_core::packets::*;
use bedrock_protocol_core::protocol::{
    decode_packet, ConnectionMovementState, MovementValidator, TerminationReason, Verdict,
};
use bedrock_protocol_core::utils::ManualClock;
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn finite() -> impl Strategy<Value = f32> {
    -1.0e6f32..1.0e6f32
}

fn vec3() -> impl Strategy<Value = Vec3> {
    (finite(), finite(), finite()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn play_mode() -> impl Strategy<Value = PlayMode> {
    (0u32..=8).prop_map(|v| PlayMode::try_from(v).unwrap())
}

fn move_mode() -> impl Strategy<Value = MoveMode> {
    prop_oneof![
        Just(MoveMode::Normal),
        Just(MoveMode::Reset),
        Just(MoveMode::PitchOnly),
        (any::<i32>(), any::<i32>()).prop_map(|(cause, item)| MoveMode::Teleport { cause, item }),
    ]
}

// Property: varints decode back to the value that was written
proptest! {
    #[test]
    fn prop_varint_roundtrip(unsigned in any::<u32>(), signed in any::<i32>(), long in any::<u64>(), slong in any::<i64>()) {
        let mut writer = BinaryWriter::new();
        writer.put_unsigned_varint(unsigned);
        writer.put_varint(signed);
        writer.put_unsigned_varlong(long);
        writer.put_varlong(slong);

        let mut reader = BinaryReader::new(writer.as_slice());
        prop_assert_eq!(reader.get_unsigned_varint().unwrap(), unsigned);
        prop_assert_eq!(reader.get_varint().unwrap(), signed);
        prop_assert_eq!(reader.get_unsigned_varlong().unwrap(), long);
        prop_assert_eq!(reader.get_varlong().unwrap(), slong);
        prop_assert_eq!(reader.remaining(), 0);
    }
}

// Property: arbitrary bytes never panic any decoder
proptest! {
    #[test]
    fn prop_decode_never_panics(id in prop::sample::select(vec![ids::BOOK_EDIT, ids::MOB_EFFECT, ids::MOVE_PLAYER, ids::PLAYER_AUTH_INPUT]),
                                data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode_packet(id, &data);
    }
}

// Property: move packets survive encode/decode in every mode
proptest! {
    #[test]
    fn prop_move_player_roundtrip(eid in any::<u64>(), pos in vec3(), mode in move_mode(),
                                  on_ground in any::<bool>(), tick in any::<u64>()) {
        let packet = MovePlayerPacket::new(eid, pos)
            .with_rotation(10.0, 20.0, 30.0)
            .with_mode(mode)
            .with_on_ground(on_ground)
            .with_tick(tick);
        let decoded = decode_packet(ids::MOVE_PLAYER, &packet.encode()).unwrap();
        prop_assert_eq!(decoded, Packet::MovePlayer(packet));
    }
}

// Property: the gaze vector is on the wire exactly when play mode is VR
proptest! {
    #[test]
    fn prop_auth_input_gaze_layout(pos in vec3(), gaze in vec3(), mode in play_mode(),
                                   flags in any::<u64>(), tick in any::<u64>()) {
        let packet = PlayerAuthInputPacket::new(
            pos, 0.0, 0.0, 0.0, Vec2::default(), InputFlags(flags),
            1, mode, 0, Some(gaze), tick, Vec3::ZERO,
        ).unwrap();
        let decoded = PlayerAuthInputPacket::decode(&packet.encode()).unwrap();

        prop_assert_eq!(decoded.play_mode(), mode);
        prop_assert_eq!(decoded.vr_gaze_direction().is_some(), mode == PlayMode::Vr);
        prop_assert_eq!(decoded, packet);
    }
}

// Property: encoded strings never exceed their limit and stay valid UTF-8
proptest! {
    #[test]
    fn prop_page_text_truncation(text in "\\PC{0,400}") {
        let packet = BookEditPacket::replace_page(0, 1, text.clone(), "").unwrap();
        let decoded = BookEditPacket::decode(&packet.encode()).unwrap();
        match decoded.action {
            BookEditAction::ReplacePage { text: decoded_text, .. } => {
                prop_assert!(decoded_text.len() <= book_edit::MAX_PAGE_TEXT_LENGTH);
                prop_assert!(text.starts_with(&decoded_text));
            }
            other => prop_assert!(false, "unexpected action {:?}", other),
        }
    }
}

// Property: any coordinate beyond the bound terminates, anything inside is accepted
proptest! {
    #[test]
    fn prop_bounds_rule(inside in -29_999_998.0f32..29_999_998.0f32,
                        outside in 30_000_002.0f32..1.0e9f32,
                        axis in 0usize..3, negative in any::<bool>()) {
        let validator = MovementValidator::default();
        let mut coords = [inside, 0.0, 0.0];
        let mut state = ConnectionMovementState::new();
        let packet = MovePlayerPacket::new(1, Vec3::new(coords[0], coords[1], coords[2]));
        prop_assert_eq!(validator.check_move(&mut state, &packet), Verdict::Accept);

        coords[axis] = if negative { -outside } else { outside };
        let mut state = ConnectionMovementState::new();
        let packet = MovePlayerPacket::new(1, Vec3::new(coords[0], coords[1], coords[2]));
        prop_assert_eq!(
            validator.check_move(&mut state, &packet),
            Verdict::Terminate(TerminationReason::InvalidPosition)
        );
    }
}

// Property: step-ups never count toward the jump limit
proptest! {
    #[test]
    fn prop_slab_steps_never_counted(rises in prop::collection::vec(0.0001f32..=0.6f32, 1..700)) {
        let clock = ManualClock::new();
        let validator = MovementValidator::with_clock(MovementConfig::default(), Arc::new(clock.clone()));
        let mut state = ConnectionMovementState::new();
        for rise in rises {
            let packet = PlayerAuthInputPacket::movement(
                Vec3::ZERO,
                InputFlags::EMPTY.with(InputFlag::JumpDown),
                Vec3::new(0.0, rise, 0.0),
                0,
            );
            prop_assert_eq!(validator.check_auth_input(&mut state, &packet), Verdict::Accept);
            clock.advance(Duration::from_millis(1));
        }
        prop_assert_eq!(state.jump_count(), 0);
    }
}
