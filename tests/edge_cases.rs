#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case tests for the packet codecs and the dispatch pipeline
//! Covers malformed frames, conditional layouts, and validator boundaries

use bedrock_protocol_core::core::binary::BinaryWriter;
use bedrock_protocol_core::core::math::{Vec2, Vec3};
use bedrock_protocol_core::error::{ConstructionError, DecodeError};
use bedrock_protocol_core::packets::book_edit::{
    MAX_AUTHOR_LENGTH, MAX_PAGE_TEXT_LENGTH, MAX_TITLE_LENGTH,
};
use bedrock_protocol_core::packets::*;
use bedrock_protocol_core::protocol::{decode_packet, PacketRegistry};

// ============================================================================
// FRAME-LEVEL EDGE CASES
// ============================================================================

#[test]
fn test_empty_payload_rejected_for_every_kind() {
    for id in [
        ids::BOOK_EDIT,
        ids::MOB_EFFECT,
        ids::MOVE_PLAYER,
        ids::PLAYER_AUTH_INPUT,
    ] {
        let result = decode_packet(id, &[]);
        assert!(
            matches!(result, Err(DecodeError::Truncated { .. })),
            "0x{id:02X} accepted an empty payload: {result:?}"
        );
    }
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut payload = MobEffectPacket::remove(1, 4).encode().to_vec();
    payload.push(0);

    assert_eq!(
        decode_packet(ids::MOB_EFFECT, &payload),
        Err(DecodeError::TrailingBytes {
            packet: MobEffectPacket::NAME,
            remaining: 1
        })
    );
}

#[test]
fn test_every_truncation_of_a_valid_frame_fails() {
    let payload = PlayerAuthInputPacket::movement(
        Vec3::new(10.0, 64.0, -3.0),
        InputFlags::EMPTY.with(InputFlag::Up),
        Vec3::new(0.0, 0.1, 0.2),
        77,
    )
    .encode();

    for cut in 0..payload.len() {
        assert!(
            decode_packet(ids::PLAYER_AUTH_INPUT, &payload[..cut]).is_err(),
            "prefix of {cut} bytes decoded"
        );
    }
    assert!(decode_packet(ids::PLAYER_AUTH_INPUT, &payload).is_ok());
}

#[test]
fn test_registry_rejects_unknown_ids() {
    let registry = PacketRegistry::standard();
    for id in [0x00, 0x01, 0x14, 0x62, 0x8f, 0x91, u32::MAX] {
        assert_eq!(
            registry.decode(id, &[0; 8]),
            Err(DecodeError::UnsupportedPacket(id))
        );
    }
}

// ============================================================================
// BOOK EDIT
// ============================================================================

#[test]
fn test_unknown_book_edit_kind() {
    assert_eq!(
        decode_packet(ids::BOOK_EDIT, &[9, 0]),
        Err(DecodeError::InvalidDiscriminant {
            kind: "book edit type",
            value: 9
        })
    );
}

#[test]
fn test_page_number_boundary_on_decode() {
    // DeletePage, slot 0, page N
    assert!(decode_packet(ids::BOOK_EDIT, &[2, 0, 49]).is_ok());
    assert_eq!(
        decode_packet(ids::BOOK_EDIT, &[2, 0, 50]),
        Err(DecodeError::PageOutOfRange { page: 50 })
    );
}

#[test]
fn test_page_number_boundary_on_construction() {
    assert!(BookEditPacket::swap_pages(0, 0, 49).is_ok());
    assert_eq!(
        BookEditPacket::swap_pages(0, 50, 1),
        Err(ConstructionError::PageOutOfRange(50))
    );
}

#[test]
fn test_page_text_boundary() {
    let mut writer = BinaryWriter::new();
    writer.put_byte(BookEditKind::ReplacePage as u8);
    writer.put_byte(0);
    writer.put_byte(3);
    writer.put_string(&"a".repeat(MAX_PAGE_TEXT_LENGTH + 1));
    writer.put_string("");

    assert!(matches!(
        decode_packet(ids::BOOK_EDIT, writer.as_slice()),
        Err(DecodeError::StringTooLong { field: "page text", len: 257, max: 256 })
    ));
}

fn sign_book_payload(title: &str, author: &str) -> Vec<u8> {
    let mut writer = BinaryWriter::new();
    writer.put_byte(BookEditKind::SignBook as u8);
    writer.put_byte(0);
    writer.put_string(title);
    writer.put_string(author);
    writer.put_string("2535412345");
    writer.as_slice().to_vec()
}

#[test]
fn test_title_and_author_boundary_on_decode() {
    let at_limit = sign_book_payload(
        &"t".repeat(MAX_TITLE_LENGTH),
        &"a".repeat(MAX_AUTHOR_LENGTH),
    );
    match decode_packet(ids::BOOK_EDIT, &at_limit).unwrap() {
        Packet::BookEdit(BookEditPacket {
            action: BookEditAction::SignBook { title, author, .. },
            ..
        }) => {
            assert_eq!(title.len(), 32);
            assert_eq!(author.len(), 32);
        }
        other => panic!("unexpected packet {other:?}"),
    }

    assert_eq!(
        decode_packet(ids::BOOK_EDIT, &sign_book_payload(&"t".repeat(33), "Steve")),
        Err(DecodeError::StringTooLong {
            field: "title",
            len: 33,
            max: 32
        })
    );
    assert_eq!(
        decode_packet(ids::BOOK_EDIT, &sign_book_payload("Diary", &"a".repeat(33))),
        Err(DecodeError::StringTooLong {
            field: "author",
            len: 33,
            max: 32
        })
    );
}

#[test]
fn test_overlong_strings_truncated_on_encode() {
    let title = "é".repeat(MAX_TITLE_LENGTH); // 64 bytes
    let packet = BookEditPacket::sign_book(1, title, "Alex", "12345");
    let decoded = BookEditPacket::decode(&packet.encode()).unwrap();

    match decoded.action {
        BookEditAction::SignBook { title, author, .. } => {
            assert_eq!(title.len(), MAX_TITLE_LENGTH);
            assert!(title.chars().all(|c| c == 'é'));
            assert_eq!(author, "Alex");
        }
        other => panic!("unexpected action {other:?}"),
    }
}

#[test]
fn test_invalid_utf8_rejected() {
    let payload = [
        BookEditKind::SignBook as u8,
        0,
        2,
        0xff,
        0xfe,
        0,
        0,
    ];
    assert_eq!(
        decode_packet(ids::BOOK_EDIT, &payload),
        Err(DecodeError::InvalidUtf8)
    );
}

// ============================================================================
// MOB EFFECT
// ============================================================================

#[test]
fn test_unknown_mob_effect_event() {
    let mut writer = BinaryWriter::new();
    writer.put_entity_runtime_id(1);
    writer.put_byte(0);
    assert!(matches!(
        decode_packet(ids::MOB_EFFECT, writer.as_slice()),
        Err(DecodeError::InvalidDiscriminant {
            kind: "mob effect event",
            value: 0
        })
    ));
}

#[test]
fn test_negative_effect_fields_survive() {
    let packet = MobEffectPacket::add(u64::MAX, true, -1, i32::MIN, false, i32::MAX).with_tick(9);
    let decoded = decode_packet(ids::MOB_EFFECT, &packet.encode()).unwrap();
    assert_eq!(decoded, Packet::MobEffect(packet));
}

// ============================================================================
// MOVE PLAYER
// ============================================================================

#[test]
fn test_teleport_fields_only_for_teleport_mode() {
    let normal = MovePlayerPacket::new(5, Vec3::new(1.0, 2.0, 3.0));
    let teleport = normal
        .clone()
        .with_mode(MoveMode::Teleport { cause: 2, item: 368 });

    let normal_len = normal.encode().len();
    let teleport_bytes = teleport.encode();
    assert_eq!(teleport_bytes.len(), normal_len + 8);

    let decoded = MovePlayerPacket::decode(&teleport_bytes).unwrap();
    assert_eq!(decoded.mode, MoveMode::Teleport { cause: 2, item: 368 });
}

#[test]
fn test_unknown_move_mode() {
    let mut bytes = MovePlayerPacket::new(1, Vec3::ZERO).encode().to_vec();
    // entity id (1 byte) + position (12) + rotation (12) puts mode at 25
    bytes[25] = 7;
    assert_eq!(
        decode_packet(ids::MOVE_PLAYER, &bytes),
        Err(DecodeError::InvalidDiscriminant {
            kind: "move mode",
            value: 7
        })
    );
}

// ============================================================================
// PLAYER AUTH INPUT
// ============================================================================

fn input(play_mode: PlayMode, gaze: Option<Vec3>) -> Result<PlayerAuthInputPacket, ConstructionError> {
    PlayerAuthInputPacket::new(
        Vec3::new(0.0, 64.0, 0.0),
        0.0,
        90.0,
        90.0,
        Vec2::new(0.0, 1.0),
        InputFlags::EMPTY,
        InputMode::Touch.into(),
        play_mode,
        0,
        gaze,
        1,
        Vec3::ZERO,
    )
}

#[test]
fn test_vr_requires_gaze() {
    assert_eq!(
        input(PlayMode::Vr, None).unwrap_err(),
        ConstructionError::MissingGazeDirection
    );
}

#[test]
fn test_gaze_dropped_outside_vr() {
    let packet = input(PlayMode::Screen, Some(Vec3::new(0.0, 0.0, 1.0))).unwrap();
    assert_eq!(packet.vr_gaze_direction(), None);

    let plain = input(PlayMode::Screen, None).unwrap();
    assert_eq!(packet.encode(), plain.encode());
}

#[test]
fn test_vr_layout_carries_gaze() {
    let gaze = Vec3::new(0.25, -0.5, 0.75);
    let vr = input(PlayMode::Vr, Some(gaze)).unwrap();
    let normal = input(PlayMode::Normal, None).unwrap();

    let bytes = vr.encode();
    assert_eq!(bytes.len(), normal.encode().len() + 12);

    let decoded = PlayerAuthInputPacket::decode(&bytes).unwrap();
    assert_eq!(decoded.play_mode(), PlayMode::Vr);
    assert_eq!(decoded.vr_gaze_direction(), Some(gaze));
}

#[test]
fn test_unknown_play_mode_rejected() {
    let mut writer = BinaryWriter::new();
    for _ in 0..8 {
        writer.put_lfloat(0.0);
    }
    writer.put_unsigned_varlong(0);
    writer.put_unsigned_varint(1);
    writer.put_unsigned_varint(9);

    assert_eq!(
        decode_packet(ids::PLAYER_AUTH_INPUT, writer.as_slice()),
        Err(DecodeError::InvalidDiscriminant {
            kind: "play mode",
            value: 9
        })
    );
}

#[test]
fn test_unknown_input_mode_kept_raw() {
    let mut packet = input(PlayMode::Normal, None).unwrap();
    packet.input_mode = 42;
    let decoded = PlayerAuthInputPacket::decode(&packet.encode()).unwrap();
    assert_eq!(decoded.input_mode, 42);
    assert_eq!(decoded.input_mode(), InputMode::Other(42));
}

#[test]
fn test_input_flags_high_bits_survive() {
    let flags: InputFlags = [InputFlag::JumpDown, InputFlag::PersistSneak]
        .into_iter()
        .collect();
    let packet =
        PlayerAuthInputPacket::movement(Vec3::ZERO, InputFlags(flags.0 | 1 << 50), Vec3::ZERO, 0);
    let decoded = PlayerAuthInputPacket::decode(&packet.encode()).unwrap();
    assert!(decoded.input_flags.is_jumping());
    assert!(decoded.input_flags.contains(InputFlag::PersistSneak));
    assert_eq!(decoded.input_flags.0 >> 50 & 1, 1);
}
