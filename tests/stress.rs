use bedrock_protocol_core::core::math::Vec3;
use bedrock_protocol_core::packets::*;
use bedrock_protocol_core::protocol::decode_packet;

#[test]
fn stress_mixed_packet_series() {
    // heavy burst of every kind; no panics, every frame decodes back
    let frames: Vec<Packet> = vec![
        BookEditPacket::replace_page(0, 12, "x".repeat(256), "photo")
            .unwrap()
            .into(),
        BookEditPacket::sign_book(3, "Title", "Author", "2535412345").into(),
        MobEffectPacket::add(99, false, 14, 2, true, 600).into(),
        MovePlayerPacket::new(7, Vec3::new(-120.5, 70.0, 3000.25))
            .with_mode(MoveMode::Teleport { cause: 1, item: 0 })
            .into(),
        PlayerAuthInputPacket::movement(
            Vec3::new(1.0, 2.0, 3.0),
            InputFlags::EMPTY.with(InputFlag::Sprinting),
            Vec3::new(0.1, 0.0, 0.1),
            123_456,
        )
        .into(),
    ];

    for _ in 0..20_000 {
        for packet in &frames {
            let bytes = packet.encode();
            let decoded = decode_packet(packet.id(), &bytes);
            assert!(decoded.is_ok());
        }
    }
}
