use bedrock_protocol_core::config::MovementConfig;
use bedrock_protocol_core::core::math::Vec3;
use bedrock_protocol_core::packets::*;
use bedrock_protocol_core::protocol::{
    decode_packet, ConnectionMovementState, MovementValidator,
};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

#[allow(clippy::unwrap_used)]
fn sample_packets() -> Vec<(&'static str, Packet)> {
    vec![
        (
            "book_edit",
            BookEditPacket::replace_page(0, 3, "lorem ipsum ".repeat(20), "")
                .unwrap()
                .into(),
        ),
        (
            "mob_effect",
            MobEffectPacket::add(42, false, 1, 1, true, 200).into(),
        ),
        (
            "move_player",
            MovePlayerPacket::new(42, Vec3::new(100.5, 64.0, -30.25)).into(),
        ),
        (
            "player_auth_input",
            PlayerAuthInputPacket::movement(
                Vec3::new(100.5, 64.0, -30.25),
                InputFlags::EMPTY.with(InputFlag::Up),
                Vec3::new(0.0, 0.0, 0.2),
                1000,
            )
            .into(),
        ),
    ]
}

fn bench_packet_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_encode_decode");

    for (name, packet) in sample_packets() {
        let bytes = packet.encode();
        let id = packet.id();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_function(format!("encode_{name}"), |b| {
            b.iter(|| black_box(packet.encode()))
        });
        group.bench_function(format!("decode_{name}"), |b| {
            b.iter(|| {
                let decoded = decode_packet(id, black_box(&bytes));
                assert!(decoded.is_ok());
            })
        });
    }
    group.finish();
}

fn bench_validator(c: &mut Criterion) {
    let validator = MovementValidator::new(MovementConfig {
        min_move_interval: std::time::Duration::ZERO,
        ..MovementConfig::default()
    });
    let step = MovePlayerPacket::new(1, Vec3::new(0.0, 64.0, 0.0));
    let jump = PlayerAuthInputPacket::movement(
        Vec3::new(0.0, 64.0, 0.0),
        InputFlags::EMPTY.with(InputFlag::JumpDown),
        Vec3::new(0.0, 1.0, 0.0),
        0,
    );

    c.bench_function("validate_move", |b| {
        b.iter_batched(
            ConnectionMovementState::new,
            |mut state| black_box(validator.check_move(&mut state, &step)),
            BatchSize::SmallInput,
        )
    });
    c.bench_function("validate_auth_input", |b| {
        b.iter_batched(
            ConnectionMovementState::new,
            |mut state| black_box(validator.check_auth_input(&mut state, &jump)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_packet_encode_decode, bench_validator);
criterion_main!(benches);
