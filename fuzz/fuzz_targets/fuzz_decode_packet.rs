#![no_main]

use bedrock_protocol_core::protocol::decode_packet;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // first byte picks the packet kind, the rest is the payload
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };
    let id = match selector % 4 {
        0 => 0x13,
        1 => 0x1c,
        2 => 0x61,
        _ => 0x90,
    };

    if let Ok(packet) = decode_packet(id, payload) {
        // anything that decodes must re-encode and decode to the same value
        let encoded = packet.encode();
        let again = decode_packet(id, &encoded);
        assert!(again.is_ok());
    }
});
