#[path = "../common/mod.rs"]
mod common;

use nfc_relay::protocol::{Packet, PacketType, Reassembler};

fn stream_of(packets: &[Packet]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for p in packets {
        bytes.extend(p.encode().unwrap());
    }
    bytes
}

#[test]
fn realistic_session_prefix_byte_by_byte() {
    // The opening exchange of a relay session fed one byte at a time
    let packets = vec![
        Packet::new(PacketType::Ping, vec![0x00]),
        Packet::new(PacketType::Pong, vec![0x01]),
        common::fixtures::sample_descriptor_packet(),
        Packet::new(PacketType::ApduRequest, common::fixtures::select_apdu()),
        Packet::new(PacketType::ApduResponse, common::fixtures::status_ok()),
    ];
    let bytes = stream_of(&packets);

    let mut r = Reassembler::new();
    let mut out = Vec::new();
    for b in bytes {
        out.extend(r.feed(&[b]));
    }
    assert_eq!(out, packets);
}

#[test]
fn uneven_chunk_sizes() {
    let packets = vec![
        Packet::new(PacketType::ApduRequest, vec![1; 40]),
        Packet::new(PacketType::Error, vec![]),
        Packet::new(PacketType::ApduResponse, vec![2; 7]),
    ];
    let bytes = stream_of(&packets);

    for chunk in [1usize, 2, 3, 5, 17, 64] {
        let mut r = Reassembler::new();
        let mut out = Vec::new();
        for piece in bytes.chunks(chunk) {
            out.extend(r.feed(piece));
        }
        assert_eq!(out, packets, "chunk size {chunk}");
    }
}

#[test]
fn machine_is_reusable_across_packets() {
    let mut r = Reassembler::new();
    for i in 0..10u8 {
        let pkt = Packet::new(PacketType::ApduRequest, vec![i; i as usize]);
        let out = r.feed(&pkt.encode().unwrap());
        assert_eq!(out, vec![pkt]);
    }
}
