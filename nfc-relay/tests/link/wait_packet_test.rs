#[path = "../common/mod.rs"]
mod common;

use nfc_relay::test_support::mock_link_pair;
use nfc_relay::{Packet, PacketType, RelayLink};

fn recv(link: &mut RelayLink, target: PacketType) -> Option<Packet> {
    for _ in 0..40 {
        if let Some(p) = link.wait_for_packet(target).unwrap() {
            return Some(p);
        }
    }
    None
}

#[test]
fn only_the_requested_type_is_returned() {
    let (mut reader, mut card) = mock_link_pair().unwrap();
    reader
        .send_with_payload(PacketType::ApduRequest, &common::fixtures::select_apdu())
        .unwrap();
    let pkt = recv(&mut card, PacketType::ApduRequest).expect("request lost");
    assert_eq!(pkt.payload, common::fixtures::select_apdu());
}

#[test]
fn mismatched_packet_is_dropped_not_requeued() {
    let (mut reader, mut card) = mock_link_pair().unwrap();
    reader.send_no_payload(PacketType::Error).unwrap();

    // Each wait attempt spans the packet's arrival, so the mismatching
    // Error packet is popped and discarded here
    for _ in 0..3 {
        assert!(card
            .wait_for_packet(PacketType::ApduRequest)
            .unwrap()
            .is_none());
    }

    // A later wait for the Error packet must not see it again
    assert!(card.wait_for_packet(PacketType::Error).unwrap().is_none());

    // The link itself still works for the next in-order packet
    reader
        .send_with_payload(PacketType::ApduResponse, &common::fixtures::status_ok())
        .unwrap();
    let pkt = recv(&mut card, PacketType::ApduResponse).expect("response lost");
    assert_eq!(pkt.payload, common::fixtures::status_ok());
}

#[test]
fn empty_queue_returns_none_promptly() {
    let (_reader, mut card) = mock_link_pair().unwrap();
    assert!(card
        .wait_for_packet(PacketType::ApduRequest)
        .unwrap()
        .is_none());
}
