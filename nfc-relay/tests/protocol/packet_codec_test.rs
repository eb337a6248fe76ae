#[path = "../common/mod.rs"]
mod common;

use nfc_relay::protocol::{Packet, PacketType};
use nfc_relay::Error;

#[test]
fn descriptor_packet_roundtrips() {
    let pkt = common::fixtures::sample_descriptor_packet();
    let wire = pkt.encode().unwrap();
    assert_eq!(Packet::decode(&wire).unwrap(), pkt);
}

#[test]
fn wire_layout_is_type_length_payload() {
    let pkt = Packet::new(PacketType::ApduRequest, common::fixtures::select_apdu());
    let wire = pkt.encode().unwrap();
    assert_eq!(wire[0], 0x63);
    assert_eq!(wire[1] as usize, common::fixtures::select_apdu().len());
    assert_eq!(&wire[2..], &common::fixtures::select_apdu()[..]);
}

#[test]
fn max_payload_boundary() {
    let pkt = Packet::new(PacketType::ApduResponse, vec![0x5a; 255]);
    let wire = pkt.encode().unwrap();
    assert_eq!(wire.len(), 257);
    assert_eq!(Packet::decode(&wire).unwrap(), pkt);

    let too_big = Packet::new(PacketType::ApduResponse, vec![0x5a; 256]);
    assert!(matches!(
        too_big.encode(),
        Err(Error::PayloadTooLarge { .. })
    ));
}

#[test]
fn hex_crate_fixture_decodes() {
    // A Ping carrying Role=Card, written out as hex
    let wire = hex::decode("600101").unwrap();
    let pkt = Packet::decode(&wire).unwrap();
    assert_eq!(pkt.packet_type, PacketType::Ping);
    assert_eq!(pkt.payload, vec![0x01]);
}
