#[path = "../common/mod.rs"]
mod common;

use std::time::{Duration, Instant};

use serial_test::serial;

use nfc_relay::nfc::mock::MockCardEmulator;
use nfc_relay::protocol::{check_crc_a, descriptor};
use nfc_relay::test_support::mock_link_pair;
use nfc_relay::{CardWorker, PacketType, RelayLink, Role};

fn settle_peer(peer: &mut RelayLink) {
    for _ in 0..50 {
        if peer.wait_for_pong(Role::Card, Role::Reader).unwrap() {
            return;
        }
    }
    panic!("card worker never announced itself");
}

fn wait_until(deadline_ms: u64, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(deadline_ms);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
#[serial]
fn corrupt_descriptor_does_not_start_emulation() {
    common::init_logs();
    let (mut peer, card_link) = mock_link_pair().unwrap();
    let emulator = MockCardEmulator::new();
    let (handle, _events) = CardWorker::spawn(card_link, emulator.clone());

    settle_peer(&mut peer);

    // Tail declares more bytes than are present
    let mut record = descriptor::serialize(&common::fixtures::sample_identity()).unwrap();
    record.pop();
    peer.send_with_payload(PacketType::DeviceDescriptor, &record)
        .unwrap();

    assert!(
        !wait_until(400, || emulator.is_started()),
        "corrupt descriptor must not start emulation"
    );

    // A well-formed record afterwards still gets the worker going
    let record = descriptor::serialize(&common::fixtures::sample_identity()).unwrap();
    peer.send_with_payload(PacketType::DeviceDescriptor, &record)
        .unwrap();
    assert!(wait_until(2000, || emulator.is_started()));
    assert_eq!(
        emulator.identity(),
        Some(common::fixtures::sample_identity())
    );

    handle.stop();
}

#[test]
#[serial]
fn scripted_reader_sequence_relays_one_apdu() {
    common::init_logs();
    let (mut peer, card_link) = mock_link_pair().unwrap();
    let emulator = MockCardEmulator::new();
    let (handle, _events) = CardWorker::spawn(card_link, emulator.clone());

    settle_peer(&mut peer);
    let record = descriptor::serialize(&common::fixtures::sample_identity()).unwrap();
    peer.send_with_payload(PacketType::DeviceDescriptor, &record)
        .unwrap();
    assert!(wait_until(2000, || emulator.is_started()));

    // Real reader sends the SELECT I-block; the emulated card stalls
    let stall = emulator
        .exchange(&common::fixtures::select_i_block())
        .expect("no answer to I-block");
    assert_eq!(stall, vec![0xf2, 0x01]);

    // The captured APDU crosses the link exactly once
    let mut request = None;
    for _ in 0..50 {
        if let Some(p) = peer.wait_for_packet(PacketType::ApduRequest).unwrap() {
            request = Some(p);
            break;
        }
    }
    assert_eq!(
        request.expect("request never forwarded").payload,
        common::fixtures::select_apdu()
    );

    // Impatient reader: NACK retry and a repeated I-block while the
    // answer is outstanding. Both are absorbed locally.
    assert_eq!(emulator.exchange(&[0xb2]), Some(vec![0xf2, 0x01]));
    assert_eq!(emulator.exchange(&common::fixtures::select_i_block()), None);

    // Peer answers; the next WTX acknowledgments deliver the I-block
    peer.send_with_payload(PacketType::ApduResponse, &common::fixtures::status_ok())
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(2);
    let response = loop {
        assert!(Instant::now() < deadline, "answer never delivered");
        match emulator.exchange(&[0xf2, 0x01]) {
            Some(block) if block[0] == 0x02 => break block,
            Some(block) => assert_eq!(block, vec![0xf2, 0x01]),
            None => panic!("WTX ack ignored"),
        }
        std::thread::sleep(Duration::from_millis(5));
    };
    assert_eq!(&response[1..3], &[0x90, 0x00]);
    assert!(check_crc_a(&response));

    // The repeated I-block earlier must not have produced a second request
    assert!(peer
        .wait_for_packet(PacketType::ApduRequest)
        .unwrap()
        .is_none());

    handle.stop();
    assert!(!emulator.is_started(), "stop must end the emulation");
}
