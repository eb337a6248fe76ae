#[path = "../common/mod.rs"]
mod common;

use std::time::{Duration, Instant};

use serial_test::serial;

use nfc_relay::nfc::mock::{MockCardEmulator, MockCardReader};
use nfc_relay::protocol::check_crc_a;
use nfc_relay::test_support::mock_link_pair;
use nfc_relay::{CardWorker, ReaderWorker};

// Full relay scenario over one mock serial wire: the reader-side unit
// finds the real card, ships its descriptor, and the card-side unit
// emulates it; one SELECT APDU crosses the link and its 90 00 answer
// comes back to the real reader as a CRC-terminated I-block.
#[test]
#[serial]
fn select_apdu_crosses_the_relay() {
    common::init_logs();

    let (reader_link, card_link) = mock_link_pair().unwrap();

    let mut real_card = MockCardReader::new();
    real_card.push_detection(Some(common::fixtures::sample_identity()));
    real_card.push_response(Ok(common::fixtures::status_ok()));

    let emulator = MockCardEmulator::new();

    let (reader_handle, _reader_events) = ReaderWorker::spawn(reader_link, real_card);
    let (card_handle, _card_events) = CardWorker::spawn(card_link, emulator.clone());

    // Handshake and descriptor transfer happen between the two workers;
    // the test only waits for the emulation to come up
    let deadline = Instant::now() + Duration::from_secs(5);
    while !emulator.is_started() {
        assert!(Instant::now() < deadline, "emulation never started");
        std::thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(
        emulator.identity(),
        Some(common::fixtures::sample_identity())
    );

    // The real reader opens with a SELECT I-block and gets stalled
    let stall = emulator
        .exchange(&common::fixtures::select_i_block())
        .expect("no answer to I-block");
    assert_eq!(stall, vec![0xf2, 0x01]);

    // Acknowledge the WTX until the relayed answer arrives
    let deadline = Instant::now() + Duration::from_secs(5);
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

    card_handle.stop();
    reader_handle.stop();
}
