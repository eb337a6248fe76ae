#[path = "../common/mod.rs"]
mod common;

use std::convert::TryFrom;

use nfc_relay::protocol::descriptor;
use nfc_relay::{CardIdentity, Error, Uid};

#[test]
fn sample_identity_roundtrips() {
    let id = common::fixtures::sample_identity();
    let wire = descriptor::serialize(&id).unwrap();
    assert_eq!(descriptor::deserialize(&wire).unwrap(), id);
}

#[test]
fn uid_lengths_four_through_seven() {
    for len in 4..=7usize {
        let uid_bytes: Vec<u8> = (0..len as u8).map(|i| 0x10 + i).collect();
        let id = CardIdentity::new(
            Uid::try_from(&uid_bytes[..]).unwrap(),
            [0x44, 0x00],
            0x28,
            vec![0xaa; len],
        );
        let wire = descriptor::serialize(&id).unwrap();
        let back = descriptor::deserialize(&wire).unwrap();
        assert_eq!(back, id, "uid length {len}");
        assert_eq!(back.uid.len(), len);
    }
}

#[test]
fn corrupt_record_is_never_partially_applied() {
    let id = common::fixtures::sample_identity();
    let mut wire = descriptor::serialize(&id).unwrap();
    // Declared tail no longer matches the byte count
    wire.pop();
    match descriptor::deserialize(&wire) {
        Err(Error::SizeMismatch { .. }) => {}
        other => panic!("expected SizeMismatch, got: {:?}", other),
    }
}

#[test]
fn every_truncation_is_rejected() {
    let id = common::fixtures::sample_identity();
    let wire = descriptor::serialize(&id).unwrap();
    for cut in 0..wire.len() {
        assert!(
            descriptor::deserialize(&wire[..cut]).is_err(),
            "truncation to {cut} bytes must fail"
        );
    }
}
