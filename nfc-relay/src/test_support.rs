// nfc-relay/src/test_support.rs

//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize common mock wiring so tests across the crate
//! and tests/ directory can reuse the same logic.
#![allow(dead_code)]

use std::convert::TryFrom;

use crate::link::RelayLink;
use crate::transport::{MockSerialLink, TransportChannel};
use crate::types::{CardIdentity, Role, Uid};
use crate::Result;

/// A cross-connected pair of relay links, reader end first.
#[doc(hidden)]
pub fn mock_link_pair() -> Result<(RelayLink, RelayLink)> {
    let (a, b) = MockSerialLink::pair();
    let reader = RelayLink::new(TransportChannel::open(Box::new(a))?, Role::Reader);
    let card = RelayLink::new(TransportChannel::open(Box::new(b))?, Role::Card);
    Ok((reader, card))
}

/// The 4-byte-UID identity used throughout the tests.
#[doc(hidden)]
pub fn sample_identity() -> CardIdentity {
    CardIdentity::new(
        Uid::try_from(&[0x04, 0xaa, 0xbb, 0xcc][..]).unwrap(),
        [0x04, 0x00],
        0x20,
        vec![0x78, 0x80, 0x70, 0x02],
    )
}

/// A double-size (7-byte) UID identity with an empty ATS tail.
#[doc(hidden)]
pub fn sample_identity_7b() -> CardIdentity {
    CardIdentity::new(
        Uid::try_from(&[0x04, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66][..]).unwrap(),
        [0x44, 0x00],
        0x20,
        Vec::new(),
    )
}
