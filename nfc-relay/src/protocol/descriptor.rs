// nfc-relay/src/protocol/descriptor.rs

//! Flat binary record carrying the real card's identity across the link.
//!
//! Layout: `[uid_len:1][uid:7 zero-padded][atqa:2][sak:1][ats_len:2 LE]`
//! followed by `ats_len` historical/ATS bytes. The total record length
//! must equal the fixed header plus the declared tail; anything else is a
//! corrupt descriptor and must be dropped, never partially applied.

use std::convert::TryFrom;

use crate::constants::{DESCRIPTOR_HEADER_LEN, DESCRIPTOR_MAX_ATS_LEN, UID_MAX_LEN, UID_MIN_LEN};
use crate::types::{CardIdentity, Uid};
use crate::{Error, Result};

/// Serialize an identity into the flat record.
pub fn serialize(identity: &CardIdentity) -> Result<Vec<u8>> {
    if identity.ats.len() > DESCRIPTOR_MAX_ATS_LEN {
        return Err(Error::PayloadTooLarge {
            actual: DESCRIPTOR_HEADER_LEN + identity.ats.len(),
            max: DESCRIPTOR_HEADER_LEN + DESCRIPTOR_MAX_ATS_LEN,
        });
    }
    let mut out = Vec::with_capacity(DESCRIPTOR_HEADER_LEN + identity.ats.len());
    out.push(identity.uid.len() as u8);
    out.extend_from_slice(identity.uid.padded());
    out.extend_from_slice(&identity.atqa);
    out.push(identity.sak);
    out.extend_from_slice(&(identity.ats.len() as u16).to_le_bytes());
    out.extend_from_slice(&identity.ats);
    Ok(out)
}

/// Deserialize the flat record, validating the declared sizes before
/// anything is applied.
pub fn deserialize(bytes: &[u8]) -> Result<CardIdentity> {
    if bytes.len() < DESCRIPTOR_HEADER_LEN {
        return Err(Error::SizeMismatch {
            expected: DESCRIPTOR_HEADER_LEN,
            actual: bytes.len(),
        });
    }

    // Only single (4) and double (7) size UIDs are valid on the wire
    let uid_len = bytes[0] as usize;
    if uid_len < UID_MIN_LEN || uid_len > UID_MAX_LEN {
        return Err(Error::SizeMismatch {
            expected: UID_MAX_LEN,
            actual: uid_len,
        });
    }

    let ats_len = u16::from_le_bytes([bytes[11], bytes[12]]) as usize;
    let expected = DESCRIPTOR_HEADER_LEN + ats_len;
    if bytes.len() != expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }

    let uid = Uid::try_from(&bytes[1..1 + uid_len])?;
    let atqa = [bytes[8], bytes[9]];
    let sak = bytes[10];
    let ats = bytes[DESCRIPTOR_HEADER_LEN..].to_vec();

    Ok(CardIdentity::new(uid, atqa, sak, ats))
}
