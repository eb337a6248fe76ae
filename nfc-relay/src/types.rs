// nfc-relay/src/types.rs

use crate::constants::{UID_MAX_LEN, UID_MIN_LEN};
use crate::Error;
use derive_more::Display;
use std::convert::TryFrom;

/// ISO14443A UID held in a fixed buffer, up to 7 significant bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uid {
    bytes: [u8; UID_MAX_LEN],
    len: u8,
}

impl Uid {
    /// Number of significant UID bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True for the (invalid on the wire) zero-length UID.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Significant bytes only.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Full fixed-size backing buffer, zero padded past `len`.
    pub fn padded(&self) -> &[u8; UID_MAX_LEN] {
        &self.bytes
    }

    /// Lowercase hex rendering for logs and display.
    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(self.as_bytes())
    }
}

impl TryFrom<&[u8]> for Uid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        // ISO14443A single (4) and double (7) size UIDs; triple-size does
        // not fit the descriptor record.
        if bytes.len() < UID_MIN_LEN || bytes.len() > UID_MAX_LEN {
            return Err(Error::InvalidLength {
                expected: UID_MAX_LEN,
                actual: bytes.len(),
            });
        }
        let mut buf = [0u8; UID_MAX_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            bytes: buf,
            len: bytes.len() as u8,
        })
    }
}

/// Anticollision/protocol parameters of the card currently being
/// represented. Read from the real card on the reader side, or received
/// from the peer to drive emulation on the card side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardIdentity {
    /// Card UID.
    pub uid: Uid,
    /// ATQA bytes as sent during selection.
    pub atqa: [u8; 2],
    /// SAK byte.
    pub sak: u8,
    /// Historical/ATS tail, variable length.
    pub ats: Vec<u8>,
}

impl CardIdentity {
    /// Build an identity; the ATS tail may be empty.
    pub fn new(uid: Uid, atqa: [u8; 2], sak: u8, ats: Vec<u8>) -> Self {
        Self {
            uid,
            atqa,
            sak,
            ats,
        }
    }
}

/// Which half of the relay this unit is acting as.
#[repr(u8)]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Talks to the real card.
    Reader = 0,
    /// Emulates the card toward the real reader.
    Card = 1,
}

impl Role {
    /// One-byte wire form carried inside Ping/Pong payloads.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Parse the wire byte.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Role::Reader),
            1 => Some(Role::Card),
            _ => None,
        }
    }

    /// The role the peer unit must be running.
    pub fn complement(self) -> Self {
        match self {
            Role::Reader => Role::Card,
            Role::Card => Role::Reader,
        }
    }
}
