// nfc-relay/src/protocol/packet.rs

use crate::constants::{MAX_PAYLOAD_LEN, PACKET_HEADER_LEN};
use crate::{Error, Result};

/// Closed set of relay packet types.
/// Wire format of every packet: `[type: 1][length: 1][payload: length]`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    /// Role announcement from the initiating side.
    Ping = 0x60,
    /// Role announcement reply.
    Pong = 0x61,
    /// Serialized card identity record.
    DeviceDescriptor = 0x62,
    /// APDU captured from the real reader, heading to the real card.
    ApduRequest = 0x63,
    /// Answer from the real card, heading back to the real reader.
    ApduResponse = 0x64,
    /// Per-exchange hardware failure report.
    Error = 0x65,
}

impl PacketType {
    /// Parse the wire type byte; `None` for anything outside the closed set.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x60 => Some(PacketType::Ping),
            0x61 => Some(PacketType::Pong),
            0x62 => Some(PacketType::DeviceDescriptor),
            0x63 => Some(PacketType::ApduRequest),
            0x64 => Some(PacketType::ApduResponse),
            0x65 => Some(PacketType::Error),
            _ => None,
        }
    }
}

/// One typed, variable-length unit of relay link traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Packet type.
    pub packet_type: PacketType,
    /// Payload bytes, at most [`MAX_PAYLOAD_LEN`].
    pub payload: Vec<u8>,
}

impl Packet {
    /// Build a packet; the payload length is validated at encode time.
    pub fn new(packet_type: PacketType, payload: Vec<u8>) -> Self {
        Self {
            packet_type,
            payload,
        }
    }

    /// Encode into the wire form `[type][len][payload]`.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.payload.len() > MAX_PAYLOAD_LEN {
            return Err(Error::PayloadTooLarge {
                actual: self.payload.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }
        let mut out = Vec::with_capacity(PACKET_HEADER_LEN + self.payload.len());
        out.push(self.packet_type as u8);
        out.push(self.payload.len() as u8);
        out.extend_from_slice(&self.payload);
        Ok(out)
    }

    /// Decode a packet from the head of `bytes`. Fails with `Truncated`
    /// when fewer bytes are available than the declared length; trailing
    /// bytes past the declared length are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Packet> {
        if bytes.len() < PACKET_HEADER_LEN {
            return Err(Error::Truncated {
                declared: PACKET_HEADER_LEN,
                actual: bytes.len(),
            });
        }
        let packet_type =
            PacketType::from_byte(bytes[0]).ok_or(Error::UnknownPacketType(bytes[0]))?;
        let declared = bytes[1] as usize;
        let available = bytes.len() - PACKET_HEADER_LEN;
        if available < declared {
            return Err(Error::Truncated {
                declared,
                actual: available,
            });
        }
        Ok(Packet {
            packet_type,
            payload: bytes[PACKET_HEADER_LEN..PACKET_HEADER_LEN + declared].to_vec(),
        })
    }
}
