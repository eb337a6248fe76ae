// nfc-relay/src/protocol/reassembler.rs

use log::warn;

use super::packet::{Packet, PacketType};

/// Where the machine is inside the current packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    ReadType,
    ReadLength,
    ReadPayload,
}

/// Byte-level state machine that turns the unstructured serial byte stream
/// back into discrete packets.
///
/// Stages: `ReadType -> ReadLength -> ReadPayload -> (complete)`, resetting
/// to `ReadType` after each emitted packet. A declared length of zero
/// completes immediately. Payload bytes may arrive in arbitrarily small
/// chunks; nothing buffered is ever discarded except by emitting a packet.
///
/// There is no resynchronization: if the two ends ever disagree about the
/// stream position the machine will misparse until the link is reopened.
/// That matches the lock-step discipline of the relay protocol.
#[derive(Debug)]
pub struct Reassembler {
    stage: Stage,
    type_byte: u8,
    declared_len: usize,
    payload: Vec<u8>,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reassembler {
    /// Fresh machine at `ReadType`.
    pub fn new() -> Self {
        Self {
            stage: Stage::ReadType,
            type_byte: 0,
            declared_len: 0,
            payload: Vec::new(),
        }
    }

    /// Feed a chunk of received bytes, returning every packet completed by
    /// this chunk in arrival order. Packets whose type byte falls outside
    /// the closed set are dropped here; their declared length was still
    /// honored, so the stream stays byte-synchronized.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Packet> {
        let mut completed = Vec::new();
        for &b in bytes {
            if let Some(pkt) = self.feed_byte(b) {
                completed.push(pkt);
            }
        }
        completed
    }

    fn feed_byte(&mut self, b: u8) -> Option<Packet> {
        match self.stage {
            Stage::ReadType => {
                self.type_byte = b;
                self.stage = Stage::ReadLength;
                None
            }
            Stage::ReadLength => {
                self.declared_len = b as usize;
                if self.declared_len == 0 {
                    // Empty packets are valid; complete without a payload stage
                    self.complete()
                } else {
                    self.payload = Vec::with_capacity(self.declared_len);
                    self.stage = Stage::ReadPayload;
                    None
                }
            }
            Stage::ReadPayload => {
                self.payload.push(b);
                if self.payload.len() == self.declared_len {
                    self.complete()
                } else {
                    None
                }
            }
        }
    }

    fn complete(&mut self) -> Option<Packet> {
        let payload = std::mem::take(&mut self.payload);
        let type_byte = self.type_byte;
        self.stage = Stage::ReadType;
        self.declared_len = 0;
        match PacketType::from_byte(type_byte) {
            Some(packet_type) => Some(Packet {
                packet_type,
                payload,
            }),
            None => {
                warn!(
                    "dropping packet with unknown type {:#04x} ({} payload bytes)",
                    type_byte,
                    payload.len()
                );
                None
            }
        }
    }
}
