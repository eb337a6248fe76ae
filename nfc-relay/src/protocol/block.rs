// nfc-relay/src/protocol/block.rs

//! ISO14443-4 (T=CL) block helpers used by the card-side emulation.
//!
//! Only the PCB classification and the few block shapes the relay needs
//! are modelled; chaining and CID/NAD addressing are outside the relay's
//! scope and classify as `Other`.

use crate::constants::{DEFAULT_WTXM, PCB_BLOCK_NUMBER, PCB_I_BLOCK, PCB_S_WTX};
use crate::protocol::crc::append_crc_a;

/// The block kinds the relay distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Information block, carries an APDU.
    IBlock,
    /// Receive-ready acknowledgment.
    RAck,
    /// Receive-ready negative acknowledgment.
    RNack,
    /// Supervisory waiting-time-extension (request or acknowledgment).
    SWtx,
    /// Supervisory deselect.
    SDeselect,
    /// Anything else (chaining, CID/NAD forms the relay does not handle).
    Other,
}

/// Classify a protocol control byte.
pub fn classify(pcb: u8) -> BlockKind {
    match pcb & 0xc0 {
        0x00 => BlockKind::IBlock,
        0x80 => {
            if pcb & 0x10 != 0 {
                BlockKind::RNack
            } else {
                BlockKind::RAck
            }
        }
        0xc0 => match pcb & 0x30 {
            0x30 => BlockKind::SWtx,
            0x00 => BlockKind::SDeselect,
            _ => BlockKind::Other,
        },
        _ => BlockKind::Other,
    }
}

/// Block number bit of a PCB.
pub fn block_number(pcb: u8) -> u8 {
    pcb & PCB_BLOCK_NUMBER
}

/// Build an S(WTX) request matching the reader's current block number.
/// WTX control traffic is sent without an explicit CRC; the radio layer
/// frames it.
pub fn wtx_request(block_number: u8) -> Vec<u8> {
    vec![PCB_S_WTX | (block_number & PCB_BLOCK_NUMBER), DEFAULT_WTXM]
}

/// Build the I-block answering the reader: PCB with the matching block
/// number, the APDU response, and the trailing CRC_A.
pub fn i_block_response(block_number: u8, apdu: &[u8]) -> Vec<u8> {
    let mut block = Vec::with_capacity(1 + apdu.len() + 2);
    block.push(PCB_I_BLOCK | (block_number & PCB_BLOCK_NUMBER));
    block.extend_from_slice(apdu);
    append_crc_a(&mut block);
    block
}

/// Strip a leading I-block PCB when one is present. The peer normally
/// forwards the bare APDU, but a PCB-prefixed request from an older unit
/// must not reach the card as-is.
pub fn strip_leading_pcb(data: &[u8]) -> &[u8] {
    match data.first() {
        Some(&b) if b == PCB_I_BLOCK || b == PCB_I_BLOCK | PCB_BLOCK_NUMBER => &data[1..],
        _ => data,
    }
}
