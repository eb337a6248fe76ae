// nfc-relay/src/constants.rs
//! Common protocol constants used across the crate

/// Relay packet header length: type byte + length byte
pub const PACKET_HEADER_LEN: usize = 2;

/// Maximum payload length carried by one relay packet
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Fixed descriptor header: uid_len(1) + uid(7) + atqa(2) + sak(1) + ats_len(2)
pub const DESCRIPTOR_HEADER_LEN: usize = 13;

/// Minimum UID length carried in a descriptor (ISO14443A single size)
pub const UID_MIN_LEN: usize = 4;

/// Maximum UID length carried in a descriptor (ISO14443A double size)
pub const UID_MAX_LEN: usize = 7;

/// Maximum ATS/historical tail that still fits one packet payload
pub const DESCRIPTOR_MAX_ATS_LEN: usize = MAX_PAYLOAD_LEN - DESCRIPTOR_HEADER_LEN;

/// CRC_A initial value per ISO14443-3A
pub const CRC_A_INIT: u16 = 0x6363;

/// PCB bit 0 carries the block number
pub const PCB_BLOCK_NUMBER: u8 = 0x01;

/// S(WTX) request PCB for block number 0 (11 11 0 0 1 0)
pub const PCB_S_WTX: u8 = 0xF2;

/// I-block PCB for block number 0 (00 0 0 0 0 1 0)
pub const PCB_I_BLOCK: u8 = 0x02;

/// Default waiting-time-extension multiplier sent while an answer is
/// outstanding on the far side of the link
pub const DEFAULT_WTXM: u8 = 0x01;
