// nfc-relay/src/protocol/crc.rs

//! CRC_A checksum per ISO14443-3A.
//!
//! Pure functions with no retained state; the two CRC bytes are appended
//! least-significant first, so recomputing over `data || crc` yields zero.

use crate::constants::CRC_A_INIT;

/// Compute CRC_A over `data` (init `0x6363`, reflected polynomial 0x8408).
pub fn crc_a(data: &[u8]) -> u16 {
    let mut crc = CRC_A_INIT;
    for &byte in data {
        let mut ch = byte ^ (crc as u8);
        ch ^= ch << 4;
        crc = (crc >> 8) ^ ((ch as u16) << 8) ^ ((ch as u16) << 3) ^ ((ch as u16) >> 4);
    }
    crc
}

/// Append the CRC_A of the current contents, low byte first.
pub fn append_crc_a(block: &mut Vec<u8>) {
    let crc = crc_a(block);
    block.push((crc & 0xff) as u8);
    block.push((crc >> 8) as u8);
}

/// Verify a block that carries its CRC_A in the last two bytes.
pub fn check_crc_a(block: &[u8]) -> bool {
    block.len() >= 2 && crc_a(block) == 0
}
