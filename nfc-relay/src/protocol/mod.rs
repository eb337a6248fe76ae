// nfc-relay/src/protocol/mod.rs

//! Wire protocol of the relay link plus the ISO14443-4 helpers the
//! card-side emulation needs.

pub mod block;
pub mod crc;
pub mod descriptor;
pub mod packet;
pub mod reassembler;

pub use block::BlockKind;
pub use crc::{append_crc_a, check_crc_a, crc_a};
pub use packet::{Packet, PacketType};
pub use reassembler::Reassembler;
