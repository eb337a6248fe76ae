// nfc-relay/src/prelude.rs

//! Convenience re-exports for consumers of the relay core.

pub use crate::link::RelayLink;
pub use crate::nfc::{BlockHandler, CardEmulator, CardReader};
pub use crate::protocol::{Packet, PacketType};
pub use crate::transport::{SerialLink, TransportChannel};
pub use crate::worker::{
    CardState, CardWorker, ReaderState, ReaderWorker, WorkerHandle, WorkerState,
};
pub use crate::{CardIdentity, Error, Result, Role, Uid};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, ms};
