// nfc-relay/src/nfc/mod.rs

//! Boundary to the physical radio. The relay core only assumes two
//! capabilities exist: talk to a real card, and emulate a card toward a
//! real reader. Both are opaque services behind these traits; the radio
//! driver internals live outside the crate.

pub mod mock;

use std::time::Duration;

use crate::types::CardIdentity;
use crate::Result;

/// Capability to drive a physical reader against a real card.
pub trait CardReader: Send {
    /// Bounded-timeout attempt to find a nearby ISO14443-4A card.
    /// `Ok(None)` when nothing answered within the budget.
    fn detect_card(&mut self, timeout: Duration) -> Result<Option<CardIdentity>>;

    /// Exchange one APDU with the selected card.
    fn transceive(&mut self, data: &[u8], timeout: Duration) -> Result<Vec<u8>>;
}

/// Per-exchange callback driven by the real reader's protocol exchanges.
/// Invoked synchronously from the radio with a hard wall-clock budget of a
/// few milliseconds; an implementation that cannot answer yet must return
/// a waiting-time extension rather than block.
pub trait BlockHandler: Send {
    /// Handle one received block; the returned bytes (if any) are
    /// transmitted back to the real reader.
    fn handle_block(&mut self, rx_block: &[u8]) -> Option<Vec<u8>>;
}

/// Capability to emulate a card toward a real reader.
pub trait CardEmulator: Send {
    /// Start emulating `identity`; `handler` is invoked once per physical
    /// exchange until [`CardEmulator::stop_emulation`].
    fn start_emulation(
        &mut self,
        identity: &CardIdentity,
        handler: Box<dyn BlockHandler>,
    ) -> Result<()>;

    /// Stop a running emulation. No-op when none is running.
    fn stop_emulation(&mut self) -> Result<()>;
}
