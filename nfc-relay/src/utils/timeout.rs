// nfc-relay/src/utils/timeout.rs

//! Timeout helpers used across the crate.
//!
//! Keep these helpers minimal: they centralize the commonly used polling
//! intervals and provide a small conversion helper so tests and code can
//! express timeouts in milliseconds clearly.

use std::time::Duration;

/// Sleep between inbound-queue polls inside the link wait primitives.
pub const LINK_POLL_INTERVAL_MS: u64 = 5;

/// One bounded attempt of `wait_for_packet`/`wait_for_pong` before the
/// worker loop gets a chance to observe its stop flag.
pub const WAIT_ATTEMPT_TIMEOUT_MS: u64 = 100;

/// One bounded card-detection attempt on the reader side.
pub const CARD_POLL_TIMEOUT_MS: u64 = 300;

/// Budget for one transceive against the real card.
pub const TRANSCEIVE_TIMEOUT_MS: u64 = 1000;

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
