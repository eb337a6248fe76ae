// nfc-relay/src/lib.rs

//! nfc-relay
//!
//! Relay core for forwarding ISO14443-4A transactions between a physical
//! reader and a physical card that are not co-located. Two handheld units
//! are joined by a point-to-point serial link; the reader-side unit talks
//! to the real card while the card-side unit emulates that card toward the
//! real reader.
#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod link;
pub mod nfc;
pub mod prelude;
pub mod protocol;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;
pub mod worker;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
