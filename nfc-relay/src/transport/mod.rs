// nfc-relay/src/transport/mod.rs

//! Ownership of the physical serial link and the byte-to-packet boundary.

pub mod channel;
pub mod mock;
#[cfg(feature = "serial")]
pub mod serial;
pub mod traits;

pub use channel::TransportChannel;
pub use mock::MockSerialLink;
pub use traits::SerialLink;
