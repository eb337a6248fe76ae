// nfc-relay/src/transport/traits.rs

use std::time::Duration;

use crate::Result;

/// Raw byte-stream link between the two relay units. Implementations must
/// be full duplex: `try_clone` hands the receive thread its own half while
/// the original stays with the sender.
pub trait SerialLink: Send {
    /// Write the whole buffer to the wire.
    fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// Read up to `buf.len()` bytes. Returns `Ok(0)` when the timeout
    /// expires with nothing received; errors are reserved for link
    /// failures, which are fatal to the owning worker.
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Clone the link handle so reads and writes can run on separate
    /// threads against the same wire.
    fn try_clone(&self) -> Result<Box<dyn SerialLink>>;
}
