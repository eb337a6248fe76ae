// nfc-relay/src/transport/serial.rs

//! Real UART link backed by the `serialport` crate (feature `serial`).

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::SerialPort;

use crate::transport::traits::SerialLink;
use crate::{Error, Result};

/// Default baud rate of the inter-unit link.
pub const DEFAULT_BAUD: u32 = 115_200;

/// System serial port implementing [`SerialLink`].
pub struct SystemSerialLink {
    port: Box<dyn SerialPort>,
}

impl SystemSerialLink {
    /// Open `path` at `baud`. The port timeout is managed per read call.
    pub fn open(path: &str, baud: u32) -> Result<Self> {
        let port = serialport::new(path, baud)
            .timeout(Duration::from_millis(10))
            .open()?;
        Ok(Self { port })
    }
}

impl SerialLink for SystemSerialLink {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.port
            .write_all(data)
            .map_err(|e| Error::Transport(format!("serial write failed: {e}")))?;
        self.port
            .flush()
            .map_err(|e| Error::Transport(format!("serial flush failed: {e}")))
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        self.port.set_timeout(timeout)?;
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            // An expired timeout is an empty read, not a failure
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(Error::Transport(format!("serial read failed: {e}"))),
        }
    }

    fn try_clone(&self) -> Result<Box<dyn SerialLink>> {
        let port = self.port.try_clone()?;
        Ok(Box::new(SystemSerialLink { port }))
    }
}
