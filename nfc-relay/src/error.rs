// nfc-relay/src/error.rs

use thiserror::Error;

/// Common error type for the relay core.
#[derive(Error, Debug)]
pub enum Error {
    /// The serial link between the two units failed.
    #[error("transport failure: {0}")]
    Transport(String),

    // serialport is an optional dependency so the core builds on hosts
    // without a UART stack
    /// Error reported by the system serial port.
    #[cfg(feature = "serial")]
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Payload does not fit the one-byte length field.
    #[error("payload too large: {actual} bytes (max {max})")]
    PayloadTooLarge { actual: usize, max: usize },

    /// Packet buffer ends before the declared payload length.
    #[error("truncated packet: declared {declared} payload bytes, got {actual}")]
    Truncated { declared: usize, actual: usize },

    /// Type byte outside the known packet range.
    #[error("unknown packet type: {0:#04x}")]
    UnknownPacketType(u8),

    /// A field's length is outside its allowed range.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A descriptor record disagrees with its declared sizes.
    #[error("descriptor size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The physical card did not answer an exchange.
    #[error("transceive failed: {0}")]
    HardwareTransceive(String),

    /// The peer sent something the protocol does not allow here.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// A bounded wait elapsed.
    #[error("operation timed out")]
    Timeout,
}

impl Error {
    /// Only transport-level failures unwind a worker loop; every other
    /// kind is handled by discarding the offending unit of work.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            #[cfg(feature = "serial")]
            Error::Serial(_) => true,
            _ => false,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
