//! Bus transport abstraction.
//!
//! The driver never touches the bus directly; it goes through a [`Transport`]
//! supplied by the caller. Each call is one complete, blocking transaction.

use thiserror::Error;

#[cfg(feature = "hid")]
pub mod hid;
pub mod mock;

/// Errors reported by a [`Transport`] implementation.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The addressed device did not acknowledge.
    #[error("No acknowledge from I2C address 0x{address:02X}")]
    Nack {
        /// The address that NACKed.
        address: u8,
    },
    /// Bus arbitration was lost during the transaction.
    #[error("I2C arbitration lost while accessing address 0x{address:02X}")]
    ArbitrationLost {
        /// The address being accessed.
        address: u8,
    },
    /// The device or bridge did not respond in time.
    #[error("I2C timeout while accessing address 0x{address:02X}")]
    Timeout {
        /// The address being accessed.
        address: u8,
    },
    /// The bus master rejected the request parameters.
    #[error("I2C request rejected for address 0x{address:02X}")]
    RequestError {
        /// The address being accessed.
        address: u8,
    },
    /// A malformed or truncated response was received.
    #[error("Invalid report received or unexpected size ({0} bytes)")]
    InvalidReport(usize),
    /// The transaction exceeds what the transport can carry.
    #[error("Requested operation size is too large (max {max}, got {actual})")]
    OperationTooLarge {
        /// Maximum allowed size.
        max: usize,
        /// Requested size.
        actual: usize,
    },
    /// A transport configuration value is out of range.
    #[error("Argument out of range: {0}")]
    ArgumentOutOfRange(String),
    /// Generic bus failure.
    #[error("Bus error: {0}")]
    Bus(String),
    /// I/O error from the host operating system.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Error from the HID API layer.
    #[cfg(feature = "hid")]
    #[error("HID API error: {0}")]
    Hid(#[from] hidapi::HidError),
}

/// Byte-level access to devices on a two-wire addressed bus.
pub trait Transport {
    /// Lightweight presence check: true if a device acknowledges `address`.
    fn probe(&mut self, address: u8) -> bool;

    /// Writes `command` followed by `data` to the device at `address`.
    fn write_block(&mut self, address: u8, command: u8, data: &[u8])
        -> Result<(), TransportError>;

    /// Reads `buffer.len()` bytes from the device at `address`, starting at `register`.
    fn read_block(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn probe(&mut self, address: u8) -> bool {
        (**self).probe(address)
    }

    fn write_block(
        &mut self,
        address: u8,
        command: u8,
        data: &[u8],
    ) -> Result<(), TransportError> {
        (**self).write_block(address, command, data)
    }

    fn read_block(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), TransportError> {
        (**self).read_block(address, register, buffer)
    }
}
