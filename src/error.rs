use crate::transport::TransportError;
use thiserror::Error;

/// Errors that can occur when driving an AD51xx digital potentiometer.
///
/// Validation errors (`InvalidChannel`, `InvalidValue`, `InvalidMask`,
/// `InvalidAddress`) are always reported before anything is sent on the bus.
/// A `Transport` error means a transaction was attempted and failed; the
/// driver's cached wiper values are left as they were.
#[derive(Error, Debug)]
pub enum Error {
    /// Channel index is outside the range supported by this chip.
    #[error("Channel {channel} out of range: device has {channel_count} channel(s)")]
    InvalidChannel {
        /// The channel index that was requested.
        channel: u8,
        /// Number of channels on this chip.
        channel_count: u8,
    },
    /// Wiper value exceeds the chip's resolution.
    #[error("Value {value} out of range (0-{max_value})")]
    InvalidValue {
        /// The value that was requested.
        value: u8,
        /// Largest value accepted by this chip.
        max_value: u8,
    },
    /// Sync channel mask has bits set above the four channel bits.
    #[error("Sync mask 0x{0:02X} out of range (0x00-0x0F)")]
    InvalidMask(u8),
    /// Bus address does not fit in 7 bits.
    #[error("Invalid 7-bit I2C address: 0x{0:02X}")]
    InvalidAddress(u8),
    /// Nothing acknowledged the probe at the configured address.
    #[error("No device found at I2C address 0x{address:02X}")]
    DeviceNotFound {
        /// The probed address.
        address: u8,
    },
    /// The underlying bus transaction failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl Error {
    /// Numeric status code compatible with the classic AD51xx driver API:
    /// 1 for a bad channel, 2 for a bad value, 3 for everything else.
    pub fn status_code(&self) -> u8 {
        match self {
            Error::InvalidChannel { .. } => 1,
            Error::InvalidValue { .. } => 2,
            _ => 3,
        }
    }

    /// True when the error comes from the caller's arguments rather than the hardware.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidChannel { .. }
                | Error::InvalidValue { .. }
                | Error::InvalidMask(_)
                | Error::InvalidAddress(_)
        )
    }
}

/// Result type alias for AD51xx operations.
pub type Result<T> = std::result::Result<T, Error>;
