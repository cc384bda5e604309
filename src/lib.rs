//! # ad51xx-digipot
//!
//! A Rust driver for the Analog Devices AD51xx family of I²C digital
//! potentiometers: AD5121, AD5141, AD5122A, AD5142A, AD5123, AD5124,
//! AD5143, AD5144 and AD5144A.
//!
//! The driver talks to the bus through a [`Transport`] supplied by the
//! caller, so it runs unchanged against real hardware or against the
//! in-memory [`MockTransport`].
//!
//! ## Features
//!
//! *   One device type for every model, parameterized by a [`Variant`].
//! *   Wiper control (`write`, `write_all`, `zero`, `mid_scale`, `max_scale`, ...).
//! *   Cached wiper values (`read`) that never touch the bus.
//! *   EEPROM defaults (`store_to_memory`, `recall_from_memory`).
//! *   Top/bottom scale, linear and 6 dB increment/decrement.
//! *   Potentiometer / linear gain setting mode with read-modify-write of the
//!     control register.
//! *   Two-phase updates: `preload` channels, then `sync` them simultaneously.
//! *   Read-back of the input, EEPROM, control and RDAC registers.
//! *   Optional host transport through an XR2280x USB-HID I²C bridge
//!     (Cargo feature `hid`).
//!
//! ## Resolution
//!
//! The 7-bit parts (AD5121, AD5122A, AD5123, AD5124) accept wiper values
//! 0-127, the 8-bit parts 0-255. The 7-bit chips still use the full 8-bit
//! data field on the wire, so values are shifted left by one on the way out
//! and right by one on the way back. Callers always work in 0..=`max_value()`.
//!
//! ## Installation
//!
//! Add the following to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! ad51xx-digipot = { version = "0.1.0", features = ["hid"] } # Drop "hid" for your own transport
//! log = "0.4"          # Optional, for logging
//! ```
//!
//! The `hid` feature needs the `hidapi` system library. See the
//! [`hidapi` crate documentation](https://docs.rs/hidapi/) for details.
//!
//! ## Basic Usage
//!
//! ```
//! use ad51xx_digipot::{Ad51xx, MockTransport, Result, Variant};
//!
//! fn main() -> Result<()> {
//!     // Swap the mock for a real transport, e.g. `Xr2280xBridge::open_first(&hid_api)?`.
//!     let bus = MockTransport::new(0x2C);
//!     let mut pot = Ad51xx::new(bus, 0x2C, Variant::AD5144A)?;
//!
//!     pot.begin()?;
//!     pot.write(0, 200)?;
//!     pot.mid_scale_all()?;
//!     assert_eq!(pot.read(3)?, 128);
//!
//!     // Stage two channels and move them together.
//!     pot.preload(0, 10)?;
//!     pot.preload(1, 20)?;
//!     pot.sync(0b0011)?;
//!     assert_eq!(pot.read(1)?, 20);
//!     Ok(())
//! }
//! ```
//!
//! ## Hardware Setup Notes
//!
//! *   **I²C Pull-up Resistors:** Required externally (e.g., 4.7kΩ to 3.3V).
//! *   **Addresses:** Set by the ADDR pins, typically 0x20-0x2F (check the datasheet for your package).
//!
//! ## License
//!
//! This project is licensed under the WTFPL - see the [LICENSE](LICENSE) file for details.

// Make internal modules private, re-export public types
pub mod codec;
mod consts;
pub mod device;
mod error;
pub mod transport;
pub mod variant;

pub use codec::{denormalize, normalize, OperationalMode};
pub use device::Ad51xx;
pub use error::{Error, Result};
pub use transport::mock::MockTransport;
pub use transport::{Transport, TransportError};
pub use variant::Variant;

#[cfg(feature = "hid")]
pub use transport::hid::Xr2280xBridge;
#[cfg(feature = "hid")]
pub use consts::bridge::{EXAR_VID, XR2280X_I2C_PID};
