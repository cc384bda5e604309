//! Command encoding for the AD51xx two-byte I2C protocol.
//!
//! Every operation on the chip is a single `[command, data]` write. The
//! command byte carries the operation in its upper nibble and the channel
//! index (or channel mask, for sync) in its lower bits.

use crate::consts::{cmd, control, data};

/// Which wiper(s) a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A single channel (0-3).
    Channel(u8),
    /// All channels at once.
    All,
}

impl Target {
    #[inline]
    fn command(self, single: u8, all: u8) -> u8 {
        match self {
            Target::Channel(ch) => single | (ch & 0x03),
            Target::All => all,
        }
    }
}

/// Direction of an increment/decrement command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Increment,
    Decrement,
}

/// Register selected by a read-back command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReadBackSource {
    /// Input (preload) register.
    Input = 0x00,
    /// EEPROM.
    Eeprom = 0x01,
    /// Control register.
    Control = 0x02,
    /// RDAC (live wiper position).
    Rdac = 0x03,
}

impl ReadBackSource {
    /// Whether the register holds a wiper value subject to resolution shifting.
    #[inline]
    pub fn is_wiper_value(self) -> bool {
        !matches!(self, ReadBackSource::Control)
    }
}

/// Wiper operating mode held in bit 2 of the control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationalMode {
    /// Standard potentiometer divider mode.
    Potentiometer,
    /// Linear gain setting mode (independent top and bottom strings).
    Linear,
}

impl OperationalMode {
    /// Decodes the mode from a control register value.
    pub fn from_control(mask: u8) -> Self {
        if mask & control::LINEAR_MODE != 0 {
            OperationalMode::Linear
        } else {
            OperationalMode::Potentiometer
        }
    }

    /// Returns `mask` with the mode bit updated and every other bit untouched.
    pub fn apply_to(self, mask: u8) -> u8 {
        match self {
            OperationalMode::Linear => mask | control::LINEAR_MODE,
            OperationalMode::Potentiometer => mask & !control::LINEAR_MODE,
        }
    }

    #[inline]
    pub fn is_linear(self) -> bool {
        self == OperationalMode::Linear
    }
}

/// One chip command. Wiper values are already normalized (device-native units).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reset,
    WriteRdac { target: Target, value: u8 },
    StoreCurrentToEeprom { channel: u8 },
    StoreValueToEeprom { channel: u8, value: u8 },
    RecallFromEeprom { channel: u8 },
    TopScale { target: Target, enable: bool },
    BottomScale { target: Target, enable: bool },
    WriteControl(u8),
    StepLinear { target: Target, step: Step },
    Step6dB { target: Target, step: Step },
    Preload { target: Target, value: u8 },
    Sync { mask: u8 },
    Shutdown,
    ReadBack { channel: u8, source: ReadBackSource },
}

impl Command {
    /// Encodes the command as the `[command, data]` pair written to the chip.
    pub fn encode(self) -> [u8; 2] {
        match self {
            Command::Reset => [cmd::RESET, 0x00],
            Command::WriteRdac { target, value } => {
                [target.command(cmd::WRITE_RDAC, cmd::WRITE_RDAC_ALL), value]
            }
            Command::StoreCurrentToEeprom { channel } => {
                [cmd::EEPROM_COPY | (channel & 0x03), data::EEPROM_STORE]
            }
            Command::StoreValueToEeprom { channel, value } => {
                [cmd::WRITE_EEPROM | (channel & 0x03), value]
            }
            Command::RecallFromEeprom { channel } => {
                [cmd::EEPROM_COPY | (channel & 0x03), data::EEPROM_RECALL]
            }
            Command::TopScale { target, enable } => [
                target.command(cmd::SCALE, cmd::SCALE_ALL),
                if enable {
                    data::TOP_SCALE_SET
                } else {
                    data::TOP_SCALE_CLEAR
                },
            ],
            Command::BottomScale { target, enable } => [
                target.command(cmd::SCALE, cmd::SCALE_ALL),
                if enable {
                    data::BOTTOM_SCALE_SET
                } else {
                    data::BOTTOM_SCALE_CLEAR
                },
            ],
            Command::WriteControl(mask) => [cmd::WRITE_CONTROL, mask],
            Command::StepLinear { target, step } => [
                target.command(cmd::STEP_LINEAR, cmd::STEP_LINEAR_ALL),
                step_data(step),
            ],
            Command::Step6dB { target, step } => [
                target.command(cmd::STEP_6DB, cmd::STEP_6DB_ALL),
                step_data(step),
            ],
            Command::Preload { target, value } => {
                [target.command(cmd::WRITE_INPUT, cmd::WRITE_INPUT_ALL), value]
            }
            Command::Sync { mask } => [cmd::SYNC | (mask & 0x0F), 0x00],
            Command::Shutdown => [cmd::SHUTDOWN, data::SHUTDOWN_ENTER],
            Command::ReadBack { channel, source } => {
                [cmd::READ_BACK | (channel & 0x03), source as u8]
            }
        }
    }
}

#[inline]
fn step_data(step: Step) -> u8 {
    match step {
        Step::Increment => data::STEP_UP,
        Step::Decrement => data::STEP_DOWN,
    }
}

/// Converts a caller-facing wiper value to the chip's native 8-bit field.
/// 7-bit parts (`max_value == 127`) take the value shifted left by one.
#[inline]
pub fn normalize(value: u8, max_value: u8) -> u8 {
    if max_value == 127 {
        value << 1
    } else {
        value
    }
}

/// Inverse of [`normalize`].
#[inline]
pub fn denormalize(raw: u8, max_value: u8) -> u8 {
    if max_value == 127 {
        raw >> 1
    } else {
        raw
    }
}
