//! Internal constants, command bytes, and bit definitions.

/// Highest number of wiper channels on any supported chip.
pub const MAX_CHANNELS: usize = 4;

/// Highest valid 7-bit I2C address.
pub const MAX_I2C_ADDRESS: u8 = 0x7F;

// --- Command Bytes (first byte of every I2C write) ---
pub mod cmd {
    pub const NOP: u8 = 0x00;
    /// Write RDAC, OR-ed with the channel index.
    pub const WRITE_RDAC: u8 = 0x10;
    pub const WRITE_RDAC_ALL: u8 = 0x18;
    /// Write input (preload) register, OR-ed with the channel index.
    pub const WRITE_INPUT: u8 = 0x20;
    pub const WRITE_INPUT_ALL: u8 = 0x28;
    /// Select a register for read-back, OR-ed with the channel index.
    pub const READ_BACK: u8 = 0x30;
    pub const STEP_LINEAR: u8 = 0x40;
    pub const STEP_LINEAR_ALL: u8 = 0x48;
    pub const STEP_6DB: u8 = 0x50;
    pub const STEP_6DB_ALL: u8 = 0x58;
    /// Copy input registers to RDAC, OR-ed with the channel mask.
    pub const SYNC: u8 = 0x60;
    /// Copy between RDAC and EEPROM, OR-ed with the channel index.
    pub const EEPROM_COPY: u8 = 0x70;
    /// Write EEPROM directly, OR-ed with the channel index.
    pub const WRITE_EEPROM: u8 = 0x80;
    pub const SCALE: u8 = 0x90;
    pub const SCALE_ALL: u8 = 0x98;
    pub const RESET: u8 = 0xB0;
    pub const SHUTDOWN: u8 = 0xC8;
    pub const WRITE_CONTROL: u8 = 0xD0;
}

// --- Data Bytes for fixed-data commands ---
pub mod data {
    pub const STEP_UP: u8 = 0x01;
    pub const STEP_DOWN: u8 = 0x00;
    /// RDAC -> EEPROM.
    pub const EEPROM_STORE: u8 = 0x01;
    /// EEPROM -> RDAC.
    pub const EEPROM_RECALL: u8 = 0x00;
    pub const TOP_SCALE_SET: u8 = 0x81;
    pub const TOP_SCALE_CLEAR: u8 = 0x80;
    pub const BOTTOM_SCALE_SET: u8 = 0x01;
    pub const BOTTOM_SCALE_CLEAR: u8 = 0x00;
    pub const SHUTDOWN_ENTER: u8 = 0x01;
}

// --- Control Register Bits ---
pub mod control {
    /// Write protect for RDAC registers (cleared enables updates).
    #[allow(dead_code)]
    pub const WRITE_PROTECT: u8 = 1 << 0;
    /// EEPROM program enable.
    #[allow(dead_code)]
    pub const EEPROM_PROGRAM: u8 = 1 << 1;
    /// Linear gain setting mode when set, potentiometer mode when clear.
    pub const LINEAR_MODE: u8 = 1 << 2;
}

/// Largest channel mask accepted by the sync command.
pub const SYNC_MASK_MAX: u8 = 0x0F;

// --- XR2280x USB-HID bridge constants ---
#[cfg(feature = "hid")]
pub mod bridge {
    /// Exar Corporation vendor ID.
    pub const EXAR_VID: u16 = 0x04E2;
    /// Product ID for the XR2280x I2C interface (common for XR22800/1/2/4).
    pub const XR2280X_I2C_PID: u16 = 0x1100;

    pub const REPORT_ID_WRITE_HID_REGISTER: u8 = 0x3C;

    pub const REPORT_MAX_DATA_SIZE: usize = 32;
    // Flags(1) + WrSize(1) + RdSize(1) + SlaveAddr(1) + Data(32)
    pub const OUT_REPORT_WRITE_BUF_SIZE: usize = 36;
    // ReportID(1) + Flags(1) + WrSize(1) + RdSize(1) + Reserved(1) + Data(32)
    pub const IN_REPORT_READ_BUF_SIZE: usize = 36;
    pub const IN_REPORT_HEADER_SIZE: usize = 4;

    pub const REG_SCL_LOW: u16 = 0x0341;
    pub const REG_SCL_HIGH: u16 = 0x0342;

    pub const DEFAULT_TIMEOUT_MS: i32 = 500;
    pub const MAX_SPEED_KHZ: u32 = 400;

    pub mod out_flags {
        pub const START_BIT: u8 = 1 << 0;
        pub const STOP_BIT: u8 = 1 << 1;
    }

    pub mod in_flags {
        pub const REQUEST_ERROR: u8 = 1 << 0;
        pub const NAK_RECEIVED: u8 = 1 << 1;
        pub const ARBITRATION_LOST: u8 = 1 << 2;
        pub const TIMEOUT: u8 = 1 << 3;
        // Bits 7..4 Sequence number
    }
}
