//! Host-side transport through a MaxLinear/Exar XR2280x USB-HID I2C bridge.
//!
//! The XR22800/1/2/4 expose an I2C master as a HID interface. Each
//! transaction is one 36-byte OUT report (flags, write length, read length,
//! address, data) answered by one IN report carrying status flags and any
//! read data.

use super::{Transport, TransportError};
use crate::consts::bridge::{self as consts, in_flags, out_flags};
use hidapi::{HidApi, HidDevice};
use log::{debug, trace, warn};

/// An XR2280x I2C interface used as a [`Transport`].
///
/// **Note:** This handle is not thread-safe (`!Send`, `!Sync`).
#[derive(Debug)]
pub struct Xr2280xBridge {
    device: HidDevice,
    timeout_ms: i32,
}

impl Xr2280xBridge {
    /// Opens the first XR2280x I2C interface with the default VID/PID.
    /// **Warning:** Ambiguous if multiple bridges are connected.
    pub fn open_first(hid_api: &HidApi) -> Result<Self, TransportError> {
        Self::open_by_vid_pid(hid_api, consts::EXAR_VID, consts::XR2280X_I2C_PID)
    }

    /// Opens a bridge by Vendor ID and Product ID (for reprogrammed IDs).
    pub fn open_by_vid_pid(hid_api: &HidApi, vid: u16, pid: u16) -> Result<Self, TransportError> {
        let device = hid_api.open(vid, pid)?;
        debug!("Opened XR2280x I2C interface: VID={:04X}, PID={:04X}", vid, pid);
        Ok(Self::from_device(device))
    }

    /// Wraps an already opened HID device.
    pub fn from_device(device: HidDevice) -> Self {
        Xr2280xBridge {
            device,
            timeout_ms: consts::DEFAULT_TIMEOUT_MS,
        }
    }

    /// Sets the per-transaction response timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: i32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the I2C bus speed (approximated). Max supported is 400 kHz.
    pub fn set_speed_khz(&self, speed_khz: u32) -> Result<(), TransportError> {
        let (low, high) = scl_cycles(speed_khz)?;
        debug!(
            "Setting I2C speed ~{}kHz: SCL_LOW=0x{:04X}, SCL_HIGH=0x{:04X}",
            speed_khz, low, high
        );
        self.write_hid_register(consts::REG_SCL_LOW, low)?;
        self.write_hid_register(consts::REG_SCL_HIGH, high)
    }

    fn write_hid_register(&self, reg_addr: u16, value: u16) -> Result<(), TransportError> {
        let [reg_lo, reg_hi] = reg_addr.to_le_bytes();
        let [val_lo, val_hi] = value.to_le_bytes();
        let buf = [
            consts::REPORT_ID_WRITE_HID_REGISTER,
            reg_lo,
            reg_hi,
            val_lo,
            val_hi,
        ];
        trace!("Write reg 0x{:04X} = 0x{:04X}: {:02X?}", reg_addr, value, buf);
        self.device.send_feature_report(&buf)?;
        Ok(())
    }

    fn transfer(
        &self,
        address: u8,
        write_data: &[u8],
        read_buffer: Option<&mut [u8]>,
    ) -> Result<(), TransportError> {
        let read_len = read_buffer.as_ref().map(|b| b.len()).unwrap_or(0);
        let out_buf = encode_out_report(
            address,
            write_data,
            read_len,
            out_flags::START_BIT | out_flags::STOP_BIT,
        )?;
        debug!(
            "I2C transfer to 0x{:02X}: write {} bytes, read {} bytes",
            address,
            write_data.len(),
            read_len
        );
        trace!("I2C OUT buffer: {:02X?}", &out_buf);

        let written = self.device.write(&out_buf)?;
        if written != out_buf.len() {
            warn!("Partial write: sent {} of {} bytes", written, out_buf.len());
            return Err(TransportError::Io(std::io::Error::other(
                "Partial HID write",
            )));
        }

        // The bridge answers every transaction, including write-only ones.
        let mut in_buf = [0u8; consts::IN_REPORT_READ_BUF_SIZE];
        let received = self.device.read_timeout(&mut in_buf, self.timeout_ms)?;
        trace!("I2C IN buffer: {:02X?}", &in_buf[..received]);
        decode_in_report(address, &in_buf[..received], read_buffer)
    }
}

impl Transport for Xr2280xBridge {
    fn probe(&mut self, address: u8) -> bool {
        match self.transfer(address, &[], None) {
            Ok(()) => true,
            Err(TransportError::Nack { .. }) | Err(TransportError::Timeout { .. }) => false,
            Err(e) => {
                debug!("Error probing address 0x{:02X}: {}", address, e);
                false
            }
        }
    }

    fn write_block(
        &mut self,
        address: u8,
        command: u8,
        data: &[u8],
    ) -> Result<(), TransportError> {
        let mut bytes = Vec::with_capacity(data.len() + 1);
        bytes.push(command);
        bytes.extend_from_slice(data);
        self.transfer(address, &bytes, None)
    }

    fn read_block(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), TransportError> {
        self.transfer(address, &[register], Some(buffer))
    }
}

/// Builds the I2C OUT report for a 7-bit address.
pub(crate) fn encode_out_report(
    address: u8,
    write_data: &[u8],
    read_len: usize,
    flags: u8,
) -> Result<Vec<u8>, TransportError> {
    for len in [write_data.len(), read_len] {
        if len > consts::REPORT_MAX_DATA_SIZE {
            return Err(TransportError::OperationTooLarge {
                max: consts::REPORT_MAX_DATA_SIZE,
                actual: len,
            });
        }
    }
    let mut out_buf = vec![0u8; consts::OUT_REPORT_WRITE_BUF_SIZE];
    out_buf[0] = flags;
    out_buf[1] = write_data.len() as u8;
    out_buf[2] = read_len as u8;
    // 7-bit address in bits 7:1, R/W bit handled by the bridge.
    out_buf[3] = address << 1;
    out_buf[4..4 + write_data.len()].copy_from_slice(write_data);
    Ok(out_buf)
}

/// Checks the status flags of an I2C IN report and copies out any read data.
pub(crate) fn decode_in_report(
    address: u8,
    in_buf: &[u8],
    read_buffer: Option<&mut [u8]>,
) -> Result<(), TransportError> {
    if in_buf.len() < consts::IN_REPORT_HEADER_SIZE {
        return Err(TransportError::InvalidReport(in_buf.len()));
    }
    let status = in_buf[0];
    if status & in_flags::REQUEST_ERROR != 0 {
        return Err(TransportError::RequestError { address });
    }
    if status & in_flags::NAK_RECEIVED != 0 {
        return Err(TransportError::Nack { address });
    }
    if status & in_flags::ARBITRATION_LOST != 0 {
        return Err(TransportError::ArbitrationLost { address });
    }
    if status & in_flags::TIMEOUT != 0 {
        return Err(TransportError::Timeout { address });
    }

    if let Some(read_buf) = read_buffer {
        let reported = in_buf[2] as usize;
        if reported != read_buf.len() {
            warn!(
                "I2C read length mismatch: expected {}, got {}",
                read_buf.len(),
                reported
            );
        }
        let available = in_buf.len() - consts::IN_REPORT_HEADER_SIZE;
        let len = reported.min(read_buf.len()).min(available);
        if len < read_buf.len() {
            return Err(TransportError::InvalidReport(in_buf.len()));
        }
        read_buf[..len].copy_from_slice(
            &in_buf[consts::IN_REPORT_HEADER_SIZE..consts::IN_REPORT_HEADER_SIZE + len],
        );
    }
    Ok(())
}

/// SCL low/high cycle counts (60 MHz clock) for a bus speed in kHz.
pub(crate) fn scl_cycles(speed_khz: u32) -> Result<(u16, u16), TransportError> {
    if speed_khz == 0 || speed_khz > consts::MAX_SPEED_KHZ {
        return Err(TransportError::ArgumentOutOfRange(format!(
            "I2C speed {} kHz out of range (1-{})",
            speed_khz,
            consts::MAX_SPEED_KHZ
        )));
    }
    let total = 60_000 / speed_khz;
    let low = total / 2;
    let high = total - low;
    // Standard mode and fast mode have different minimum pulse widths.
    let (min_low, min_high) = if speed_khz <= 100 { (252, 240) } else { (78, 36) };
    Ok((low.max(min_low) as u16, high.max(min_high) as u16))
}
