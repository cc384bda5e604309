//! In-memory AD51xx chip for tests and host-side dry runs.
//!
//! [`MockTransport`] answers on one address and models the registers the
//! driver touches: RDAC, input (preload) latch, EEPROM and the control
//! register, plus the read-back selection. Every transaction is recorded so
//! tests can check the exact bytes on the wire.

use super::{Transport, TransportError};
use crate::consts::{cmd, data, MAX_CHANNELS};
use log::trace;

/// One recorded bus transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Probe { address: u8 },
    Write { address: u8, command: u8, data: Vec<u8> },
    Read { address: u8, register: u8, len: usize },
}

/// Simulated AD51xx chip behind a fake bus.
#[derive(Debug, Clone)]
pub struct MockTransport {
    address: u8,
    present: bool,
    rdac: [u8; MAX_CHANNELS],
    input: [u8; MAX_CHANNELS],
    eeprom: [u8; MAX_CHANNELS],
    control: u8,
    shutdown: bool,
    selected: Option<u8>,
    fail_at: Option<usize>,
    fail_all: bool,
    log: Vec<Transaction>,
}

impl MockTransport {
    /// A present chip at `address` with every register zeroed.
    pub fn new(address: u8) -> Self {
        MockTransport {
            address,
            present: true,
            rdac: [0; MAX_CHANNELS],
            input: [0; MAX_CHANNELS],
            eeprom: [0; MAX_CHANNELS],
            control: 0,
            shutdown: false,
            selected: None,
            fail_at: None,
            fail_all: false,
            log: Vec::new(),
        }
    }

    /// Simulates the chip being unplugged (`false`) or plugged back in.
    pub fn set_present(&mut self, present: bool) {
        self.present = present;
    }

    /// Makes the `nth` transaction from now (0 = the next one) fail.
    pub fn fail_transaction(&mut self, nth: usize) {
        self.fail_at = Some(self.log.len() + nth);
    }

    /// Makes every transaction fail until switched off again.
    pub fn set_fail_all(&mut self, fail: bool) {
        self.fail_all = fail;
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.log
    }

    /// Recorded writes as `(command, first data byte)` pairs.
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.log
            .iter()
            .filter_map(|t| match t {
                Transaction::Write { command, data, .. } => {
                    Some((*command, data.first().copied().unwrap_or(0)))
                }
                _ => None,
            })
            .collect()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.fail_at = None;
    }

    pub fn rdac(&self, channel: usize) -> u8 {
        self.rdac[channel]
    }

    pub fn input(&self, channel: usize) -> u8 {
        self.input[channel]
    }

    pub fn eeprom(&self, channel: usize) -> u8 {
        self.eeprom[channel]
    }

    pub fn control(&self) -> u8 {
        self.control
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown
    }

    pub fn set_rdac(&mut self, channel: usize, raw: u8) {
        self.rdac[channel] = raw;
    }

    pub fn set_eeprom(&mut self, channel: usize, raw: u8) {
        self.eeprom[channel] = raw;
    }

    pub fn set_control(&mut self, mask: u8) {
        self.control = mask;
    }

    // Records the transaction, then decides whether it goes through.
    fn begin(&mut self, address: u8, transaction: Transaction) -> Result<(), TransportError> {
        trace!("Mock transaction: {:?}", transaction);
        let index = self.log.len();
        self.log.push(transaction);
        if self.fail_all || self.fail_at == Some(index) {
            return Err(TransportError::Bus("injected failure".to_string()));
        }
        if !self.present || address != self.address {
            return Err(TransportError::Nack { address });
        }
        Ok(())
    }

    fn apply(&mut self, command: u8, value: u8) {
        let ch = (command & 0x03) as usize;
        let all = command & 0x08 != 0;
        match command & 0xF0 {
            cmd::WRITE_RDAC => self.update(all, ch, |_| value),
            cmd::WRITE_INPUT => {
                if all {
                    self.input = [value; MAX_CHANNELS];
                } else {
                    self.input[ch] = value;
                }
            }
            cmd::READ_BACK => {
                self.selected = Some(match value & 0x03 {
                    0x00 => self.input[ch],
                    0x01 => self.eeprom[ch],
                    0x02 => self.control,
                    _ => self.rdac[ch],
                });
            }
            cmd::STEP_LINEAR => self.update(all, ch, |raw| step_linear(raw, value)),
            cmd::STEP_6DB => self.update(all, ch, |raw| step_6db(raw, value)),
            cmd::SYNC => {
                for bit in 0..MAX_CHANNELS {
                    if command & (1 << bit) != 0 {
                        self.rdac[bit] = self.input[bit];
                    }
                }
            }
            cmd::EEPROM_COPY => {
                if value == data::EEPROM_STORE {
                    self.eeprom[ch] = self.rdac[ch];
                } else {
                    self.rdac[ch] = self.eeprom[ch];
                }
            }
            cmd::WRITE_EEPROM => self.eeprom[ch] = value,
            cmd::SCALE => self.update(all, ch, |raw| scale(raw, value)),
            cmd::RESET => {
                self.rdac = self.eeprom;
                self.input = self.eeprom;
            }
            _ if command == cmd::SHUTDOWN => self.shutdown = value == data::SHUTDOWN_ENTER,
            _ if command == cmd::WRITE_CONTROL => self.control = value,
            _ => {}
        }
    }

    fn update(&mut self, all: bool, channel: usize, f: impl Fn(u8) -> u8) {
        if all {
            self.rdac.iter_mut().for_each(|raw| *raw = f(*raw));
        } else {
            self.rdac[channel] = f(self.rdac[channel]);
        }
    }
}

fn step_linear(raw: u8, direction: u8) -> u8 {
    if direction == data::STEP_UP {
        raw.saturating_add(1)
    } else {
        raw.saturating_sub(1)
    }
}

fn step_6db(raw: u8, direction: u8) -> u8 {
    if direction == data::STEP_UP {
        raw.saturating_mul(2).max(1)
    } else {
        raw / 2
    }
}

// Top scale drives the wiper to full scale, bottom scale to zero; clearing leaves it.
fn scale(raw: u8, value: u8) -> u8 {
    match value {
        data::TOP_SCALE_SET => 0xFF,
        data::BOTTOM_SCALE_SET => 0x00,
        _ => raw,
    }
}

impl Transport for MockTransport {
    fn probe(&mut self, address: u8) -> bool {
        self.begin(address, Transaction::Probe { address }).is_ok()
    }

    fn write_block(
        &mut self,
        address: u8,
        command: u8,
        data: &[u8],
    ) -> Result<(), TransportError> {
        self.begin(
            address,
            Transaction::Write {
                address,
                command,
                data: data.to_vec(),
            },
        )?;
        self.apply(command, data.first().copied().unwrap_or(0));
        Ok(())
    }

    fn read_block(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), TransportError> {
        self.begin(
            address,
            Transaction::Read {
                address,
                register,
                len: buffer.len(),
            },
        )?;
        buffer.fill(0);
        if let Some(first) = buffer.first_mut() {
            *first = self.selected.unwrap_or(0);
        }
        Ok(())
    }
}
