//! The AD51xx device handle.

use crate::codec::{
    denormalize, normalize, Command, OperationalMode, ReadBackSource, Step, Target,
};
use crate::consts::{self, MAX_CHANNELS};
use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::variant::Variant;
use log::{debug, trace, warn};

/// A handle to one AD51xx chip on a bus.
///
/// The handle owns its [`Transport`] (pass `&mut bus` to share one bus between
/// several chips) and keeps a cache of the last wiper value written to or read
/// back from each channel. The cache holds device-native values: for 7-bit
/// parts these are the caller's values shifted left by one.
///
/// **Note:** The cache is not synchronized; one owner per physical chip.
#[derive(Debug)]
pub struct Ad51xx<T: Transport> {
    transport: T,
    address: u8,
    variant: Variant,
    last_value: [u8; MAX_CHANNELS],
}

impl<T: Transport> Ad51xx<T> {
    // --- Constructors and Info ---

    /// Creates a handle for a chip of the given model at a 7-bit bus address.
    /// Nothing is sent on the bus until [`connect`](Self::connect).
    pub fn new(transport: T, address: u8, variant: Variant) -> Result<Self> {
        if address > consts::MAX_I2C_ADDRESS {
            return Err(Error::InvalidAddress(address));
        }
        debug!("Created {} handle at address 0x{:02X}", variant, address);
        Ok(Ad51xx {
            transport,
            address,
            variant,
            last_value: [0; MAX_CHANNELS],
        })
    }

    /// Checks the chip is present and, if `reset_on_connect`, resets it so the
    /// cache reflects the EEPROM power-on values.
    pub fn connect(&mut self, reset_on_connect: bool) -> Result<()> {
        if !self.is_connected() {
            warn!("No {} found at 0x{:02X}", self.variant.name(), self.address);
            return Err(Error::DeviceNotFound {
                address: self.address,
            });
        }
        debug!("{} present at 0x{:02X}", self.variant.name(), self.address);
        if reset_on_connect {
            self.reset()?;
        }
        Ok(())
    }

    /// Connects and resets. Equivalent to `connect(true)`.
    pub fn begin(&mut self) -> Result<()> {
        self.connect(true)
    }

    /// Probes the bus for the chip. Does not touch the cache.
    pub fn is_connected(&mut self) -> bool {
        self.transport.probe(self.address)
    }

    /// Issues a software reset, which reloads every wiper from EEPROM, then
    /// refreshes the cache from the EEPROM values.
    pub fn reset(&mut self) -> Result<()> {
        self.send(Command::Reset)?;
        let mut refreshed = self.last_value;
        for channel in 0..self.variant.channel_count() {
            refreshed[channel as usize] = self.read_back(channel, ReadBackSource::Eeprom)?;
        }
        self.last_value = refreshed;
        debug!("Reset complete, cache = {:02X?}", self.cache());
        Ok(())
    }

    #[inline]
    pub fn address(&self) -> u8 {
        self.address
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Number of wiper channels on this chip.
    #[inline]
    pub fn channel_count(&self) -> u8 {
        self.variant.channel_count()
    }

    /// Largest wiper value accepted by this chip (127 or 255).
    #[inline]
    pub fn max_value(&self) -> u8 {
        self.variant.max_value()
    }

    /// Raw cached value for a channel in device-native units (no shift applied).
    pub fn cached_value(&self, channel: u8) -> Result<u8> {
        self.check_channel(channel)?;
        Ok(self.last_value[channel as usize])
    }

    /// Mutable access to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Destroys the handle and hands back the transport.
    pub fn release(self) -> T {
        self.transport
    }

    // --- Read / Write ---

    /// Moves one wiper to `value` (0..=max_value).
    pub fn write(&mut self, channel: u8, value: u8) -> Result<()> {
        self.check_channel(channel)?;
        let raw = self.check_value(value)?;
        debug!("Write channel {} = {} (raw 0x{:02X})", channel, value, raw);
        self.send(Command::WriteRdac {
            target: Target::Channel(channel),
            value: raw,
        })?;
        self.last_value[channel as usize] = raw;
        Ok(())
    }

    /// Moves every wiper to `value` with a single command.
    pub fn write_all(&mut self, value: u8) -> Result<()> {
        let raw = self.check_value(value)?;
        debug!("Write all channels = {} (raw 0x{:02X})", value, raw);
        self.send(Command::WriteRdac {
            target: Target::All,
            value: raw,
        })?;
        self.last_value = [raw; MAX_CHANNELS];
        Ok(())
    }

    /// Last known wiper value for a channel, in caller units. No bus access.
    pub fn read(&self, channel: u8) -> Result<u8> {
        let raw = self.cached_value(channel)?;
        Ok(denormalize(raw, self.max_value()))
    }

    pub fn zero(&mut self, channel: u8) -> Result<()> {
        self.write(channel, 0)
    }

    pub fn mid_scale(&mut self, channel: u8) -> Result<()> {
        self.write(channel, self.mid_value())
    }

    pub fn max_scale(&mut self, channel: u8) -> Result<()> {
        self.write(channel, self.max_value())
    }

    pub fn zero_all(&mut self) -> Result<()> {
        self.write_all(0)
    }

    pub fn mid_scale_all(&mut self) -> Result<()> {
        self.write_all(self.mid_value())
    }

    pub fn max_scale_all(&mut self) -> Result<()> {
        self.write_all(self.max_value())
    }

    // --- EEPROM ---

    /// Stores a wiper default in EEPROM. With `None` the current wiper
    /// position is copied; with `Some(value)` that value is written directly.
    pub fn store_to_memory(&mut self, channel: u8, value: Option<u8>) -> Result<()> {
        self.check_channel(channel)?;
        match value {
            None => {
                debug!("Store channel {} wiper to EEPROM", channel);
                self.send(Command::StoreCurrentToEeprom { channel })
            }
            Some(value) => {
                let raw = self.check_value(value)?;
                debug!("Store channel {} = {} to EEPROM", channel, value);
                self.send(Command::StoreValueToEeprom { channel, value: raw })
            }
        }
    }

    /// Restores a wiper from its EEPROM default and refreshes the cache.
    pub fn recall_from_memory(&mut self, channel: u8) -> Result<()> {
        self.check_channel(channel)?;
        let stored = self.read_back(channel, ReadBackSource::Eeprom)?;
        debug!("Recall channel {} from EEPROM (raw 0x{:02X})", channel, stored);
        self.send(Command::RecallFromEeprom { channel })?;
        self.last_value[channel as usize] = stored;
        Ok(())
    }

    // --- Scale ---

    pub fn set_top_scale(&mut self, channel: u8) -> Result<()> {
        self.check_channel(channel)?;
        self.send(Command::TopScale {
            target: Target::Channel(channel),
            enable: true,
        })
    }

    pub fn clear_top_scale(&mut self, channel: u8) -> Result<()> {
        self.check_channel(channel)?;
        self.send(Command::TopScale {
            target: Target::Channel(channel),
            enable: false,
        })
    }

    pub fn set_top_scale_all(&mut self) -> Result<()> {
        self.send(Command::TopScale {
            target: Target::All,
            enable: true,
        })
    }

    pub fn clear_top_scale_all(&mut self) -> Result<()> {
        self.send(Command::TopScale {
            target: Target::All,
            enable: false,
        })
    }

    pub fn set_bottom_scale(&mut self, channel: u8) -> Result<()> {
        self.check_channel(channel)?;
        self.send(Command::BottomScale {
            target: Target::Channel(channel),
            enable: true,
        })
    }

    pub fn clear_bottom_scale(&mut self, channel: u8) -> Result<()> {
        self.check_channel(channel)?;
        self.send(Command::BottomScale {
            target: Target::Channel(channel),
            enable: false,
        })
    }

    pub fn set_bottom_scale_all(&mut self) -> Result<()> {
        self.send(Command::BottomScale {
            target: Target::All,
            enable: true,
        })
    }

    pub fn clear_bottom_scale_all(&mut self) -> Result<()> {
        self.send(Command::BottomScale {
            target: Target::All,
            enable: false,
        })
    }

    // --- Mode ---

    /// Switches to linear gain setting mode, preserving the other control bits.
    pub fn set_linear_mode(&mut self, channel: u8) -> Result<()> {
        self.set_operational_mode(channel, OperationalMode::Linear)
    }

    /// Switches to potentiometer mode, preserving the other control bits.
    pub fn set_potentiometer_mode(&mut self, channel: u8) -> Result<()> {
        self.set_operational_mode(channel, OperationalMode::Potentiometer)
    }

    /// Reads the current operating mode from the control register.
    pub fn operational_mode(&mut self, channel: u8) -> Result<OperationalMode> {
        self.check_channel(channel)?;
        let mask = self.read_back(channel, ReadBackSource::Control)?;
        Ok(OperationalMode::from_control(mask))
    }

    fn set_operational_mode(&mut self, channel: u8, mode: OperationalMode) -> Result<()> {
        self.check_channel(channel)?;
        let mask = self.read_back(channel, ReadBackSource::Control)?;
        let new_mask = mode.apply_to(mask);
        debug!(
            "Set {:?} mode: control 0x{:02X} -> 0x{:02X}",
            mode, mask, new_mask
        );
        self.send(Command::WriteControl(new_mask))
    }

    // --- Increment / Decrement ---

    pub fn increment_linear(&mut self, channel: u8) -> Result<()> {
        self.step_linear(Some(channel), Step::Increment)
    }

    pub fn decrement_linear(&mut self, channel: u8) -> Result<()> {
        self.step_linear(Some(channel), Step::Decrement)
    }

    pub fn increment_linear_all(&mut self) -> Result<()> {
        self.step_linear(None, Step::Increment)
    }

    pub fn decrement_linear_all(&mut self) -> Result<()> {
        self.step_linear(None, Step::Decrement)
    }

    pub fn increment_6db(&mut self, channel: u8) -> Result<()> {
        self.step_6db(Some(channel), Step::Increment)
    }

    pub fn decrement_6db(&mut self, channel: u8) -> Result<()> {
        self.step_6db(Some(channel), Step::Decrement)
    }

    pub fn increment_6db_all(&mut self) -> Result<()> {
        self.step_6db(None, Step::Increment)
    }

    pub fn decrement_6db_all(&mut self) -> Result<()> {
        self.step_6db(None, Step::Decrement)
    }

    // The chip's step counters are not mirrored in the cache.
    fn step_linear(&mut self, channel: Option<u8>, step: Step) -> Result<()> {
        let target = self.target(channel)?;
        self.send(Command::StepLinear { target, step })
    }

    fn step_6db(&mut self, channel: Option<u8>, step: Step) -> Result<()> {
        let target = self.target(channel)?;
        self.send(Command::Step6dB { target, step })
    }

    // --- Preload / Sync ---

    /// Stages `value` in a channel's input register without moving the wiper.
    /// Apply it later with [`sync`](Self::sync).
    pub fn preload(&mut self, channel: u8, value: u8) -> Result<()> {
        self.check_channel(channel)?;
        let raw = self.check_value(value)?;
        debug!("Preload channel {} = {}", channel, value);
        self.send(Command::Preload {
            target: Target::Channel(channel),
            value: raw,
        })
    }

    /// Stages `value` in every input register.
    pub fn preload_all(&mut self, value: u8) -> Result<()> {
        let raw = self.check_value(value)?;
        debug!("Preload all channels = {}", value);
        self.send(Command::Preload {
            target: Target::All,
            value: raw,
        })
    }

    /// Copies the preloaded input registers of the channels in `mask` (bit n =
    /// channel n) to their wipers simultaneously, then refreshes those channels'
    /// cache from the RDAC registers.
    pub fn sync(&mut self, mask: u8) -> Result<()> {
        if mask > consts::SYNC_MASK_MAX {
            return Err(Error::InvalidMask(mask));
        }
        debug!("Sync channels with mask 0b{:04b}", mask);
        self.send(Command::Sync { mask })?;
        let mut refreshed = self.last_value;
        for channel in 0..self.variant.channel_count() {
            if mask & (1 << channel) != 0 {
                refreshed[channel as usize] = self.read_back(channel, ReadBackSource::Rdac)?;
            }
        }
        self.last_value = refreshed;
        Ok(())
    }

    // --- Misc ---

    /// Puts the chip into shutdown (all wipers open at the A terminal).
    pub fn shutdown(&mut self) -> Result<()> {
        debug!("Shutdown");
        self.send(Command::Shutdown)
    }

    /// Writes the raw control register. Unlike the mode setters this does not
    /// preserve any bits.
    pub fn write_control_register(&mut self, mask: u8) -> Result<()> {
        debug!("Write control register = 0x{:02X}", mask);
        self.send(Command::WriteControl(mask))
    }

    pub fn read_back_input(&mut self, channel: u8) -> Result<u8> {
        self.read_back_value(channel, ReadBackSource::Input)
    }

    pub fn read_back_eeprom(&mut self, channel: u8) -> Result<u8> {
        self.read_back_value(channel, ReadBackSource::Eeprom)
    }

    /// Raw control register value.
    pub fn read_back_control(&mut self, channel: u8) -> Result<u8> {
        self.read_back_value(channel, ReadBackSource::Control)
    }

    /// Live wiper position as reported by the chip.
    pub fn read_back_rdac(&mut self, channel: u8) -> Result<u8> {
        self.read_back_value(channel, ReadBackSource::Rdac)
    }

    fn read_back_value(&mut self, channel: u8, source: ReadBackSource) -> Result<u8> {
        self.check_channel(channel)?;
        let raw = self.read_back(channel, source)?;
        if source.is_wiper_value() {
            Ok(denormalize(raw, self.max_value()))
        } else {
            Ok(raw)
        }
    }

    // --- Internal ---

    fn check_channel(&self, channel: u8) -> Result<()> {
        if channel >= self.variant.channel_count() {
            return Err(Error::InvalidChannel {
                channel,
                channel_count: self.variant.channel_count(),
            });
        }
        Ok(())
    }

    // Validates a caller value and returns it in device-native units.
    fn check_value(&self, value: u8) -> Result<u8> {
        if value > self.max_value() {
            return Err(Error::InvalidValue {
                value,
                max_value: self.max_value(),
            });
        }
        Ok(normalize(value, self.max_value()))
    }

    fn target(&self, channel: Option<u8>) -> Result<Target> {
        match channel {
            Some(channel) => {
                self.check_channel(channel)?;
                Ok(Target::Channel(channel))
            }
            None => Ok(Target::All),
        }
    }

    #[inline]
    fn mid_value(&self) -> u8 {
        ((self.max_value() as u16 + 1) / 2) as u8
    }

    fn cache(&self) -> &[u8] {
        &self.last_value[..self.variant.channel_count() as usize]
    }

    fn send(&mut self, command: Command) -> Result<()> {
        let [cmd, data] = command.encode();
        trace!("0x{:02X} <- [0x{:02X}, 0x{:02X}]", self.address, cmd, data);
        self.transport.write_block(self.address, cmd, &[data])?;
        Ok(())
    }

    // Selects a register for read-back, then reads the single result byte.
    fn read_back(&mut self, channel: u8, source: ReadBackSource) -> Result<u8> {
        self.send(Command::ReadBack { channel, source })?;
        let mut buf = [0u8; 1];
        self.transport
            .read_block(self.address, consts::cmd::NOP, &mut buf)?;
        trace!(
            "Read back {:?} channel {} = 0x{:02X}",
            source,
            channel,
            buf[0]
        );
        Ok(buf[0])
    }
}
