//! Supported chip models.

use std::fmt;

/// A supported AD51xx chip model: its channel count and wiper resolution.
///
/// Variants are only available through the associated constants; a device is
/// never built from arbitrary parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variant {
    name: &'static str,
    channel_count: u8,
    max_value: u8,
}

impl Variant {
    /// Single channel, 128 positions.
    pub const AD5121: Variant = Variant::new("AD5121", 1, 127);
    /// Single channel, 256 positions.
    pub const AD5141: Variant = Variant::new("AD5141", 1, 255);
    /// Dual channel, 128 positions.
    pub const AD5122A: Variant = Variant::new("AD5122A", 2, 127);
    /// Dual channel, 256 positions.
    pub const AD5142A: Variant = Variant::new("AD5142A", 2, 255);
    /// Quad channel, 128 positions.
    pub const AD5123: Variant = Variant::new("AD5123", 4, 127);
    /// Quad channel, 128 positions.
    pub const AD5124: Variant = Variant::new("AD5124", 4, 127);
    /// Quad channel, 256 positions.
    pub const AD5143: Variant = Variant::new("AD5143", 4, 255);
    /// Quad channel, 256 positions.
    pub const AD5144: Variant = Variant::new("AD5144", 4, 255);
    /// Quad channel, 256 positions.
    pub const AD5144A: Variant = Variant::new("AD5144A", 4, 255);

    /// Every supported model.
    pub const ALL: [Variant; 9] = [
        Variant::AD5121,
        Variant::AD5141,
        Variant::AD5122A,
        Variant::AD5142A,
        Variant::AD5123,
        Variant::AD5124,
        Variant::AD5143,
        Variant::AD5144,
        Variant::AD5144A,
    ];

    const fn new(name: &'static str, channel_count: u8, max_value: u8) -> Self {
        Variant {
            name,
            channel_count,
            max_value,
        }
    }

    /// Looks up a model by its part number, ignoring ASCII case.
    pub fn by_name(name: &str) -> Option<Variant> {
        Variant::ALL
            .iter()
            .copied()
            .find(|v| v.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Part number, e.g. `"AD5144A"`.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of independently addressable wipers (1, 2 or 4).
    #[inline]
    pub fn channel_count(&self) -> u8 {
        self.channel_count
    }

    /// Largest wiper value in caller-facing units (127 or 255).
    #[inline]
    pub fn max_value(&self) -> u8 {
        self.max_value
    }

    /// Wiper resolution in bits (7 or 8).
    #[inline]
    pub fn resolution_bits(&self) -> u8 {
        if self.max_value == 127 {
            7
        } else {
            8
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}ch, {}-bit)",
            self.name,
            self.channel_count,
            self.resolution_bits()
        )
    }
}
