//! Glowworm: two antenna lights with a blink flag, plus an RGB body colour.
//!
//! Wire layout (4 bytes):
//! ```text
//! ┌─────────────┬────┬────┬────┐
//! │ antenna (1B)│ r  │ g  │ b  │
//! └─────────────┴────┴────┴────┘
//! ```

use core::ops::{BitOr, BitXor};

use crate::error::WireError;

/// Bitmask over the antenna outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Antenna(u8);

impl Antenna {
    pub const NONE: Self = Self(0);
    pub const LEFT: Self = Self(0b001);
    pub const RIGHT: Self = Self(0b010);
    pub const BLINK: Self = Self(0b100);
    pub const BOTH: Self = Self(0b011);

    const KNOWN: u8 = 0b111;

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::KNOWN == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Antenna {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitXor for Antenna {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

/// Configuration pushed to a Glowworm receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlowwormConfig {
    pub antenna: Antenna,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl GlowwormConfig {
    pub const WIRE_SIZE: usize = 4;

    pub const OFF: Self = Self {
        antenna: Antenna::NONE,
        r: 0,
        g: 0,
        b: 0,
    };

    /// Off blanks everything. Antenna commands XOR bits and keep the colour;
    /// colour presets overwrite r/g/b and keep the antenna.
    pub fn apply(self, cmd: GlowwormCommand) -> Self {
        let flip = match cmd {
            GlowwormCommand::Off => return Self::OFF,
            GlowwormCommand::ToggleBoth => Antenna::BOTH,
            GlowwormCommand::ToggleLeft => Antenna::LEFT,
            GlowwormCommand::ToggleRight => Antenna::RIGHT,
            GlowwormCommand::Blink => Antenna::BLINK,
            GlowwormCommand::Colour(preset) => {
                let (r, g, b) = preset.rgb();
                return Self { r, g, b, ..self };
            }
        };
        Self {
            antenna: self.antenna ^ flip,
            ..self
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub fn to_bytes(&self) -> [u8; Self::WIRE_SIZE] {
        [self.antenna.bits(), self.r, self.g, self.b]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let &[antenna, r, g, b] = bytes else {
            return Err(WireError::Length {
                expected: Self::WIRE_SIZE,
                actual: bytes.len(),
            });
        };
        let antenna = Antenna::from_bits(antenna).ok_or(WireError::InvalidMode(antenna))?;
        Ok(Self { antenna, r, g, b })
    }
}

/// Fixed body colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColourPreset {
    Red,
    Green,
    Blue,
    Yellow,
    Pink,
}

impl ColourPreset {
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Red => (0xa0, 0, 0),
            Self::Green => (0, 0xa0, 0),
            Self::Blue => (0, 0, 0xa0),
            Self::Yellow => (0xa0, 0xa0, 0),
            Self::Pink => (0xff, 0x0a, 0x50), // deep pink
        }
    }
}

/// Commands offered on the Glowworm menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlowwormCommand {
    Off,
    ToggleBoth,
    ToggleLeft,
    ToggleRight,
    Blink,
    Colour(ColourPreset),
}

impl GlowwormCommand {
    /// Menu order; position `i` is menu index `i + 1` (index 0 is Back).
    pub const ALL: [Self; 10] = [
        Self::Off,
        Self::ToggleBoth,
        Self::ToggleLeft,
        Self::ToggleRight,
        Self::Blink,
        Self::Colour(ColourPreset::Red),
        Self::Colour(ColourPreset::Green),
        Self::Colour(ColourPreset::Blue),
        Self::Colour(ColourPreset::Yellow),
        Self::Colour(ColourPreset::Pink),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::ToggleBoth => "Toggle both",
            Self::ToggleLeft => "Left",
            Self::ToggleRight => "Right",
            Self::Blink => "Blink",
            Self::Colour(ColourPreset::Red) => "Red",
            Self::Colour(ColourPreset::Green) => "Green",
            Self::Colour(ColourPreset::Blue) => "Blue",
            Self::Colour(ColourPreset::Yellow) => "Yellow",
            Self::Colour(ColourPreset::Pink) => "Pink",
        }
    }
}
