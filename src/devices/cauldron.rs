//! Cauldron: fan, fire and glow effects, each independently switchable.
//!
//! Wire layout (1 byte): the mode bitmask.

use core::ops::{BitOr, BitXor};

use crate::error::WireError;

/// Bitmask over the cauldron's effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CauldronMode(u8);

impl CauldronMode {
    pub const NONE: Self = Self(0);
    pub const FAN: Self = Self(0b001);
    pub const FIRE: Self = Self(0b010);
    pub const GLOW: Self = Self(0b100);
    pub const ALL: Self = Self(0b111);

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Accepts only bits the cauldron knows about.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::ALL.0 == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CauldronMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitXor for CauldronMode {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

/// Configuration pushed to a Cauldron receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CauldronConfig {
    pub mode: CauldronMode,
}

impl CauldronConfig {
    pub const WIRE_SIZE: usize = 1;

    pub const OFF: Self = Self {
        mode: CauldronMode::NONE,
    };

    /// Off clears unconditionally; every toggle XORs its bits into the mode.
    pub fn apply(self, cmd: CauldronCommand) -> Self {
        let flip = match cmd {
            CauldronCommand::Off => return Self::OFF,
            CauldronCommand::ToggleAll => CauldronMode::ALL,
            CauldronCommand::ToggleFan => CauldronMode::FAN,
            CauldronCommand::ToggleFire => CauldronMode::FIRE,
            CauldronCommand::ToggleGlow => CauldronMode::GLOW,
        };
        Self {
            mode: self.mode ^ flip,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::WIRE_SIZE] {
        [self.mode.bits()]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let &[bits] = bytes else {
            return Err(WireError::Length {
                expected: Self::WIRE_SIZE,
                actual: bytes.len(),
            });
        };
        let mode = CauldronMode::from_bits(bits).ok_or(WireError::InvalidMode(bits))?;
        Ok(Self { mode })
    }
}

/// Commands offered on the Cauldron menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CauldronCommand {
    Off,
    ToggleAll,
    ToggleFan,
    ToggleFire,
    ToggleGlow,
}

impl CauldronCommand {
    /// Menu order; position `i` is menu index `i + 1` (index 0 is Back).
    pub const ALL: [Self; 5] = [
        Self::Off,
        Self::ToggleAll,
        Self::ToggleFan,
        Self::ToggleFire,
        Self::ToggleGlow,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::ToggleAll => "Toggle all",
            Self::ToggleFan => "Fan",
            Self::ToggleFire => "Fire",
            Self::ToggleGlow => "Glow",
        }
    }
}
