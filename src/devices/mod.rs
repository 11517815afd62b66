//! Device configuration models — one fixed-layout record per device class.
//!
//! The byte layout of each record **is** the wire format: the link payload
//! width is derived from [`DeviceClass::payload_size`], and the receivers
//! are fixed-firmware devices that decode exactly these bytes.
//!
//! | Class    | Id | Bytes | Layout              |
//! |----------|----|-------|---------------------|
//! | Bottles  | 1  | 1     | mode                |
//! | Cauldron | 2  | 1     | mode bitmask        |
//! | Glowworm | 3  | 4     | antenna, r, g, b    |

pub mod bottles;
pub mod cauldron;
pub mod glowworm;

use crate::error::Result;

pub use bottles::{BottlesCommand, BottlesConfig, BottlesMode};
pub use cauldron::{CauldronCommand, CauldronConfig, CauldronMode};
pub use glowworm::{Antenna, ColourPreset, GlowwormCommand, GlowwormConfig};

/// Largest payload the transceiver can carry in one frame.
pub const MAX_PAYLOAD_SIZE: usize = 32;

/// A raw payload as written to or read from the link.
pub type Payload = heapless::Vec<u8, MAX_PAYLOAD_SIZE>;

// ---------------------------------------------------------------------------
// Device class identity
// ---------------------------------------------------------------------------

/// The controllable device classes. The discriminant is the stable
/// identifier used to index pipe addresses (0 is reserved).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeviceClass {
    Bottles = 1,
    Cauldron = 2,
    Glowworm = 3,
}

impl DeviceClass {
    pub const COUNT: usize = 3;

    pub const ALL: [Self; Self::COUNT] = [Self::Bottles, Self::Cauldron, Self::Glowworm];

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn from_index(idx: u8) -> Option<Self> {
        match idx {
            1 => Some(Self::Bottles),
            2 => Some(Self::Cauldron),
            3 => Some(Self::Glowworm),
            _ => None,
        }
    }

    /// Fixed payload width for this class.
    pub const fn payload_size(self) -> usize {
        match self {
            Self::Bottles => BottlesConfig::WIRE_SIZE,
            Self::Cauldron => CauldronConfig::WIRE_SIZE,
            Self::Glowworm => GlowwormConfig::WIRE_SIZE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bottles => "Bottles",
            Self::Cauldron => "Cauldron",
            Self::Glowworm => "Glowworm",
        }
    }
}

// ---------------------------------------------------------------------------
// Tagged configuration
// ---------------------------------------------------------------------------

/// The configuration of one device, tagged with its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceConfig {
    Bottles(BottlesConfig),
    Cauldron(CauldronConfig),
    Glowworm(GlowwormConfig),
}

impl DeviceConfig {
    /// The all-off value for `class`.
    pub const fn off(class: DeviceClass) -> Self {
        match class {
            DeviceClass::Bottles => Self::Bottles(BottlesConfig::OFF),
            DeviceClass::Cauldron => Self::Cauldron(CauldronConfig::OFF),
            DeviceClass::Glowworm => Self::Glowworm(GlowwormConfig::OFF),
        }
    }

    pub const fn class(&self) -> DeviceClass {
        match self {
            Self::Bottles(_) => DeviceClass::Bottles,
            Self::Cauldron(_) => DeviceClass::Cauldron,
            Self::Glowworm(_) => DeviceClass::Glowworm,
        }
    }

    pub fn is_off(&self) -> bool {
        *self == Self::off(self.class())
    }

    /// Encode to the class's fixed wire layout.
    pub fn encode(&self) -> Payload {
        // Every layout is far below MAX_PAYLOAD_SIZE.
        match self {
            Self::Bottles(c) => Payload::from_slice(&c.to_bytes()),
            Self::Cauldron(c) => Payload::from_slice(&c.to_bytes()),
            Self::Glowworm(c) => Payload::from_slice(&c.to_bytes()),
        }
        .unwrap_or_default()
    }

    /// Decode `bytes` as a `class` record.
    pub fn decode(class: DeviceClass, bytes: &[u8]) -> Result<Self> {
        Ok(match class {
            DeviceClass::Bottles => Self::Bottles(BottlesConfig::from_bytes(bytes)?),
            DeviceClass::Cauldron => Self::Cauldron(CauldronConfig::from_bytes(bytes)?),
            DeviceClass::Glowworm => Self::Glowworm(GlowwormConfig::from_bytes(bytes)?),
        })
    }
}

// ---------------------------------------------------------------------------
// Per-class current state
// ---------------------------------------------------------------------------

/// Last-known local configuration of every device class.
///
/// Created all-off at startup and updated in place; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceStates {
    pub bottles: BottlesConfig,
    pub cauldron: CauldronConfig,
    pub glowworm: GlowwormConfig,
}

impl DeviceStates {
    pub fn get(&self, class: DeviceClass) -> DeviceConfig {
        match class {
            DeviceClass::Bottles => DeviceConfig::Bottles(self.bottles),
            DeviceClass::Cauldron => DeviceConfig::Cauldron(self.cauldron),
            DeviceClass::Glowworm => DeviceConfig::Glowworm(self.glowworm),
        }
    }

    /// Overwrite the slot matching `config`'s class.
    pub fn set(&mut self, config: DeviceConfig) {
        match config {
            DeviceConfig::Bottles(c) => self.bottles = c,
            DeviceConfig::Cauldron(c) => self.cauldron = c,
            DeviceConfig::Glowworm(c) => self.glowworm = c,
        }
    }
}
