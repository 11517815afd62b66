//! Bottles: a light array with four mutually exclusive modes.
//!
//! Wire layout (1 byte):
//! ```text
//! ┌──────────┐
//! │ mode (1B)│
//! └──────────┘
//! ```

use crate::error::WireError;

/// Lighting mode. Exactly one is active; `None` is all outputs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BottlesMode {
    #[default]
    None = 0,
    Rigging = 1,
    Red = 2,
    White = 3,
}

impl BottlesMode {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Self::None),
            1 => Some(Self::Rigging),
            2 => Some(Self::Red),
            3 => Some(Self::White),
            _ => None,
        }
    }
}

/// Configuration pushed to a Bottles receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BottlesConfig {
    pub mode: BottlesMode,
}

impl BottlesConfig {
    pub const WIRE_SIZE: usize = 1;

    pub const OFF: Self = Self {
        mode: BottlesMode::None,
    };

    /// Compute the configuration that follows `cmd`.
    ///
    /// Off always clears. Any other command toggles its own mode: selecting
    /// the active mode turns it off, selecting another switches directly.
    pub fn apply(self, cmd: BottlesCommand) -> Self {
        let target = match cmd {
            BottlesCommand::Off => return Self::OFF,
            BottlesCommand::Rigging => BottlesMode::Rigging,
            BottlesCommand::Red => BottlesMode::Red,
            BottlesCommand::White => BottlesMode::White,
        };
        let mode = if self.mode == target {
            BottlesMode::None
        } else {
            target
        };
        Self { mode }
    }

    pub fn to_bytes(&self) -> [u8; Self::WIRE_SIZE] {
        [self.mode as u8]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let &[mode] = bytes else {
            return Err(WireError::Length {
                expected: Self::WIRE_SIZE,
                actual: bytes.len(),
            });
        };
        let mode = BottlesMode::from_byte(mode).ok_or(WireError::InvalidMode(mode))?;
        Ok(Self { mode })
    }
}

/// Commands offered on the Bottles menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BottlesCommand {
    Off,
    Rigging,
    Red,
    White,
}

impl BottlesCommand {
    /// Menu order; position `i` is menu index `i + 1` (index 0 is Back).
    pub const ALL: [Self; 4] = [Self::Off, Self::Rigging, Self::Red, Self::White];

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Rigging => "Rigging",
            Self::Red => "Red",
            Self::White => "White",
        }
    }
}
