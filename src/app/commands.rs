//! Inbound commands to the controller.
//!
//! The selection layer hands over a raw `(class, menu index)` pair; this
//! module turns it into a typed [`Command`] or rejects it.

use crate::devices::{
    BottlesCommand, CauldronCommand, DeviceClass, DeviceConfig, GlowwormCommand,
};

/// What the operator picked: a device class and a position in its menu.
///
/// Index 0 is the "Back" entry; commands start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub class: DeviceClass,
    pub index: u8,
}

impl Selection {
    pub const fn new(class: DeviceClass, index: u8) -> Self {
        Self { class, index }
    }
}

/// A typed command for one device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Bottles(BottlesCommand),
    Cauldron(CauldronCommand),
    Glowworm(GlowwormCommand),
}

impl Command {
    /// Resolve a menu selection. Back (index 0) and out-of-range indices
    /// are not commands.
    pub fn from_selection(sel: Selection) -> Option<Self> {
        let pos = usize::from(sel.index.checked_sub(1)?);
        match sel.class {
            DeviceClass::Bottles => BottlesCommand::ALL.get(pos).copied().map(Self::Bottles),
            DeviceClass::Cauldron => CauldronCommand::ALL.get(pos).copied().map(Self::Cauldron),
            DeviceClass::Glowworm => GlowwormCommand::ALL.get(pos).copied().map(Self::Glowworm),
        }
    }

    pub const fn class(&self) -> DeviceClass {
        match self {
            Self::Bottles(_) => DeviceClass::Bottles,
            Self::Cauldron(_) => DeviceClass::Cauldron,
            Self::Glowworm(_) => DeviceClass::Glowworm,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bottles(c) => c.label(),
            Self::Cauldron(c) => c.label(),
            Self::Glowworm(c) => c.label(),
        }
    }

    /// Compute the next configuration for `current`.
    ///
    /// Returns `None` when the command belongs to a different class than
    /// `current`; nothing is applied in that case.
    pub fn apply(self, current: DeviceConfig) -> Option<DeviceConfig> {
        match (self, current) {
            (Self::Bottles(cmd), DeviceConfig::Bottles(c)) => {
                Some(DeviceConfig::Bottles(c.apply(cmd)))
            }
            (Self::Cauldron(cmd), DeviceConfig::Cauldron(c)) => {
                Some(DeviceConfig::Cauldron(c.apply(cmd)))
            }
            (Self::Glowworm(cmd), DeviceConfig::Glowworm(c)) => {
                Some(DeviceConfig::Glowworm(c.apply(cmd)))
            }
            _ => None,
        }
    }
}
