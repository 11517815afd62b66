//! Unified error types for the controller firmware.
//!
//! A single `Error` enum that every subsystem converts into. All variants
//! are `Copy` so they can be handed across the port boundary without
//! allocation.

use core::fmt;

pub use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A payload did not match the fixed layout of its device class.
    Wire(WireError),
    /// Controller configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(e) => write!(f, "wire: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Wire format errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    /// Payload length differs from the class's fixed layout.
    Length { expected: usize, actual: usize },
    /// A mode/antenna byte carries a value the device class cannot hold.
    InvalidMode(u8),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { expected, actual } => {
                write!(f, "expected {expected} bytes, got {actual}")
            }
            Self::InvalidMode(m) => write!(f, "invalid mode 0x{m:02x}"),
        }
    }
}

impl From<WireError> for Error {
    fn from(e: WireError) -> Self {
        Self::Wire(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Radio errors
// ---------------------------------------------------------------------------

/// Errors raised inside the transceiver adapter.
///
/// These never cross the [`RadioPort`](crate::app::ports::RadioPort)
/// boundary and so have no [`Error`] variant: the adapter logs them and
/// the exchange degrades to a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// SPI transaction failed.
    Bus(embedded_hal::spi::ErrorKind),
    /// CE pin could not be driven.
    Pin,
    /// The chip did not report TX_DS or MAX_RT in time.
    TxStalled,
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(kind) => write!(f, "SPI bus error ({kind})"),
            Self::Pin => write!(f, "CE pin write failed"),
            Self::TxStalled => write!(f, "transmit did not complete"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
