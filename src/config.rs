//! Controller configuration parameters
//!
//! Link parameters, pipe addresses and the echo timeout budget.
//! Values are fixed at build time via [`Default`] and can be overridden
//! from a JSON document (e.g. pasted over the console) after validation.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::devices::DeviceClass;
use crate::error::Result;

/// Length of every pipe address on the link.
pub const ADDRESS_WIDTH: usize = 5;

/// A pipe address as written to the transceiver (LSB first on the air).
pub type Address = [u8; ADDRESS_WIDTH];

/// Highest RF channel the transceiver accepts (2400 + 125 MHz).
pub const MAX_CHANNEL: u8 = 125;

/// Upper bound on the echo timeout; anything longer freezes the UI for too long.
pub const MAX_ECHO_TIMEOUT_MS: u32 = 10_000;

/// Transmit power amplifier level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerLevel {
    Min,
    Low,
    High,
    Max,
}

/// Air data rate. Slower is more robust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataRate {
    Kbps250,
    Mbps1,
    Mbps2,
}

/// Hardware auto-retransmit policy applied inside every `write`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Delay between retries in steps of 250 µs (0 = 250 µs, 15 = 4000 µs).
    pub delay: u8,
    /// Number of retransmits before giving up (0–15).
    pub count: u8,
}

/// Transceiver settings applied once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioSettings {
    pub channel: u8,
    pub power: PowerLevel,
    pub data_rate: DataRate,
    pub retry: RetryPolicy,
}

impl Default for RadioSettings {
    fn default() -> Self {
        Self {
            channel: 108, // above most 2.4 GHz WiFi traffic
            power: PowerLevel::Max,
            data_rate: DataRate::Kbps250,
            retry: RetryPolicy { delay: 15, count: 15 },
        }
    }
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub radio: RadioSettings,
    /// How long to wait for an echo before reporting failure (milliseconds).
    pub echo_timeout_ms: u32,
    /// Shared address the controller listens on for echoes (pipe 1).
    pub listen_address: Address,
    /// Per-class send addresses, indexed by `DeviceClass::index() - 1`.
    pub device_addresses: [Address; DeviceClass::COUNT],
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            radio: RadioSettings::default(),
            echo_timeout_ms: 500,
            listen_address: *b"CTRL0",
            device_addresses: [*b"BOTL1", *b"CAUL2", *b"GLOW3"],
        }
    }
}

impl ControllerConfig {
    /// Send address for `class`.
    pub fn address_for(&self, class: DeviceClass) -> Address {
        self.device_addresses[class.index() as usize - 1]
    }

    /// Reject out-of-range values. Nothing is clamped.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.radio.channel > MAX_CHANNEL {
            return Err(ConfigError::ValidationFailed("channel above 125"));
        }
        if self.radio.retry.delay > 15 {
            return Err(ConfigError::ValidationFailed("retry delay above 15"));
        }
        if self.radio.retry.count > 15 {
            return Err(ConfigError::ValidationFailed("retry count above 15"));
        }
        if self.echo_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("echo timeout is zero"));
        }
        if self.echo_timeout_ms > MAX_ECHO_TIMEOUT_MS {
            return Err(ConfigError::ValidationFailed("echo timeout above 10s"));
        }

        let addrs = &self.device_addresses;
        if addrs.contains(&self.listen_address) {
            return Err(ConfigError::ValidationFailed(
                "device address equals listen address",
            ));
        }
        for (i, a) in addrs.iter().enumerate() {
            if addrs[i + 1..].contains(a) {
                return Err(ConfigError::ValidationFailed("duplicate device address"));
            }
        }
        Ok(())
    }

    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }
}

/// Errors from loading or validating [`ControllerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document could not be parsed.
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed config document"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
