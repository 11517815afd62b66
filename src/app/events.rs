//! Outbound application events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — log to serial, draw a status
//! panel, etc.

use crate::devices::{DeviceClass, DeviceConfig};

use super::commands::Selection;

/// Structured events emitted by the controller core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Global link setup finished (carries the RF channel).
    Started { channel: u8, chip_ok: bool },

    /// The link was re-addressed for a device class.
    LinkSelected(DeviceClass),

    /// The active class was dropped; the radio is back to plain listening.
    LinkReleased(DeviceClass),

    /// A new configuration is about to go out. For display only.
    Sending { config: DeviceConfig, bytes: usize },

    /// The low-level write returned. `ok == false` does not stop the exchange.
    Sent { ok: bool },

    /// An echo arrived before the deadline.
    EchoReceived {
        class: DeviceClass,
        bytes: usize,
        rtt_ms: u64,
        /// The echo decoded as a configuration, if it was well-formed.
        echo: Option<DeviceConfig>,
    },

    /// No echo within the budget.
    TimedOut { class: DeviceClass, timeout_ms: u32 },

    /// A selection that maps to no command; nothing was sent.
    CommandIgnored(Selection),
}
