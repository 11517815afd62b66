//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing controller events to the logger
//! (UART / USB-CDC on the handheld).  The per-class status lines mirror
//! what the operator sees in the info panel.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::devices::{BottlesMode, CauldronMode, DeviceConfig};

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "On" } else { "Off" }
}

/// Human-readable status panel for a configuration.
pub fn status_lines(config: &DeviceConfig) -> heapless::Vec<heapless::String<32>, 4> {
    use core::fmt::Write;

    let mut lines = heapless::Vec::new();
    let mut push = |args: core::fmt::Arguments<'_>| {
        let mut s = heapless::String::new();
        let _ = s.write_fmt(args);
        let _ = lines.push(s);
    };

    match config {
        DeviceConfig::Bottles(c) => {
            push(format_args!("Rigging: {}", on_off(c.mode == BottlesMode::Rigging)));
            push(format_args!("Red:     {}", on_off(c.mode == BottlesMode::Red)));
            push(format_args!("White:   {}", on_off(c.mode == BottlesMode::White)));
        }
        DeviceConfig::Cauldron(c) => {
            push(format_args!("Fan:   {}", on_off(c.mode.contains(CauldronMode::FAN))));
            push(format_args!("Fire:  {}", on_off(c.mode.contains(CauldronMode::FIRE))));
            push(format_args!("Glow:  {}", on_off(c.mode.contains(CauldronMode::GLOW))));
        }
        DeviceConfig::Glowworm(c) => {
            push(format_args!("Antenna: {}", c.antenna.bits()));
            push(format_args!("Red:     0x{:02x}", c.r));
            push(format_args!("Green:   0x{:02x}", c.g));
            push(format_args!("Blue:    0x{:02x}", c.b));
        }
    }
    lines
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { channel, chip_ok } => {
                let chip = if *chip_ok { "OK" } else { "MISSING" };
                info!("START | channel={} chip={}", channel, chip);
            }
            AppEvent::LinkSelected(class) => {
                info!("LINK  | addressed {}", class.name());
            }
            AppEvent::LinkReleased(class) => {
                info!("LINK  | released {}", class.name());
            }
            AppEvent::Sending { config, bytes } => {
                for line in status_lines(config) {
                    info!("{:<8}| {}", config.class().name(), line);
                }
                info!("SEND  | Sending {} bytes...", bytes);
            }
            AppEvent::Sent { ok } => {
                info!("SEND  | {}", if *ok { "done" } else { "failed" });
            }
            AppEvent::EchoReceived { bytes, rtt_ms, echo, .. } => {
                info!("ECHO  | Received {} bytes - round-trip delay: {}", bytes, rtt_ms);
                if echo.is_none() {
                    warn!("ECHO  | payload did not match the device layout");
                }
                info!("ECHO  | Success");
            }
            AppEvent::TimedOut { class, timeout_ms } => {
                warn!("ECHO  | {} Failed - response timed out after {}.", class.name(), timeout_ms);
            }
            AppEvent::CommandIgnored(sel) => {
                info!("CMD   | {} index {} ignored", sel.class.name(), sel.index);
            }
        }
    }
}
