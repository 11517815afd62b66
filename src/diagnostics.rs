//! Link statistics and runtime diagnostics.
//!
//! [`LinkStats`] is updated by the controller after every exchange and can
//! be dumped as JSON over the console for field debugging.

use serde::Serialize;

use crate::link::{ExchangeOutcome, ExchangeReport};

/// Counters over every exchange since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub exchanges: u32,
    pub echoes: u32,
    pub timeouts: u32,
    /// Writes the transceiver reported as unacknowledged.
    pub send_failures: u32,
    /// Selections that mapped to no command.
    pub ignored: u32,
    pub last_rtt_ms: Option<u64>,
    pub min_rtt_ms: Option<u64>,
    pub max_rtt_ms: Option<u64>,
}

impl LinkStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: &ExchangeReport) {
        self.exchanges = self.exchanges.saturating_add(1);
        if !report.send_ok {
            self.send_failures = self.send_failures.saturating_add(1);
        }
        match report.outcome {
            ExchangeOutcome::Echo { rtt_ms, .. } => {
                self.echoes = self.echoes.saturating_add(1);
                self.last_rtt_ms = Some(rtt_ms);
                self.min_rtt_ms = Some(self.min_rtt_ms.map_or(rtt_ms, |m| m.min(rtt_ms)));
                self.max_rtt_ms = Some(self.max_rtt_ms.map_or(rtt_ms, |m| m.max(rtt_ms)));
            }
            ExchangeOutcome::TimedOut { .. } => {
                self.timeouts = self.timeouts.saturating_add(1);
            }
        }
    }

    pub fn record_ignored(&mut self) {
        self.ignored = self.ignored.saturating_add(1);
    }

    /// Percentage of exchanges that got an echo (0 when nothing was sent).
    pub fn success_percent(&self) -> u8 {
        if self.exchanges == 0 {
            return 0;
        }
        (u64::from(self.echoes) * 100 / u64::from(self.exchanges)) as u8
    }
}

// ───────────────────────────────────────────────────────────────
// Panic hook
// ───────────────────────────────────────────────────────────────

/// Install a panic hook that routes the panic reason through `log`
/// before the default handler resets the chip.
pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };

        match info.location() {
            Some(loc) => log::error!("PANIC: {} at {}:{}", reason, loc.file(), loc.line()),
            None => log::error!("PANIC: {}", reason),
        }
    }));
}
