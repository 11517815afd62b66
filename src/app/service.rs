//! Controller service — the hexagonal core.
//!
//! [`Controller`] owns the per-class device state, the link session and
//! the exchange engine.  All I/O flows through port traits injected at
//! call sites, making the whole pipeline testable with mock adapters.
//!
//! ```text
//!  Selection ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                │          Controller          │
//!  ClockPort ──▶ │ transition · session · echo  │ ◀─▶ RadioPort
//!                └──────────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::ControllerConfig;
use crate::devices::{DeviceClass, DeviceConfig, DeviceStates};
use crate::diagnostics::LinkStats;
use crate::link::{ExchangeEngine, ExchangeOutcome, ExchangeReport, LinkSession};

use super::commands::{Command, Selection};
use super::events::AppEvent;
use super::ports::{ClockPort, EventSink, RadioPort};

/// What the controller did with one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// The configuration that was stored and sent.
    pub config: DeviceConfig,
    pub report: ExchangeReport,
}

impl CommandResult {
    pub fn succeeded(&self) -> bool {
        self.report.succeeded()
    }
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

pub struct Controller {
    config: ControllerConfig,
    devices: DeviceStates,
    session: LinkSession,
    engine: ExchangeEngine,
    stats: LinkStats,
}

impl Controller {
    /// Construct the controller. Every device starts all-off.
    ///
    /// Does **not** touch the radio — call [`start`](Self::start) next.
    pub fn new(config: ControllerConfig) -> Self {
        let engine = ExchangeEngine::new(config.echo_timeout_ms);
        Self {
            config,
            devices: DeviceStates::default(),
            session: LinkSession::new(),
            engine,
            stats: LinkStats::new(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// One-shot link bring-up.
    pub fn start(&mut self, radio: &mut impl RadioPort, sink: &mut impl EventSink) {
        let chip_ok = self.session.init(radio, &self.config);
        sink.emit(&AppEvent::Started {
            channel: self.config.radio.channel,
            chip_ok,
        });
    }

    /// Operator left a program menu: drop the active class.
    pub fn release(&mut self, radio: &mut impl RadioPort, sink: &mut impl EventSink) {
        if let Some(class) = self.session.release(radio) {
            sink.emit(&AppEvent::LinkReleased(class));
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Resolve a menu selection and run it.
    ///
    /// Unrecognised selections are ignored: no state change, no exchange.
    pub fn handle_selection(
        &mut self,
        sel: Selection,
        radio: &mut impl RadioPort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Option<CommandResult> {
        let Some(cmd) = Command::from_selection(sel) else {
            self.stats.record_ignored();
            sink.emit(&AppEvent::CommandIgnored(sel));
            return None;
        };
        Some(self.execute(cmd, radio, clock, sink))
    }

    /// Apply `cmd` to local state and push the result to the device.
    ///
    /// Local state is updated before the exchange and kept even if no echo
    /// arrives; the controller has no way to know what the device holds.
    pub fn execute(
        &mut self,
        cmd: Command,
        radio: &mut impl RadioPort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> CommandResult {
        let class = cmd.class();
        let config = self.apply(cmd);
        info!("{}: {} -> {:?}", class.name(), cmd.label(), config);

        if self.session.select(radio, &self.config, class) {
            sink.emit(&AppEvent::LinkSelected(class));
        }

        let payload = config.encode();
        sink.emit(&AppEvent::Sending {
            config,
            bytes: payload.len(),
        });

        let sent = self.engine.send(radio, clock, &payload);
        sink.emit(&AppEvent::Sent { ok: sent.send_ok });

        let report = self.engine.await_echo(radio, clock, sent);
        self.stats.record(&report);

        match &report.outcome {
            ExchangeOutcome::Echo { rtt_ms, echo } => {
                let decoded = DeviceConfig::decode(class, echo);
                if let Err(e) = decoded {
                    warn!("{} echo did not decode: {}", class.name(), e);
                }
                sink.emit(&AppEvent::EchoReceived {
                    class,
                    bytes: echo.len(),
                    rtt_ms: *rtt_ms,
                    echo: decoded.ok(),
                });
            }
            ExchangeOutcome::TimedOut { .. } => {
                warn!(
                    "{} did not echo within {} ms",
                    class.name(),
                    self.engine.timeout_ms()
                );
                sink.emit(&AppEvent::TimedOut {
                    class,
                    timeout_ms: self.engine.timeout_ms(),
                });
            }
        }

        CommandResult { config, report }
    }

    /// Pure state update: compute and store the next configuration.
    pub fn apply(&mut self, cmd: Command) -> DeviceConfig {
        let current = self.devices.get(cmd.class());
        // Command and state are looked up by the same class, so this always matches.
        let next = cmd.apply(current).unwrap_or(current);
        self.devices.set(next);
        next
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn device(&self, class: DeviceClass) -> DeviceConfig {
        self.devices.get(class)
    }

    pub fn devices(&self) -> &DeviceStates {
        &self.devices
    }

    pub fn active_class(&self) -> Option<DeviceClass> {
        self.session.active()
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}
