//! Request/response exchange engine.
//!
//! One exchange = one write followed by one bounded receive window:
//!
//! ```text
//!  Idle ──▶ Sending ──▶ AwaitingEcho ──┬──▶ Succeeded
//!                                      └──▶ TimedOut
//! ```
//!
//! The wait is a busy-poll on `available()` against a wall-clock deadline
//! measured from the moment before the write.  There is no retry here: a
//! new attempt is a new call.  A failed write is recorded but the echo
//! window still runs, since the hardware retransmits already happened
//! inside `write`.

use log::debug;

use crate::app::ports::{ClockPort, RadioPort};
use crate::devices::Payload;

/// Where the engine is in the current (or last) exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePhase {
    Idle,
    Sending,
    AwaitingEcho,
    Succeeded,
    TimedOut,
}

/// How the echo window ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// A frame arrived; `echo` holds exactly the payload-width bytes read.
    Echo { rtt_ms: u64, echo: Payload },
    /// The deadline passed first. Nothing was read.
    TimedOut { waited_ms: u64 },
}

/// Result of one [`ExchangeEngine::exchange`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeReport {
    /// What the low-level write returned.
    pub send_ok: bool,
    pub outcome: ExchangeOutcome,
}

impl ExchangeReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, ExchangeOutcome::Echo { .. })
    }

    pub fn rtt_ms(&self) -> Option<u64> {
        match self.outcome {
            ExchangeOutcome::Echo { rtt_ms, .. } => Some(rtt_ms),
            ExchangeOutcome::TimedOut { .. } => None,
        }
    }
}

/// A write that has gone out and whose echo window is open.
///
/// Returned by [`ExchangeEngine::send`] so the caller can report the
/// write result before blocking in [`ExchangeEngine::await_echo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlight {
    /// What the low-level write returned.
    pub send_ok: bool,
    started_ms: u64,
    /// Receive buffer, one payload width long.
    frame: Payload,
}

/// Synchronous send-then-await-echo engine.
pub struct ExchangeEngine {
    timeout_ms: u32,
    phase: ExchangePhase,
}

impl ExchangeEngine {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            phase: ExchangePhase::Idle,
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Phase reached by the most recent exchange.
    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    /// Send `payload` and block until an echo arrives or the budget runs out.
    pub fn exchange(
        &mut self,
        radio: &mut impl RadioPort,
        clock: &impl ClockPort,
        payload: &Payload,
    ) -> ExchangeReport {
        let sent = self.send(radio, clock, payload);
        self.await_echo(radio, clock, sent)
    }

    /// Idle → Sending → AwaitingEcho: write `payload` and switch back to
    /// listening.  The deadline starts just before the write.
    pub fn send(
        &mut self,
        radio: &mut impl RadioPort,
        clock: &impl ClockPort,
        payload: &Payload,
    ) -> InFlight {
        self.enter(ExchangePhase::Sending);
        radio.stop_listening();
        let started_ms = clock.now_ms();
        let send_ok = radio.write(payload);

        radio.start_listening();
        self.enter(ExchangePhase::AwaitingEcho);
        InFlight {
            send_ok,
            started_ms,
            frame: payload.clone(),
        }
    }

    /// Busy-poll until a frame is available or the deadline passes.
    ///
    /// On success exactly one payload width is read.
    pub fn await_echo(
        &mut self,
        radio: &mut impl RadioPort,
        clock: &impl ClockPort,
        sent: InFlight,
    ) -> ExchangeReport {
        let InFlight {
            send_ok,
            started_ms,
            frame: mut echo,
        } = sent;
        let budget = u64::from(self.timeout_ms);

        loop {
            let elapsed = clock.now_ms().saturating_sub(started_ms);

            // Deadline first, so a reported round-trip is always under budget.
            if elapsed >= budget {
                self.enter(ExchangePhase::TimedOut);
                return ExchangeReport {
                    send_ok,
                    outcome: ExchangeOutcome::TimedOut { waited_ms: elapsed },
                };
            }

            if radio.available() {
                radio.read(&mut echo);
                self.enter(ExchangePhase::Succeeded);
                return ExchangeReport {
                    send_ok,
                    outcome: ExchangeOutcome::Echo {
                        rtt_ms: elapsed,
                        echo,
                    },
                };
            }

            core::hint::spin_loop();
        }
    }

    fn enter(&mut self, next: ExchangePhase) {
        debug!("exchange: {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}
