//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (transceiver, clock, event sinks) implement these
//! traits.  The [`Controller`](super::service::Controller) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::config::{Address, RadioSettings};

// ───────────────────────────────────────────────────────────────
// Radio port (driven adapter: domain ↔ transceiver)
// ───────────────────────────────────────────────────────────────

/// The transceiver call contract.
///
/// Configuration calls are fire-and-forget: an adapter that hits a bus
/// error logs it and returns, and the next exchange simply times out.
/// Only `begin`, `write` and `available` report anything back.
pub trait RadioPort {
    /// Reset the chip to its power-on defaults and power it up.
    /// Returns `false` if the chip did not respond.
    fn begin(&mut self) -> bool;

    /// Enable or disable hardware auto-acknowledgement on all pipes.
    fn set_auto_ack(&mut self, enabled: bool);

    /// Apply channel, PA level, data rate and auto-retransmit policy.
    fn configure(&mut self, settings: &RadioSettings);

    /// Fixed payload width for every pipe (1–32 bytes).
    fn set_payload_size(&mut self, size: usize);

    /// Listen for frames addressed to `address` on pipe `slot` (0–5).
    fn open_reading_pipe(&mut self, slot: u8, address: &Address);

    /// Direct subsequent writes at `address`.
    fn open_writing_pipe(&mut self, address: &Address);

    fn start_listening(&mut self);

    fn stop_listening(&mut self);

    /// Transmit one payload. Auto-retransmits happen inside this call.
    /// Returns `true` if the frame was acknowledged.
    fn write(&mut self, payload: &[u8]) -> bool;

    /// Whether a received frame is waiting in the RX FIFO.
    fn available(&mut self) -> bool;

    /// Pop one frame into `buf` (up to `buf.len()` bytes).
    fn read(&mut self, buf: &mut [u8]);
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: monotonic time → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock used to bound the echo wait.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → display / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log,
/// status display, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
