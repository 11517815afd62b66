//! Wireless link: session setup and the send/echo exchange.

pub mod exchange;
pub mod session;

pub use exchange::{ExchangeEngine, ExchangeOutcome, ExchangePhase, ExchangeReport, InFlight};
pub use session::{LISTEN_PIPE, LinkSession};
