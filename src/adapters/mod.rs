//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to                        |
//! |------------|------------|------------------------------------|
//! | `nrf24`    | RadioPort  | nRF24L01+ over embedded-hal SPI    |
//! | `time`     | ClockPort  | ESP32 system timer / host Instant  |
//! | `log_sink` | EventSink  | Serial log output                  |

pub mod log_sink;
pub mod nrf24;
pub mod time;
