//! Prop controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing and host-side
//! simulation. ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod devices;
pub mod diagnostics;
pub mod error;
pub mod link;
pub mod menu;
