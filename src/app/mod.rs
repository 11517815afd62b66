//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the controller: command
//! decoding, mode transitions, and the send/echo pipeline.  All
//! interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without a radio.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
