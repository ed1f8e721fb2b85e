//! Application core — pure domain logic, zero I/O.
//!
//! Boot reporting, command parsing and validation, outbound event shapes,
//! and the [`service::AlertService`] that applies commands to shared state. All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer testable without real peripherals.

pub mod boot;
pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
