//! EvacGuard firmware library.
//!
//! Exposes the task loops, the command/telemetry core and the drivers for
//! integration testing on the host. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod pins;
pub mod protocol;
pub mod scheduler;
pub mod state;
pub mod tasks;
pub mod zones;

// Hardware-facing modules compile on every target; the device-only
// implementations are selected by cfg attributes inside.
pub mod adapters;
pub mod drivers;
pub mod sensors;

#[cfg(target_os = "espidf")]
mod esp_link_shims;
