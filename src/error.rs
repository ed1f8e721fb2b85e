//! Error types for the EvacGuard firmware.
//!
//! [`Error`] covers configuration and the LED strip. Sensor, modem and serial
//! link faults keep their own small enums: they are handled inside the task
//! that owns the device and only ever cross a task boundary as a
//! [`ModemError`] inside a channel message. All of them are `Copy`.
//!
//! None of these are fatal to the device. Each task handles its own faults
//! locally and keeps running.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The LED strip driver rejected a frame.
    Strip(&'static str),
    /// Configuration value is out of range.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strip(msg) => write!(f, "strip: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I²C transaction failed (NACK, arbitration loss, bus fault).
    BusFault,
    /// A device answered but with an unexpected identity register.
    WrongDevice(u8),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusFault => write!(f, "I2C bus fault"),
            Self::WrongDevice(id) => write!(f, "unexpected device id 0x{id:02x}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cellular module errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModemError {
    /// The modem UART refused the write.
    WriteFailed,
    /// A directive did not fit the fixed directive buffer.
    DirectiveTooLong,
}

impl ModemError {
    /// Short machine-readable tag used in outbound error events.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::WriteFailed => "write_failed",
            Self::DirectiveTooLong => "directive_too_long",
        }
    }
}

impl fmt::Display for ModemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "UART write failed"),
            Self::DirectiveTooLong => write!(f, "directive exceeds buffer"),
        }
    }
}

// ---------------------------------------------------------------------------
// Serial link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    ReadFailed,
    WriteFailed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "serial read failed"),
            Self::WriteFailed => write!(f, "serial write failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
