//! Inter-task communication channels.
//!
//! Uses `embassy-sync` bounded MPMC channels to hand work between the
//! task threads without heap allocation. The only shared mutable record is
//! [`SharedState`](crate::state::SharedState); everything else moves as a
//! message.
//!
//! ```text
//! ┌──────────────┐ ZoneOverride ┌──────────────┐
//! │ Command task │─────────────▶│ Actuator task│
//! │              │   ModemJob   ├──────────────┤
//! │              │─────────────▶│  Modem task  │
//! │              │◀─────────────│              │
//! └──────────────┘  ModemEvent  └──────────────┘
//!                  ◀─ HANGUP ─ (signal, command → modem)
//! ```
//!
//! Tasks take these by reference so tests can build private instances;
//! the firmware wires the statics below.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::app::commands::{PhoneNumber, SmsText};
use crate::drivers::led_strip::Rgb;
use crate::error::ModemError;

/// One-shot paint request for a single zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneOverride {
    pub zone: u8,
    pub colour: Rgb,
}

/// Work item for the modem task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModemJob {
    Call(PhoneNumber),
    Sms {
        number: PhoneNumber,
        message: SmsText,
    },
}

/// Progress reported back by the modem task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModemEvent {
    Dialing(PhoneNumber),
    HungUp,
    SmsSent(PhoneNumber),
    Failed(ModemError),
}

/// Channel depth for zone overrides.
pub const ZONE_DEPTH: usize = 4;

/// Channel depth for queued modem jobs.
pub const JOB_DEPTH: usize = 4;

/// Channel depth for modem progress events.
pub const MODEM_EVENT_DEPTH: usize = 8;

pub type ZoneChannel = Channel<CriticalSectionRawMutex, ZoneOverride, ZONE_DEPTH>;
pub type ModemJobChannel = Channel<CriticalSectionRawMutex, ModemJob, JOB_DEPTH>;
pub type ModemEventChannel = Channel<CriticalSectionRawMutex, ModemEvent, MODEM_EVENT_DEPTH>;
pub type HangupSignal = Signal<CriticalSectionRawMutex, ()>;

/// Zone overrides: command task → actuator task.
pub static ZONE_OVERRIDES: ZoneChannel = Channel::new();

/// Cellular jobs: command task → modem task.
pub static MODEM_JOBS: ModemJobChannel = Channel::new();

/// Cellular progress: modem task → command task.
pub static MODEM_EVENTS: ModemEventChannel = Channel::new();

/// Early hang-up request: command task → modem task.
pub static HANGUP: HangupSignal = Signal::new();
