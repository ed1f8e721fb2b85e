//! Outbound application events.
//!
//! The [`AlertService`](super::service::AlertService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Each one serialises to a
//! single JSON object on its own line:
//!
//! ```text
//! {"event":"alert_set","alert":3}
//! {"event":"error","message":"json_parse_failed"}
//! {"type":"telemetry","water":12.4,"gyro":{..},"accel":{..},"fire":false,"alert":0,"ts":184221}
//! ```

use serde::Serialize;

use crate::state::{Snapshot, Vec3};

/// Anything the firmware writes to the orchestrator link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AppEvent<'a> {
    Notice(Notice<'a>),
    Telemetry(TelemetryFrame),
}

impl<'a> From<Notice<'a>> for AppEvent<'a> {
    fn from(n: Notice<'a>) -> Self {
        Self::Notice(n)
    }
}

impl From<TelemetryFrame> for AppEvent<'_> {
    fn from(t: TelemetryFrame) -> Self {
        Self::Telemetry(t)
    }
}

/// `{"event": ...}` records: acknowledgements, lifecycle, and errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notice<'a> {
    Boot {
        status: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        ready: Option<bool>,
    },
    Init {
        component: &'a str,
        status: &'a str,
    },
    /// Strip bring-up reports its geometry instead of a status.
    #[serde(rename = "init")]
    StripInit {
        component: &'a str,
        leds: usize,
        zones: usize,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        component: Option<&'a str>,
        message: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<&'a str>,
    },
    AlertSet {
        alert: u8,
    },
    ExitSet {
        zone: i16,
    },
    ZoneSet {
        zone: u8,
    },
    GsmCall {
        number: &'a str,
    },
    GsmSms {
        number: &'a str,
    },
    GsmDialing {
        number: &'a str,
    },
    GsmHangup,
    GsmSmsSent {
        to: &'a str,
    },
    Pong {
        uptime: u64,
    },
}

impl<'a> Notice<'a> {
    /// Error without component or field.
    pub const fn error(message: &'a str) -> Self {
        Self::Error {
            component: None,
            message,
            field: None,
        }
    }

    /// Component came up.
    pub const fn init_ok(component: &'a str) -> Self {
        Self::Init {
            component,
            status: "ok",
        }
    }

    /// Error raised by a hardware component.
    pub const fn component_error(component: &'a str, message: &'a str) -> Self {
        Self::Error {
            component: Some(component),
            message,
            field: None,
        }
    }
}

/// Periodic sensor + alert report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetryFrame {
    #[serde(rename = "type")]
    kind: &'static str,
    pub water: f32,
    pub gyro: Vec3,
    pub accel: Vec3,
    /// Present only on boards with a flame sensor fitted. The backend
    /// reads this key as `fire`.
    #[serde(rename = "fire", skip_serializing_if = "Option::is_none")]
    pub flame: Option<bool>,
    pub alert: u8,
    pub ts: u64,
}

impl TelemetryFrame {
    pub fn from_snapshot(snap: &Snapshot, flame_fitted: bool, ts: u64) -> Self {
        Self {
            kind: "telemetry",
            water: snap.reading.water_pct,
            gyro: snap.reading.gyro,
            accel: snap.reading.accel,
            flame: flame_fitted.then_some(snap.reading.flame),
            alert: snap.alert.level.code(),
            ts,
        }
    }
}
