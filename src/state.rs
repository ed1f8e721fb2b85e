//! Shared sensor/alert record — the only mutable state crossing tasks.
//!
//! ```text
//!  Sampling task ──write_reading()──▶ ┌──────────────┐ ──snapshot()──▶ Command task
//!                                     │ SharedState  │
//!  Command task ──write_alert()─────▶ │ Mutex<Record>│ ──alert()─────▶ Actuator task
//!                                     └──────────────┘
//! ```
//!
//! One coarse lock guards the whole record, so a snapshot never mixes fields
//! from two sampling cycles. Every acquisition is a bounded wait: on timeout
//! the accessor returns `None` (reads) or `false` (writes) and the caller
//! carries on with the values it already had. A stalled task therefore never
//! wedges another one.

use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::zones::ZONES;

// ───────────────────────────────────────────────────────────────
// Value types
// ───────────────────────────────────────────────────────────────

/// Three-axis vector, serialised as `{"x":..,"y":..,"z":..}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// One sampling cycle's worth of sensor data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorReading {
    /// Water/rain level, 0–100 %.
    pub water_pct: f32,
    /// Raw 12-bit ADC count behind `water_pct`.
    pub water_raw: u16,
    /// Angular rate (rad/s).
    pub gyro: Vec3,
    /// Linear acceleration (m/s²).
    pub accel: Vec3,
    /// Flame detected (polarity already applied).
    pub flame: bool,
    /// False when the inertial sensor is absent; `gyro`/`accel` are zero then.
    pub imu_ok: bool,
    /// Sampling cycle that produced this reading.
    pub cycle: u32,
}

impl SensorReading {
    pub const ZERO: Self = Self {
        water_pct: 0.0,
        water_raw: 0,
        gyro: Vec3::ZERO,
        accel: Vec3::ZERO,
        flame: false,
        imu_ok: false,
        cycle: 0,
    };
}

/// Hazard-response level. Transitions are only ever commanded externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum AlertLevel {
    #[default]
    Safe = 0,
    Calling = 1,
    Messaging = 2,
    Danger = 3,
    Evacuate = 4,
}

impl AlertLevel {
    pub const ALL: [Self; 5] = [
        Self::Safe,
        Self::Calling,
        Self::Messaging,
        Self::Danger,
        Self::Evacuate,
    ];

    /// Wire code, as reported in telemetry and `alert_set`.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire value; anything outside `0..=4` is `None`.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Safe),
            1 => Some(Self::Calling),
            2 => Some(Self::Messaging),
            3 => Some(Self::Danger),
            4 => Some(Self::Evacuate),
            _ => None,
        }
    }
}

/// Exit marker for the EVACUATE chase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveZone {
    /// No single exit; every zone chases.
    All,
    /// Index into the zone table. Range-checked before it gets here.
    Zone(u8),
}

impl ActiveZone {
    /// Wire form: `-1` for all zones, otherwise the zone index.
    pub const fn code(self) -> i16 {
        match self {
            Self::All => -1,
            Self::Zone(z) => z as i16,
        }
    }
}

/// What the renderer needs: the level plus where the exit is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertState {
    pub level: AlertLevel,
    pub exit: ActiveZone,
}

impl AlertState {
    pub const fn boot(default_exit: u8) -> Self {
        Self {
            level: AlertLevel::Safe,
            exit: ActiveZone::Zone(default_exit),
        }
    }
}

impl Default for AlertState {
    fn default() -> Self {
        Self::boot((ZONES.len() - 1) as u8)
    }
}

/// Consistent copy of the whole record, taken under one lock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub reading: SensorReading,
    pub alert: AlertState,
}

// ───────────────────────────────────────────────────────────────
// SharedState
// ───────────────────────────────────────────────────────────────

struct Record {
    reading: SensorReading,
    alert: AlertState,
}

/// The single lock-guarded record shared by all tasks.
pub struct SharedState {
    inner: Mutex<Record>,
    timeout: Duration,
    lock_misses: AtomicU32,
}

impl SharedState {
    /// Boot state: SAFE, exit at `default_exit`, zeroed readings.
    pub const fn new(timeout: Duration, default_exit: u8) -> Self {
        Self {
            inner: Mutex::new(Record {
                reading: SensorReading::ZERO,
                alert: AlertState::boot(default_exit),
            }),
            timeout,
            lock_misses: AtomicU32::new(0),
        }
    }

    /// Bounded-wait acquisition. Poisoned locks are recovered; the record
    /// is plain `Copy` data.
    fn acquire(&self) -> Option<MutexGuard<'_, Record>> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match self.inner.try_lock() {
                Ok(guard) => return Some(guard),
                Err(TryLockError::Poisoned(p)) => return Some(p.into_inner()),
                Err(TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        self.lock_misses.fetch_add(1, Ordering::Relaxed);
                        return None;
                    }
                    std::thread::yield_now();
                }
            }
        }
    }

    /// Replace the whole sensor reading. `false` if the lock timed out and
    /// the reading was dropped.
    pub fn write_reading(&self, reading: SensorReading) -> bool {
        match self.acquire() {
            Some(mut rec) => {
                rec.reading = reading;
                true
            }
            None => false,
        }
    }

    /// Set the alert level, leaving the exit zone untouched.
    pub fn write_level(&self, level: AlertLevel) -> bool {
        match self.acquire() {
            Some(mut rec) => {
                rec.alert.level = level;
                true
            }
            None => false,
        }
    }

    /// Set the exit zone, leaving the level untouched.
    pub fn write_exit(&self, exit: ActiveZone) -> bool {
        match self.acquire() {
            Some(mut rec) => {
                rec.alert.exit = exit;
                true
            }
            None => false,
        }
    }

    /// Set level and exit zone in one critical section.
    pub fn write_alert(&self, alert: AlertState) -> bool {
        match self.acquire() {
            Some(mut rec) => {
                rec.alert = alert;
                true
            }
            None => false,
        }
    }

    /// Full consistent snapshot, or `None` on lock timeout.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.acquire().map(|rec| Snapshot {
            reading: rec.reading,
            alert: rec.alert,
        })
    }

    /// Alert level and exit zone, or `None` on lock timeout.
    pub fn alert(&self) -> Option<AlertState> {
        self.acquire().map(|rec| rec.alert)
    }

    /// Number of acquisitions that gave up since boot.
    pub fn lock_misses(&self) -> u32 {
        self.lock_misses.load(Ordering::Relaxed)
    }

    /// Hold the lock for `hold`, calling `locked` once it is taken; used to
    /// exercise the timeout path.
    #[cfg(test)]
    pub(crate) fn hold_for(&self, hold: Duration, locked: impl FnOnce()) {
        let _guard = self.inner.lock();
        locked();
        std::thread::sleep(hold);
    }
}
