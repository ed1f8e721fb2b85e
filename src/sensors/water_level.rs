//! Resistive rain/water sensor on an ADC1 channel.
//!
//! The module's analog output rises with wetted area. The raw 12-bit count
//! is normalised against a configurable full-scale value into 0–100 %.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: one-shot ADC1 read via `hw_init`.
//! On host/test: reads a simulated raw count (default: dry).

use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

static SIM_WATER_RAW: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_water_raw(raw: u16) {
    SIM_WATER_RAW.store(raw, Ordering::Relaxed);
}

/// Convert a raw ADC count into percent of `full_scale`, clamped to 0–100.
pub fn percent_from_raw(raw: u16, full_scale: u16) -> f32 {
    if full_scale == 0 {
        return 0.0;
    }
    (f32::from(raw) / f32::from(full_scale) * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterReading {
    pub raw: u16,
    pub percent: f32,
}

pub struct WaterLevelSensor {
    _channel: u32,
    full_scale: u16,
}

impl WaterLevelSensor {
    pub fn new(channel: u32, full_scale: u16) -> Self {
        Self {
            _channel: channel,
            full_scale,
        }
    }

    pub fn read(&mut self) -> WaterReading {
        let raw = self.read_raw();
        WaterReading {
            raw,
            percent: percent_from_raw(raw, self.full_scale),
        }
    }

    #[cfg(target_os = "espidf")]
    fn read_raw(&self) -> u16 {
        hw_init::adc1_read(self._channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&self) -> u16 {
        SIM_WATER_RAW.load(Ordering::Relaxed)
    }
}
