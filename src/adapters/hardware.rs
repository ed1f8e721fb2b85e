//! Hardware adapter — bridges the sensor drivers to [`SensorPort`].
//!
//! Owns the [`SensorHub`] (ADC water channel, flame GPIO, MPU-6050 on I²C).
//! On non-espidf targets the underlying drivers read simulation atomics, so
//! the same adapter runs in host tests.

use embedded_hal::i2c::I2c;

use crate::app::ports::SensorPort;
use crate::sensors::SensorHub;
use crate::state::SensorReading;

/// Concrete adapter that puts all sensors behind the port trait.
pub struct HardwareAdapter<I2C> {
    sensor_hub: SensorHub<I2C>,
}

impl<I2C: I2c> HardwareAdapter<I2C> {
    pub fn new(sensor_hub: SensorHub<I2C>) -> Self {
        Self { sensor_hub }
    }

    pub fn hub(&self) -> &SensorHub<I2C> {
        &self.sensor_hub
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<I2C: I2c> SensorPort for HardwareAdapter<I2C> {
    fn sample(&mut self) -> SensorReading {
        self.sensor_hub.sample()
    }
}
