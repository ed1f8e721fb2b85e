//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces one [`SensorReading`] per
//! sampling cycle, which the sampling task writes into shared state.

pub mod flame;
pub mod imu;
pub mod water_level;

use embedded_hal::i2c::I2c;
use log::{info, warn};

use crate::state::{SensorReading, Vec3};
use flame::FlameSensor;
use imu::{ImuSample, Mpu6050};
use water_level::WaterLevelSensor;

/// Aggregates all sensor drivers and produces a unified reading.
pub struct SensorHub<I2C> {
    pub water: WaterLevelSensor,
    pub flame: FlameSensor,
    /// `None` when the IMU failed to initialise at boot.
    imu: Option<Mpu6050<I2C>>,
    last_imu: ImuSample,
    imu_faulted: bool,
    imu_read_errors: u32,
    cycle: u32,
}

impl<I2C: I2c> SensorHub<I2C> {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(water: WaterLevelSensor, flame: FlameSensor, imu: Option<Mpu6050<I2C>>) -> Self {
        if imu.is_none() {
            info!("SensorHub: no IMU, inertial fields will read zero");
        }
        Self {
            water,
            flame,
            imu,
            last_imu: ImuSample {
                accel: Vec3::ZERO,
                gyro: Vec3::ZERO,
            },
            imu_faulted: false,
            imu_read_errors: 0,
            cycle: 0,
        }
    }

    /// Read every sensor and return one reading.
    ///
    /// A failed IMU read keeps the previous inertial values; a flaky bus
    /// must not stall the sampling cadence.
    pub fn sample(&mut self) -> SensorReading {
        self.cycle = self.cycle.wrapping_add(1);
        let water = self.water.read();
        let flame = self.flame.read();

        if let Some(imu) = self.imu.as_mut() {
            match imu.read() {
                Ok(s) => {
                    if self.imu_faulted {
                        info!("SensorHub: IMU reads recovered");
                        self.imu_faulted = false;
                    }
                    self.last_imu = s;
                }
                Err(e) => {
                    self.imu_read_errors = self.imu_read_errors.saturating_add(1);
                    if !self.imu_faulted {
                        warn!("SensorHub: IMU read failed ({}), holding last value", e);
                        self.imu_faulted = true;
                    }
                }
            }
        }

        SensorReading {
            water_pct: water.percent,
            water_raw: water.raw,
            gyro: self.last_imu.gyro,
            accel: self.last_imu.accel,
            flame,
            imu_ok: self.imu.is_some(),
            cycle: self.cycle,
        }
    }

    pub fn has_imu(&self) -> bool {
        self.imu.is_some()
    }

    /// IMU read failures since boot.
    pub fn imu_read_errors(&self) -> u32 {
        self.imu_read_errors
    }
}
