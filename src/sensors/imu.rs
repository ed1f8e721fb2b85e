//! MPU-6050 six-axis inertial sensor over I²C.
//!
//! Configured once at boot for ±8 g / ±500 °/s with the 21 Hz digital
//! low-pass filter, then read as one 14-byte burst per sampling cycle.
//!
//! ```text
//!  0x3B ┌──────┬──────┬──────┬──────┬──────┬──────┬──────┐
//!       │ AX   │ AY   │ AZ   │ TEMP │ GX   │ GY   │ GZ   │  big-endian i16
//!       └──────┴──────┴──────┴──────┴──────┴──────┴──────┘
//! ```
//!
//! Generic over [`embedded_hal::i2c::I2c`], so host tests drive it with a
//! scripted bus and the device build hands it the ESP-IDF I²C driver.

use embedded_hal::i2c::I2c;
use log::debug;

use crate::error::SensorError;
use crate::state::Vec3;

pub const MPU6050_ADDR: u8 = 0x68;

pub mod reg {
    pub const SMPLRT_DIV: u8 = 0x19;
    pub const CONFIG: u8 = 0x1A;
    pub const GYRO_CONFIG: u8 = 0x1B;
    pub const ACCEL_CONFIG: u8 = 0x1C;
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    pub const PWR_MGMT_1: u8 = 0x6B;
    pub const WHO_AM_I: u8 = 0x75;
}

/// PLL with X-axis gyro reference, out of sleep.
const PWR_CLK_PLL_X: u8 = 0x01;
/// DLPF_CFG = 4 → 21 Hz accel / 20 Hz gyro bandwidth.
const DLPF_21HZ: u8 = 0x04;
/// FS_SEL = 1 → ±500 °/s.
const GYRO_FS_500: u8 = 0x08;
/// AFS_SEL = 2 → ±8 g.
const ACCEL_FS_8G: u8 = 0x10;

/// LSB per g at ±8 g.
const ACCEL_LSB_PER_G: f32 = 4096.0;
/// LSB per °/s at ±500 °/s.
const GYRO_LSB_PER_DPS: f32 = 65.5;
const STANDARD_GRAVITY: f32 = 9.806_65;

/// Accelerometer and gyro in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuSample {
    /// m/s²
    pub accel: Vec3,
    /// rad/s
    pub gyro: Vec3,
}

pub struct Mpu6050<I2C> {
    i2c: I2C,
    addr: u8,
}

impl<I2C: I2c> Mpu6050<I2C> {
    /// Check `WHO_AM_I` and configure the sensor. The bus is handed back on
    /// failure so the caller can keep it for other devices.
    pub fn init(mut i2c: I2C) -> Result<Self, (I2C, SensorError)> {
        match Self::configure(&mut i2c, MPU6050_ADDR) {
            Ok(()) => Ok(Self {
                i2c,
                addr: MPU6050_ADDR,
            }),
            Err(e) => Err((i2c, e)),
        }
    }

    fn configure(i2c: &mut I2C, addr: u8) -> Result<(), SensorError> {
        let mut id = [0u8; 1];
        i2c.write_read(addr, &[reg::WHO_AM_I], &mut id)
            .map_err(|_| SensorError::BusFault)?;
        if id[0] != MPU6050_ADDR {
            return Err(SensorError::WrongDevice(id[0]));
        }

        for (register, value) in [
            (reg::PWR_MGMT_1, PWR_CLK_PLL_X),
            (reg::SMPLRT_DIV, 0),
            (reg::CONFIG, DLPF_21HZ),
            (reg::GYRO_CONFIG, GYRO_FS_500),
            (reg::ACCEL_CONFIG, ACCEL_FS_8G),
        ] {
            i2c.write(addr, &[register, value])
                .map_err(|_| SensorError::BusFault)?;
        }
        debug!("mpu6050: configured ±8g / ±500dps / DLPF 21Hz");
        Ok(())
    }

    /// One burst read of accel + gyro.
    pub fn read(&mut self) -> Result<ImuSample, SensorError> {
        let mut buf = [0u8; 14];
        self.i2c
            .write_read(self.addr, &[reg::ACCEL_XOUT_H], &mut buf)
            .map_err(|_| SensorError::BusFault)?;
        Ok(decode_burst(&buf))
    }

    /// Give the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Convert a raw 14-byte burst into SI units. Temperature is skipped.
pub fn decode_burst(buf: &[u8; 14]) -> ImuSample {
    let word = |i: usize| f32::from(i16::from_be_bytes([buf[i], buf[i + 1]]));
    let accel = |i: usize| word(i) / ACCEL_LSB_PER_G * STANDARD_GRAVITY;
    let gyro = |i: usize| (word(i) / GYRO_LSB_PER_DPS).to_radians();
    ImuSample {
        accel: Vec3::new(accel(0), accel(2), accel(4)),
        gyro: Vec3::new(gyro(8), gyro(10), gyro(12)),
    }
}
