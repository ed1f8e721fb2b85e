//! IR flame sensor, digital output.
//!
//! The module's comparator output is read as a plain GPIO level; whether LOW
//! or HIGH means "flame" is a board property carried in [`FlamePolarity`].
//! A board without the sensor reports no flame at all.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::FlamePolarity;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

/// Simulated pin level. Idle HIGH matches an active-low module with no flame.
static SIM_FLAME_PIN_HIGH: AtomicBool = AtomicBool::new(true);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_flame_pin(high: bool) {
    SIM_FLAME_PIN_HIGH.store(high, Ordering::Relaxed);
}

pub struct FlameSensor {
    _gpio: i32,
    polarity: FlamePolarity,
    fitted: bool,
}

impl FlameSensor {
    pub fn new(gpio: i32, polarity: FlamePolarity, fitted: bool) -> Self {
        Self {
            _gpio: gpio,
            polarity,
            fitted,
        }
    }

    pub fn fitted(&self) -> bool {
        self.fitted
    }

    /// `true` when a flame is detected. Always `false` when not fitted.
    pub fn read(&self) -> bool {
        self.fitted && self.polarity.flame_present(self.pin_high())
    }

    #[cfg(target_os = "espidf")]
    fn pin_high(&self) -> bool {
        hw_init::gpio_read(self._gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    fn pin_high(&self) -> bool {
        SIM_FLAME_PIN_HIGH.load(Ordering::Relaxed)
    }
}
