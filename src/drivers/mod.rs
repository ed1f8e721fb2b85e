//! Peripheral drivers, hardware initialisation, and threading helpers.

pub mod gsm;
pub mod hw_init;
pub mod led_patterns;
pub mod led_strip;
pub mod task_pin;
