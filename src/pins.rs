//! GPIO / peripheral pin assignments for the EvacGuard main controller
//! (ESP32-DevKitC).
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Resistive rain/water sensor, analog output.
/// ADC1 channel 6 (GPIO 34, input-only pin).
pub const WATER_ADC_GPIO: i32 = 34;
/// ADC1 channel number backing [`WATER_ADC_GPIO`].
pub const WATER_ADC_CHANNEL: u32 = 6;

// ---------------------------------------------------------------------------
// Sensors — Digital
// ---------------------------------------------------------------------------

/// IR flame sensor module, digital output (DO).
/// Most KY-026 style boards pull DO LOW when a flame is seen; the sense is
/// set by `SystemConfig::flame_polarity`.
pub const FLAME_GPIO: i32 = 35;

// ---------------------------------------------------------------------------
// I²C bus (MPU-6050)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// 400 kHz fast mode; the MPU-6050 supports it and a 14-byte burst stays
/// well inside one 20 ms sampling period.
pub const I2C_FREQ_HZ: u32 = 400_000;

// ---------------------------------------------------------------------------
// WS2812B LED strip
// ---------------------------------------------------------------------------

/// Strip data line, driven by RMT channel 0.
pub const LED_DATA_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Cellular module (SIM800L) on UART2
// ---------------------------------------------------------------------------

/// ESP32 RX ← modem TX.
pub const GSM_RX_GPIO: i32 = 16;
/// ESP32 TX → modem RX.
pub const GSM_TX_GPIO: i32 = 17;

// ---------------------------------------------------------------------------
// Orchestrator link (USB serial bridge on UART0)
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 1;
pub const UART_RX_GPIO: i32 = 3;
