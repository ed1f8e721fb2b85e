//! System configuration parameters
//!
//! All tunable parameters for the EvacGuard controller. Defaults match the
//! reference hardware (ESP32-DevKitC, 60-LED strip, SIM800L).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::zones::ZONES;

/// Electrical sense of the flame sensor's digital output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlamePolarity {
    /// Output pulled LOW when a flame is detected (KY-026 and most clones).
    ActiveLow,
    /// Output driven HIGH when a flame is detected.
    ActiveHigh,
}

impl FlamePolarity {
    /// Translate a raw pin level into "flame present".
    pub const fn flame_present(self, pin_high: bool) -> bool {
        match self {
            Self::ActiveLow => !pin_high,
            Self::ActiveHigh => pin_high,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Sampling ---
    /// Sampling task period (milliseconds)
    pub sample_period_ms: u32,
    /// ADC count that maps to 100 % water level
    pub water_adc_full_scale: u16,
    /// Whether a flame sensor is fitted on this board variant
    pub flame_fitted: bool,
    /// Sense of the flame sensor output
    pub flame_polarity: FlamePolarity,

    // --- Rendering ---
    /// Global strip brightness for the solid and chase patterns (0-255)
    pub led_brightness: u8,
    /// Exit zone marked by the EVACUATE chase at boot
    pub default_exit_zone: u8,

    // --- Protocol ---
    /// Orchestrator link baud rate
    pub serial_baud: u32,
    /// Telemetry emission period (milliseconds)
    pub telemetry_period_ms: u32,
    /// Maximum wait for the shared-state lock (milliseconds)
    pub lock_timeout_ms: u32,
    /// Emit an error event when a command parameter is out of range
    pub report_rejected_params: bool,
    /// Sustained inbound command rate (lines/second); 0 disables limiting.
    /// Not part of the orchestrator protocol, a flood guard on top of it.
    pub command_rate_per_sec: u64,
    /// Inbound command burst allowance
    pub command_burst: u64,

    // --- Cellular ---
    /// Modem UART baud rate
    pub modem_baud: u32,
    /// How long an outbound call rings before the automatic hang-up (seconds)
    pub call_ring_secs: u32,
    /// Settling delay after each AT directive (milliseconds)
    pub modem_directive_gap_ms: u32,
    /// Wait after Ctrl-Z while the modem submits an SMS (milliseconds)
    pub sms_submit_wait_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Sampling
            sample_period_ms: 20, // 50 Hz
            water_adc_full_scale: 4095,
            flame_fitted: true,
            flame_polarity: FlamePolarity::ActiveLow,

            // Rendering
            led_brightness: 128,
            default_exit_zone: 3,

            // Protocol
            serial_baud: 115_200,
            telemetry_period_ms: 100, // 10 Hz
            lock_timeout_ms: 5,
            report_rejected_params: true,
            command_rate_per_sec: 20,
            command_burst: 20,

            // Cellular
            modem_baud: 9_600,
            call_ring_secs: 30,
            modem_directive_gap_ms: 100,
            sms_submit_wait_ms: 1_000,
        }
    }
}

impl SystemConfig {
    /// Parse a JSON config document (missing keys take their defaults)
    /// and validate it.
    pub fn from_json(doc: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(doc)
            .map_err(|_| Error::Config("config document is not valid JSON"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would break timing or index into nothing.
    pub fn validate(&self) -> Result<()> {
        if self.sample_period_ms == 0 || self.sample_period_ms > 1_000 {
            return Err(Error::Config("sample_period_ms must be 1-1000"));
        }
        if !(50..=1_000).contains(&self.telemetry_period_ms) {
            return Err(Error::Config("telemetry_period_ms must be 50-1000"));
        }
        if self.sample_period_ms >= self.telemetry_period_ms {
            return Err(Error::Config("sampling must be faster than telemetry"));
        }
        if self.lock_timeout_ms == 0 || self.lock_timeout_ms >= self.sample_period_ms {
            return Err(Error::Config("lock_timeout_ms must be shorter than one sample period"));
        }
        if self.water_adc_full_scale == 0 {
            return Err(Error::Config("water_adc_full_scale must be non-zero"));
        }
        if self.default_exit_zone as usize >= ZONES.len() {
            return Err(Error::Config("default_exit_zone outside zone table"));
        }
        if self.command_rate_per_sec > 0 && self.command_burst == 0 {
            return Err(Error::Config("command_burst must be non-zero when limiting"));
        }
        if self.call_ring_secs == 0 || self.call_ring_secs > 120 {
            return Err(Error::Config("call_ring_secs must be 1-120"));
        }
        Ok(())
    }
}
