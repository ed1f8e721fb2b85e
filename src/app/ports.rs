//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ tasks / AlertService (domain)
//! ```
//!
//! Driven adapters (sensors, LED strip, clock, event sinks) implement these
//! traits. The task loops consume them via generics, so the domain core
//! never touches hardware directly and every loop runs on the host against
//! mocks.

use crate::drivers::led_strip::Rgb;
use crate::error::Result;
use crate::state::SensorReading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the sampling task calls this once per cycle.
pub trait SensorPort {
    /// Read every sensor and return one reading.
    fn sample(&mut self) -> SensorReading;
}

// ───────────────────────────────────────────────────────────────
// Strip port (driven adapter: domain → LED hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the addressable LED strip.
pub trait StripPort {
    /// Push one frame to the strip with `brightness` applied on output.
    fn show(&mut self, pixels: &[Rgb], brightness: u8) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic clock and task delay.
pub trait TimePort {
    /// Milliseconds since boot.
    fn uptime_ms(&self) -> u64;

    /// Block the calling task for `ms` milliseconds.
    fn delay_ms(&self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → orchestrator link)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (JSON lines on the
/// serial link, a capture buffer in tests).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent<'_>);
}
