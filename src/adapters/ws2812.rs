//! WS2812B strip adapter — implements [`StripPort`].
//!
//! - **`target_os = "espidf"`** — encodes each frame as an RMT pulse train
//!   (GRB order, MSB first) and transmits it blocking on one RMT channel.
//!   Brightness is applied per pixel on the way out.
//! - **`not(target_os = "espidf")`** — [`SimStrip`] keeps the last scaled
//!   frame so host runs can inspect what would have been lit.

use crate::app::ports::StripPort;
use crate::drivers::led_strip::{scale, Rgb};
use crate::error::Result;

#[cfg(target_os = "espidf")]
pub use esp::Ws2812Strip;

#[cfg(target_os = "espidf")]
mod esp {
    use core::time::Duration;

    use esp_idf_hal::rmt::{PinState, Pulse, TxRmtDriver, VariableLengthSignal};
    use esp_idf_svc::sys::EspError;

    use super::*;
    use crate::error::Error;

    /// Bit timings from the WS2812B datasheet (±150 ns tolerance).
    const T0H_NS: u64 = 350;
    const T0L_NS: u64 = 800;
    const T1H_NS: u64 = 700;
    const T1L_NS: u64 = 600;

    pub struct Ws2812Strip<'d> {
        tx: TxRmtDriver<'d>,
        zero: [Pulse; 2],
        one: [Pulse; 2],
    }

    impl<'d> Ws2812Strip<'d> {
        pub fn new(tx: TxRmtDriver<'d>) -> core::result::Result<Self, EspError> {
            let hz = tx.counter_clock()?;
            let pulse = |state, ns| Pulse::new_with_duration(hz, state, &Duration::from_nanos(ns));
            let zero = [pulse(PinState::High, T0H_NS)?, pulse(PinState::Low, T0L_NS)?];
            let one = [pulse(PinState::High, T1H_NS)?, pulse(PinState::Low, T1L_NS)?];
            Ok(Self { tx, zero, one })
        }
    }

    impl StripPort for Ws2812Strip<'_> {
        fn show(&mut self, pixels: &[Rgb], brightness: u8) -> Result<()> {
            let mut signal = VariableLengthSignal::with_capacity(pixels.len() * 24 * 2);
            for &px in pixels {
                let (r, g, b) = scale(px, brightness);
                let grb = (u32::from(g) << 16) | (u32::from(r) << 8) | u32::from(b);
                for bit in (0..24).rev() {
                    let pulses = if grb & (1 << bit) != 0 { &self.one } else { &self.zero };
                    signal
                        .push(pulses)
                        .map_err(|_| Error::Strip("rmt signal build failed"))?;
                }
            }
            self.tx
                .start_blocking(&signal)
                .map_err(|_| Error::Strip("rmt write failed"))
        }
    }
}

/// Host-side strip that records the last frame as it would appear.
#[derive(Debug, Default)]
pub struct SimStrip {
    last: Vec<Rgb>,
    frames: u32,
}

impl SimStrip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last frame with brightness applied.
    pub fn last_frame(&self) -> &[Rgb] {
        &self.last
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl StripPort for SimStrip {
    fn show(&mut self, pixels: &[Rgb], brightness: u8) -> Result<()> {
        self.last.clear();
        self.last
            .extend(pixels.iter().map(|&px| scale(px, brightness)));
        self.frames = self.frames.wrapping_add(1);
        Ok(())
    }
}
