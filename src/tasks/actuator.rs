//! Actuator task — renders the alert pattern onto the LED strip.
//!
//! The alert state is polled once per frame and never waited on. A zone
//! override from the command task is painted over the current frame, shown,
//! and held for one pattern period; the next frame resumes the pattern.

use log::{info, warn};

use crate::app::ports::{StripPort, TimePort};
use crate::error::Result;
use crate::drivers::led_patterns::{AlertRenderer, Pattern};
use crate::protocol::channels::ZoneChannel;
use crate::state::{AlertState, SharedState};

pub const SWEEP_STEP_MS: u32 = 20;
pub const SWEEP_HOLD_MS: u32 = 500;

pub struct ActuatorTask<'a, K, const LEDS: usize, const ZONES: usize> {
    renderer: AlertRenderer<LEDS, ZONES>,
    strip: K,
    state: &'a SharedState,
    overrides: &'a ZoneChannel,
    last_alert: AlertState,
    strip_errors: u32,
}

impl<'a, K: StripPort, const LEDS: usize, const ZONES: usize> ActuatorTask<'a, K, LEDS, ZONES> {
    pub fn new(
        renderer: AlertRenderer<LEDS, ZONES>,
        strip: K,
        state: &'a SharedState,
        overrides: &'a ZoneChannel,
    ) -> Self {
        Self {
            renderer,
            strip,
            state,
            overrides,
            last_alert: state.alert().unwrap_or_default(),
            strip_errors: 0,
        }
    }

    /// Render and show one frame. Returns how long to hold it (ms).
    pub fn step(&mut self) -> u32 {
        if let Ok(ov) = self.overrides.try_receive() {
            match self.renderer.paint_zone(usize::from(ov.zone), ov.colour) {
                Ok(()) => {
                    info!("actuator: zone {} painted {:?}", ov.zone, ov.colour);
                    self.show();
                    return self
                        .renderer
                        .current_pattern()
                        .unwrap_or(Pattern::Solid)
                        .period_ms();
                }
                Err(e) => warn!("actuator: override ignored ({})", e),
            }
        }

        if let Some(alert) = self.state.alert() {
            if alert.level != self.last_alert.level {
                info!("actuator: {:?} -> {:?}", self.last_alert.level, alert.level);
            }
            self.last_alert = alert;
        }
        let hold = self.renderer.render(self.last_alert);
        self.show();
        hold
    }

    /// Strip self-test. Stops at the first failed write.
    pub fn boot_sweep(&mut self, clock: &impl TimePort) -> Result<()> {
        for lit in 1..=LEDS {
            self.renderer.sweep(lit);
            self.push()?;
            clock.delay_ms(SWEEP_STEP_MS);
        }
        clock.delay_ms(SWEEP_HOLD_MS);
        self.renderer.blank();
        self.push()
    }

    fn push(&mut self) -> Result<()> {
        let frame = self.renderer.frame();
        self.strip.show(frame.pixels(), frame.brightness())
    }

    fn show(&mut self) {
        if let Err(e) = self.push() {
            if self.strip_errors == 0 {
                warn!("actuator: {}", e);
            }
            self.strip_errors = self.strip_errors.saturating_add(1);
        }
    }

    pub fn renderer(&self) -> &AlertRenderer<LEDS, ZONES> {
        &self.renderer
    }

    pub fn strip(&self) -> &K {
        &self.strip
    }

    /// Strip writes that failed since boot.
    pub fn strip_errors(&self) -> u32 {
        self.strip_errors
    }

    pub fn run(mut self, clock: &impl TimePort) -> ! {
        loop {
            let hold = self.step();
            clock.delay_ms(hold);
        }
    }
}
