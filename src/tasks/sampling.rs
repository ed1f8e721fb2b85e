//! Sampling task — reads every sensor on a fixed grid and publishes one
//! reading per cycle into shared state.

use log::{debug, warn};

use crate::app::ports::{SensorPort, TimePort};
use crate::scheduler::PeriodicTimer;
use crate::state::SharedState;

pub struct SamplingTask<'a, S> {
    sensors: S,
    state: &'a SharedState,
    timer: PeriodicTimer,
    dropped: u32,
}

impl<'a, S: SensorPort> SamplingTask<'a, S> {
    /// First cycle is due at `start_ms`.
    pub fn new(sensors: S, state: &'a SharedState, period_ms: u32, start_ms: u64) -> Self {
        Self {
            sensors,
            state,
            timer: PeriodicTimer::new(u64::from(period_ms), start_ms),
            dropped: 0,
        }
    }

    /// Sample once and publish. Returns `false` when the write was dropped
    /// on a lock timeout.
    pub fn step(&mut self) -> bool {
        let reading = self.sensors.sample();
        let written = self.state.write_reading(reading);
        if !written {
            self.dropped = self.dropped.saturating_add(1);
            debug!("sampling: cycle {} dropped, state lock busy", reading.cycle);
        }
        written
    }

    /// Run one cycle if the grid says so. `None` when not yet due.
    pub fn poll(&mut self, now_ms: u64) -> Option<bool> {
        self.timer.poll_due(now_ms).then(|| self.step())
    }

    /// Readings lost to lock timeouts.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Grid points skipped because a cycle overran.
    pub fn missed_cycles(&self) -> u64 {
        self.timer.missed()
    }

    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    pub fn run(mut self, clock: &impl TimePort) -> ! {
        let mut reported_missed = 0;
        loop {
            self.poll(clock.uptime_ms());
            if self.timer.missed() != reported_missed {
                reported_missed = self.timer.missed();
                warn!("sampling: overran, {} cycles skipped so far", reported_missed);
            }
            let wait = self.timer.until_due(clock.uptime_ms());
            if wait > 0 {
                clock.delay_ms(wait as u32);
            }
        }
    }
}
