//! Boot-time component reporting.
//!
//! `main` brings each peripheral up in a fixed order and hands the outcome
//! to [`BootReport`], which announces it on the orchestrator link:
//!
//! ```text
//! {"event":"boot","status":"initializing"}
//! {"event":"init","component":"gsm","status":"ok"}
//! {"event":"error","component":"mpu6050","message":"init_failed"}
//! {"event":"init","component":"water_sensor","status":"ok"}
//! {"event":"init","component":"led_strip","leds":60,"zones":4}
//! {"event":"boot","status":"complete","ready":true}
//! ```
//!
//! A failed component is reported and skipped; boot always completes.

use core::fmt::Display;

use log::{info, warn};

use super::events::Notice;
use super::ports::EventSink;

pub struct BootReport<K> {
    sink: K,
    failures: u8,
}

impl<K: EventSink> BootReport<K> {
    /// Announce the start of boot on `sink`.
    pub fn begin(mut sink: K) -> Self {
        sink.emit(
            &Notice::Boot {
                status: "initializing",
                ready: None,
            }
            .into(),
        );
        Self { sink, failures: 0 }
    }

    /// Report one component and pass its value through on success.
    pub fn component<T, E: Display>(
        &mut self,
        component: &'static str,
        outcome: Result<T, E>,
    ) -> Option<T> {
        match outcome {
            Ok(value) => {
                info!("boot: {} ok", component);
                self.sink.emit(&Notice::init_ok(component).into());
                Some(value)
            }
            Err(e) => {
                self.failed(component, e);
                None
            }
        }
    }

    /// Like [`component`](Self::component), but the strip reports its
    /// geometry instead of a status.
    pub fn strip<T, E: Display>(
        &mut self,
        outcome: Result<T, E>,
        leds: usize,
        zones: usize,
    ) -> Option<T> {
        match outcome {
            Ok(strip) => {
                info!("boot: led_strip ok ({} LEDs, {} zones)", leds, zones);
                self.sink.emit(
                    &Notice::StripInit {
                        component: "led_strip",
                        leds,
                        zones,
                    }
                    .into(),
                );
                Some(strip)
            }
            Err(e) => {
                self.failed("led_strip", e);
                None
            }
        }
    }

    fn failed(&mut self, component: &'static str, e: impl Display) {
        warn!("boot: {} init failed: {}", component, e);
        self.sink
            .emit(&Notice::component_error(component, "init_failed").into());
        self.failures = self.failures.saturating_add(1);
    }

    /// Components that failed to come up.
    pub fn failures(&self) -> u8 {
        self.failures
    }

    /// Announce boot complete and give the sink back.
    pub fn complete(mut self) -> K {
        if self.failures > 0 {
            warn!("boot: complete with {} failed component(s)", self.failures);
        }
        self.sink.emit(
            &Notice::Boot {
                status: "complete",
                ready: Some(true),
            }
            .into(),
        );
        self.sink
    }
}
