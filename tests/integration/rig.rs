//! Test rig: one private set of shared state and channels per test, so
//! tests running in parallel never see each other's messages.

use std::time::Duration;

use evacguard::app::service::{AlertService, Links};
use evacguard::config::SystemConfig;
use evacguard::drivers::led_patterns::AlertRenderer;
use evacguard::protocol::channels::{HangupSignal, ModemEventChannel, ModemJobChannel, ZoneChannel};
use evacguard::state::SharedState;
use evacguard::tasks::actuator::ActuatorTask;
use evacguard::tasks::command::CommandTask;
use evacguard::zones::{LED_COUNT, ZONES, ZONE_COUNT};

use crate::mock_hw::{CaptureSink, MockLink, MockStrip};

pub type TestCommandTask<'a> = CommandTask<'a, MockLink, CaptureSink>;
pub type TestActuatorTask<'a> = ActuatorTask<'a, MockStrip, LED_COUNT, ZONE_COUNT>;

pub struct Rig {
    pub config: SystemConfig,
    pub state: SharedState,
    pub zones: ZoneChannel,
    pub jobs: ModemJobChannel,
    pub events: ModemEventChannel,
    pub hangup: HangupSignal,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(SystemConfig::default())
    }

    pub fn with_config(config: SystemConfig) -> Self {
        Self {
            state: SharedState::new(
                Duration::from_millis(u64::from(config.lock_timeout_ms)),
                config.default_exit_zone,
            ),
            config,
            zones: ZoneChannel::new(),
            jobs: ModemJobChannel::new(),
            events: ModemEventChannel::new(),
            hangup: HangupSignal::new(),
        }
    }

    pub fn links(&self) -> Links<'_> {
        Links {
            zones: &self.zones,
            modem_jobs: &self.jobs,
            modem_events: &self.events,
            hangup: &self.hangup,
        }
    }

    pub fn service(&self) -> AlertService<'_> {
        AlertService::new(&self.state, self.links(), &self.config, ZONE_COUNT)
    }

    /// Command task whose first telemetry frame is due at t = 0.
    pub fn command_task(&self) -> TestCommandTask<'_> {
        CommandTask::new(
            MockLink::new(),
            CaptureSink::default(),
            self.service(),
            self.config.telemetry_period_ms,
            0,
        )
    }

    pub fn actuator(&self) -> TestActuatorTask<'_> {
        let renderer = AlertRenderer::new(ZONES, self.config.led_brightness).unwrap();
        ActuatorTask::new(renderer, MockStrip::default(), &self.state, &self.zones)
    }
}

/// Queue one line on the task's link and poll once at `now_ms`.
pub fn send(task: &mut TestCommandTask<'_>, line: &str, now_ms: u64) {
    task.link_mut().feed(line.as_bytes());
    task.link_mut().feed(b"\n");
    task.poll(now_ms);
}
