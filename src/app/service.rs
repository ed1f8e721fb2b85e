//! Application service — the hexagonal core of the command path.
//!
//! [`AlertService`] validates inbound lines, applies them to the shared
//! state or forwards them to the task that owns the hardware, and builds
//! telemetry. It never blocks: every hand-off is a bounded `try_send`, and
//! every state access is a bounded-wait lock.
//!
//! ```text
//!  line ──▶ ┌────────────────────────┐ ──▶ SharedState (alert, exit)
//!           │      AlertService      │ ──▶ ZoneChannel  ──▶ actuator
//!  sink ◀── │ rate limit · parse ·   │ ──▶ ModemJobChannel ──▶ modem
//!           │ dispatch · telemetry   │ ◀── ModemEventChannel
//!           └────────────────────────┘
//! ```
//!
//! ## Inbound rate limit
//!
//! The orchestrator protocol itself has no flow control. On top of it the
//! service runs a token bucket (`command_rate_per_sec`, `command_burst`,
//! 20/20 by default) so a runaway sender cannot starve telemetry. The
//! bucket starts full: a burst of up to `command_burst` lines is always
//! accepted, and only a sustained flood above the rate sees
//! `{"event":"error","message":"rate_limited"}`. Setting
//! `command_rate_per_sec` to 0 turns the limit off.

use core::time::Duration;

use burster::Limiter as _;
use log::{debug, info, warn};

use crate::adapters::time::monotonic_now;
use crate::config::SystemConfig;
use crate::protocol::channels::{
    HangupSignal, ModemEvent, ModemEventChannel, ModemJob, ModemJobChannel, ZoneChannel,
    ZoneOverride,
};
use crate::state::{AlertState, SharedState, Snapshot};

use super::commands::{self, Command, CommandError};
use super::events::{Notice, TelemetryFrame};
use super::ports::EventSink;

// ───────────────────────────────────────────────────────────────
// Wiring
// ───────────────────────────────────────────────────────────────

/// Channels the service hands work to.
#[derive(Clone, Copy)]
pub struct Links<'a> {
    pub zones: &'a ZoneChannel,
    pub modem_jobs: &'a ModemJobChannel,
    pub modem_events: &'a ModemEventChannel,
    pub hangup: &'a HangupSignal,
}

/// Running counters. The command task logs them every
/// [`STATS_EVERY_FRAMES`](crate::tasks::command::STATS_EVERY_FRAMES)
/// telemetry frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    pub lines: u32,
    pub accepted: u32,
    pub rejected: u32,
    pub rate_limited: u32,
    pub dropped_writes: u32,
}

type Limiter = burster::TokenBucket<fn() -> Duration>;

// ───────────────────────────────────────────────────────────────
// AlertService
// ───────────────────────────────────────────────────────────────

pub struct AlertService<'a> {
    state: &'a SharedState,
    links: Links<'a>,
    limiter: Option<Limiter>,
    report_rejected: bool,
    flame_fitted: bool,
    zone_count: usize,
    /// Last good snapshot; reused when the lock times out.
    last_snapshot: Snapshot,
    stats: ServiceStats,
}

impl<'a> AlertService<'a> {
    pub fn new(
        state: &'a SharedState,
        links: Links<'a>,
        config: &SystemConfig,
        zone_count: usize,
    ) -> Self {
        let limiter = (config.command_rate_per_sec > 0).then(|| {
            burster::TokenBucket::new_with_time_provider(
                config.command_rate_per_sec,
                config.command_burst,
                monotonic_now as fn() -> Duration,
            )
        });
        let last_snapshot = state.snapshot().unwrap_or(Snapshot {
            reading: crate::state::SensorReading::ZERO,
            alert: AlertState::boot(config.default_exit_zone),
        });
        Self {
            state,
            links,
            limiter,
            report_rejected: config.report_rejected_params,
            flame_fitted: config.flame_fitted,
            zone_count,
            last_snapshot,
            stats: ServiceStats::default(),
        }
    }

    pub fn stats(&self) -> ServiceStats {
        self.stats
    }

    // ── Inbound ───────────────────────────────────────────────

    /// Handle one complete line from the orchestrator.
    pub fn handle_line(&mut self, line: &[u8], now_ms: u64, sink: &mut impl EventSink) {
        let line = line.trim_ascii();
        if line.is_empty() {
            return;
        }
        self.stats.lines = self.stats.lines.wrapping_add(1);

        if let Some(limiter) = self.limiter.as_mut() {
            if limiter.try_consume(1).is_err() {
                self.stats.rate_limited = self.stats.rate_limited.wrapping_add(1);
                sink.emit(&Notice::error("rate_limited").into());
                return;
            }
        }

        match commands::parse(line, self.zone_count) {
            Ok(cmd) => {
                self.stats.accepted = self.stats.accepted.wrapping_add(1);
                self.handle_command(cmd, now_ms, sink);
            }
            Err(e) => self.reject(e, sink),
        }
    }

    /// A line outgrew the decoder buffer and was dropped.
    pub fn line_too_long(&mut self, sink: &mut impl EventSink) {
        self.stats.rejected = self.stats.rejected.wrapping_add(1);
        warn!("cmd: line exceeded buffer, discarded");
        sink.emit(&Notice::error("line_too_long").into());
    }

    fn reject(&mut self, e: CommandError, sink: &mut impl EventSink) {
        self.stats.rejected = self.stats.rejected.wrapping_add(1);
        debug!("cmd: rejected ({})", e.message());
        if e.is_out_of_range() && !self.report_rejected {
            return;
        }
        sink.emit(
            &Notice::Error {
                component: None,
                message: e.message(),
                field: e.field(),
            }
            .into(),
        );
    }

    /// Apply one validated command.
    pub fn handle_command(&mut self, cmd: Command, now_ms: u64, sink: &mut impl EventSink) {
        match cmd {
            Command::SetAlert { level, exit } => {
                let written = match exit {
                    Some(exit) => self.state.write_alert(AlertState { level, exit }),
                    None => self.state.write_level(level),
                };
                if !written {
                    self.dropped_write("set_alert");
                    return;
                }
                info!("cmd: alert -> {:?}", level);
                sink.emit(&Notice::AlertSet { alert: level.code() }.into());
                if let Some(exit) = exit {
                    sink.emit(&Notice::ExitSet { zone: exit.code() }.into());
                }
            }
            Command::SetExit(exit) => {
                if !self.state.write_exit(exit) {
                    self.dropped_write("set_exit");
                    return;
                }
                info!("cmd: exit -> {:?}", exit);
                sink.emit(&Notice::ExitSet { zone: exit.code() }.into());
            }
            Command::SetZone { zone, colour } => {
                if self.links.zones.try_send(ZoneOverride { zone, colour }).is_err() {
                    warn!("cmd: zone override queue full");
                    sink.emit(&Notice::error("zone_busy").into());
                    return;
                }
                sink.emit(&Notice::ZoneSet { zone }.into());
            }
            Command::GsmCall(number) => {
                let ack = number.clone();
                if self.links.modem_jobs.try_send(ModemJob::Call(number)).is_err() {
                    warn!("cmd: modem queue full, call dropped");
                    sink.emit(&Notice::error("modem_busy").into());
                    return;
                }
                sink.emit(&Notice::GsmCall { number: &ack }.into());
            }
            Command::GsmSms { number, message } => {
                let ack = number.clone();
                if self
                    .links
                    .modem_jobs
                    .try_send(ModemJob::Sms { number, message })
                    .is_err()
                {
                    warn!("cmd: modem queue full, SMS dropped");
                    sink.emit(&Notice::error("modem_busy").into());
                    return;
                }
                sink.emit(&Notice::GsmSms { number: &ack }.into());
            }
            Command::GsmHangup => {
                // Acknowledged by the modem task's own gsm_hangup event.
                self.links.hangup.signal(());
            }
            Command::Ping => {
                sink.emit(&Notice::Pong { uptime: now_ms }.into());
            }
        }
    }

    fn dropped_write(&mut self, what: &str) {
        self.stats.dropped_writes = self.stats.dropped_writes.wrapping_add(1);
        warn!("cmd: {} dropped, state lock busy", what);
    }

    // ── Outbound ──────────────────────────────────────────────

    /// Forward everything the modem task has reported since the last call.
    pub fn relay_modem_events(&mut self, sink: &mut impl EventSink) {
        while let Ok(ev) = self.links.modem_events.try_receive() {
            match &ev {
                ModemEvent::Dialing(n) => sink.emit(&Notice::GsmDialing { number: n }.into()),
                ModemEvent::HungUp => sink.emit(&Notice::GsmHangup.into()),
                ModemEvent::SmsSent(n) => sink.emit(&Notice::GsmSmsSent { to: n }.into()),
                ModemEvent::Failed(e) => {
                    sink.emit(&Notice::component_error("gsm", e.tag()).into());
                }
            }
        }
    }

    /// Build one telemetry frame. Falls back to the previous snapshot when
    /// the state lock is busy.
    pub fn telemetry(&mut self, now_ms: u64) -> TelemetryFrame {
        if let Some(snap) = self.state.snapshot() {
            self.last_snapshot = snap;
        }
        TelemetryFrame::from_snapshot(&self.last_snapshot, self.flame_fitted, now_ms)
    }
}
