//! Command/telemetry task — the orchestrator side of the serial link.
//!
//! Each poll drains whatever bytes the link has, feeds them through the line
//! decoder into [`AlertService`], relays modem progress, and emits telemetry
//! when its timer is due. Nothing here blocks beyond a single link read.

use log::{info, warn};

use crate::app::ports::{EventSink, TimePort};
use crate::app::service::AlertService;
use crate::protocol::codec::{LineDecoder, LineEvent};
use crate::protocol::transport::Transport;
use crate::scheduler::PeriodicTimer;

/// Idle delay between polls.
pub const IDLE_DELAY_MS: u32 = 10;

/// Bytes pulled from the link per read.
const READ_CHUNK: usize = 64;

/// Upper bound on reads per poll, so a flooding sender cannot starve
/// telemetry.
const MAX_READS_PER_POLL: usize = 16;

/// Telemetry frames between two stats log lines; one minute at 10 Hz.
pub const STATS_EVERY_FRAMES: u32 = 600;

pub struct CommandTask<'a, L, K> {
    link: L,
    sink: K,
    service: AlertService<'a>,
    decoder: LineDecoder,
    telemetry: PeriodicTimer,
    read_buf: [u8; READ_CHUNK],
    read_errors: u32,
    frames: u32,
    stats_reports: u32,
}

impl<'a, L: Transport, K: EventSink> CommandTask<'a, L, K> {
    /// First telemetry frame is due at `start_ms`.
    pub fn new(
        link: L,
        sink: K,
        service: AlertService<'a>,
        telemetry_period_ms: u32,
        start_ms: u64,
    ) -> Self {
        Self {
            link,
            sink,
            service,
            decoder: LineDecoder::new(),
            telemetry: PeriodicTimer::new(u64::from(telemetry_period_ms), start_ms),
            read_buf: [0; READ_CHUNK],
            read_errors: 0,
            frames: 0,
            stats_reports: 0,
        }
    }

    /// One loop iteration at time `now_ms`.
    pub fn poll(&mut self, now_ms: u64) {
        self.ingest(now_ms);
        self.service.relay_modem_events(&mut self.sink);
        if self.telemetry.poll_due(now_ms) {
            let frame = self.service.telemetry(now_ms);
            self.sink.emit(&frame.into());
            self.frames = self.frames.wrapping_add(1);
            if self.frames % STATS_EVERY_FRAMES == 0 {
                self.log_stats();
            }
        }
    }

    fn log_stats(&mut self) {
        let s = self.service.stats();
        info!(
            "cmd: {} lines, {} accepted, {} rejected, {} rate-limited, {} dropped writes, {} read errors",
            s.lines, s.accepted, s.rejected, s.rate_limited, s.dropped_writes, self.read_errors
        );
        self.stats_reports = self.stats_reports.saturating_add(1);
    }

    fn ingest(&mut self, now_ms: u64) {
        for _ in 0..MAX_READS_PER_POLL {
            let n = match self.link.read_available(&mut self.read_buf) {
                Ok(0) => return,
                Ok(n) => n.min(READ_CHUNK),
                Err(e) => {
                    if self.read_errors == 0 {
                        warn!("cmd: {}", e);
                    }
                    self.read_errors = self.read_errors.saturating_add(1);
                    return;
                }
            };
            for &byte in &self.read_buf[..n] {
                match self.decoder.push(byte) {
                    Some(LineEvent::Line(line)) => {
                        self.service.handle_line(line, now_ms, &mut self.sink);
                    }
                    Some(LineEvent::Overflow) => self.service.line_too_long(&mut self.sink),
                    None => {}
                }
            }
        }
    }

    /// Link reads that failed since boot.
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }

    /// Stats lines logged since boot.
    pub fn stats_reports(&self) -> u32 {
        self.stats_reports
    }

    pub fn service(&self) -> &AlertService<'a> {
        &self.service
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn run(mut self, clock: &impl TimePort) -> ! {
        loop {
            self.poll(clock.uptime_ms());
            clock.delay_ms(IDLE_DELAY_MS);
        }
    }
}
