//! Modem task — executes queued cellular jobs one at a time.
//!
//! A call occupies the task for the ring window (or until a hang-up request
//! arrives); the command task keeps serving the orchestrator meanwhile and
//! relays the progress events this task reports.

use log::{info, warn};

use crate::app::commands::PhoneNumber;
use crate::app::ports::TimePort;
use crate::drivers::gsm::GsmModem;
use crate::protocol::channels::{
    HangupSignal, ModemEvent, ModemEventChannel, ModemJob, ModemJobChannel,
};
use crate::protocol::transport::Transport;

/// Idle delay while the job queue is empty.
pub const IDLE_DELAY_MS: u32 = 50;

/// Hang-up requests are checked at least this often during a call.
const HANGUP_POLL_MS: u64 = 100;

pub struct ModemTask<'a, L, C> {
    modem: GsmModem<L>,
    clock: C,
    jobs: &'a ModemJobChannel,
    events: &'a ModemEventChannel,
    hangup: &'a HangupSignal,
    ring_ms: u64,
}

impl<'a, L: Transport, C: TimePort> ModemTask<'a, L, C> {
    pub fn new(
        modem: GsmModem<L>,
        clock: C,
        jobs: &'a ModemJobChannel,
        events: &'a ModemEventChannel,
        hangup: &'a HangupSignal,
        ring_secs: u32,
    ) -> Self {
        Self {
            modem,
            clock,
            jobs,
            events,
            hangup,
            ring_ms: u64::from(ring_secs) * 1_000,
        }
    }

    /// Run the next queued job, if any. Returns `true` when one ran.
    pub fn poll(&mut self) -> bool {
        match self.jobs.try_receive() {
            Ok(job) => {
                self.run_job(job);
                true
            }
            Err(_) => false,
        }
    }

    fn run_job(&mut self, job: ModemJob) {
        match job {
            ModemJob::Call(number) => self.call(number),
            ModemJob::Sms { number, message } => {
                match self.modem.send_sms(&number, &message, &self.clock) {
                    Ok(()) => self.report(ModemEvent::SmsSent(number)),
                    Err(e) => {
                        warn!("modem: SMS to {} failed: {}", number, e);
                        self.report(ModemEvent::Failed(e));
                    }
                }
            }
        }
    }

    fn call(&mut self, number: PhoneNumber) {
        // A hang-up requested while idle must not cut the next call short.
        self.hangup.reset();

        if let Err(e) = self.modem.dial(&number, &self.clock) {
            warn!("modem: dial failed: {}", e);
            self.report(ModemEvent::Failed(e));
            return;
        }
        self.report(ModemEvent::Dialing(number));

        let deadline = self.clock.uptime_ms().saturating_add(self.ring_ms);
        loop {
            if self.hangup.try_take().is_some() {
                info!("modem: hang-up requested");
                break;
            }
            let now = self.clock.uptime_ms();
            if now >= deadline {
                break;
            }
            self.clock.delay_ms((deadline - now).min(HANGUP_POLL_MS) as u32);
        }

        match self.modem.hang_up(&self.clock) {
            Ok(()) => self.report(ModemEvent::HungUp),
            Err(e) => {
                warn!("modem: hang-up failed: {}", e);
                self.report(ModemEvent::Failed(e));
            }
        }
    }

    fn report(&self, event: ModemEvent) {
        if self.events.try_send(event).is_err() {
            warn!("modem: event queue full, progress event dropped");
        }
    }

    pub fn modem(&self) -> &GsmModem<L> {
        &self.modem
    }

    pub fn run(mut self) -> ! {
        loop {
            if !self.poll() {
                self.clock.delay_ms(IDLE_DELAY_MS);
            }
        }
    }
}
