//! SIM800-class cellular module driver (AT directives over UART).
//!
//! Every directive is terminated with `\r\n` and followed by a settling
//! gap (100 ms by default) before the next write. Responses are not parsed;
//! the module is driven open-loop.
//!
//! ```text
//!  call:  ATD<number>;  ──(ring window)──▶  ATH
//!  sms:   AT+CMGF=1  ▶  AT+CMGS="<number>"  ▶  <text>  ▶  0x1A  ──(submit wait)──
//! ```

use core::fmt::Write as _;

use heapless::String;
use log::{debug, info};

use crate::app::ports::TimePort;
use crate::error::ModemError;
use crate::protocol::transport::Transport;

/// Longest directive we ever build (`AT+CMGS="` + 20-digit number + `"`).
const DIRECTIVE_CAP: usize = 48;

/// Terminates the SMS text prompt and submits the message.
const CTRL_Z: u8 = 0x1A;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GsmTiming {
    /// Pause after every directive.
    pub gap_ms: u32,
    /// Pause after Ctrl-Z while the module submits the SMS.
    pub submit_wait_ms: u32,
}

impl Default for GsmTiming {
    fn default() -> Self {
        Self {
            gap_ms: 100,
            submit_wait_ms: 1_000,
        }
    }
}

pub struct GsmModem<L> {
    link: L,
    timing: GsmTiming,
}

impl<L: Transport> GsmModem<L> {
    pub fn new(link: L, timing: GsmTiming) -> Self {
        Self { link, timing }
    }

    /// Write `body` + CRLF, then wait the directive gap.
    pub fn send_directive(&mut self, body: &str, clock: &impl TimePort) -> Result<(), ModemError> {
        let mut line: String<DIRECTIVE_CAP> = String::new();
        line.push_str(body)
            .and_then(|()| line.push_str("\r\n"))
            .map_err(|()| ModemError::DirectiveTooLong)?;
        debug!("gsm: > {}", body);
        self.link
            .write_all(line.as_bytes())
            .map_err(|_| ModemError::WriteFailed)?;
        clock.delay_ms(self.timing.gap_ms);
        Ok(())
    }

    /// Start a voice call. Returns once the dial directive is out.
    pub fn dial(&mut self, number: &str, clock: &impl TimePort) -> Result<(), ModemError> {
        let mut d: String<DIRECTIVE_CAP> = String::new();
        write!(d, "ATD{number};").map_err(|_| ModemError::DirectiveTooLong)?;
        info!("gsm: dialing {}", number);
        self.send_directive(&d, clock)
    }

    pub fn hang_up(&mut self, clock: &impl TimePort) -> Result<(), ModemError> {
        info!("gsm: hang up");
        self.send_directive("ATH", clock)
    }

    /// Text mode, address, body, Ctrl-Z, then wait for submission.
    pub fn send_sms(
        &mut self,
        number: &str,
        text: &str,
        clock: &impl TimePort,
    ) -> Result<(), ModemError> {
        self.send_directive("AT+CMGF=1", clock)?;

        let mut addr: String<DIRECTIVE_CAP> = String::new();
        write!(addr, "AT+CMGS=\"{number}\"").map_err(|_| ModemError::DirectiveTooLong)?;
        self.send_directive(&addr, clock)?;

        self.link
            .write_all(text.as_bytes())
            .map_err(|_| ModemError::WriteFailed)?;
        clock.delay_ms(self.timing.gap_ms);

        self.link
            .write_all(&[CTRL_Z])
            .map_err(|_| ModemError::WriteFailed)?;
        clock.delay_ms(self.timing.submit_wait_ms);
        info!("gsm: SMS to {} submitted", number);
        Ok(())
    }

    pub fn link(&self) -> &L {
        &self.link
    }
}
