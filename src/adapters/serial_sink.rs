//! JSON-lines event sink adapter.
//!
//! Implements [`EventSink`] by serialising each [`AppEvent`] as one JSON
//! object followed by `\n` and writing it to a [`Transport`] (the UART0
//! orchestrator link in production). The output buffer is allocated once
//! and reused for every event.

use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::protocol::transport::Transport;

/// Room for the largest telemetry frame with margin.
const OUT_CAPACITY: usize = 320;

/// Adapter that writes every [`AppEvent`] as a JSON line.
pub struct JsonLineSink<W> {
    out: W,
    buf: Vec<u8>,
    write_errors: u32,
}

impl<W: Transport> JsonLineSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(OUT_CAPACITY),
            write_errors: 0,
        }
    }

    /// Lines lost to link write failures.
    pub fn write_errors(&self) -> u32 {
        self.write_errors
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Transport> EventSink for JsonLineSink<W> {
    fn emit(&mut self, event: &AppEvent<'_>) {
        self.buf.clear();
        if let Err(e) = serde_json::to_writer(&mut self.buf, event) {
            warn!("sink: serialise failed: {}", e);
            return;
        }
        self.buf.push(b'\n');
        if self.out.write_all(&self.buf).is_err() {
            // Only the first failure is logged; the link may be gone for good.
            if self.write_errors == 0 {
                warn!("sink: link write failed");
            }
            self.write_errors = self.write_errors.saturating_add(1);
        }
    }
}
