//! Mock adapters for integration tests.
//!
//! Every mock records what the firmware did to it so tests can assert on
//! the full history without touching real UART/RMT/I²C registers.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use embedded_hal::i2c::{self, ErrorKind, NoAcknowledgeSource, Operation};
use evacguard::app::events::AppEvent;
use evacguard::app::ports::{EventSink, StripPort, TimePort};
use evacguard::drivers::led_strip::Rgb;
use evacguard::error::Result;
use evacguard::protocol::transport::Transport;
use serde_json::Value;

// ── MockStrip ─────────────────────────────────────────────────

/// Records every frame pushed to the strip.
#[derive(Default)]
pub struct MockStrip {
    pub frames: Vec<(Vec<Rgb>, u8)>,
}

#[allow(dead_code)]
impl MockStrip {
    pub fn last(&self) -> Option<&(Vec<Rgb>, u8)> {
        self.frames.last()
    }
}

impl StripPort for MockStrip {
    fn show(&mut self, pixels: &[Rgb], brightness: u8) -> Result<()> {
        self.frames.push((pixels.to_vec(), brightness));
        Ok(())
    }
}

// ── MockLink ──────────────────────────────────────────────────

/// Byte link with a scripted inbound queue and captured outbound bytes.
/// `chunk` limits how many bytes one `read` returns.
pub struct MockLink {
    input: VecDeque<u8>,
    pub output: Vec<u8>,
    chunk: usize,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new() -> Self {
        Self {
            input: VecDeque::new(),
            output: Vec::new(),
            chunk: usize::MAX,
            fail_reads: false,
            fail_writes: false,
        }
    }

    pub fn with_chunk(chunk: usize) -> Self {
        Self {
            chunk,
            ..Self::new()
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.input.extend(bytes);
    }

    pub fn pending(&self) -> usize {
        self.input.len()
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl Default for MockLink {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockLink {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> core::result::Result<usize, ()> {
        if self.fail_reads {
            return Err(());
        }
        let n = buf.len().min(self.chunk).min(self.input.len());
        for (slot, byte) in buf.iter_mut().zip(self.input.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> core::result::Result<usize, ()> {
        if self.fail_writes {
            return Err(());
        }
        self.output.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> core::result::Result<(), ()> {
        Ok(())
    }
}

// ── CaptureSink ───────────────────────────────────────────────

/// Event sink that keeps every event as parsed JSON.
#[derive(Default)]
pub struct CaptureSink {
    pub events: Vec<Value>,
}

#[allow(dead_code)]
impl CaptureSink {
    /// Non-telemetry events, in order.
    pub fn notices(&self) -> Vec<&Value> {
        self.events.iter().filter(|e| e.get("event").is_some()).collect()
    }

    pub fn telemetry(&self) -> Vec<&Value> {
        self.events
            .iter()
            .filter(|e| e.get("type").and_then(Value::as_str) == Some("telemetry"))
            .collect()
    }

    pub fn with_event<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.events
            .iter()
            .filter(move |e| e.get("event").and_then(Value::as_str) == Some(name))
    }

    pub fn errors(&self) -> Vec<String> {
        self.with_event("error")
            .filter_map(|e| e.get("message").and_then(Value::as_str).map(str::to_owned))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for CaptureSink {
    fn emit(&mut self, event: &AppEvent<'_>) {
        let v = serde_json::to_value(event).expect("events always serialise");
        self.events.push(v);
    }
}

// ── MockClock ─────────────────────────────────────────────────

type DelayHook = Arc<dyn Fn(u64) + Send + Sync>;

/// Virtual clock: `delay_ms` advances time instantly. An optional hook sees
/// the new time after every delay, so tests can inject events mid-wait.
#[derive(Clone, Default)]
pub struct MockClock {
    now: Arc<AtomicU64>,
    hook: Option<DelayHook>,
    delays: Arc<AtomicU64>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hook(hook: impl Fn(u64) + Send + Sync + 'static) -> Self {
        Self {
            hook: Some(Arc::new(hook)),
            ..Self::default()
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    /// Number of `delay_ms` calls so far.
    pub fn delays(&self) -> u64 {
        self.delays.load(Ordering::SeqCst)
    }
}

impl TimePort for MockClock {
    fn uptime_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn delay_ms(&self, ms: u32) {
        let t = self.now.fetch_add(u64::from(ms), Ordering::SeqCst) + u64::from(ms);
        self.delays.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = &self.hook {
            hook(t);
        }
    }
}

// ── MockI2c (MPU-6050 register file) ──────────────────────────

/// Emulates an MPU-6050 at 0x68: register pointer + auto-increment.
/// `absent` makes every transaction NACK; `fail_reads` is shared so a test
/// can break the bus after the sensor hub has taken ownership.
#[derive(Clone)]
pub struct MockI2c {
    pub regs: [u8; 128],
    ptr: usize,
    pub absent: bool,
    pub fail_reads: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockI2c {
    pub fn mpu6050() -> Self {
        let mut regs = [0u8; 128];
        regs[0x75] = 0x68; // WHO_AM_I
        Self {
            regs,
            ptr: 0,
            absent: false,
            fail_reads: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn absent() -> Self {
        Self {
            absent: true,
            ..Self::mpu6050()
        }
    }

    /// Load raw big-endian accel/gyro words into the output registers.
    pub fn set_motion(&mut self, accel: [i16; 3], gyro: [i16; 3]) {
        for (i, v) in accel.iter().enumerate() {
            self.regs[0x3B + 2 * i..0x3B + 2 * i + 2].copy_from_slice(&v.to_be_bytes());
        }
        for (i, v) in gyro.iter().enumerate() {
            self.regs[0x43 + 2 * i..0x43 + 2 * i + 2].copy_from_slice(&v.to_be_bytes());
        }
    }
}

impl i2c::ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl i2c::I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> core::result::Result<(), ErrorKind> {
        if self.absent || address != 0x68 {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if let Some((&reg, rest)) = bytes.split_first() {
                        self.ptr = usize::from(reg);
                        for &b in rest {
                            self.regs[self.ptr % 128] = b;
                            self.ptr += 1;
                        }
                    }
                }
                Operation::Read(buf) => {
                    if self.fail_reads.load(Ordering::SeqCst) {
                        return Err(ErrorKind::Bus);
                    }
                    for slot in buf.iter_mut() {
                        *slot = self.regs[self.ptr % 128];
                        self.ptr += 1;
                    }
                }
            }
        }
        Ok(())
    }
}
