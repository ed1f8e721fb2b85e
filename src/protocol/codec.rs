//! Newline-delimited line codec.
//!
//! Wire format, both directions:
//! ```text
//! ┌───────────────────────────────┬────────────┐
//! │ UTF-8 JSON object (≤ 512 B)   │ '\n' / '\r'│
//! └───────────────────────────────┴────────────┘
//! ```
//!
//! The decoder accumulates bytes one at a time and yields complete lines.
//! This handles partial reads gracefully: a single `Transport::read` may
//! return part of a line, or several lines concatenated. `\r\n` pairs and
//! blank lines produce nothing. A line that outgrows the buffer is dropped
//! whole and reported once, when its terminator arrives.

/// Maximum line length in bytes, terminator excluded.
pub const MAX_LINE: usize = 512;

/// What a byte completed, if anything.
#[derive(Debug, PartialEq, Eq)]
pub enum LineEvent<'a> {
    /// A complete, non-empty line without its terminator.
    Line(&'a [u8]),
    /// A line exceeded [`MAX_LINE`] and was discarded.
    Overflow,
}

/// Streaming line decoder with a fixed buffer.
pub struct LineDecoder {
    buf: [u8; MAX_LINE],
    len: usize,
    overflowed: bool,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    pub const fn new() -> Self {
        Self {
            buf: [0; MAX_LINE],
            len: 0,
            overflowed: false,
        }
    }

    /// Feed one byte. The returned line is valid until the next call.
    pub fn push(&mut self, byte: u8) -> Option<LineEvent<'_>> {
        if byte == b'\n' || byte == b'\r' {
            if self.overflowed {
                self.overflowed = false;
                self.len = 0;
                return Some(LineEvent::Overflow);
            }
            if self.len == 0 {
                return None;
            }
            let len = self.len;
            self.len = 0;
            return Some(LineEvent::Line(&self.buf[..len]));
        }

        if self.overflowed {
            return None;
        }
        if self.len == MAX_LINE {
            self.overflowed = true;
            self.len = 0;
            return None;
        }
        self.buf[self.len] = byte;
        self.len += 1;
        None
    }

    /// Bytes buffered for the current partial line.
    pub fn pending(&self) -> usize {
        self.len
    }

    /// Drop any partial line (e.g. after a link reset).
    pub fn reset(&mut self) {
        self.len = 0;
        self.overflowed = false;
    }
}
