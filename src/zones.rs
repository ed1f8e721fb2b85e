//! Compile-time partition of the LED strip into evacuation zones.
//!
//! ```text
//!  LED index  0            15            30            45          59
//!             ├── zone 0 ──┼── zone 1 ───┼── zone 2 ───┼── zone 3 ──┤
//!             entrance      hallway A     hallway B     exit
//! ```
//!
//! A [`ZoneTable`] is only constructible when its spans are contiguous,
//! non-empty, start at LED 0 and end exactly at the strip length. Built in a
//! `const` context (as [`ZONES`] is), an invalid table fails the build.

use core::ops::Range;

/// Total LEDs on the reference strip.
pub const LED_COUNT: usize = 60;

/// Number of zones on the reference strip.
pub const ZONE_COUNT: usize = 4;

/// Reference board layout: four equal hallway segments, exit last.
pub const ZONES: ZoneTable<ZONE_COUNT> = ZoneTable::new(
    LED_COUNT,
    [
        ZoneSpan::new(0, 15),
        ZoneSpan::new(15, 30),
        ZoneSpan::new(30, 45),
        ZoneSpan::new(45, 60),
    ],
);

/// Half-open LED index range `start..end` belonging to one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneSpan {
    pub start: usize,
    pub end: usize,
}

impl ZoneSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(&self, led: usize) -> bool {
        self.range().contains(&led)
    }
}

/// Why a candidate table was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneTableError {
    NoZones,
    EmptyZone(usize),
    Gap(usize),
    Overlap(usize),
    OutOfBounds(usize),
    Uncovered,
}

/// Validated, fixed partition of a strip of `strip_len` LEDs into `N` zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneTable<const N: usize> {
    spans: [ZoneSpan; N],
    strip_len: usize,
}

impl<const N: usize> ZoneTable<N> {
    /// Build a table, panicking on an invalid layout. Intended for `const`
    /// items so a bad layout is a compile error.
    pub const fn new(strip_len: usize, spans: [ZoneSpan; N]) -> Self {
        match Self::check(strip_len, &spans) {
            Ok(()) => Self { spans, strip_len },
            Err(_) => panic!("zone table must cover the strip with contiguous non-empty spans"),
        }
    }

    /// Fallible constructor for layouts built at runtime.
    pub const fn try_new(strip_len: usize, spans: [ZoneSpan; N]) -> Result<Self, ZoneTableError> {
        match Self::check(strip_len, &spans) {
            Ok(()) => Ok(Self { spans, strip_len }),
            Err(e) => Err(e),
        }
    }

    const fn check(strip_len: usize, spans: &[ZoneSpan; N]) -> Result<(), ZoneTableError> {
        if N == 0 {
            return Err(ZoneTableError::NoZones);
        }
        let mut expected_start = 0;
        let mut i = 0;
        while i < N {
            let span = spans[i];
            if span.end <= span.start {
                return Err(ZoneTableError::EmptyZone(i));
            }
            if span.start > expected_start {
                return Err(ZoneTableError::Gap(i));
            }
            if span.start < expected_start {
                return Err(ZoneTableError::Overlap(i));
            }
            if span.end > strip_len {
                return Err(ZoneTableError::OutOfBounds(i));
            }
            expected_start = span.end;
            i += 1;
        }
        if expected_start != strip_len {
            return Err(ZoneTableError::Uncovered);
        }
        Ok(())
    }

    /// Range-checked lookup. Command handlers must go through this.
    pub fn get(&self, zone: usize) -> Option<ZoneSpan> {
        self.spans.get(zone).copied()
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    pub const fn strip_len(&self) -> usize {
        self.strip_len
    }

    pub fn spans(&self) -> &[ZoneSpan; N] {
        &self.spans
    }

    /// Zone owning LED `led`, if any.
    pub fn zone_of(&self, led: usize) -> Option<usize> {
        self.spans.iter().position(|s| s.contains(led))
    }
}
