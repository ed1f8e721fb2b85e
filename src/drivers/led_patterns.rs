//! Alert pattern renderer for the zone-partitioned strip.
//!
//! The actuator task calls [`AlertRenderer::render`] once per iteration with
//! the latest [`AlertState`]; the renderer paints one frame and returns how
//! long to hold it before the next call.
//!
//! | Level     | Pattern          | Colour          | Brightness        | Hold   |
//! |-----------|------------------|-----------------|-------------------|--------|
//! | SAFE      | Solid            | green           | configured        | 100 ms |
//! | CALLING   | Breathing        | amber           | 10 ↔ 250, step 5  | 20 ms  |
//! | MESSAGING | Breathing        | blue            | 20 ↔ 200, step 2  | 30 ms  |
//! | DANGER    | Blink            | red / off       | 255               | 100 ms |
//! | EVACUATE  | Converging chase | green comets    | configured        | 50 ms  |
//!
//! ## Converging chase
//!
//! ```text
//!   zone 0        zone 1        zone 2 (exit)   zone 3
//!  ..oO#.......  .....oO#....  ############   ...#Oo......
//!     ──▶           ──▶           solid          ◀──
//! ```
//!
//! Zones below the exit run their comet toward higher indices, zones above
//! it toward lower indices, so every comet travels toward the exit. Each
//! zone keeps its own position, wrapping modulo that zone's length.

use crate::error::{Error, Result};
use crate::state::{ActiveZone, AlertLevel, AlertState};
use crate::zones::{ZoneSpan, ZoneTable};

use super::led_strip::{
    AMBER, BLUE, Frame, GREEN, GREEN_DIM, GREEN_DIMMEST, RED, Rgb,
};

/// Closed set of patterns, one per alert level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Solid,
    BreathingAmber,
    BreathingBlue,
    Blink,
    ConvergingChase,
}

impl Pattern {
    pub const fn for_level(level: AlertLevel) -> Self {
        match level {
            AlertLevel::Safe => Self::Solid,
            AlertLevel::Calling => Self::BreathingAmber,
            AlertLevel::Messaging => Self::BreathingBlue,
            AlertLevel::Danger => Self::Blink,
            AlertLevel::Evacuate => Self::ConvergingChase,
        }
    }

    /// How long one rendered frame is held.
    pub const fn period_ms(self) -> u32 {
        match self {
            Self::Solid | Self::Blink => 100,
            Self::BreathingAmber => 20,
            Self::BreathingBlue => 30,
            Self::ConvergingChase => 50,
        }
    }
}

/// Brightness ramp bounds for a breathing pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampSpec {
    pub colour: Rgb,
    pub min: u8,
    pub max: u8,
    pub step: u8,
}

pub const CALLING_RAMP: RampSpec = RampSpec {
    colour: AMBER,
    min: 10,
    max: 250,
    step: 5,
};

pub const MESSAGING_RAMP: RampSpec = RampSpec {
    colour: BLUE,
    min: 20,
    max: 200,
    step: 2,
};

/// Triangle-wave brightness walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ramp {
    level: u8,
    rising: bool,
}

impl Ramp {
    const fn new() -> Self {
        Self {
            level: 0,
            rising: true,
        }
    }

    /// Pull the level inside `spec`'s bounds. A level left on a bound
    /// turns back into the range, so the first frame always moves.
    fn enter(&mut self, spec: &RampSpec) {
        self.level = self.level.clamp(spec.min, spec.max);
        if self.level >= spec.max {
            self.rising = false;
        } else if self.level <= spec.min {
            self.rising = true;
        }
    }

    fn step(&mut self, spec: &RampSpec) -> u8 {
        if self.rising {
            self.level = self.level.saturating_add(spec.step);
            if self.level >= spec.max {
                self.rising = false;
            }
        } else {
            self.level = self.level.saturating_sub(spec.step);
            if self.level <= spec.min {
                self.rising = true;
            }
        }
        self.level = self.level.clamp(spec.min, spec.max);
        self.level
    }
}

/// Renders alert patterns into a `LEDS`-pixel frame split into `ZONES` zones.
pub struct AlertRenderer<const LEDS: usize, const ZONES: usize> {
    table: ZoneTable<ZONES>,
    frame: Frame<LEDS>,
    base_brightness: u8,
    current: Option<Pattern>,
    ramp: Ramp,
    blink_on: bool,
    chase: [usize; ZONES],
}

impl<const LEDS: usize, const ZONES: usize> AlertRenderer<LEDS, ZONES> {
    /// `base_brightness` is used by the solid and chase patterns.
    pub fn new(table: ZoneTable<ZONES>, base_brightness: u8) -> Result<Self> {
        if table.strip_len() != LEDS {
            return Err(Error::Config("zone table does not match strip length"));
        }
        Ok(Self {
            table,
            frame: Frame::new(base_brightness),
            base_brightness,
            current: None,
            ramp: Ramp::new(),
            blink_on: false,
            chase: [0; ZONES],
        })
    }

    pub fn frame(&self) -> &Frame<LEDS> {
        &self.frame
    }

    pub fn current_pattern(&self) -> Option<Pattern> {
        self.current
    }

    /// Per-zone chase head offsets (from the zone's trailing edge).
    pub fn chase_positions(&self) -> &[usize; ZONES] {
        &self.chase
    }

    /// Paint one frame for `alert` and return the hold time in ms.
    pub fn render(&mut self, alert: AlertState) -> u32 {
        let pattern = Pattern::for_level(alert.level);
        let entered = self.current != Some(pattern);
        if entered {
            self.on_enter(pattern);
        }
        self.current = Some(pattern);

        match pattern {
            Pattern::Solid => {
                self.frame.fill(GREEN);
                self.frame.set_brightness(self.base_brightness);
            }
            Pattern::BreathingAmber => self.breathe(&CALLING_RAMP),
            Pattern::BreathingBlue => self.breathe(&MESSAGING_RAMP),
            Pattern::Blink => {
                self.blink_on = !self.blink_on;
                if self.blink_on {
                    self.frame.fill(RED);
                } else {
                    self.frame.clear();
                }
                self.frame.set_brightness(u8::MAX);
            }
            Pattern::ConvergingChase => self.chase_tick(alert.exit),
        }
        pattern.period_ms()
    }

    /// Paint `zone` only, leaving every other pixel as it is.
    pub fn paint_zone(&mut self, zone: usize, colour: Rgb) -> Result<()> {
        let span = self
            .table
            .get(zone)
            .ok_or(Error::Config("zone index outside zone table"))?;
        self.frame.fill_span(span, colour);
        Ok(())
    }

    /// Boot self-test frame: the first `lit` LEDs green, the rest dark.
    /// Drops the current pattern so the next [`render`](Self::render)
    /// starts it afresh.
    pub fn sweep(&mut self, lit: usize) {
        self.frame.clear();
        self.frame.fill_span(ZoneSpan::new(0, lit.min(LEDS)), GREEN);
        self.frame.set_brightness(self.base_brightness);
        self.current = None;
    }

    /// All LEDs off.
    pub fn blank(&mut self) {
        self.frame.clear();
        self.current = None;
    }

    fn on_enter(&mut self, pattern: Pattern) {
        match pattern {
            Pattern::BreathingAmber => self.ramp.enter(&CALLING_RAMP),
            Pattern::BreathingBlue => self.ramp.enter(&MESSAGING_RAMP),
            Pattern::Blink => self.blink_on = false,
            Pattern::ConvergingChase => self.chase = [0; ZONES],
            Pattern::Solid => {}
        }
    }

    fn breathe(&mut self, spec: &RampSpec) {
        let level = self.ramp.step(spec);
        self.frame.fill(spec.colour);
        self.frame.set_brightness(level);
    }

    fn chase_tick(&mut self, exit: ActiveZone) {
        // An exit index the table does not know degrades to "all zones".
        let exit = match exit {
            ActiveZone::Zone(z) if (z as usize) < ZONES => Some(z as usize),
            _ => None,
        };

        self.frame.clear();
        self.frame.set_brightness(self.base_brightness);

        for (z, span) in self.table.spans().iter().enumerate() {
            match exit {
                Some(e) if z == e => self.frame.fill_span(*span, GREEN),
                Some(e) if z > e => draw_comet(&mut self.frame, *span, self.chase[z], false),
                _ => draw_comet(&mut self.frame, *span, self.chase[z], true),
            }
            self.chase[z] = (self.chase[z] + 1) % span.len();
        }
    }
}

/// Head plus two dimmer trailing pixels. The tail stops at the zone edge
/// instead of wrapping.
fn draw_comet<const N: usize>(frame: &mut Frame<N>, span: ZoneSpan, pos: usize, ascending: bool) {
    let len = span.len();
    let pos = pos % len;
    let trail = [GREEN, GREEN_DIM, GREEN_DIMMEST];
    for (back, colour) in trail.iter().enumerate() {
        if back > pos {
            break;
        }
        let offset = pos - back;
        let led = if ascending {
            span.start + offset
        } else {
            span.end - 1 - offset
        };
        frame.set(led, *colour);
    }
}
