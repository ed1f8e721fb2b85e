//! Frame buffer for the addressable alert strip.
//!
//! The actuator task owns exactly one [`Frame`]; patterns paint into it and
//! the [`StripPort`](crate::app::ports::StripPort) adapter pushes it out.
//! Brightness is carried alongside the pixels and applied at output time,
//! the same way the WS2812 driver's global brightness works.

use crate::zones::ZoneSpan;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

pub const BLACK: Rgb = (0, 0, 0);
pub const GREEN: Rgb = (0, 128, 0);
pub const GREEN_DIM: Rgb = (0, 100, 0);
pub const GREEN_DIMMEST: Rgb = (0, 50, 0);
pub const AMBER: Rgb = (255, 150, 0);
pub const BLUE: Rgb = (0, 0, 255);
pub const RED: Rgb = (255, 0, 0);

/// Scale a colour by a 0–255 brightness.
pub fn scale(colour: Rgb, brightness: u8) -> Rgb {
    let br = u16::from(brightness);
    let ch = |c: u8| ((u16::from(c) * br) / 255) as u8;
    (ch(colour.0), ch(colour.1), ch(colour.2))
}

/// Fixed-size pixel buffer plus global brightness. Stack-allocated, no heap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<const N: usize> {
    pixels: [Rgb; N],
    brightness: u8,
}

impl<const N: usize> Frame<N> {
    pub const fn new(brightness: u8) -> Self {
        Self {
            pixels: [BLACK; N],
            brightness,
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [BLACK; N];
    }

    pub fn fill(&mut self, colour: Rgb) {
        self.pixels = [colour; N];
    }

    /// Paint one zone; indices past the end of the buffer are ignored.
    pub fn fill_span(&mut self, span: ZoneSpan, colour: Rgb) {
        let end = span.end.min(N);
        if span.start < end {
            self.pixels[span.start..end].fill(colour);
        }
    }

    /// Set a single pixel. Out-of-range writes are dropped.
    pub fn set(&mut self, index: usize, colour: Rgb) {
        if let Some(px) = self.pixels.get_mut(index) {
            *px = colour;
        }
    }

    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.pixels.get(index).copied()
    }

    pub fn pixels(&self) -> &[Rgb; N] {
        &self.pixels
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    /// Pixel `index` as it will appear on the wire (brightness applied).
    pub fn output(&self, index: usize) -> Option<Rgb> {
        self.get(index).map(|c| scale(c, self.brightness))
    }

    /// `true` when every pixel is black.
    pub fn is_dark(&self) -> bool {
        self.pixels.iter().all(|&p| p == BLACK)
    }
}
