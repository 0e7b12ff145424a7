//! 1-bit framebuffer for the 128x64 OLED panel.
//!
//! A [`Frame`] is produced fresh for every tick, drawn into through the
//! embedded-graphics `DrawTarget` API and then handed to a render surface.
//! It does not own any hardware, so screens can be rendered and compared in
//! tests without a device attached.
//!
//! # Layout
//!
//! Row-major, one bit per pixel, most significant bit first:
//! `byte = (y * WIDTH + x) / 8`, `bit = 7 - (x % 8)`.

use core::fmt;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::{FRAME_BYTES, SCREEN_HEIGHT, SCREEN_WIDTH};

const WIDTH: usize = SCREEN_WIDTH as usize;
const HEIGHT: usize = SCREEN_HEIGHT as usize;

/// Complete monochrome frame ready to publish.
///
/// Equality is bitwise, so two frames compare equal exactly when the panel
/// would show the same image.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    buf: [u8; FRAME_BYTES],
}

impl Frame {
    /// Create a blank frame (all pixels off).
    pub const fn new() -> Self { Self { buf: [0u8; FRAME_BYTES] } }

    /// Check whether the pixel at `(x, y)` is lit. Out-of-bounds reads are off.
    #[inline]
    pub const fn is_on(
        &self,
        x: u32,
        y: u32,
    ) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        let (idx, mask) = Self::locate(x as usize, y as usize);
        self.buf[idx] & mask != 0
    }

    /// Number of lit pixels. Handy for "did anything get drawn" checks.
    pub fn lit_pixels(&self) -> u32 { self.buf.iter().map(|b| b.count_ones()).sum() }

    /// Raw packed bytes in row-major order.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8] { &self.buf }

    /// Iterate over every pixel of the frame, row by row.
    ///
    /// Drivers with their own buffer (e.g. the SSD1306 graphics mode) consume
    /// this through `draw_iter`.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel<BinaryColor>> + '_ {
        (0..SCREEN_HEIGHT).flat_map(move |y| {
            (0..SCREEN_WIDTH).map(move |x| {
                let color = if self.is_on(x, y) { BinaryColor::On } else { BinaryColor::Off };
                Pixel(Point::new(x as i32, y as i32), color)
            })
        })
    }

    #[inline]
    const fn locate(
        x: usize,
        y: usize,
    ) -> (usize, u8) {
        let bit = y * WIDTH + x;
        (bit / 8, 0x80 >> (bit % 8))
    }

    /// Set a pixel in the framebuffer. Out-of-bounds writes are dropped.
    #[inline]
    fn set_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: BinaryColor,
    ) {
        if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
            return;
        }
        let (idx, mask) = Self::locate(x as usize, y as usize);
        if color.is_on() {
            self.buf[idx] |= mask;
        } else {
            self.buf[idx] &= !mask;
        }
    }
}

impl Default for Frame {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for Frame {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Frame")
            .field("lit_pixels", &self.lit_pixels())
            .finish()
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let drawable_area = area.intersection(&self.bounding_box());
        if drawable_area.size == Size::zero() {
            return Ok(());
        }
        for y in drawable_area.rows() {
            for x in drawable_area.columns() {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let fill = if color.is_on() { 0xFF } else { 0x00 };
        self.buf.fill(fill);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    use super::*;

    #[test]
    fn test_new_frame_is_blank() {
        let frame = Frame::new();
        assert_eq!(frame.lit_pixels(), 0);
        assert_eq!(frame.as_bytes().len(), FRAME_BYTES);
    }

    #[test]
    fn test_set_and_read_pixel() {
        let mut frame = Frame::new();
        frame
            .draw_iter([Pixel(Point::new(3, 2), BinaryColor::On)])
            .ok();
        assert!(frame.is_on(3, 2));
        assert!(!frame.is_on(2, 3));
        assert_eq!(frame.lit_pixels(), 1);

        // Row-major, MSB first: pixel (3, 2) is bit 259
        assert_eq!(frame.as_bytes()[32], 0b0001_0000);
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut frame = Frame::new();
        frame
            .draw_iter([
                Pixel(Point::new(-1, 0), BinaryColor::On),
                Pixel(Point::new(128, 0), BinaryColor::On),
                Pixel(Point::new(0, 64), BinaryColor::On),
            ])
            .ok();
        assert_eq!(frame.lit_pixels(), 0);
        assert!(!frame.is_on(500, 500));
    }

    #[test]
    fn test_fill_solid_clipped() {
        let mut frame = Frame::new();
        Rectangle::new(Point::new(120, 60), Size::new(20, 20))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut frame)
            .ok();
        // Only the 8x4 visible corner is lit
        assert_eq!(frame.lit_pixels(), 32);
    }

    #[test]
    fn test_clear() {
        let mut frame = Frame::new();
        frame.clear(BinaryColor::On).ok();
        assert_eq!(frame.lit_pixels(), SCREEN_WIDTH * SCREEN_HEIGHT);
        frame.clear(BinaryColor::Off).ok();
        assert_eq!(frame, Frame::new());
    }

    #[test]
    fn test_pixels_iterator_covers_panel() {
        let mut frame = Frame::new();
        frame
            .draw_iter([Pixel(Point::new(127, 63), BinaryColor::On)])
            .ok();
        let pixels: Vec<_> = frame.pixels().collect();
        assert_eq!(pixels.len(), WIDTH * HEIGHT);
        let lit: Vec<_> = pixels.iter().filter(|p| p.1.is_on()).collect();
        assert_eq!(lit.len(), 1);
        assert_eq!(lit[0].0, Point::new(127, 63));
    }
}
