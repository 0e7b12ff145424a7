//! Output devices the scheduler publishes frames to.
//!
//! The scheduler only sees [`RenderSurface`]. Which implementation sits
//! behind it is decided once, when the surface is opened:
//!
//! - [`NullSurface`]: headless operation, frames are dropped
//! - [`PreviewSurface`]: frames dumped as ASCII art to the debug log
//! - `Ssd1306Surface`: the real OLED over Linux I2C (`hardware` feature)
//!
//! A device that cannot be reached at startup never fails the caller: the
//! subsystem falls back to [`NullSurface`] and keeps running its full logic.

use k9_display_common::Frame;
use k9_display_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use tracing::{debug, info, warn};

use crate::config::{DeviceKind, DisplayConfig};
use crate::error::Result;

/// Sink for finished frames.
pub trait RenderSurface: Send {
    /// Push one frame to the device.
    ///
    /// Failures are reported as
    /// [`DisplayError::DeviceUnavailable`](crate::DisplayError::DeviceUnavailable)
    /// and treated as transient by the caller.
    fn publish(
        &mut self,
        frame: &Frame,
    ) -> Result<()>;

    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Blank the device when the scheduler stops. Best effort.
    fn release(&mut self) {}
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn publish(
        &mut self,
        frame: &Frame,
    ) -> Result<()> {
        (**self).publish(frame)
    }

    fn name(&self) -> &'static str { (**self).name() }

    fn release(&mut self) { (**self).release() }
}

/// No-op surface for headless operation.
#[derive(Debug, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn publish(
        &mut self,
        _frame: &Frame,
    ) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str { "null" }
}

/// Desktop stand-in for the panel: logs each frame as ASCII art.
///
/// Two pixel rows per text line keeps the 128x64 panel readable in a
/// terminal (`▀`, `▄`, `█` or space per column).
#[derive(Debug, Default)]
pub struct PreviewSurface {
    published: u64,
}

impl PreviewSurface {
    pub const fn new() -> Self { Self { published: 0 } }
}

impl RenderSurface for PreviewSurface {
    fn publish(
        &mut self,
        frame: &Frame,
    ) -> Result<()> {
        self.published += 1;
        debug!(frame = self.published, "\n{}", frame_to_ascii(frame));
        Ok(())
    }

    fn name(&self) -> &'static str { "preview" }
}

/// Render a frame as half-block text, one line per two pixel rows.
pub fn frame_to_ascii(frame: &Frame) -> String {
    let mut out = String::with_capacity(((SCREEN_WIDTH * 3 + 1) * SCREEN_HEIGHT / 2) as usize);
    for y in (0..SCREEN_HEIGHT).step_by(2) {
        for x in 0..SCREEN_WIDTH {
            out.push(match (frame.is_on(x, y), frame.is_on(x, y + 1)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        out.push('\n');
    }
    out
}

/// Open the surface selected by `config`.
///
/// Never fails: an unreachable or unsupported device degrades to
/// [`NullSurface`] with a warning.
pub fn open_surface(config: &DisplayConfig) -> Box<dyn RenderSurface> {
    if !config.enabled {
        return Box::new(NullSurface);
    }

    match config.device.kind {
        DeviceKind::None => {
            info!("display device disabled, running headless");
            Box::new(NullSurface)
        }
        DeviceKind::Preview => {
            info!("display preview enabled (frames logged at debug level)");
            Box::new(PreviewSurface::new())
        }
        DeviceKind::Ssd1306 => open_ssd1306(config),
    }
}

#[cfg(feature = "hardware")]
fn open_ssd1306(config: &DisplayConfig) -> Box<dyn RenderSurface> {
    match crate::oled::Ssd1306Surface::open(&config.device.i2c_bus, config.device.address) {
        Ok(surface) => Box::new(surface),
        Err(err) => {
            warn!(error = %err, "OLED display not available, running headless");
            Box::new(NullSurface)
        }
    }
}

#[cfg(not(feature = "hardware"))]
fn open_ssd1306(config: &DisplayConfig) -> Box<dyn RenderSurface> {
    warn!(
        bus = %config.device.i2c_bus,
        "built without the `hardware` feature, OLED display not available"
    );
    Box::new(NullSurface)
}

// =============================================================================
// Test Surfaces
// =============================================================================


#[cfg(test)]
mod tests {
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;

    use super::*;

    #[test]
    fn test_null_surface_accepts_frames() {
        let mut surface = NullSurface;
        assert!(surface.publish(&Frame::new()).is_ok());
    }

    #[test]
    fn test_ascii_dimensions() {
        let text = frame_to_ascii(&Frame::new());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), (SCREEN_HEIGHT / 2) as usize);
        assert!(lines.iter().all(|l| l.chars().count() == SCREEN_WIDTH as usize));
    }

    #[test]
    fn test_ascii_half_blocks() {
        let mut frame = Frame::new();
        frame
            .draw_iter([
                Pixel(Point::new(0, 0), BinaryColor::On),
                Pixel(Point::new(1, 1), BinaryColor::On),
                Pixel(Point::new(2, 0), BinaryColor::On),
                Pixel(Point::new(2, 1), BinaryColor::On),
            ])
            .ok();
        let text = frame_to_ascii(&frame);
        let first: String = text.lines().next().unwrap().chars().take(4).collect();
        assert_eq!(first, "▀▄█ ");
    }

    #[test]
    fn test_open_surface_selection() {
        let mut config = DisplayConfig::default();
        config.device.kind = DeviceKind::Preview;
        assert_eq!(open_surface(&config).name(), "preview");

        config.device.kind = DeviceKind::None;
        assert_eq!(open_surface(&config).name(), "null");

        config.device.kind = DeviceKind::Preview;
        config.enabled = false;
        assert_eq!(open_surface(&config).name(), "null");
    }
}
