//! SSD1306 128x64 OLED over Linux I2C.
//!
//! The panel is driven in buffered graphics mode: each published [`Frame`]
//! is copied into the driver's buffer and flushed in one transfer.
//!
//! When a transfer fails the driver handle is dropped and re-opened on the
//! next publish, so a panel that is unplugged and reconnected comes back on
//! its own without restarting the scheduler.

use embedded_graphics::prelude::*;
use k9_display_common::Frame;
use linux_embedded_hal::I2cdev;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};
use tracing::{debug, info};

use crate::error::{DisplayError, Result};
use crate::surface::RenderSurface;

type Panel = Ssd1306<I2CInterface<I2cdev>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Real OLED panel with lazy re-initialisation.
pub struct Ssd1306Surface {
    bus: String,
    address: u8,
    panel: Option<Panel>,
}

impl Ssd1306Surface {
    /// Open and initialise the panel. Fails if the device does not answer.
    pub fn open(
        bus: &str,
        address: u8,
    ) -> Result<Self> {
        let panel = init_panel(bus, address)?;
        info!(bus, address = format_args!("{address:#04x}"), "OLED display initialized");
        Ok(Self {
            bus: bus.to_string(),
            address,
            panel: Some(panel),
        })
    }

    fn panel(&mut self) -> Result<&mut Panel> {
        if self.panel.is_none() {
            debug!(bus = %self.bus, "re-initialising OLED display");
            self.panel = Some(init_panel(&self.bus, self.address)?);
        }
        self.panel
            .as_mut()
            .ok_or_else(|| DisplayError::DeviceUnavailable("panel not initialised".to_string()))
    }
}

impl RenderSurface for Ssd1306Surface {
    fn publish(
        &mut self,
        frame: &Frame,
    ) -> Result<()> {
        let panel = self.panel()?;
        panel.clear_buffer();
        let result = panel
            .draw_iter(frame.pixels())
            .and_then(|()| panel.flush())
            .map_err(|e| DisplayError::DeviceUnavailable(format!("{e:?}")));

        if result.is_err() {
            self.panel = None;
        }
        result
    }

    fn name(&self) -> &'static str { "ssd1306" }

    fn release(&mut self) {
        if let Some(panel) = self.panel.as_mut() {
            panel.clear_buffer();
            panel.flush().ok();
        }
    }
}

fn init_panel(
    bus: &str,
    address: u8,
) -> Result<Panel> {
    let i2c = I2cdev::new(bus).map_err(|e| DisplayError::DeviceUnavailable(format!("{bus}: {e}")))?;
    let interface = I2CDisplayInterface::new_custom_address(i2c, address);
    let mut panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0).into_buffered_graphics_mode();
    panel
        .init()
        .map_err(|e| DisplayError::DeviceUnavailable(format!("init: {e:?}")))?;
    Ok(panel)
}
