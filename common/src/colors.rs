//! Color constants for the monochrome OLED panel.
//!
//! The SSD1306 is a 1-bit display, so the only "colors" are lit and unlit
//! pixels. Naming them keeps the drawing code readable and matches how the
//! widgets talk about foreground and background.

use embedded_graphics::pixelcolor::BinaryColor;

/// Lit pixel. Used for text, rules and popup borders.
pub const FOREGROUND: BinaryColor = BinaryColor::On;

/// Unlit pixel. Used for cleared backgrounds and popup interiors.
pub const BACKGROUND: BinaryColor = BinaryColor::Off;
