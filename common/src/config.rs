//! Panel geometry and pre-computed layout constants.
//!
//! All positions are `const` so the screens never do layout arithmetic per
//! frame. The vertical rhythm follows the panel's 10px text rows:
//!
//! ```text
//!  y=0   TITLE
//!  y=12  ---------------- (rule)
//!  y=24  line 1
//!  y=34  line 2
//!  y=44  line 3
//!  y=54  footer
//! ```

use embedded_graphics::prelude::Point;

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (SSD1306 128x64 module).
pub const SCREEN_WIDTH: u32 = 128;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 64;

/// Framebuffer size in bytes (1 bit per pixel).
pub const FRAME_BYTES: usize = (SCREEN_WIDTH * SCREEN_HEIGHT / 8) as usize;

/// Currency suffix shown next to amounts.
pub const CURRENCY: &str = "MDL";

// =============================================================================
// Text Rows
// =============================================================================

/// Title row.
pub const TITLE_POS: Point = Point::new(0, 0);

/// Y coordinate of the rule under the title.
pub const RULE_Y: i32 = 12;

/// First body row.
pub const LINE_1_POS: Point = Point::new(0, 24);

/// Second body row.
pub const LINE_2_POS: Point = Point::new(0, 34);

/// Third body row.
pub const LINE_3_POS: Point = Point::new(0, 44);

/// Vertical distance between consecutive body rows.
pub const ROW_PITCH: i32 = LINE_2_POS.y - LINE_1_POS.y;

/// Footer row ("Screen 1/4").
pub const FOOTER_POS: Point = Point::new(0, 54);

/// Screen center X coordinate. Used for centering placeholder text.
pub const CENTER_X: i32 = (SCREEN_WIDTH / 2) as i32;

// =============================================================================
// Popup Layout
// =============================================================================

/// Inset between the popup border and its text.
pub const POPUP_PADDING: i32 = 3;

/// Characters per wrapped popup line (6px font inside the border padding).
pub const POPUP_LINE_CHARS: usize = 20;

/// Maximum wrapped lines in a popup body.
pub const POPUP_MAX_LINES: usize = 3;

/// First popup body row.
pub const POPUP_BODY_Y: i32 = 22;

/// Row pitch between popup body lines.
pub const POPUP_LINE_PITCH: i32 = 12;
