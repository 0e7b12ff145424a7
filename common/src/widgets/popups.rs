//! Notification popup and the degraded "no data" placeholder.
//!
//! The notification popup replaces the whole screen: a 1px border around
//! the panel, the notification title, a rule, and up to three wrapped body
//! lines. Only one popup is ever drawn per frame; which notification wins
//! is decided by the caller.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::Text;

use super::primitives::{draw_text_rows, wrap_words};
use crate::colors::{BACKGROUND, FOREGROUND};
use crate::config::{CENTER_X, POPUP_BODY_Y, POPUP_LINE_PITCH, POPUP_PADDING, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::notification::NotificationKind;
use crate::styles::{BODY_STYLE, TOP_CENTERED, TOP_LEFT};

// =============================================================================
// Pre-computed Popup Geometry
// =============================================================================

/// Bordered box with a cleared interior, so the popup covers whatever was drawn.
const BOX_STYLE: PrimitiveStyle<BinaryColor> = PrimitiveStyleBuilder::new()
    .stroke_color(FOREGROUND)
    .stroke_width(1)
    .fill_color(BACKGROUND)
    .build();
const RULE_STYLE: PrimitiveStyle<BinaryColor> = PrimitiveStyle::with_stroke(FOREGROUND, 1);
const BORDER_POS: Point = Point::zero();
const BORDER_SIZE: Size = Size::new(SCREEN_WIDTH, SCREEN_HEIGHT);

const POPUP_TITLE_POS: Point = Point::new(POPUP_PADDING, POPUP_PADDING);
const POPUP_RULE_Y: i32 = POPUP_PADDING + 13;
const POPUP_RULE_START: Point = Point::new(POPUP_PADDING, POPUP_RULE_Y);
const POPUP_RULE_END: Point = Point::new(SCREEN_WIDTH as i32 - 1 - POPUP_PADDING, POPUP_RULE_Y);
const POPUP_BODY_POS: Point = Point::new(POPUP_PADDING, POPUP_BODY_Y);

const NO_DATA_POS: Point = Point::new(CENTER_X, 24);
const NO_DATA_HINT_POS: Point = Point::new(CENTER_X, 36);

// =============================================================================
// Drawing Functions
// =============================================================================

/// Draw the full-screen notification popup.
///
/// An empty `detail` falls back to the kind's default text.
pub fn draw_notification_popup<D>(
    display: &mut D,
    kind: NotificationKind,
    detail: &str,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    Rectangle::new(BORDER_POS, BORDER_SIZE)
        .into_styled(BOX_STYLE)
        .draw(display)
        .ok();

    Text::with_text_style(kind.title(), POPUP_TITLE_POS, BODY_STYLE, TOP_LEFT)
        .draw(display)
        .ok();

    Line::new(POPUP_RULE_START, POPUP_RULE_END)
        .into_styled(RULE_STYLE)
        .draw(display)
        .ok();

    let body = if detail.trim().is_empty() { kind.default_detail() } else { detail };
    let lines = wrap_words(body);
    draw_text_rows(display, POPUP_BODY_POS, POPUP_LINE_PITCH, lines.iter().map(|l| l.as_str()));
}

/// Draw the placeholder body shown when stats could not be loaded.
pub fn draw_no_data_banner<D>(display: &mut D)
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_text_style("NO DATA", NO_DATA_POS, BODY_STYLE, TOP_CENTERED)
        .draw(display)
        .ok();
    Text::with_text_style("stats unavailable", NO_DATA_HINT_POS, BODY_STYLE, TOP_CENTERED)
        .draw(display)
        .ok();
}
