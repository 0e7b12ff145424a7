//! Screen title, rule and position footer.

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::Text;
use heapless::String;

use crate::colors::FOREGROUND;
use crate::config::{FOOTER_POS, RULE_Y, SCREEN_WIDTH, TITLE_POS};
use crate::styles::{BODY_STYLE, FOOTER_STYLE, TOP_LEFT};

/// 1px stroke for the rule under the title.
const RULE_STYLE: PrimitiveStyle<BinaryColor> = PrimitiveStyle::with_stroke(FOREGROUND, 1);

const RULE_START: Point = Point::new(0, RULE_Y);
const RULE_END: Point = Point::new(SCREEN_WIDTH as i32 - 1, RULE_Y);

/// Draw the screen title followed by a full-width rule.
pub fn draw_title<D>(
    display: &mut D,
    title: &str,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_text_style(title, TITLE_POS, BODY_STYLE, TOP_LEFT)
        .draw(display)
        .ok();

    Line::new(RULE_START, RULE_END)
        .into_styled(RULE_STYLE)
        .draw(display)
        .ok();
}

/// Draw the "Screen i/n" footer. `position` is zero-based.
pub fn draw_footer<D>(
    display: &mut D,
    position: usize,
    count: usize,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let mut text: String<24> = String::new();
    let _ = write!(text, "Screen {}/{}", position + 1, count);
    Text::with_text_style(&text, FOOTER_POS, FOOTER_STYLE, TOP_LEFT)
        .draw(display)
        .ok();
}
