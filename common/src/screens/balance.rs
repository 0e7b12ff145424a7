//! Balance screen: current balance in a large font plus standing.

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use heapless::String;

use crate::config::{CURRENCY, LINE_3_POS};
use crate::stats::StatsSnapshot;
use crate::styles::{BODY_STYLE, TOP_LEFT, VALUE_STYLE};

/// Balance value sits between the rule and the standing label.
const VALUE_POS: Point = Point::new(0, 24);

pub(crate) fn draw_balance<D>(
    display: &mut D,
    snapshot: &StatsSnapshot,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let mut value: String<24> = String::new();
    let _ = write!(value, "{:.2} {}", snapshot.balance, CURRENCY);
    Text::with_text_style(&value, VALUE_POS, VALUE_STYLE, TOP_LEFT)
        .draw(display)
        .ok();

    Text::with_text_style(snapshot.standing().label(), LINE_3_POS, BODY_STYLE, TOP_LEFT)
        .draw(display)
        .ok();
}
