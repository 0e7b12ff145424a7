//! Statistics screen: walk totals and total earnings.

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use heapless::String;

use crate::config::{CURRENCY, LINE_1_POS, ROW_PITCH};
use crate::stats::StatsSnapshot;
use crate::widgets::draw_text_rows;

pub(crate) fn draw_statistics<D>(
    display: &mut D,
    snapshot: &StatsSnapshot,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let mut total: String<24> = String::new();
    let _ = write!(total, "Total Walks: {}", snapshot.total_walks);

    let mut today: String<24> = String::new();
    let _ = write!(today, "Today: {}", snapshot.walks_today);

    // Whole units only, the panel is too narrow for cents here
    let mut earned: String<24> = String::new();
    let _ = write!(earned, "Earned: {:.0} {}", snapshot.total_earned, CURRENCY);

    draw_text_rows(display, LINE_1_POS, ROW_PITCH, [total.as_str(), today.as_str(), earned.as_str()]);
}
