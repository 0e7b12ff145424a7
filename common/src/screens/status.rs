//! Status screen: online flag, uptime and today's walk count.

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use heapless::String;

use super::DisplayClock;
use crate::config::{LINE_1_POS, ROW_PITCH};
use crate::stats::StatsSnapshot;
use crate::widgets::draw_text_rows;

/// Draw the status body. Without a snapshot the walk count shows `--`.
pub(crate) fn draw_status<D>(
    display: &mut D,
    snapshot: Option<&StatsSnapshot>,
    clock: &DisplayClock,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let secs = clock.uptime.as_secs();
    let mut uptime: String<24> = String::new();
    let _ = write!(uptime, "Uptime: {:02}:{:02}", secs / 3600, (secs % 3600) / 60);

    let mut today: String<24> = String::new();
    match snapshot {
        Some(s) => {
            let _ = write!(today, "Walks today: {}", s.walks_today);
        }
        None => {
            let _ = today.push_str("Walks today: --");
        }
    }

    draw_text_rows(display, LINE_1_POS, ROW_PITCH, ["Status: ONLINE", uptime.as_str(), today.as_str()]);
}
