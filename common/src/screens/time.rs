//! Date and time screen.

use core::fmt::Write;

use chrono::{Datelike, Timelike, Weekday};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use heapless::String;

use super::DisplayClock;
use crate::config::{LINE_1_POS, ROW_PITCH};
use crate::widgets::draw_text_rows;

pub(crate) fn draw_time<D>(
    display: &mut D,
    clock: &DisplayClock,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let now = clock.now;

    let mut date: String<16> = String::new();
    let _ = write!(date, "{:04}-{:02}-{:02}", now.year(), now.month(), now.day());

    let mut time: String<16> = String::new();
    let _ = write!(time, "{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second());

    draw_text_rows(display, LINE_1_POS, ROW_PITCH, [date.as_str(), time.as_str(), weekday_name(now.weekday())]);
}

/// Full English weekday name.
const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
