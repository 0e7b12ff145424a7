//! Text helpers shared across widgets.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use heapless::{String, Vec};

use crate::config::{POPUP_LINE_CHARS, POPUP_MAX_LINES};
use crate::styles::{BODY_STYLE, TOP_LEFT};

/// One wrapped popup line.
pub type WrappedLine = String<POPUP_LINE_CHARS>;

/// Word-wrap `text` into at most [`POPUP_MAX_LINES`] lines of
/// [`POPUP_LINE_CHARS`] characters.
///
/// Words longer than a line are split across lines. Text that does not fit
/// in the last line is dropped. Non-ASCII characters become `?` since the
/// panel fonts are ASCII only.
pub fn wrap_words(text: &str) -> Vec<WrappedLine, POPUP_MAX_LINES> {
    let mut lines = Vec::new();
    let mut current = WrappedLine::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if !current.is_empty() {
            if current.len() + 1 + word_len <= POPUP_LINE_CHARS {
                current.push(' ').ok();
            } else if !flush_line(&mut lines, &mut current) {
                return lines;
            }
        }
        for c in word.chars() {
            if current.len() == POPUP_LINE_CHARS && !flush_line(&mut lines, &mut current) {
                return lines;
            }
            current.push(if c.is_ascii() { c } else { '?' }).ok();
        }
    }

    if !current.is_empty() {
        lines.push(current).ok();
    }
    lines
}

/// Move `current` into `lines`. Returns `false` once no further line fits.
fn flush_line(
    lines: &mut Vec<WrappedLine, POPUP_MAX_LINES>,
    current: &mut WrappedLine,
) -> bool {
    if lines.push(core::mem::take(current)).is_err() {
        return false;
    }
    !lines.is_full()
}

/// Draw consecutive rows of body text starting at `origin`.
pub fn draw_text_rows<'a, D, I>(
    display: &mut D,
    origin: Point,
    pitch: i32,
    rows: I,
) where
    D: DrawTarget<Color = BinaryColor>,
    I: IntoIterator<Item = &'a str>,
{
    for (i, row) in rows.into_iter().enumerate() {
        let pos = origin + Point::new(0, pitch * i as i32);
        Text::with_text_style(row, pos, BODY_STYLE, TOP_LEFT)
            .draw(display)
            .ok();
    }
}
