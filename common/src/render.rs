//! Frame production for screens and overlays.
//!
//! These are the only entry points the runtime calls. Both are pure: each
//! call starts from a blank [`Frame`], draws, and hands the frame back, so
//! nothing is retained between ticks and nothing can leak from a previous
//! screen or popup.
//!
//! | Input | Output |
//! |-------|--------|
//! | Screen + snapshot | Title, body, "Screen i/n" footer |
//! | Screen needing stats, no snapshot | Title, "NO DATA" placeholder, footer |
//! | Notification | Full-screen bordered popup |

use crate::frame::Frame;
use crate::notification::NotificationKind;
use crate::screens::{DisplayClock, Screen, ScreenSet, draw_balance, draw_statistics, draw_status, draw_time};
use crate::stats::StatsSnapshot;
use crate::widgets::{draw_footer, draw_no_data_banner, draw_notification_popup, draw_title};

impl ScreenSet {
    /// Render one screen of the rotation.
    ///
    /// `snapshot` is `None` when stats could not be loaded; screens that
    /// need stats then show the placeholder instead of stale or zero values.
    /// A screen outside the set still renders, just without a footer.
    pub fn render(
        &self,
        screen: Screen,
        snapshot: Option<&StatsSnapshot>,
        clock: &DisplayClock,
    ) -> Frame {
        let mut frame = Frame::new();

        draw_title(&mut frame, screen.title());

        match (screen, snapshot) {
            (Screen::Status, _) => draw_status(&mut frame, snapshot, clock),
            (Screen::Time, _) => draw_time(&mut frame, clock),
            (Screen::Balance, Some(s)) => draw_balance(&mut frame, s),
            (Screen::Statistics, Some(s)) => draw_statistics(&mut frame, s),
            (Screen::Balance | Screen::Statistics, None) => draw_no_data_banner(&mut frame),
        }

        if let Some(position) = self.position(screen) {
            draw_footer(&mut frame, position, self.len());
        }

        frame
    }
}

/// Render the notification overlay that temporarily replaces the rotation.
pub fn render_notification(
    kind: NotificationKind,
    detail: &str,
) -> Frame {
    let mut frame = Frame::new();
    draw_notification_popup(&mut frame, kind, detail);
    frame
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use chrono::NaiveDate;
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;

    use super::*;

    fn clock() -> DisplayClock {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(14, 5, 30))
            .unwrap();
        DisplayClock {
            now,
            uptime: Duration::from_secs(3 * 3600 + 25 * 60),
        }
    }

    fn snapshot(balance: f64) -> StatsSnapshot {
        StatsSnapshot {
            total_walks: 42,
            walks_today: 2,
            total_earned: 4200.0,
            balance,
            as_of: clock().now,
        }
    }

    #[test]
    fn test_every_screen_draws_something() {
        let set = ScreenSet::standard();
        let snap = snapshot(150.0);
        for screen in set.iter() {
            let frame = set.render(screen, Some(&snap), &clock());
            assert!(frame.lit_pixels() > 0, "{screen:?} rendered blank");
        }
    }

    #[test]
    fn test_screens_are_distinct() {
        let set = ScreenSet::standard();
        let snap = snapshot(150.0);
        let frames: std::vec::Vec<Frame> = set.iter().map(|s| set.render(s, Some(&snap), &clock())).collect();
        for (i, a) in frames.iter().enumerate() {
            for b in frames.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let set = ScreenSet::standard();
        let snap = snapshot(-20.0);
        let a = set.render(Screen::Balance, Some(&snap), &clock());
        let b = set.render(Screen::Balance, Some(&snap), &clock());
        assert_eq!(a, b);
    }

    #[test]
    fn test_balance_reflects_snapshot() {
        let set = ScreenSet::standard();
        let owed = set.render(Screen::Balance, Some(&snapshot(150.0)), &clock());
        let settled = set.render(Screen::Balance, Some(&snapshot(0.0)), &clock());
        assert_ne!(owed, settled);
    }

    #[test]
    fn test_missing_stats_renders_placeholder() {
        let set = ScreenSet::standard();
        let degraded = set.render(Screen::Statistics, None, &clock());
        let normal = set.render(Screen::Statistics, Some(&snapshot(0.0)), &clock());
        assert!(degraded.lit_pixels() > 0);
        assert_ne!(degraded, normal);
    }

    #[test]
    fn test_time_screen_ignores_stats() {
        let set = ScreenSet::standard();
        let with = set.render(Screen::Time, Some(&snapshot(10.0)), &clock());
        let without = set.render(Screen::Time, None, &clock());
        assert_eq!(with, without);
    }

    #[test]
    fn test_footer_tracks_position() {
        let full = ScreenSet::standard();
        let reduced = ScreenSet::new(&[Screen::Time]).unwrap();
        let a = full.render(Screen::Time, None, &clock());
        let b = reduced.render(Screen::Time, None, &clock());
        // "Screen 4/4" vs "Screen 1/1"
        assert_ne!(a, b);
    }

    #[test]
    fn test_notification_differs_by_content() {
        let walk = render_notification(NotificationKind::WalkAdded, "Walk #43");
        let pay = render_notification(NotificationKind::PaymentMade, "Paid Out: 300");
        assert!(walk.lit_pixels() > 0);
        assert_ne!(walk, pay);
    }

    #[test]
    fn test_notification_empty_detail_uses_default() {
        let empty = render_notification(NotificationKind::WalkAdded, "");
        let explicit = render_notification(
            NotificationKind::WalkAdded,
            NotificationKind::WalkAdded.default_detail(),
        );
        assert_eq!(empty, explicit);
    }

    #[test]
    fn test_popup_covers_previous_content() {
        let mut frame = Frame::new();
        frame.clear(BinaryColor::On).ok();
        draw_notification_popup(&mut frame, NotificationKind::CreditGiven, "Credit: -50 MDL");
        assert_eq!(frame, render_notification(NotificationKind::CreditGiven, "Credit: -50 MDL"));
    }
}
