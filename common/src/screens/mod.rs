//! Rotating information screens.
//!
//! # Rotation Order
//!
//! 1. **Status** ([`status`]): Bot online flag, uptime, walks today
//! 2. **Balance** ([`balance`]): Current balance and who owes whom
//! 3. **Statistics** ([`statistics`]): Total walks, today, total earned
//! 4. **Time** ([`time`]): Date, time and weekday
//!
//! The order is fixed by the [`ScreenSet`]; a deployment that does not want
//! a screen builds a set without it rather than toggling it at runtime.

mod balance;
mod statistics;
mod status;
mod time;

use core::time::Duration;

use chrono::NaiveDateTime;
use heapless::Vec;

pub(crate) use balance::draw_balance;
pub(crate) use statistics::draw_statistics;
pub(crate) use status::draw_status;
pub(crate) use time::draw_time;

/// Upper bound on screens in a set (one per [`Screen`] variant).
pub const MAX_SCREENS: usize = 4;

/// Available screens in rotation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    /// Bot status with uptime.
    Status,
    /// Current balance.
    Balance,
    /// Walk and earnings totals.
    Statistics,
    /// Date and time.
    Time,
}

impl Screen {
    /// Every screen, in standard rotation order.
    pub const ALL: [Self; MAX_SCREENS] = [Self::Status, Self::Balance, Self::Statistics, Self::Time];

    /// Title drawn at the top of the screen.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Status => "K9 LOG BOT",
            Self::Balance => "CURRENT BALANCE",
            Self::Statistics => "STATISTICS",
            Self::Time => "DATE & TIME",
        }
    }

    /// Whether the screen shows ledger data (and so degrades without it).
    #[inline]
    pub const fn needs_stats(self) -> bool { matches!(self, Self::Balance | Self::Statistics) }
}

/// Clock values a render needs besides the stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayClock {
    /// Local wall-clock time of the tick.
    pub now: NaiveDateTime,
    /// Time since the display subsystem started.
    pub uptime: Duration,
}

/// Ordered, non-empty collection of screens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenSet {
    screens: Vec<Screen, MAX_SCREENS>,
}

impl ScreenSet {
    /// The standard four-screen rotation.
    pub fn standard() -> Self {
        let mut screens = Vec::new();
        for screen in Screen::ALL {
            screens.push(screen).ok();
        }
        Self { screens }
    }

    /// Build a set from an explicit order.
    ///
    /// Later duplicates are dropped. Returns `None` for an empty list.
    pub fn new(order: &[Screen]) -> Option<Self> {
        let mut screens: Vec<Screen, MAX_SCREENS> = Vec::new();
        for &screen in order {
            if !screens.contains(&screen) {
                screens.push(screen).ok();
            }
        }
        if screens.is_empty() { None } else { Some(Self { screens }) }
    }

    /// Number of screens in rotation.
    #[inline]
    pub fn len(&self) -> usize { self.screens.len() }

    /// Always `false`: a set holds at least one screen.
    #[inline]
    pub fn is_empty(&self) -> bool { self.screens.is_empty() }

    /// Screen for a rotation counter (wraps modulo the set size).
    #[inline]
    pub fn get(
        &self,
        counter: usize,
    ) -> Screen {
        self.screens[counter % self.screens.len()]
    }

    /// Zero-based position of `screen` in the rotation.
    pub fn position(
        &self,
        screen: Screen,
    ) -> Option<usize> {
        self.screens.iter().position(|&s| s == screen)
    }

    /// Iterate in rotation order.
    pub fn iter(&self) -> impl Iterator<Item = Screen> + '_ { self.screens.iter().copied() }
}

impl Default for ScreenSet {
    fn default() -> Self { Self::standard() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order() {
        let set = ScreenSet::standard();
        let order: std::vec::Vec<_> = set.iter().collect();
        assert_eq!(order, Screen::ALL);
    }

    #[test]
    fn test_get_wraps() {
        let set = ScreenSet::standard();
        assert_eq!(set.get(0), Screen::Status);
        assert_eq!(set.get(3), Screen::Time);
        assert_eq!(set.get(4), Screen::Status);
        assert_eq!(set.get(9), Screen::Balance);
    }

    #[test]
    fn test_rotation_cycle_returns_to_start() {
        let set = ScreenSet::standard();
        for start in 0..set.len() {
            assert_eq!(set.get(start), set.get(start + set.len()));
        }
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(ScreenSet::new(&[]).is_none());
    }

    #[test]
    fn test_new_drops_duplicates() {
        let set = ScreenSet::new(&[Screen::Time, Screen::Balance, Screen::Time]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0), Screen::Time);
        assert_eq!(set.get(1), Screen::Balance);
        assert_eq!(set.position(Screen::Status), None);
    }

    #[test]
    fn test_needs_stats() {
        assert!(!Screen::Status.needs_stats());
        assert!(Screen::Balance.needs_stats());
        assert!(Screen::Statistics.needs_stats());
        assert!(!Screen::Time.needs_stats());
    }
}
