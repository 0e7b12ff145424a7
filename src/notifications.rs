//! Pending overlay requests.
//!
//! Only one notification is shown at a time and the most recent wins: a
//! `push` while another is active replaces it outright. Bursts (several
//! walks logged back to back) therefore never queue up behind each other,
//! and the panel always shows the latest event.

use std::time::{Duration, Instant};

use heapless::String;
use k9_display_common::NotificationKind;

/// Maximum bytes of detail text kept per notification.
pub const DETAIL_LEN: usize = 64;

/// A transient overlay request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Detail text, truncated to [`DETAIL_LEN`] bytes on a char boundary.
    pub detail: String<DETAIL_LEN>,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        detail: &str,
        created_at: Instant,
        duration: Duration,
    ) -> Self {
        let mut text: String<DETAIL_LEN> = String::new();
        for c in detail.chars() {
            if text.push(c).is_err() {
                break;
            }
        }
        Self {
            kind,
            detail: text,
            created_at,
            duration,
        }
    }

    /// Check if this notification has expired at `now`.
    #[inline]
    pub fn is_expired(
        &self,
        now: Instant,
    ) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }
}

/// Single-slot, last-write-wins notification holder.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    slot: Option<Notification>,
}

impl NotificationQueue {
    pub const fn new() -> Self { Self { slot: None } }

    /// Install `notification`, replacing any current one.
    ///
    /// Returns the notification that was displaced, if it was still active.
    pub fn push(
        &mut self,
        notification: Notification,
    ) -> Option<Notification> {
        let now = notification.created_at;
        self.slot
            .replace(notification)
            .filter(|previous| !previous.is_expired(now))
    }

    /// The active notification at `now`, clearing the slot once it expires.
    pub fn peek_active(
        &mut self,
        now: Instant,
    ) -> Option<Notification> {
        if self.slot.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.slot = None;
        }
        self.slot.clone()
    }

    /// Drop any pending notification.
    pub fn clear(&mut self) { self.slot = None; }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(
        detail: &str,
        at: Instant,
    ) -> Notification {
        Notification::new(NotificationKind::WalkAdded, detail, at, Duration::from_secs(8))
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = NotificationQueue::new();
        assert!(queue.peek_active(Instant::now()).is_none());
    }

    #[test]
    fn test_active_until_duration() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        queue.push(walk("Walk #1", t0));

        assert!(queue.peek_active(t0).is_some());
        assert!(queue.peek_active(t0 + Duration::from_millis(7999)).is_some());
        assert!(queue.peek_active(t0 + Duration::from_secs(8)).is_none());
    }

    #[test]
    fn test_expired_stays_cleared() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        queue.push(walk("Walk #1", t0));

        assert!(queue.peek_active(t0 + Duration::from_secs(9)).is_none());
        // An earlier clock reading does not resurrect it
        assert!(queue.peek_active(t0).is_none());
    }

    #[test]
    fn test_push_replaces_active() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        queue.push(walk("Walk #1", t0));

        let displaced = queue.push(walk("Walk #2", t0 + Duration::from_secs(1)));
        assert_eq!(displaced.map(|n| n.detail), Some(String::try_from("Walk #1").unwrap()));

        let active = queue.peek_active(t0 + Duration::from_secs(2)).unwrap();
        assert_eq!(active.detail.as_str(), "Walk #2");
        // Window restarts from the replacement
        assert!(queue.peek_active(t0 + Duration::from_secs(8)).is_some());
    }

    #[test]
    fn test_push_over_expired_reports_nothing_displaced() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        queue.push(walk("Walk #1", t0));
        assert!(queue.push(walk("Walk #2", t0 + Duration::from_secs(20))).is_none());
    }

    #[test]
    fn test_detail_truncated_on_char_boundary() {
        let long = "ă".repeat(40);
        let n = walk(&long, Instant::now());
        assert_eq!(n.detail.chars().count(), DETAIL_LEN / 2);
    }

    #[test]
    fn test_clear() {
        let t0 = Instant::now();
        let mut queue = NotificationQueue::new();
        queue.push(walk("Walk #1", t0));
        queue.clear();
        assert!(queue.peek_active(t0).is_none());
    }
}
