//! Tick loop that drives the panel.
//!
//! Every tick the scheduler advances the rotation counter, then either
//! renders the active notification overlay or the screen the counter points
//! at, and publishes the frame:
//!
//! ```text
//!   t=0    t=10   t=20   t=30     (tick = 10s)
//!   Status [WALK] Stats  Time     rotation keeps counting under the overlay
//!          ^ notify() at t=5
//! ```
//!
//! The counter advances on every tick whether or not an overlay is showing,
//! so overlays interleave with the rotation but never delay it.
//!
//! # Error containment
//!
//! Nothing that goes wrong inside a tick leaves it. Missing stats degrade
//! the screen to a placeholder, and publish failures mark the device offline
//! until the next successful publish. A panic inside a tick (a misbehaving
//! stats source, say) is caught and logged, and the next tick runs as usual.
//! The loop itself only exits when the owning manager asks it to.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime};
use k9_display_common::{DisplayClock, NotificationKind, Screen, ScreenSet, render_notification};
use tracing::{debug, error, info, warn};

use crate::error::{DisplayError, Result};
use crate::notifications::{Notification, NotificationQueue};
use crate::stats::StatsCache;
use crate::surface::RenderSurface;

// =============================================================================
// Shared State
// =============================================================================

/// Rotation position and notification slot, shared with the facade.
#[derive(Debug, Default)]
pub struct SchedulerState {
    rotation: usize,
    notifications: NotificationQueue,
    running: bool,
}

impl SchedulerState {
    pub const fn new() -> Self {
        Self {
            rotation: 0,
            notifications: NotificationQueue::new(),
            running: false,
        }
    }

    /// Return the current rotation index and step to the next one.
    pub fn advance(
        &mut self,
        screen_count: usize,
    ) -> usize {
        let current = self.rotation;
        self.rotation = (current + 1) % screen_count.max(1);
        current
    }

    /// Install a notification (last write wins). Returns the one it displaced.
    pub fn push_notification(
        &mut self,
        notification: Notification,
    ) -> Option<Notification> {
        self.notifications.push(notification)
    }

    pub fn active_notification(
        &mut self,
        now: Instant,
    ) -> Option<Notification> {
        self.notifications.peek_active(now)
    }

    pub fn is_running(&self) -> bool { self.running }

    /// Fresh state for a new run: rotation from the first screen, no overlay.
    pub(crate) fn begin(&mut self) {
        *self = Self::new();
        self.running = true;
    }

    pub(crate) fn end(&mut self) {
        self.running = false;
        self.notifications.clear();
    }
}

pub(crate) fn lock_state(state: &Mutex<SchedulerState>) -> MutexGuard<'_, SchedulerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Metrics
// =============================================================================

/// Counters updated by the tick loop.
#[derive(Debug, Default)]
pub struct SchedulerMetrics {
    ticks: AtomicU64,
    frames_published: AtomicU64,
    publish_failures: AtomicU64,
    overlays: AtomicU64,
    degraded_frames: AtomicU64,
    tick_panics: AtomicU64,
}

/// Point-in-time copy of [`SchedulerMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub frames_published: u64,
    pub publish_failures: u64,
    /// Ticks that rendered a notification instead of a screen.
    pub overlays: u64,
    /// Screens rendered without stats (placeholder or `--` values).
    pub degraded_frames: u64,
    /// Ticks abandoned because something inside them panicked.
    pub tick_panics: u64,
}

impl SchedulerMetrics {
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            frames_published: self.frames_published.load(Ordering::Relaxed),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            overlays: self.overlays.load(Ordering::Relaxed),
            degraded_frames: self.degraded_frames.load(Ordering::Relaxed),
            tick_panics: self.tick_panics.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) { counter.fetch_add(1, Ordering::Relaxed); }
}

// =============================================================================
// Scheduler
// =============================================================================

/// What a tick put on the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickView {
    Screen(Screen),
    /// Screen that reads stats, drawn without them because they were
    /// unavailable.
    Degraded(Screen),
    Notification(NotificationKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    pub view: TickView,
    /// Whether the surface accepted the frame.
    pub published: bool,
}

/// Owns the surface and runs the per-tick algorithm.
pub struct DisplayScheduler {
    screens: ScreenSet,
    stats: Arc<StatsCache>,
    state: Arc<Mutex<SchedulerState>>,
    surface: Box<dyn RenderSurface>,
    metrics: Arc<SchedulerMetrics>,
    interval: Duration,
    started: Instant,
    device_online: bool,
}

impl DisplayScheduler {
    /// Fails with [`DisplayError::ConfigInvalid`] for a zero `interval`.
    pub fn new(
        screens: ScreenSet,
        stats: Arc<StatsCache>,
        state: Arc<Mutex<SchedulerState>>,
        surface: Box<dyn RenderSurface>,
        metrics: Arc<SchedulerMetrics>,
        interval: Duration,
    ) -> Result<Self> {
        if interval.is_zero() {
            return Err(DisplayError::ConfigInvalid {
                field: "tick_interval_ms",
                reason: "tick interval must be non-zero".to_string(),
            });
        }
        Ok(Self {
            screens,
            stats,
            state,
            surface,
            metrics,
            interval,
            started: Instant::now(),
            device_online: true,
        })
    }

    /// Run one tick at `now` (monotonic) / `wall` (local time).
    ///
    /// Returns `None` without touching the surface once the shared state is
    /// no longer running.
    pub fn tick(
        &mut self,
        now: Instant,
        wall: NaiveDateTime,
    ) -> Option<TickOutcome> {
        let (rotation, notification) = {
            let mut state = lock_state(&self.state);
            if !state.is_running() {
                return None;
            }
            let rotation = state.advance(self.screens.len());
            (rotation, state.active_notification(now))
        };
        SchedulerMetrics::bump(&self.metrics.ticks);

        let (frame, view) = match notification {
            Some(n) => {
                SchedulerMetrics::bump(&self.metrics.overlays);
                (render_notification(n.kind, &n.detail), TickView::Notification(n.kind))
            }
            None => {
                let screen = self.screens.get(rotation);
                let snapshot = if shows_stats(screen) {
                    self.stats
                        .get_stats_at(now, wall)
                        .inspect_err(|err| warn!(error = %err, ?screen, "rendering without stats"))
                        .ok()
                } else {
                    None
                };
                let clock = DisplayClock {
                    now: wall,
                    uptime: now.saturating_duration_since(self.started),
                };
                let view = if snapshot.is_none() && shows_stats(screen) {
                    SchedulerMetrics::bump(&self.metrics.degraded_frames);
                    TickView::Degraded(screen)
                } else {
                    TickView::Screen(screen)
                };
                (self.screens.render(screen, snapshot.as_ref(), &clock), view)
            }
        };

        let published = match self.surface.publish(&frame) {
            Ok(()) => {
                SchedulerMetrics::bump(&self.metrics.frames_published);
                if !self.device_online {
                    info!(surface = self.surface.name(), "display device back online");
                    self.device_online = true;
                }
                true
            }
            Err(err) => {
                SchedulerMetrics::bump(&self.metrics.publish_failures);
                if self.device_online {
                    warn!(surface = self.surface.name(), error = %err, "display device offline, still ticking");
                    self.device_online = false;
                } else {
                    debug!(error = %err, "display device still offline");
                }
                false
            }
        };

        debug!(?view, published, "tick");
        Some(TickOutcome { view, published })
    }

    /// Start the loop on its own thread.
    ///
    /// The thread ticks immediately, then on fixed-rate deadlines, until a
    /// message arrives on `stop` (or its sender is dropped). It hands the
    /// surface back when it exits.
    pub fn spawn(
        self,
        stop: Receiver<()>,
    ) -> Result<JoinHandle<Box<dyn RenderSurface>>> {
        let handle = thread::Builder::new()
            .name("k9-display".to_string())
            .spawn(move || self.run(stop))?;
        Ok(handle)
    }

    fn run(
        mut self,
        stop: Receiver<()>,
    ) -> Box<dyn RenderSurface> {
        info!(
            surface = self.surface.name(),
            interval_ms = self.interval.as_millis() as u64,
            screens = self.screens.len(),
            "display scheduler running"
        );
        let mut deadline = Instant::now();

        loop {
            match stop.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }

            let now = Instant::now();
            let wall = Local::now().naive_local();
            match panic::catch_unwind(AssertUnwindSafe(|| self.tick(now, wall))) {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(_) => {
                    SchedulerMetrics::bump(&self.metrics.tick_panics);
                    error!("display tick panicked, continuing with the next tick");
                }
            }

            let (next, skipped) = next_deadline(deadline, Instant::now(), self.interval);
            if skipped > 0 {
                debug!(skipped, "tick overran, skipping missed deadlines");
            }
            deadline = next;
        }

        lock_state(&self.state).end();
        debug!("display scheduler loop exited");
        self.surface
    }
}

/// Screens whose body reads the stats snapshot.
const fn shows_stats(screen: Screen) -> bool { !matches!(screen, Screen::Time) }

/// Next fixed-rate deadline after `now`, and how many were missed.
///
/// A zero `interval` yields `previous + interval` without skipping.
fn next_deadline(
    previous: Instant,
    now: Instant,
    interval: Duration,
) -> (Instant, u32) {
    let next = previous + interval;
    if next > now || interval.is_zero() {
        return (next, 0);
    }
    let behind = now.duration_since(next).as_nanos() / interval.as_nanos();
    let skipped = u32::try_from(behind + 1).unwrap_or(u32::MAX);
    (next + interval.saturating_mul(skipped), skipped)
}

// =============================================================================
// Unit Tests
// =============================================================================
