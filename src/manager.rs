//! Public entry point for the rest of the bot.
//!
//! Chat handlers hold a [`DisplayManager`] (usually behind an `Arc`) and only
//! ever call [`notify`](DisplayManager::notify). The bot's lifecycle code
//! calls [`start`](DisplayManager::start) and [`stop`](DisplayManager::stop).
//! All methods take `&self`.

use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Instant;

use k9_display_common::{NotificationKind, ScreenSet};
use tracing::{debug, error, info};

use crate::config::DisplayConfig;
use crate::error::{DisplayError, Result};
use crate::notifications::Notification;
use crate::scheduler::{DisplayScheduler, MetricsSnapshot, SchedulerMetrics, SchedulerState, lock_state};
use crate::stats::{StatsCache, StatsSource};
use crate::surface::{RenderSurface, open_surface};

/// Running loop handle.
struct Worker {
    stop: Sender<()>,
    handle: JoinHandle<Box<dyn RenderSurface>>,
}

#[derive(Default)]
struct Lifecycle {
    /// Surface parked between runs. `None` before the first start (opened
    /// lazily from config) or after the loop thread panicked.
    surface: Option<Box<dyn RenderSurface>>,
    worker: Option<Worker>,
}

/// Display subsystem facade.
pub struct DisplayManager {
    config: DisplayConfig,
    screens: ScreenSet,
    stats: Arc<StatsCache>,
    state: Arc<Mutex<SchedulerState>>,
    metrics: Arc<SchedulerMetrics>,
    lifecycle: Mutex<Lifecycle>,
}

impl DisplayManager {
    /// Manager whose surface is opened from `config.device` on first start.
    pub fn new(
        config: DisplayConfig,
        source: Arc<dyn StatsSource>,
    ) -> Self {
        Self::build(config, source, None)
    }

    /// Manager publishing to an explicit surface.
    pub fn with_surface(
        config: DisplayConfig,
        source: Arc<dyn StatsSource>,
        surface: impl RenderSurface + 'static,
    ) -> Self {
        Self::build(config, source, Some(Box::new(surface)))
    }

    fn build(
        config: DisplayConfig,
        source: Arc<dyn StatsSource>,
        surface: Option<Box<dyn RenderSurface>>,
    ) -> Self {
        let stats = Arc::new(StatsCache::new(source, config.stats_ttl(), config.stale_ceiling()));
        Self {
            config,
            screens: ScreenSet::standard(),
            stats,
            state: Arc::new(Mutex::new(SchedulerState::new())),
            metrics: Arc::new(SchedulerMetrics::default()),
            lifecycle: Mutex::new(Lifecycle { surface, worker: None }),
        }
    }

    /// Validate the config and spawn the tick loop.
    ///
    /// A missing or unreachable device is not an error: the loop runs
    /// against a null surface. With `enabled = false` this logs and returns
    /// `Ok` without starting anything.
    pub fn start(&self) -> Result<()> {
        self.config.validate()?;

        let mut lifecycle = self.lock_lifecycle();
        if lifecycle.worker.is_some() {
            return Err(DisplayError::AlreadyRunning);
        }
        if !self.config.enabled {
            info!("display disabled in config, not starting");
            return Ok(());
        }

        let surface = lifecycle
            .surface
            .take()
            .unwrap_or_else(|| open_surface(&self.config));
        let surface_name = surface.name();

        let scheduler = DisplayScheduler::new(
            self.screens.clone(),
            Arc::clone(&self.stats),
            Arc::clone(&self.state),
            surface,
            Arc::clone(&self.metrics),
            self.config.tick_interval(),
        )?;

        lock_state(&self.state).begin();
        let (stop, stop_rx) = mpsc::channel();
        let handle = scheduler.spawn(stop_rx).inspect_err(|_| lock_state(&self.state).end())?;
        lifecycle.worker = Some(Worker { stop, handle });

        info!(
            surface = surface_name,
            tick_ms = self.config.tick_interval_ms,
            ttl_ms = self.config.stats_ttl_ms,
            "display started"
        );
        Ok(())
    }

    /// Stop the loop and wait for it to exit. Idempotent.
    ///
    /// Blocks for at most one in-flight tick. Once this returns, no further
    /// frame is published by this manager until the next `start()`.
    pub fn stop(&self) {
        let mut lifecycle = self.lock_lifecycle();
        let Some(worker) = lifecycle.worker.take() else {
            return;
        };

        lock_state(&self.state).end();
        // The loop may already be gone; a failed send is fine
        worker.stop.send(()).ok();

        match worker.handle.join() {
            Ok(mut surface) => {
                surface.release();
                lifecycle.surface = Some(surface);
            }
            Err(_) => error!("display scheduler thread panicked"),
        }
        info!("display stopped");
    }

    /// Show `kind` on the panel at the next tick, replacing any active
    /// notification. Empty `detail` falls back to the kind's default text.
    ///
    /// Ignored while the display is stopped.
    pub fn notify(
        &self,
        kind: NotificationKind,
        detail: &str,
    ) {
        let detail = if detail.is_empty() { kind.default_detail() } else { detail };

        let mut state = lock_state(&self.state);
        if !state.is_running() {
            debug!(?kind, "display not running, notification dropped");
            return;
        }
        let notification = Notification::new(kind, detail, Instant::now(), self.config.notification_duration());
        if let Some(previous) = state.push_notification(notification) {
            debug!(?kind, replaced = ?previous.kind, "notification replaced");
        }
    }

    pub fn is_running(&self) -> bool { lock_state(&self.state).is_running() }

    pub fn metrics(&self) -> MetricsSnapshot { self.metrics.snapshot() }

    /// Shared stats cache, for read-only callers such as a `/balance` reply.
    pub fn stats(&self) -> Arc<StatsCache> { Arc::clone(&self.stats) }

    pub fn config(&self) -> &DisplayConfig { &self.config }

    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle> { self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner) }
}

impl Drop for DisplayManager {
    fn drop(&mut self) { self.stop(); }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::thread;
    use std::time::Duration;

    use k9_display_common::render_notification;

    use super::*;
    use crate::stats::AggregateStats;
    use crate::surface::testing::{Recording, RecordingSurface};

    fn fast_config() -> DisplayConfig {
        DisplayConfig {
            tick_interval_ms: 100,
            stats_ttl_ms: 1_000,
            stale_ceiling_ms: 5_000,
            notification_ms: 2_000,
            ..DisplayConfig::default()
        }
    }

    fn ledger() -> Arc<dyn StatsSource> {
        Arc::new(|| -> Result<AggregateStats> {
            Ok(AggregateStats {
                total_walks: 3,
                walks_today: 1,
                total_earned: 150.0,
                balance: -20.0,
            })
        })
    }

    fn manager(config: DisplayConfig) -> (DisplayManager, Arc<Recording>) {
        let (surface, recording) = RecordingSurface::new();
        (DisplayManager::with_surface(config, ledger(), surface), recording)
    }

    /// Poll until `check` holds or two seconds pass.
    fn wait_for(check: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if check() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        check()
    }

    #[test]
    fn test_start_publishes_immediately() {
        let (manager, recording) = manager(fast_config());
        manager.start().unwrap();

        assert!(manager.is_running());
        assert!(wait_for(|| recording.count() >= 1));
        manager.stop();
    }

    #[test]
    fn test_double_start_rejected() {
        let (manager, _recording) = manager(fast_config());
        manager.start().unwrap();

        assert!(matches!(manager.start(), Err(DisplayError::AlreadyRunning)));
        manager.stop();
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (manager, recording) = manager(fast_config());
        manager.stop();

        manager.start().unwrap();
        manager.stop();
        manager.stop();

        assert!(!manager.is_running());
        assert!(recording.released.load(Ordering::SeqCst));
    }

    #[test]
    fn test_no_publish_after_stop() {
        let (manager, recording) = manager(fast_config());
        manager.start().unwrap();
        assert!(wait_for(|| recording.count() >= 2));

        manager.stop();
        let published = recording.count();
        thread::sleep(Duration::from_millis(350));

        assert_eq!(recording.count(), published);
    }

    #[test]
    fn test_notify_shows_overlay() {
        let (manager, recording) = manager(fast_config());
        manager.start().unwrap();
        assert!(wait_for(|| recording.count() >= 1));

        manager.notify(NotificationKind::WalkAdded, "Walk #4 logged");
        let overlay = render_notification(NotificationKind::WalkAdded, "Walk #4 logged");

        assert!(wait_for(|| recording.last().as_ref() == Some(&overlay)));
        assert!(manager.metrics().overlays >= 1);
        manager.stop();
    }

    #[test]
    fn test_notify_while_stopped_ignored() {
        let (manager, recording) = manager(fast_config());
        manager.notify(NotificationKind::PaymentMade, "Paid 150.00 MDL");

        manager.start().unwrap();
        assert!(wait_for(|| recording.count() >= 1));
        manager.stop();

        let overlay = render_notification(NotificationKind::PaymentMade, "Paid 150.00 MDL");
        let frames = recording.frames.lock().unwrap();
        assert!(frames.iter().all(|f| *f != overlay));
    }

    #[test]
    fn test_empty_detail_uses_default() {
        let (manager, recording) = manager(fast_config());
        manager.start().unwrap();
        manager.notify(NotificationKind::CreditGiven, "");

        let overlay = render_notification(NotificationKind::CreditGiven, NotificationKind::CreditGiven.default_detail());
        assert!(wait_for(|| recording.last().as_ref() == Some(&overlay)));
        manager.stop();
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DisplayConfig {
            tick_interval_ms: 0,
            ..fast_config()
        };
        let (manager, recording) = manager(config);

        assert!(matches!(
            manager.start(),
            Err(DisplayError::ConfigInvalid {
                field: "tick_interval_ms",
                ..
            })
        ));
        assert!(!manager.is_running());
        assert_eq!(recording.count(), 0);
    }

    #[test]
    fn test_disabled_start_is_noop() {
        let config = DisplayConfig {
            enabled: false,
            ..fast_config()
        };
        let (manager, recording) = manager(config);

        manager.start().unwrap();
        thread::sleep(Duration::from_millis(150));

        assert!(!manager.is_running());
        assert_eq!(recording.count(), 0);
    }

    #[test]
    fn test_restart_reuses_surface() {
        let (manager, recording) = manager(fast_config());
        manager.start().unwrap();
        assert!(wait_for(|| recording.count() >= 1));
        manager.stop();

        let before = recording.count();
        manager.start().unwrap();
        assert!(wait_for(|| recording.count() > before));
        manager.stop();
    }

    #[test]
    fn test_offline_device_keeps_running() {
        let (manager, recording) = manager(fast_config());
        recording.offline.store(true, Ordering::SeqCst);
        manager.start().unwrap();

        assert!(wait_for(|| manager.metrics().publish_failures >= 2));
        assert!(manager.is_running());

        recording.offline.store(false, Ordering::SeqCst);
        assert!(wait_for(|| recording.count() >= 1));
        manager.stop();
    }

    #[test]
    fn test_drop_stops_loop() {
        let (manager, recording) = manager(fast_config());
        manager.start().unwrap();
        assert!(wait_for(|| recording.count() >= 1));

        drop(manager);
        let published = recording.count();
        thread::sleep(Duration::from_millis(250));
        assert_eq!(recording.count(), published);
    }
}
