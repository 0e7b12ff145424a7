//! Time-windowed cache over aggregate statistics queries.
//!
//! The panel re-renders every tick but the ledger only needs reading once
//! per TTL window. [`StatsCache`] sits between the two:
//!
//! - A fresh entry (`now < expires_at`) is returned as-is.
//! - An expired or missing entry triggers exactly one
//!   [`StatsSource::aggregate_stats`] call, and the whole entry is swapped.
//! - Callers arriving while a refresh is in flight wait for it and share its
//!   outcome, so concurrent callers never issue overlapping queries.
//! - On a failed refresh the previous snapshot is served as long as it is
//!   younger than the staleness ceiling; past that the error propagates as
//!   [`DisplayError::DataUnavailable`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime};
use k9_display_common::StatsSnapshot;
use tracing::{debug, warn};

use crate::error::{DisplayError, Result};

/// Raw aggregates as returned by the ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AggregateStats {
    pub total_walks: u32,
    pub walks_today: u32,
    pub total_earned: f64,
    pub balance: f64,
}

impl AggregateStats {
    /// Stamp the aggregates with the time they were read.
    pub const fn into_snapshot(
        self,
        as_of: NaiveDateTime,
    ) -> StatsSnapshot {
        StatsSnapshot {
            total_walks: self.total_walks,
            walks_today: self.walks_today,
            total_earned: self.total_earned,
            balance: self.balance,
            as_of,
        }
    }
}

/// Read-only aggregate queries over the ledger.
///
/// One call is one query batch (counts and sums by transaction kind plus the
/// current balance). Failures should be reported as
/// [`DisplayError::DataUnavailable`].
pub trait StatsSource: Send + Sync {
    fn aggregate_stats(&self) -> Result<AggregateStats>;
}

impl<F> StatsSource for F
where
    F: Fn() -> Result<AggregateStats> + Send + Sync,
{
    fn aggregate_stats(&self) -> Result<AggregateStats> { self() }
}

/// Cached snapshot with its validity window.
#[derive(Clone, Copy, Debug)]
struct CacheEntry {
    snapshot: StatsSnapshot,
    fetched_at: Instant,
    expires_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entry: Option<CacheEntry>,
    /// A refresh query is currently running.
    refreshing: bool,
    /// Bumped every time a refresh completes, successfully or not.
    generation: u64,
    /// Error text of the most recent failed refresh.
    last_error: Option<String>,
}

/// TTL cache in front of a [`StatsSource`].
pub struct StatsCache {
    source: Arc<dyn StatsSource>,
    ttl: Duration,
    stale_ceiling: Duration,
    state: Mutex<CacheState>,
    refreshed: Condvar,
    queries: AtomicU64,
}

impl StatsCache {
    pub fn new(
        source: Arc<dyn StatsSource>,
        ttl: Duration,
        stale_ceiling: Duration,
    ) -> Self {
        Self {
            source,
            ttl,
            stale_ceiling,
            state: Mutex::new(CacheState::default()),
            refreshed: Condvar::new(),
            queries: AtomicU64::new(0),
        }
    }

    /// Current snapshot, refreshing if the cached one has expired.
    pub fn get_stats(&self) -> Result<StatsSnapshot> { self.get_stats_at(Instant::now(), Local::now().naive_local()) }

    /// [`get_stats`](Self::get_stats) with an explicit clock.
    ///
    /// `now` drives expiry, `wall` stamps a freshly read snapshot.
    pub fn get_stats_at(
        &self,
        now: Instant,
        wall: NaiveDateTime,
    ) -> Result<StatsSnapshot> {
        let mut state = self.lock();

        if let Some(entry) = state.entry.as_ref().filter(|e| now < e.expires_at) {
            return Ok(entry.snapshot);
        }

        if state.refreshing {
            // Share the in-flight refresh instead of issuing another query
            let generation = state.generation;
            while state.refreshing && state.generation == generation {
                state = self
                    .refreshed
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            // A successful refresh is shared as is, even if it took longer than the TTL
            return match state.entry.as_ref() {
                Some(entry) if state.last_error.is_none() => Ok(entry.snapshot),
                _ => self.fallback(&state, now),
            };
        }

        state.refreshing = true;
        drop(state);

        let mut refresh = RefreshGuard { cache: self, done: false };
        self.queries.fetch_add(1, Ordering::Relaxed);
        let result = self.source.aggregate_stats();

        let mut state = self.lock();
        refresh.finish(&mut state);

        match result {
            Ok(aggregates) => {
                let snapshot = aggregates.into_snapshot(wall);
                state.entry = Some(CacheEntry {
                    snapshot,
                    fetched_at: now,
                    expires_at: now + self.ttl,
                });
                state.last_error = None;
                debug!(
                    total_walks = snapshot.total_walks,
                    walks_today = snapshot.walks_today,
                    "stats cache refreshed"
                );
                Ok(snapshot)
            }
            Err(err) => {
                state.last_error = Some(err.to_string());
                self.fallback(&state, now)
            }
        }
    }

    /// Drop the cached entry so the next call queries the source.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        if let Some(entry) = state.entry.as_mut() {
            entry.expires_at = entry.fetched_at;
        }
    }

    /// Number of aggregate queries issued so far.
    pub fn query_count(&self) -> u64 { self.queries.load(Ordering::Relaxed) }

    /// Resolve a failed refresh: stale snapshot within the ceiling, else error.
    fn fallback(
        &self,
        state: &CacheState,
        now: Instant,
    ) -> Result<StatsSnapshot> {
        let reason = state
            .last_error
            .clone()
            .unwrap_or_else(|| "refresh failed".to_string());

        match state.entry {
            Some(entry) if now.saturating_duration_since(entry.fetched_at) <= self.stale_ceiling => {
                warn!(
                    age_ms = now.saturating_duration_since(entry.fetched_at).as_millis() as u64,
                    error = %reason,
                    "stats refresh failed, serving stale snapshot"
                );
                Ok(entry.snapshot)
            }
            _ => Err(DisplayError::DataUnavailable(reason)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> { self.state.lock().unwrap_or_else(PoisonError::into_inner) }
}

/// Clears the in-flight flag and wakes waiters, even if the source panics.
struct RefreshGuard<'a> {
    cache: &'a StatsCache,
    done: bool,
}

impl RefreshGuard<'_> {
    fn finish(
        &mut self,
        state: &mut CacheState,
    ) {
        state.refreshing = false;
        state.generation = state.generation.wrapping_add(1);
        self.done = true;
        self.cache.refreshed.notify_all();
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let mut state = self.cache.lock();
        state.refreshing = false;
        state.generation = state.generation.wrapping_add(1);
        state.last_error = Some("stats source panicked".to_string());
        self.cache.refreshed.notify_all();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
