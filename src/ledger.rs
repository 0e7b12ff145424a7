//! In-memory walk ledger used by the `k9-display` binary.
//!
//! Mirrors the bot's transaction table closely enough to drive the panel
//! without a database: walks add [`WALK_PRICE`] to the balance, a payout
//! zeroes it, and credit is subtracted.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::error::Result;
use crate::stats::{AggregateStats, StatsSource};

/// Amount credited per walk, in MDL.
pub const WALK_PRICE: f64 = 75.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntryKind {
    Walk,
    Payment,
    Credit,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    at: NaiveDateTime,
    amount: f64,
    kind: EntryKind,
}

#[derive(Debug, Default)]
struct Book {
    entries: Vec<Entry>,
    balance: f64,
}

/// Thread-safe transaction log with a running balance.
#[derive(Debug, Default)]
pub struct SimulatedLedger {
    book: Mutex<Book>,
}

impl SimulatedLedger {
    pub fn new() -> Self { Self::default() }

    /// Record a walk now. Returns the new balance.
    pub fn add_walk(&self) -> f64 { self.add_walk_at(Local::now().naive_local()) }

    pub fn add_walk_at(
        &self,
        at: NaiveDateTime,
    ) -> f64 {
        self.record(at, WALK_PRICE, EntryKind::Walk)
    }

    /// Pay out the whole balance. Returns the amount paid.
    pub fn pay_out(&self) -> f64 {
        let mut book = self.lock();
        let paid = book.balance;
        book.entries.push(Entry {
            at: Local::now().naive_local(),
            amount: -paid,
            kind: EntryKind::Payment,
        });
        book.balance = 0.0;
        paid
    }

    /// Record credit given against the balance. Returns the new balance.
    pub fn give_credit(
        &self,
        amount: f64,
    ) -> f64 {
        self.record(Local::now().naive_local(), -amount, EntryKind::Credit)
    }

    /// Aggregates with "today" taken as `today`.
    pub fn aggregate_on(
        &self,
        today: NaiveDate,
    ) -> AggregateStats {
        let book = self.lock();
        let walks = book.entries.iter().filter(|e| e.kind == EntryKind::Walk);

        let mut stats = AggregateStats {
            balance: book.balance,
            ..AggregateStats::default()
        };
        for walk in walks {
            stats.total_walks += 1;
            stats.total_earned += walk.amount;
            if walk.at.date() == today {
                stats.walks_today += 1;
            }
        }
        stats
    }

    fn record(
        &self,
        at: NaiveDateTime,
        amount: f64,
        kind: EntryKind,
    ) -> f64 {
        let mut book = self.lock();
        book.entries.push(Entry { at, amount, kind });
        book.balance += amount;
        book.balance
    }

    fn lock(&self) -> MutexGuard<'_, Book> { self.book.lock().unwrap_or_else(PoisonError::into_inner) }
}

impl StatsSource for SimulatedLedger {
    fn aggregate_stats(&self) -> Result<AggregateStats> { Ok(self.aggregate_on(Local::now().date_naive())) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 5, d).unwrap() }

    fn at(
        d: u32,
        hour: u32,
    ) -> NaiveDateTime {
        day(d).and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = SimulatedLedger::new();
        assert_eq!(ledger.aggregate_on(day(1)), AggregateStats::default());
    }

    #[test]
    fn test_walks_today_by_date() {
        let ledger = SimulatedLedger::new();
        ledger.add_walk_at(at(1, 8));
        ledger.add_walk_at(at(2, 8));
        ledger.add_walk_at(at(2, 18));

        let stats = ledger.aggregate_on(day(2));
        assert_eq!(stats.total_walks, 3);
        assert_eq!(stats.walks_today, 2);
        assert!((stats.total_earned - 225.0).abs() < f64::EPSILON);
        assert!((stats.balance - 225.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_payout_and_credit_affect_balance_only() {
        let ledger = SimulatedLedger::new();
        ledger.add_walk_at(at(1, 8));
        ledger.add_walk_at(at(1, 9));

        assert!((ledger.pay_out() - 150.0).abs() < f64::EPSILON);
        assert!((ledger.give_credit(50.0) + 50.0).abs() < f64::EPSILON);

        let stats = ledger.aggregate_on(day(1));
        assert_eq!(stats.total_walks, 2);
        assert!((stats.total_earned - 150.0).abs() < f64::EPSILON);
        assert!((stats.balance + 50.0).abs() < f64::EPSILON);
    }
}
