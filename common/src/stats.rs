//! Aggregate walk/payment statistics as shown on the rotating screens.

use chrono::NaiveDateTime;

/// Immutable point-in-time aggregate read.
///
/// Produced by the stats cache on refresh and never mutated afterwards;
/// screens only ever see copies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatsSnapshot {
    /// All walks ever recorded.
    pub total_walks: u32,
    /// Walks recorded since local midnight.
    pub walks_today: u32,
    /// Sum of all walk earnings.
    pub total_earned: f64,
    /// Current ledger balance. Positive means money is owed to the walker.
    pub balance: f64,
    /// Wall-clock time the aggregate was read.
    pub as_of: NaiveDateTime,
}

impl StatsSnapshot {
    /// Which side of the ledger currently owes money.
    #[inline]
    pub fn standing(&self) -> BalanceStanding { BalanceStanding::from_balance(self.balance) }
}

/// Direction of the current balance.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BalanceStanding {
    /// Balance above zero: the owner owes the walker.
    TheyOwe,
    /// Balance below zero: the walker has been paid ahead.
    YouOwe,
    /// Exactly zero.
    Settled,
}

impl BalanceStanding {
    /// Classify a balance amount.
    pub fn from_balance(balance: f64) -> Self {
        if balance > 0.0 {
            Self::TheyOwe
        } else if balance < 0.0 {
            Self::YouOwe
        } else {
            Self::Settled
        }
    }

    /// Short label shown under the balance value.
    pub const fn label(self) -> &'static str {
        match self {
            Self::TheyOwe => "They owe you",
            Self::YouOwe => "You owe them",
            Self::Settled => "All settled",
        }
    }
}
