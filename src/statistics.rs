//! Transaction statistics shared by all cashiers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::atomic_amount::AtomicAmount;
use crate::Amount;

/// Both counters read back to back.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatisticsSnapshot {
    pub transactions: usize,
    pub amount: Amount,
}

pub trait Statistics: Send + Sync {
    /// Counts one transaction and adds its amount to the running total.
    fn record_transaction(&self, amount: Amount);

    fn total_transactions(&self) -> usize;

    fn total_amount(&self) -> Amount;

    /// Reads the two counters one after the other.
    ///
    /// While cashiers are still running the pair may not describe the same
    /// set of transactions. Once every cashier has joined it is exact for
    /// the synchronized variant.
    fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            transactions: self.total_transactions(),
            amount: self.total_amount(),
        }
    }
}

/// Statistics updated with plain read-then-write steps. Loses increments
/// under contention.
#[derive(Debug)]
pub struct UnsyncStatistics {
    transaction_count: AtomicUsize,
    total_amount: AtomicAmount,
}

impl Default for UnsyncStatistics {
    fn default() -> Self {
        Self {
            transaction_count: AtomicUsize::new(0),
            total_amount: AtomicAmount::new(0.0),
        }
    }
}

impl Statistics for UnsyncStatistics {
    fn record_transaction(&self, amount: Amount) {
        let count = self.transaction_count.load(Ordering::Relaxed);
        thread::yield_now();
        self.transaction_count.store(count + 1, Ordering::Relaxed);

        self.total_amount.unguarded_update(|total| total + amount);
    }

    fn total_transactions(&self) -> usize {
        self.transaction_count.load(Ordering::Relaxed)
    }

    fn total_amount(&self) -> Amount {
        self.total_amount.load(Ordering::Relaxed)
    }
}

/// Statistics where each field is its own atomic.
///
/// The count and the total are two separate atomic updates, not one
/// transaction. Each field on its own never loses an update.
#[derive(Debug)]
pub struct SyncStatistics {
    transaction_count: AtomicUsize,
    total_amount: AtomicAmount,
}

impl Default for SyncStatistics {
    fn default() -> Self {
        Self {
            transaction_count: AtomicUsize::new(0),
            total_amount: AtomicAmount::new(0.0),
        }
    }
}

impl Statistics for SyncStatistics {
    fn record_transaction(&self, amount: Amount) {
        self.transaction_count.fetch_add(1, Ordering::SeqCst);
        self.total_amount.fetch_add(amount, Ordering::SeqCst);
    }

    fn total_transactions(&self) -> usize {
        self.transaction_count.load(Ordering::SeqCst)
    }

    fn total_amount(&self) -> Amount {
        self.total_amount.load(Ordering::SeqCst)
    }
}
