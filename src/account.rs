//! The shared bank account, in an unguarded and a locked flavor.

use std::sync::atomic::Ordering;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;

use crate::atomic_amount::AtomicAmount;
use crate::simulation::INITIAL_BALANCE;
use crate::Amount;

/// Balance operations every cashier can call concurrently.
pub trait Account: Send + Sync {
    /// Adds `amount` to the balance. Never fails.
    fn deposit(&self, amount: Amount);

    /// Takes `amount` out if the balance covers it.
    ///
    /// Returns `false` and leaves the balance untouched when funds are
    /// insufficient. That is a normal outcome, not an error.
    fn withdraw(&self, amount: Amount) -> bool;

    fn balance(&self) -> Amount;
}

// =============================================================================
// Unsynchronized account
// =============================================================================

/// Account whose operations are split into independent reads and writes.
///
/// Intentionally racy: concurrent deposits overwrite each other and a
/// withdrawal can pass its funds check against a balance that another
/// cashier drains before the subtraction lands, so the balance can go
/// negative. The relaxed atomic cell keeps this free of undefined behavior
/// while still losing updates.
#[derive(Debug)]
pub struct UnsyncAccount {
    balance: AtomicAmount,
}

impl UnsyncAccount {
    pub fn new(initial_balance: Amount) -> Self {
        Self {
            balance: AtomicAmount::new(initial_balance),
        }
    }
}

impl Default for UnsyncAccount {
    fn default() -> Self {
        Self::new(INITIAL_BALANCE)
    }
}

impl Account for UnsyncAccount {
    fn deposit(&self, amount: Amount) {
        self.balance.unguarded_update(|balance| balance + amount);
    }

    fn withdraw(&self, amount: Amount) -> bool {
        if self.balance.load(Ordering::Relaxed) >= amount {
            thread::yield_now();
            self.balance.unguarded_update(|balance| balance - amount);
            true
        } else {
            false
        }
    }

    fn balance(&self) -> Amount {
        self.balance.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Synchronized account
// =============================================================================

/// Account guarded by a mutex held for the full duration of each operation.
#[derive(Debug)]
pub struct SyncAccount {
    balance: Mutex<Amount>,
}

impl SyncAccount {
    pub fn new(initial_balance: Amount) -> Self {
        Self {
            balance: Mutex::new(initial_balance),
        }
    }

    // A panicking holder cannot leave a half-written f64 behind.
    fn lock(&self) -> MutexGuard<'_, Amount> {
        self.balance.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SyncAccount {
    fn default() -> Self {
        Self::new(INITIAL_BALANCE)
    }
}

impl Account for SyncAccount {
    fn deposit(&self, amount: Amount) {
        *self.lock() += amount;
    }

    fn withdraw(&self, amount: Amount) -> bool {
        let mut balance = self.lock();
        if *balance >= amount {
            *balance -= amount;
            true
        } else {
            false
        }
    }

    fn balance(&self) -> Amount {
        *self.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;

    fn exercise_boundary<A: Account>(account: A) {
        assert!(account.withdraw(1000.0));
        assert_eq!(account.balance(), 0.0);

        account.deposit(100.0);
        assert!(!account.withdraw(100.0 + f64::EPSILON * 1024.0));
        assert_eq!(account.balance(), 100.0);
    }

    #[test]
    fn test_default_starts_at_initial_balance() {
        assert_eq!(SyncAccount::default().balance(), 1000.0);
        assert_eq!(UnsyncAccount::default().balance(), 1000.0);
    }

    #[test]
    fn test_withdraw_exact_balance_boundary() {
        exercise_boundary(SyncAccount::default());
        exercise_boundary(UnsyncAccount::default());
    }

    #[test]
    fn test_withdraw_just_above_balance_fails() {
        let account = SyncAccount::new(250.0);
        assert!(!account.withdraw(250.01));
        assert_eq!(account.balance(), 250.0);
    }

    #[test]
    fn test_concrete_sequence() {
        let account = SyncAccount::default();

        account.deposit(500.0);
        let first = account.withdraw(200.0);
        let second = account.withdraw(2000.0);
        account.deposit(50.0);

        assert_eq!([first, second], [true, false]);
        assert_eq!(account.balance(), 1350.0);
    }

    #[test]
    fn test_deposit_order_does_not_matter() {
        let orders = [
            [50.0, 100.0, 200.0],
            [200.0, 50.0, 100.0],
            [100.0, 200.0, 50.0],
        ];

        for order in orders {
            let account = SyncAccount::default();
            for amount in order {
                account.deposit(amount);
            }
            assert_eq!(account.balance(), 1350.0);
        }
    }

    #[test]
    fn test_sync_account_concurrent_mix_never_negative() {
        let account = SyncAccount::new(0.0);

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..500 {
                        account.deposit(10.0);
                        account.withdraw(20.0);
                        assert!(account.balance() >= 0.0);
                    }
                });
            }
        });

        assert!(account.balance() >= 0.0);
    }

    #[test]
    fn test_sync_account_concurrent_deposits_are_exact() {
        let account = SyncAccount::default();

        thread::scope(|s| {
            for _ in 0..5 {
                s.spawn(|| {
                    for _ in 0..1_000 {
                        account.deposit(1.0);
                    }
                });
            }
        });

        assert_eq!(account.balance(), 6_000.0);
    }

    #[test]
    fn test_unsync_account_loses_updates() {
        const THREADS: usize = 4;
        const DEPOSITS: usize = 2_000;
        let expected = 1000.0 + (THREADS * DEPOSITS) as f64;

        let lost_update_seen = (0..10).any(|_| {
            let account = UnsyncAccount::default();
            let start = Barrier::new(THREADS);

            thread::scope(|s| {
                for _ in 0..THREADS {
                    s.spawn(|| {
                        start.wait();
                        for _ in 0..DEPOSITS {
                            account.deposit(1.0);
                        }
                    });
                }
            });

            account.balance() != expected
        });

        assert!(lost_update_seen, "unguarded deposits never collided");
    }

    #[test]
    fn test_unsync_stale_check_overdraws() {
        const THREADS: usize = 8;

        let overdrawn = (0..2_000).any(|_| {
            let account = UnsyncAccount::new(100.0);
            let start = Barrier::new(THREADS);

            thread::scope(|s| {
                for _ in 0..THREADS {
                    s.spawn(|| {
                        start.wait();
                        account.withdraw(100.0);
                    });
                }
            });

            account.balance() < 0.0
        });

        assert!(overdrawn, "no withdrawal ever passed a stale funds check");
    }

    #[test]
    fn test_sync_same_withdrawals_never_overdraw() {
        const THREADS: usize = 8;

        for _ in 0..200 {
            let account = SyncAccount::new(100.0);
            let start = Barrier::new(THREADS);
            let approved = std::sync::atomic::AtomicUsize::new(0);

            thread::scope(|s| {
                for _ in 0..THREADS {
                    s.spawn(|| {
                        start.wait();
                        if account.withdraw(100.0) {
                            approved.fetch_add(1, Ordering::SeqCst);
                        }
                    });
                }
            });

            assert_eq!(approved.load(Ordering::SeqCst), 1);
            assert_eq!(account.balance(), 0.0);
        }
    }
}
