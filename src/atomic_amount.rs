use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crate::Amount;

/// An `f64` stored as raw bits in an `AtomicU64`.
///
/// Offers two ways to update: `fetch_add` is a real compare-and-swap loop,
/// `unguarded_update` is a plain load followed by a plain store and loses
/// updates under contention.
#[derive(Debug)]
pub(crate) struct AtomicAmount {
    bits: AtomicU64,
}

impl AtomicAmount {
    pub(crate) fn new(value: Amount) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    pub(crate) fn load(&self, order: Ordering) -> Amount {
        f64::from_bits(self.bits.load(order))
    }

    /// Adds `delta` atomically and returns the previous value.
    pub(crate) fn fetch_add(&self, delta: Amount, order: Ordering) -> Amount {
        let mut current = self.bits.load(Ordering::Relaxed);

        loop {
            let next = (f64::from_bits(current) + delta).to_bits();

            match self
                .bits
                .compare_exchange_weak(current, next, order, Ordering::Relaxed)
            {
                Ok(previous) => return f64::from_bits(previous),
                Err(actual) => current = actual, // lost the race, retry on the fresh value
            }
        }
    }

    /// Read-modify-write with no coordination between threads.
    ///
    /// The thread yields between the read and the write, so another thread
    /// can slip in and have its write overwritten.
    pub(crate) fn unguarded_update(&self, f: impl FnOnce(Amount) -> Amount) {
        let current = self.load(Ordering::Relaxed);
        thread::yield_now();
        self.bits.store(f(current).to_bits(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_add_returns_previous() {
        let cell = AtomicAmount::new(10.0);
        assert_eq!(cell.fetch_add(2.5, Ordering::SeqCst), 10.0);
        assert_eq!(cell.load(Ordering::SeqCst), 12.5);
    }

    #[test]
    fn test_fetch_add_is_exact_under_contention() {
        let cell = AtomicAmount::new(0.0);

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..1_000 {
                        cell.fetch_add(0.5, Ordering::AcqRel);
                    }
                });
            }
        });

        assert_eq!(cell.load(Ordering::SeqCst), 4_000.0);
    }

    #[test]
    fn test_unguarded_update_single_thread() {
        let cell = AtomicAmount::new(100.0);
        cell.unguarded_update(|v| v - 30.0);
        cell.unguarded_update(|v| v * 2.0);
        assert_eq!(cell.load(Ordering::Relaxed), 140.0);
    }
}
