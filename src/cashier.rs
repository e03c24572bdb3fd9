//! The loop each cashier thread runs.

use std::iter::Sum;
use std::thread;
use std::time::Duration;

use log::trace;

use crate::account::Account;
use crate::denomination::{DenominationSource, Draw};
use crate::simulation::ITERATIONS_PER_CASHIER;
use crate::statistics::Statistics;
use crate::Amount;

/// What happened to one customer request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Deposited(Amount),
    Withdrew(Amount),
    /// Insufficient funds; nothing was recorded.
    Declined(Amount),
}

/// What a single cashier saw during its shift.
///
/// Kept on the cashier's own stack, so it is never raced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CashierTally {
    pub deposits: usize,
    pub deposited: Amount,
    pub withdrawals: usize,
    pub withdrawn: Amount,
    pub declined: usize,
}

impl CashierTally {
    pub fn observe(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Deposited(amount) => {
                self.deposits += 1;
                self.deposited += amount;
            }
            Outcome::Withdrew(amount) => {
                self.withdrawals += 1;
                self.withdrawn += amount;
            }
            Outcome::Declined(_) => self.declined += 1,
        }
    }

    pub fn merge(&mut self, other: &CashierTally) {
        self.deposits += other.deposits;
        self.deposited += other.deposited;
        self.withdrawals += other.withdrawals;
        self.withdrawn += other.withdrawn;
        self.declined += other.declined;
    }

    /// Requests served, declined ones included.
    pub fn attempts(&self) -> usize {
        self.deposits + self.withdrawals + self.declined
    }

    pub fn recorded_transactions(&self) -> usize {
        self.deposits + self.withdrawals
    }

    pub fn recorded_amount(&self) -> Amount {
        self.deposited + self.withdrawn
    }

    /// Net effect on the balance.
    pub fn net_flow(&self) -> Amount {
        self.deposited - self.withdrawn
    }
}

impl Sum for CashierTally {
    fn sum<I: Iterator<Item = CashierTally>>(iter: I) -> Self {
        iter.fold(CashierTally::default(), |mut total, tally| {
            total.merge(&tally);
            total
        })
    }
}

/// Applies one request: deposits are always recorded, withdrawals only when
/// the account approves them.
pub fn serve_customer<A, S>(account: &A, stats: &S, draw: Draw) -> Outcome
where
    A: Account + ?Sized,
    S: Statistics + ?Sized,
{
    match draw {
        Draw::Deposit(amount) => {
            account.deposit(amount);
            stats.record_transaction(amount);
            Outcome::Deposited(amount)
        }
        Draw::Withdraw(amount) => {
            if account.withdraw(amount) {
                stats.record_transaction(amount);
                Outcome::Withdrew(amount)
            } else {
                Outcome::Declined(amount)
            }
        }
    }
}

/// One cashier's shift: a fixed number of random requests, pausing `pacing`
/// after each one.
pub fn cashier_work<A, S, D>(
    account: &A,
    stats: &S,
    source: &mut D,
    pacing: Duration,
) -> CashierTally
where
    A: Account + ?Sized,
    S: Statistics + ?Sized,
    D: DenominationSource + ?Sized,
{
    let mut tally = CashierTally::default();

    for _ in 0..ITERATIONS_PER_CASHIER {
        let outcome = serve_customer(account, stats, source.next_draw());
        trace!("{outcome:?}");
        tally.observe(outcome);

        if !pacing.is_zero() {
            thread::sleep(pacing);
        }
    }

    tally
}
