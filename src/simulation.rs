//! Runs a full cashier shift against one shared account.
//!
//! A run goes `NotStarted -> Running -> Completed` exactly once. The driver
//! does no bookkeeping checks of its own: whatever mismatch the report shows
//! between the balance and the statistics is the result of the experiment.

use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::account::{Account, SyncAccount, UnsyncAccount};
use crate::cashier::{cashier_work, CashierTally};
use crate::config::Settings;
use crate::denomination::{DenominationSource, RandomDenominations};
use crate::error::SimulationError;
use crate::report::Reporter;
use crate::statistics::{Statistics, StatisticsSnapshot, SyncStatistics, UnsyncStatistics};
use crate::Amount;

pub const CASHIER_COUNT: usize = 5;
pub const ITERATIONS_PER_CASHIER: usize = 100;
pub const INITIAL_BALANCE: Amount = 1000.0;
pub const CASHIER_PACING_MS: u64 = 10;
pub const CASHIER_PACING: Duration = Duration::from_millis(CASHIER_PACING_MS);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Unsynchronized,
    Synchronized,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Unsynchronized, Variant::Synchronized];

    pub fn label(self) -> &'static str {
        match self {
            Variant::Unsynchronized => "Unsafe Version",
            Variant::Synchronized => "Safe Version",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotStarted,
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub label: String,
    pub initial_balance: Amount,
    pub final_balance: Amount,
    pub statistics: StatisticsSnapshot,
    /// What the cashiers themselves observed, summed over all of them.
    pub ledger: CashierTally,
}

impl SimulationReport {
    /// Balance implied by the operations the cashiers saw succeed.
    pub fn expected_balance(&self) -> Amount {
        self.initial_balance + self.ledger.net_flow()
    }

    pub fn balance_drift(&self) -> Amount {
        self.final_balance - self.expected_balance()
    }

    /// `true` when neither the account nor the statistics lost an update.
    pub fn is_consistent(&self) -> bool {
        self.balance_drift() == 0.0
            && self.statistics.transactions == self.ledger.recorded_transactions()
            && self.statistics.amount == self.ledger.recorded_amount()
    }
}

/// Owns the shared account and statistics for one run.
pub struct SimulationDriver<A, S> {
    label: String,
    account: A,
    statistics: S,
    pacing: Duration,
    phase: Phase,
}

impl<A: Account + Default, S: Statistics + Default> SimulationDriver<A, S> {
    /// Fresh account at the starting balance and zeroed statistics.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_parts(label, A::default(), S::default())
    }
}

impl<A: Account, S: Statistics> SimulationDriver<A, S> {
    pub fn with_parts(label: impl Into<String>, account: A, statistics: S) -> Self {
        Self {
            label: label.into(),
            account,
            statistics,
            pacing: CASHIER_PACING,
            phase: Phase::NotStarted,
        }
    }

    pub fn pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Runs every cashier to completion and reports before and after.
    ///
    /// `make_source` is called once per cashier, on the calling thread, with
    /// the cashier's index.
    pub fn run<D, F, R>(
        mut self,
        make_source: F,
        reporter: &mut R,
    ) -> Result<SimulationReport, SimulationError>
    where
        D: DenominationSource + Send,
        F: FnMut(usize) -> D,
        R: Reporter + ?Sized,
    {
        let initial_balance = self.account.balance();
        reporter.started(&self.label, initial_balance)?;

        self.enter(Phase::Running);
        let ledger = self.launch_cashiers(make_source)?;

        let report = SimulationReport {
            label: self.label.clone(),
            initial_balance,
            final_balance: self.account.balance(),
            statistics: self.statistics.snapshot(),
            ledger,
        };
        reporter.finished(&report)?;
        self.enter(Phase::Completed);

        info!(
            "{}: final balance {} (cashiers expected {}), {} recorded transactions",
            report.label,
            report.final_balance,
            report.expected_balance(),
            report.statistics.transactions
        );
        Ok(report)
    }

    fn enter(&mut self, phase: Phase) {
        debug!("{}: {:?} -> {:?}", self.label, self.phase, phase);
        self.phase = phase;
    }

    fn launch_cashiers<D, F>(&self, mut make_source: F) -> Result<CashierTally, SimulationError>
    where
        D: DenominationSource + Send,
        F: FnMut(usize) -> D,
    {
        let account = &self.account;
        let statistics = &self.statistics;
        let pacing = self.pacing;

        thread::scope(|scope| -> Result<CashierTally, SimulationError> {
            let mut handles = Vec::with_capacity(CASHIER_COUNT);

            for cashier in 0..CASHIER_COUNT {
                let mut source = make_source(cashier);
                let handle = thread::Builder::new()
                    .name(format!("cashier-{cashier}"))
                    .spawn_scoped(scope, move || {
                        cashier_work(account, statistics, &mut source, pacing)
                    })
                    .map_err(|source| SimulationError::Spawn { cashier, source })?;
                handles.push((cashier, handle));
            }

            // Join everyone before reporting the first failure.
            let mut ledger = CashierTally::default();
            let mut failure = None;
            for (cashier, handle) in handles {
                match handle.join() {
                    Ok(tally) => ledger.merge(&tally),
                    Err(_) => {
                        failure.get_or_insert(SimulationError::CashierPanicked { cashier });
                    }
                }
            }

            match failure {
                Some(error) => Err(error),
                None => Ok(ledger),
            }
        })
    }
}

/// Runs one variant with random denominations, honoring `settings`.
pub fn run_variant<R>(
    variant: Variant,
    settings: &Settings,
    reporter: &mut R,
) -> Result<SimulationReport, SimulationError>
where
    R: Reporter + ?Sized,
{
    let seed = settings.seed;
    // Offset by cashier index so seeded cashiers don't all draw the same
    // sequence.
    let make_source = move |cashier: usize| match seed {
        Some(seed) => RandomDenominations::seeded(seed.wrapping_add(cashier as u64)),
        None => RandomDenominations::from_entropy(),
    };

    match variant {
        Variant::Unsynchronized => {
            SimulationDriver::<UnsyncAccount, UnsyncStatistics>::new(variant.label())
                .pacing(settings.pacing())
                .run(make_source, reporter)
        }
        Variant::Synchronized => {
            SimulationDriver::<SyncAccount, SyncStatistics>::new(variant.label())
                .pacing(settings.pacing())
                .run(make_source, reporter)
        }
    }
}
