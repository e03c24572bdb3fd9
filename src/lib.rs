//! Cashier race simulation
//!
//! Five cashier threads share one bank account and one statistics counter.
//! The same workload runs once against unguarded state and once against
//! locked/atomic state, so lost updates and their cure can be compared
//! side by side.
//!
//! Run with: cargo run --bin bank_simulation -- --variant both

pub mod account;
mod atomic_amount;
pub mod cashier;
pub mod config;
pub mod denomination;
pub mod error;
pub mod menu;
pub mod report;
pub mod simulation;
pub mod statistics;

/// Monetary amount in whole currency units.
///
/// Every denomination is integral, so sums stay exact in an `f64`.
pub type Amount = f64;

pub use account::{Account, SyncAccount, UnsyncAccount};
pub use cashier::{cashier_work, serve_customer, CashierTally, Outcome};
pub use config::Settings;
pub use denomination::{
    DenominationSource, Draw, RandomDenominations, ScriptedDenominations, DEPOSIT_DENOMINATIONS,
    WITHDRAWAL_DENOMINATIONS,
};
pub use error::{ConfigError, SimulationError};
pub use menu::{Menu, MenuChoice};
pub use report::{ConsoleReporter, Reporter};
pub use simulation::{
    run_variant, SimulationDriver, SimulationReport, Variant, CASHIER_COUNT, CASHIER_PACING,
    CASHIER_PACING_MS, INITIAL_BALANCE, ITERATIONS_PER_CASHIER,
};
pub use statistics::{Statistics, StatisticsSnapshot, SyncStatistics, UnsyncStatistics};
