use std::io::{self, Write};

use colored::Colorize;

use crate::simulation::SimulationReport;
use crate::Amount;

/// Receives the two halves of a run's report.
pub trait Reporter {
    /// Called before any cashier starts.
    fn started(&mut self, label: &str, initial_balance: Amount) -> io::Result<()>;

    /// Called after every cashier has joined.
    fn finished(&mut self, report: &SimulationReport) -> io::Result<()>;
}

/// Plain-text report, with a colored header when enabled.
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn started(&mut self, label: &str, initial_balance: Amount) -> io::Result<()> {
        let header = format!("=== Bank Simulation Results ({label}) ===");

        writeln!(self.out)?;
        if self.color {
            writeln!(self.out, "{}", header.blue().bold())?;
        } else {
            writeln!(self.out, "{header}")?;
        }
        writeln!(self.out, "Initial balance: {initial_balance}")?;
        self.out.flush()
    }

    fn finished(&mut self, report: &SimulationReport) -> io::Result<()> {
        writeln!(self.out, "Final balance: {}", report.final_balance)?;
        writeln!(self.out, "Total transactions: {}", report.statistics.transactions)?;
        writeln!(self.out, "Total transaction amount: {}", report.statistics.amount)?;
        writeln!(self.out, "All cashiers completed work!")?;
        self.out.flush()
    }
}
