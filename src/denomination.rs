//! Banknote values a cashier hands out or takes in.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Amount;

pub const DEPOSIT_DENOMINATIONS: [Amount; 4] = [50.0, 100.0, 200.0, 500.0];
pub const WITHDRAWAL_DENOMINATIONS: [Amount; 5] = [10.0, 20.0, 50.0, 100.0, 200.0];

/// One customer request: which operation and for how much.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Draw {
    Deposit(Amount),
    Withdraw(Amount),
}

impl Draw {
    pub fn amount(self) -> Amount {
        match self {
            Draw::Deposit(amount) | Draw::Withdraw(amount) => amount,
        }
    }
}

/// Where a cashier gets its next customer from.
pub trait DenominationSource {
    /// `true` means the next customer deposits.
    fn flip_coin(&mut self) -> bool;

    fn deposit_amount(&mut self) -> Amount;

    fn withdrawal_amount(&mut self) -> Amount;

    fn next_draw(&mut self) -> Draw {
        if self.flip_coin() {
            Draw::Deposit(self.deposit_amount())
        } else {
            Draw::Withdraw(self.withdrawal_amount())
        }
    }
}

/// Fair coin and uniform picks from the fixed denomination sets.
#[derive(Debug, Clone)]
pub struct RandomDenominations {
    rng: StdRng,
}

impl RandomDenominations {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible draws for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick(&mut self, set: &[Amount]) -> Amount {
        set[self.rng.gen_range(0..set.len())]
    }
}

impl DenominationSource for RandomDenominations {
    fn flip_coin(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn deposit_amount(&mut self) -> Amount {
        self.pick(&DEPOSIT_DENOMINATIONS)
    }

    fn withdrawal_amount(&mut self) -> Amount {
        self.pick(&WITHDRAWAL_DENOMINATIONS)
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ScriptedDenominations {
    script: Vec<Draw>,
    cursor: usize,
}

impl ScriptedDenominations {
    /// Returns `None` for an empty script.
    pub fn new(script: Vec<Draw>) -> Option<Self> {
        if script.is_empty() {
            return None;
        }
        Some(Self { script, cursor: 0 })
    }

    fn current(&self) -> Draw {
        self.script[self.cursor % self.script.len()]
    }

    fn advance(&mut self) -> Amount {
        let amount = self.current().amount();
        self.cursor += 1;
        amount
    }
}

impl DenominationSource for ScriptedDenominations {
    fn flip_coin(&mut self) -> bool {
        matches!(self.current(), Draw::Deposit(_))
    }

    fn deposit_amount(&mut self) -> Amount {
        self.advance()
    }

    fn withdrawal_amount(&mut self) -> Amount {
        self.advance()
    }
}
