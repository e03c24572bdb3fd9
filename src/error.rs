use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Failed to spawn cashier {cashier}: {source}")]
    Spawn {
        cashier: usize,
        #[source]
        source: io::Error,
    },

    #[error("Cashier {cashier} panicked before finishing its shift")]
    CashierPanicked { cashier: usize },

    #[error("Console I/O failed: {0}")]
    Console(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
