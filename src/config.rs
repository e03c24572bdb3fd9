//! Optional TOML settings file.
//!
//! ```toml
//! pacing_ms = 10
//! seed = 1234
//! color = false
//! ```
//!
//! Every key may be omitted. Cashier count, iteration count and the starting
//! balance are fixed and cannot be set here.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::simulation::CASHIER_PACING_MS;

const MAX_PACING_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Pause after every request, in milliseconds.
    pub pacing_ms: u64,
    /// Seed for the denomination draws; fresh entropy when absent.
    pub seed: Option<u64>,
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pacing_ms: CASHIER_PACING_MS,
            seed: None,
            color: true,
        }
    }
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pacing_ms > MAX_PACING_MS {
            return Err(ConfigError::invalid_value(
                "pacing_ms",
                format!("{} exceeds the maximum of {MAX_PACING_MS}", self.pacing_ms),
            ));
        }
        Ok(())
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}
