//! Chain configuration read from environment variables (and `.env`).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::blockchain::{DEFAULT_DIFFICULTY, MiningLimits};
use crate::error::{LedgerError, Result};

pub const DIFFICULTY_VAR: &str = "LEDGER_DIFFICULTY";
pub const MAX_ITERATIONS_VAR: &str = "LEDGER_MAX_ITERATIONS";
pub const TIMEOUT_MS_VAR: &str = "LEDGER_TIMEOUT_MS";
/// Number of blocks the demo binary mines.
pub const DEMO_BLOCKS_VAR: &str = "LEDGER_DEMO_BLOCKS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConfig {
    /// Leading hex zeros required of every appended block.
    pub difficulty: u32,
    pub limits: MiningLimits,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            limits: MiningLimits::UNBOUNDED,
        }
    }
}

impl ChainConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Missing keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let difficulty = parse_var(&lookup, DIFFICULTY_VAR)?.unwrap_or(DEFAULT_DIFFICULTY);
        let max_iterations = parse_var(&lookup, MAX_ITERATIONS_VAR)?;
        let timeout = parse_var::<u64, _>(&lookup, TIMEOUT_MS_VAR)?.map(Duration::from_millis);

        Ok(Self {
            difficulty,
            limits: MiningLimits {
                max_iterations,
                timeout,
            },
        })
    }
}

/// Read one optional variable from the process environment, with the same
/// parsing rules as [`ChainConfig::from_env`].
pub fn env_var<T: FromStr>(key: &str) -> Result<Option<T>> {
    parse_var(&|k: &str| env::var(k).ok(), key)
}

/// Parse an optional variable. Empty values count as unset.
pub(crate) fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| LedgerError::InvalidConfig {
                key: key.to_string(),
                value: raw,
            }),
    }
}
