use std::time::Duration;

use super::DIGEST_HEX_LEN;
use crate::error::{LedgerError, Result};

/// How often (in attempts) the seal loop looks at the wall clock.
pub const TIMEOUT_CHECK_INTERVAL: u64 = 1024;

/// Caps applied to a single seal. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MiningLimits {
    pub max_iterations: Option<u64>,
    pub timeout: Option<Duration>,
}

impl MiningLimits {
    pub const UNBOUNDED: MiningLimits = MiningLimits {
        max_iterations: None,
        timeout: None,
    };

    pub fn with_max_iterations(mut self, max: u64) -> Self {
        self.max_iterations = Some(max);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Outcome of a successful seal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealReport {
    pub nonce: u64,
    pub hash: String,
    /// Number of nonce increments performed by this call.
    pub attempts: u64,
    pub elapsed_ms: u128,
}

/// Reject difficulties no hex SHA-256 digest can satisfy.
pub fn check_difficulty(difficulty: u32) -> Result<()> {
    if difficulty as usize > DIGEST_HEX_LEN {
        return Err(LedgerError::InvalidDifficulty {
            difficulty,
            max: DIGEST_HEX_LEN as u32,
        });
    }
    Ok(())
}

/// True when `hash` starts with `difficulty` zero characters.
pub fn meets_target(hash: &str, difficulty: u32) -> bool {
    let difficulty = difficulty as usize;
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}
