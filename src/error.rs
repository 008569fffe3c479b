use thiserror::Error;

/// Failures surfaced by block sealing and chain operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid difficulty {difficulty}: must be at most {max}")]
    InvalidDifficulty { difficulty: u32, max: u32 },

    #[error("clock unavailable: could not read a timestamp")]
    ClockUnavailable,

    #[error("chain has no blocks")]
    EmptyChainAccess,

    #[error("mining timed out after {attempts} attempts ({elapsed_ms} ms)")]
    MiningTimedOut { attempts: u64, elapsed_ms: u128 },

    #[error("mining aborted: nonce space exhausted at {nonce}")]
    MiningAborted { nonce: u64 },

    #[error("invalid config value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
