use std::time::Instant;

use log::{debug, info, warn};
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::clock::{Clock, SystemClock};
use super::pow::{MiningLimits, SealReport, TIMEOUT_CHECK_INTERVAL, check_difficulty, meets_target};
use super::{EMPTY_HASH, GENESIS_DATA};
use crate::error::{LedgerError, Result};

/// A single block in the ledger holding an opaque text payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    index: u64,
    timestamp: i64, // Unix timestamp (UTC)
    data: String,
    nonce: u64, // Proof-of-Work nonce
    previous_hash: String,
    hash: String, // Cached hash of the block
}

impl Block {
    /// Create a new unlinked, unsealed block stamped with the current UTC time.
    pub fn new(index: u64, data: impl Into<String>) -> Self {
        Self::with_timestamp(index, data, SystemClock.timestamp())
    }

    /// Create a new block, reading the timestamp once from `clock`.
    pub fn with_clock(index: u64, data: impl Into<String>, clock: &impl Clock) -> Result<Self> {
        let timestamp = clock.now().ok_or(LedgerError::ClockUnavailable)?;
        Ok(Self::with_timestamp(index, data, timestamp))
    }

    /// Create a new block with a caller-chosen timestamp.
    pub fn with_timestamp(index: u64, data: impl Into<String>, timestamp: i64) -> Self {
        let mut block = Self {
            index,
            timestamp,
            data: data.into(),
            nonce: 0,
            previous_hash: EMPTY_HASH.to_string(),
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// The first block of a chain. It has no predecessor and is not sealed.
    pub fn genesis() -> Self {
        Self::new(0, GENESIS_DATA)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// SHA-256 over `index ‖ timestamp ‖ data ‖ nonce ‖ previous_hash`,
    /// each rendered as text and concatenated without separators.
    /// Returned as 64 lowercase hex characters.
    pub fn compute_hash(&self) -> String {
        let preimage = format!(
            "{}{}{}{}{}",
            self.index, self.timestamp, self.data, self.nonce, self.previous_hash
        );
        let mut hasher = Sha256::new();
        hasher.update(preimage.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Whether the cached hash starts with `difficulty` zeros.
    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        meets_target(&self.hash, difficulty)
    }

    /// Validate that the cached `hash` matches the content and satisfies
    /// the PoW difficulty. Chain linkage is not checked here.
    pub fn is_valid(&self, difficulty: u32) -> bool {
        self.hash == self.compute_hash() && self.meets_difficulty(difficulty)
    }

    /// Bind this block to its predecessor. The hash is refreshed so the
    /// block stays consistent with its fields.
    pub(crate) fn link(&mut self, previous_hash: &str) {
        self.previous_hash = previous_hash.to_string();
        self.hash = self.compute_hash();
    }

    /// Perform Proof-of-Work without any cap. May run for a very long time
    /// at high difficulties.
    pub fn seal(&mut self, difficulty: u32) -> Result<SealReport> {
        self.seal_with_limits(difficulty, &MiningLimits::UNBOUNDED)
    }

    /// Perform Proof-of-Work by searching nonces upward from the current one
    /// until the hash starts with `difficulty` hex zeros.
    ///
    /// The block is consistent (`hash == compute_hash()`) after every step,
    /// so a timed-out block can be sealed again and resumes where it stopped.
    pub fn seal_with_limits(
        &mut self,
        difficulty: u32,
        limits: &MiningLimits,
    ) -> Result<SealReport> {
        check_difficulty(difficulty)?;

        let started = Instant::now();
        let mut attempts: u64 = 0;
        self.hash = self.compute_hash();

        while !self.meets_difficulty(difficulty) {
            if let Some(max) = limits.max_iterations {
                if attempts >= max {
                    return Err(self.timed_out(attempts, started));
                }
            }
            if let Some(timeout) = limits.timeout {
                if attempts % TIMEOUT_CHECK_INTERVAL == 0 && started.elapsed() >= timeout {
                    return Err(self.timed_out(attempts, started));
                }
            }

            self.nonce = self
                .nonce
                .checked_add(1)
                .ok_or(LedgerError::MiningAborted { nonce: self.nonce })?;
            self.hash = self.compute_hash();
            attempts += 1;
        }

        let elapsed_ms = started.elapsed().as_millis();
        debug!(
            "SEAL - block #{} diff={} attempts={} ({} ms)",
            self.index, difficulty, attempts, elapsed_ms
        );
        info!("Block mined: {}", self.hash);

        Ok(SealReport {
            nonce: self.nonce,
            hash: self.hash.clone(),
            attempts,
            elapsed_ms,
        })
    }

    fn timed_out(&self, attempts: u64, started: Instant) -> LedgerError {
        let elapsed_ms = started.elapsed().as_millis();
        warn!(
            "SEAL - block #{} gave up at nonce={} after {} attempts ({} ms)",
            self.index, self.nonce, attempts, elapsed_ms
        );
        LedgerError::MiningTimedOut {
            attempts,
            elapsed_ms,
        }
    }
}
