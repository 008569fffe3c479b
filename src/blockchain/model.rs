use log::debug;

use super::clock::{Clock, SystemClock};
use super::pow::{MiningLimits, check_difficulty};
use super::{Block, DEFAULT_DIFFICULTY};
use crate::config::ChainConfig;
use crate::error::{LedgerError, Result};

/// Simple in-memory, append-only blockchain with Proof-of-Work.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    difficulty: u32,
    limits: MiningLimits,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block, the default
    /// difficulty and no mining caps.
    pub fn new() -> Self {
        Self {
            chain: vec![Block::genesis()],
            difficulty: DEFAULT_DIFFICULTY,
            limits: MiningLimits::UNBOUNDED,
        }
    }

    /// Initialize a new blockchain with difficulty and caps from `config`.
    pub fn with_config(config: ChainConfig) -> Result<Self> {
        check_difficulty(config.difficulty)?;
        Ok(Self {
            chain: vec![Block::genesis()],
            difficulty: config.difficulty,
            limits: config.limits,
        })
    }

    /// Return the last block in the chain.
    pub fn tail(&self) -> Result<&Block> {
        self.chain.last().ok_or(LedgerError::EmptyChainAccess)
    }

    /// A fresh candidate positioned right after the current tail.
    pub fn next_block(&self, data: impl Into<String>) -> Block {
        Block::with_timestamp(self.chain.len() as u64, data, SystemClock.timestamp())
    }

    /// Like [`next_block`](Self::next_block), stamped by `clock`.
    pub fn next_block_with_clock(
        &self,
        data: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Block> {
        Block::with_clock(self.chain.len() as u64, data, clock)
    }

    /// Link `candidate` to the tail, seal it and append it.
    ///
    /// The candidate's previous hash, nonce and hash are overwritten. If
    /// sealing fails the chain is left untouched.
    pub fn append(&mut self, mut candidate: Block) -> Result<&Block> {
        let prev_hash = self.tail()?.hash().to_string();
        debug!(
            "APPEND - linking block #{} to {} (height {})",
            candidate.index(),
            prev_hash,
            self.chain.len()
        );

        candidate.link(&prev_hash);
        candidate.seal_with_limits(self.difficulty, &self.limits)?;

        self.chain.push(candidate);
        self.tail()
    }

    /// Mine and append a new block with the provided `data`.
    pub fn mine_block(&mut self, data: impl Into<String>) -> Result<&Block> {
        self.mine_block_with_clock(data, &SystemClock)
    }

    /// Mine and append a new block whose timestamp is read from `clock`.
    pub fn mine_block_with_clock(
        &mut self,
        data: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<&Block> {
        let block = self.next_block_with_clock(data, clock)?;
        self.append(block)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn genesis(&self) -> Option<&Block> {
        self.chain.first()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.chain.get(index)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Always false once constructed; genesis is never removed.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn limits(&self) -> &MiningLimits {
        &self.limits
    }
}

#[cfg(test)]
mod tests {
    use super::Blockchain;
    use crate::blockchain::{Block, Clock, DEFAULT_DIFFICULTY, EMPTY_HASH, FixedClock, MiningLimits};
    use crate::config::ChainConfig;
    use crate::error::LedgerError;

    fn chain(difficulty: u32) -> Blockchain {
        Blockchain::with_config(ChainConfig {
            difficulty,
            ..ChainConfig::default()
        })
        .unwrap()
    }

    fn assert_linked(bc: &Blockchain) {
        for pair in bc.blocks().windows(2) {
            assert_eq!(pair[1].previous_hash(), pair[0].hash());
        }
    }

    #[test]
    fn starts_with_unsealed_genesis() {
        let bc = Blockchain::new();
        assert_eq!(bc.len(), 1);
        assert!(!bc.is_empty());
        assert_eq!(bc.difficulty(), DEFAULT_DIFFICULTY);

        let genesis = bc.genesis().unwrap();
        assert_eq!(genesis.index(), 0);
        assert_eq!(genesis.previous_hash(), EMPTY_HASH);
        assert_eq!(genesis.nonce(), 0);
        assert_eq!(genesis.hash(), genesis.compute_hash());
        assert_eq!(bc.tail().unwrap(), genesis);
    }

    #[test]
    fn appends_link_to_previous_tail() {
        let mut bc = chain(1);
        let genesis_hash = bc.tail().unwrap().hash().to_string();

        let first = bc.append(Block::new(1, "payload-A")).unwrap().clone();
        assert_eq!(first.previous_hash(), genesis_hash);
        assert!(first.hash().starts_with('0'));

        let second = bc.append(Block::new(2, "payload-B")).unwrap().clone();
        assert_eq!(second.previous_hash(), first.hash());
        assert!(second.is_valid(1));

        assert_eq!(bc.len(), 3);
        assert_linked(&bc);
    }

    #[test]
    fn genesis_survives_appends() {
        let mut bc = chain(1);
        let genesis = bc.genesis().unwrap().clone();
        for i in 0..5 {
            bc.mine_block(format!("block {i}")).unwrap();
        }
        assert_eq!(bc.genesis(), Some(&genesis));
        assert_eq!(bc.get(0).unwrap().previous_hash(), EMPTY_HASH);
        assert_linked(&bc);
    }

    #[test]
    fn mine_block_uses_next_index() {
        let mut bc = chain(1);
        bc.mine_block("a").unwrap();
        bc.mine_block("b").unwrap();
        let indexes: Vec<u64> = bc.blocks().iter().map(|b| b.index()).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
        assert_eq!(bc.get(2).unwrap().data(), "b");
    }

    #[test]
    fn every_appended_block_meets_difficulty() {
        let mut bc = chain(2);
        for data in ["x", "y", "z"] {
            bc.mine_block(data).unwrap();
        }
        assert!(bc.blocks().iter().skip(1).all(|b| b.is_valid(2)));
    }

    #[test]
    fn payload_changes_hash() {
        let mut a = chain(1);
        let mut b = chain(1);
        let ha = a
            .append(Block::with_timestamp(1, "payload-A", 1_700_000_000))
            .unwrap()
            .hash()
            .to_string();
        let hb = b
            .append(Block::with_timestamp(1, "payload-B", 1_700_000_000))
            .unwrap()
            .hash()
            .to_string();
        assert_ne!(ha, hb);
    }

    #[test]
    fn zero_difficulty_appends_without_search() {
        let mut bc = chain(0);
        let block = bc.mine_block("free").unwrap();
        assert_eq!(block.nonce(), 0);
    }

    #[test]
    fn rejects_impossible_difficulty() {
        let err = Blockchain::with_config(ChainConfig {
            difficulty: 65,
            ..ChainConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidDifficulty { .. }));
    }

    #[test]
    fn failed_append_leaves_chain_unchanged() {
        let mut bc = Blockchain::with_config(ChainConfig {
            difficulty: 64,
            limits: MiningLimits::default().with_max_iterations(5),
        })
        .unwrap();
        let before = bc.tail().unwrap().clone();

        let err = bc.mine_block("never").unwrap_err();
        assert!(matches!(err, LedgerError::MiningTimedOut { attempts: 5, .. }));
        assert_eq!(bc.len(), 1);
        assert_eq!(bc.tail().unwrap(), &before);
    }

    struct StoppedClock;

    impl Clock for StoppedClock {
        fn now(&self) -> Option<i64> {
            None
        }
    }

    #[test]
    fn unreadable_clock_fails_mining() {
        let mut bc = chain(1);
        let err = bc.mine_block_with_clock("late", &StoppedClock).unwrap_err();
        assert_eq!(err, LedgerError::ClockUnavailable);
        assert_eq!(bc.len(), 1);
    }

    #[test]
    fn mined_block_carries_clock_timestamp() {
        let mut bc = chain(1);
        let block = bc
            .mine_block_with_clock("stamped", &FixedClock(1_700_000_123))
            .unwrap();
        assert_eq!(block.timestamp(), 1_700_000_123);
        assert_eq!(block.index(), 1);
        assert!(block.is_valid(1));
    }

    #[test]
    fn empty_chain_tail_is_an_error() {
        let bc = Blockchain {
            chain: Vec::new(),
            difficulty: 1,
            limits: MiningLimits::UNBOUNDED,
        };
        assert_eq!(bc.tail().unwrap_err(), LedgerError::EmptyChainAccess);
    }
}
