//! A minimal append-only ledger: blocks sealed by a SHA-256 proof-of-work
//! search and linked to their predecessor's hash.

pub mod blockchain;
pub mod config;
pub mod error;

pub use blockchain::{Block, Blockchain, Clock, MiningLimits, SealReport, SystemClock};
pub use config::ChainConfig;
pub use error::{LedgerError, Result};
