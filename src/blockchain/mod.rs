pub mod block;
pub mod clock;
pub mod model;
pub mod pow;

pub use block::Block;
pub use clock::{Clock, FixedClock, SystemClock};
pub use model::Blockchain;
pub use pow::{MiningLimits, SealReport};

/// Default Proof-of-Work difficulty (number of leading zeros).
pub const DEFAULT_DIFFICULTY: u32 = 3;

/// Length of a hex-encoded SHA-256 digest; no difficulty above this can be met.
pub const DIGEST_HEX_LEN: usize = 64;

/// Payload of the genesis block.
pub const GENESIS_DATA: &str = "Genesis Block";

/// `previous_hash` of a block that has not been linked (and of genesis).
pub const EMPTY_HASH: &str = "";
