use log::{error, info};

use pow_ledger::config::{DEMO_BLOCKS_VAR, env_var};
use pow_ledger::{Blockchain, ChainConfig};

fn main() {
    env_logger::init();

    // Also loads `.env`.
    let config = match ChainConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(2);
        }
    };
    let blocks: u64 = match env_var(DEMO_BLOCKS_VAR) {
        Ok(value) => value.unwrap_or(3),
        Err(e) => {
            error!("{e}");
            std::process::exit(2);
        }
    };

    println!(
        "⛓️ Mining {blocks} blocks at difficulty {}",
        config.difficulty
    );

    let mut chain = match Blockchain::with_config(config) {
        Ok(chain) => chain,
        Err(e) => {
            error!("{e}");
            std::process::exit(2);
        }
    };

    for i in 1..=blocks {
        match chain.mine_block(format!("Block {i} Data")) {
            Ok(block) => info!("block #{} nonce={}", block.index(), block.nonce()),
            Err(e) => {
                error!("mining block {i} failed: {e}");
                std::process::exit(1);
            }
        }
    }

    println!("chain height: {}", chain.len());
}
