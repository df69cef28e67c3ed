//! Walkthrough of the mining lifecycle.

use crate::display::print_chain;
use anyhow::{Context, Result};
use colored::Colorize;
use powchain_chain::{Blockchain, BlockchainConfig};

pub fn run(config: BlockchainConfig) -> Result<()> {
    let mut blockchain = Blockchain::new(config).context("Failed to initialize chain")?;
    print_chain(&blockchain)?;

    blockchain.add_transaction("A", "B", 1.0)?;

    for _ in 0..2 {
        println!("{}", "Mining block...".bold().cyan());
        blockchain.mine_block().context("Failed to mine block")?;
        print_chain(&blockchain)?;
    }

    Ok(())
}
