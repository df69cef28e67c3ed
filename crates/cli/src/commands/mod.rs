//! CLI commands module.

use anyhow::Result;
use clap::{Args, Subcommand};
use powchain_chain::BlockchainConfig;
use powchain_consensus::{PowConfig, DEFAULT_DIFFICULTY};

mod demo;
mod mine;

/// Mining options shared by every command.
#[derive(Args)]
pub struct ChainArgs {
    /// Required leading zero hex characters in a block hash
    #[arg(short, long, global = true, default_value_t = DEFAULT_DIFFICULTY)]
    difficulty: u32,

    /// Number of threads searching for a nonce
    #[arg(short, long, global = true, default_value = "1")]
    workers: usize,

    /// Give up after trying this many nonces
    #[arg(long, global = true)]
    max_attempts: Option<u64>,
}

impl ChainArgs {
    fn config(&self) -> BlockchainConfig {
        BlockchainConfig {
            pow: PowConfig {
                difficulty: self.difficulty,
                max_attempts: self.max_attempts,
                workers: self.workers,
            },
            ..BlockchainConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a genesis block, add one transaction and mine two blocks
    Demo,
    /// Mine blocks from transactions given on the command line
    Mine(mine::MineArgs),
}

pub fn run(cmd: Commands, chain: &ChainArgs) -> Result<()> {
    let config = chain.config();
    match cmd {
        Commands::Demo => demo::run(config),
        Commands::Mine(args) => mine::run(args, config),
    }
}
