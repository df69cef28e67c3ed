//! Mine blocks from command-line transactions.

use crate::display::{chain_json, print_chain};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use powchain_chain::{Blockchain, BlockchainConfig};

#[derive(Args)]
pub struct MineArgs {
    /// Transaction to include in the first block, as sender:recipient:amount
    #[arg(short, long = "tx", value_parser = parse_transaction)]
    transactions: Vec<(String, String, f64)>,

    /// Number of blocks to mine
    #[arg(short, long, default_value = "1")]
    blocks: usize,

    /// Print the chain as JSON
    #[arg(long)]
    json: bool,
}

fn parse_transaction(s: &str) -> std::result::Result<(String, String, f64), String> {
    let mut parts = s.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(sender), Some(recipient), Some(amount)) => {
            let amount = amount
                .parse::<f64>()
                .map_err(|e| format!("invalid amount '{}': {}", amount, e))?;
            Ok((sender.to_string(), recipient.to_string(), amount))
        }
        _ => Err(format!("expected sender:recipient:amount, got '{}'", s)),
    }
}

pub fn run(args: MineArgs, config: BlockchainConfig) -> Result<()> {
    let mut blockchain = Blockchain::new(config).context("Failed to initialize chain")?;

    for (sender, recipient, amount) in args.transactions {
        blockchain
            .add_transaction(sender.as_str(), recipient.as_str(), amount)
            .with_context(|| format!("Rejected transaction {} -> {}", sender, recipient))?;
    }

    for i in 0..args.blocks {
        if !args.json {
            println!("{}", format!("Mining block {}...", i + 1).bold().cyan());
        }
        let block = blockchain.mine_block().context("Failed to mine block")?;
        if !args.json {
            println!(
                "{}  nonce {}",
                "✓".green().bold(),
                block.nonce().to_string().bright_cyan()
            );
        }
    }

    blockchain.validate().context("Mined chain failed validation")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&chain_json(&blockchain)?)?);
    } else {
        println!();
        print_chain(&blockchain)?;
    }

    Ok(())
}
