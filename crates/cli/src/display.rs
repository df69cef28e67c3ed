//! Human and JSON renderings of the chain.
//!
//! Output here is for reading only and is never hashed.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use colored::Colorize;
use powchain_chain::Blockchain;
use powchain_core::Block;
use serde_json::{json, Value};

fn format_timestamp(nanos: i64) -> String {
    Utc.timestamp_nanos(nanos).to_rfc3339()
}

fn print_block(block: &Block) -> Result<()> {
    println!("  Timestamp:     {}", format_timestamp(block.timestamp()).bright_black());
    println!("  Nonce:         {}", block.nonce().to_string().bright_cyan());
    println!(
        "  Previous Hash: {}",
        block.previous_hash().to_hex().bright_black()
    );
    println!("  Hash:          {}", block.hash()?.to_hex().bright_yellow());

    for tx in block.transactions() {
        println!("  {}", "-".repeat(40));
        println!("   sender     {}", tx.sender());
        println!("   recipient  {}", tx.recipient());
        println!("   value      {:.1}", tx.amount());
    }
    Ok(())
}

/// Print every sealed block, genesis first.
pub fn print_chain(blockchain: &Blockchain) -> Result<()> {
    for (height, block) in blockchain.blocks().iter().enumerate() {
        let banner = "=".repeat(25);
        println!("{} {} {}", banner, format!("Chain {}", height).bold(), banner);
        print_block(block)?;
    }
    println!("{}", "*".repeat(25));
    Ok(())
}

/// JSON view of the chain.
pub fn chain_json(blockchain: &Blockchain) -> Result<Value> {
    let blocks = blockchain
        .blocks()
        .iter()
        .enumerate()
        .map(|(height, block)| -> Result<Value> {
            Ok(json!({
                "height": height,
                "timestamp": block.timestamp(),
                "nonce": block.nonce(),
                "previous_hash": block.previous_hash().to_hex(),
                "hash": block.hash()?.to_hex(),
                "transactions": block.transactions(),
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(json!({
        "difficulty": blockchain.difficulty(),
        "blocks": blocks,
    }))
}
