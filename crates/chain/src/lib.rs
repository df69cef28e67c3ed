//! Chain manager for powchain.
//!
//! This crate ties the pieces together into a single-node ledger:
//! - **Pool**: ordered staging area for pending transactions
//! - **Blockchain**: the sealed chain, block creation and mining
//!
//! # Example
//!
//! ```rust
//! use powchain_chain::{Blockchain, BlockchainConfig};
//!
//! let mut blockchain = Blockchain::new(BlockchainConfig::with_difficulty(2)).unwrap();
//!
//! blockchain.add_transaction("A", "B", 1.0).unwrap();
//! let block = blockchain.mine_block().unwrap();
//! assert!(block.hash().unwrap().to_hex().starts_with("00"));
//!
//! assert_eq!(blockchain.height(), 1);
//! assert!(blockchain.validate().is_ok());
//! ```

pub mod blockchain;
pub mod pool;

// Re-export commonly used types
pub use blockchain::{Blockchain, BlockchainConfig, BlockchainError, BlockchainStats};
pub use pool::{PoolConfig, PoolError, TransactionPool};
