//! Core ledger primitives for powchain.
//!
//! This crate provides the fundamental types used throughout the chain:
//! - SHA-256 hashing and difficulty checks
//! - Transactions
//! - Blocks
//! - The canonical byte encoding blocks are hashed over

pub mod block;
pub mod canonical;
pub mod hash;
pub mod transaction;

// Re-export commonly used types at the crate root
pub use block::Block;
pub use canonical::{canonical_block_bytes, SerializationError};
pub use hash::{sha256, Hash, H256};
pub use transaction::{Transaction, TransactionError};
