//! Transaction pool for pending transactions.
//!
//! The pool keeps transactions in submission order until they are committed
//! into a block. Readers only ever get value copies.

use powchain_core::Transaction;
use thiserror::Error;

/// Errors that can occur during pool operations.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("transaction pool is full (capacity: {0})")]
    PoolFull(usize),
}

pub type Result<T> = std::result::Result<T, PoolError>;

/// Configuration for the transaction pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of pending transactions (None is unbounded).
    pub max_transactions: Option<usize>,
}

/// Ordered pool of pending transactions.
#[derive(Debug, Default)]
pub struct TransactionPool {
    config: PoolConfig,
    transactions: Vec<Transaction>,
}

impl TransactionPool {
    /// Create a new pool with default configuration.
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Create a new pool with the given configuration.
    pub fn with_config(config: PoolConfig) -> Self {
        Self {
            config,
            transactions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Append a transaction.
    pub fn push(&mut self, tx: Transaction) -> Result<()> {
        if let Some(max) = self.config.max_transactions {
            if self.transactions.len() >= max {
                return Err(PoolError::PoolFull(max));
            }
        }
        self.transactions.push(tx);
        Ok(())
    }

    /// Independent copy of the pending transactions.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    /// Empty the pool, returning what it held.
    pub fn take_all(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.transactions)
    }

    /// Drop the first `count` transactions, keeping anything submitted after
    /// a snapshot of that length was taken.
    pub fn remove_committed(&mut self, count: usize) {
        let count = count.min(self.transactions.len());
        self.transactions.drain(..count);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }
}
