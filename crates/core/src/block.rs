//! Block structure.

use crate::canonical::{canonical_block_bytes, SerializationError};
use crate::hash::{sha256, Hash};
use crate::transaction::Transaction;
use std::time::{SystemTime, UNIX_EPOCH};

/// A sealed block: a batch of transactions linked to its parent by hash.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// Nanoseconds since the Unix epoch.
    timestamp: i64,
    /// Proof-of-work nonce.
    nonce: u64,
    /// Hash of the previous block.
    previous_hash: Hash,
    /// Transactions in submission order.
    transactions: Vec<Transaction>,
}

impl Block {
    /// Create a new block stamped with the current time.
    pub fn new(nonce: u64, previous_hash: Hash, transactions: Vec<Transaction>) -> Self {
        Self::with_timestamp(Self::current_timestamp(), nonce, previous_hash, transactions)
    }

    /// Create a block with an explicit timestamp.
    pub fn with_timestamp(
        timestamp: i64,
        nonce: u64,
        previous_hash: Hash,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            timestamp,
            nonce,
            previous_hash,
            transactions,
        }
    }

    /// The empty block whose hash the genesis block points at.
    pub fn sentinel() -> Self {
        Self::default()
    }

    /// Previous hash used by every genesis block.
    pub fn genesis_previous_hash() -> Result<Hash, SerializationError> {
        Self::sentinel().hash()
    }

    /// Get the current time in nanoseconds since the Unix epoch.
    pub fn current_timestamp() -> i64 {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        i64::try_from(nanos).unwrap_or(i64::MAX)
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn previous_hash(&self) -> &Hash {
        &self.previous_hash
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Get the number of transactions in this block.
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }

    /// Check if this block is shaped like a genesis block.
    pub fn is_genesis(&self) -> bool {
        self.nonce == 0
            && self.transactions.is_empty()
            && Self::genesis_previous_hash().is_ok_and(|h| h == self.previous_hash)
    }

    /// Canonical bytes this block is hashed over.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        canonical_block_bytes(
            self.timestamp,
            self.nonce,
            &self.previous_hash,
            &self.transactions,
        )
    }

    /// SHA-256 of the canonical bytes.
    pub fn hash(&self) -> Result<Hash, SerializationError> {
        Ok(sha256(&self.canonical_bytes()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block(nonce: u64) -> Block {
        let txs = vec![
            Transaction::new("A", "B", 1.0).unwrap(),
            Transaction::new("B", "C", 0.5).unwrap(),
        ];
        Block::with_timestamp(1_000, nonce, Hash::from_bytes([3u8; 32]), txs)
    }

    #[test]
    fn test_new_block_stamps_time() {
        let before = Block::current_timestamp();
        let block = Block::new(0, Hash::ZERO, vec![]);
        let after = Block::current_timestamp();

        assert!(block.timestamp() >= before);
        assert!(block.timestamp() <= after);
    }

    #[test]
    fn test_sentinel_hash_is_fixed() {
        let h1 = Block::genesis_previous_hash().unwrap();
        let h2 = Block::sentinel().hash().unwrap();
        assert_eq!(h1, h2);
        assert_ne!(h1, Hash::ZERO);
    }

    #[test]
    fn test_block_hash_deterministic() {
        let a = sample_block(7);
        let b = sample_block(7);

        assert_eq!(a.canonical_bytes().unwrap(), b.canonical_bytes().unwrap());
        assert_eq!(a.hash().unwrap(), b.hash().unwrap());
        assert_eq!(a.hash().unwrap(), a.hash().unwrap());
    }

    #[test]
    fn test_hash_sensitive_to_every_field() {
        let base = sample_block(7);
        let base_hash = base.hash().unwrap();
        let prev = *base.previous_hash();
        let txs = base.transactions().to_vec();

        let variants = vec![
            Block::with_timestamp(1_001, 7, prev, txs.clone()),
            Block::with_timestamp(1_000, 8, prev, txs.clone()),
            Block::with_timestamp(1_000, 7, Hash::ZERO, txs.clone()),
            Block::with_timestamp(
                1_000,
                7,
                prev,
                vec![Transaction::new("X", "B", 1.0).unwrap(), txs[1].clone()],
            ),
            Block::with_timestamp(
                1_000,
                7,
                prev,
                vec![Transaction::new("A", "X", 1.0).unwrap(), txs[1].clone()],
            ),
            Block::with_timestamp(
                1_000,
                7,
                prev,
                vec![Transaction::new("A", "B", 1.1).unwrap(), txs[1].clone()],
            ),
        ];

        let mut seen = std::collections::HashSet::new();
        seen.insert(base_hash);
        for block in variants {
            assert!(seen.insert(block.hash().unwrap()));
        }
    }

    #[test]
    fn test_genesis_shape() {
        let genesis = Block::new(0, Block::genesis_previous_hash().unwrap(), vec![]);
        assert!(genesis.is_genesis());
        assert!(!sample_block(0).is_genesis());
    }
}
