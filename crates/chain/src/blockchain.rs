//! Main chain manager.
//!
//! Owns the sealed blocks and the transaction pool, and drives the nonce
//! search when a new block is requested.

use crate::pool::{PoolConfig, TransactionPool};
use powchain_consensus::{BlockTemplate, BlockValidator, PowConfig, ProofOfWork};
use powchain_core::{Block, Hash, Transaction};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    #[error("transaction error: {0}")]
    Transaction(#[from] powchain_core::TransactionError),

    #[error("serialization error: {0}")]
    Serialization(#[from] powchain_core::SerializationError),

    #[error("consensus error: {0}")]
    Consensus(#[from] powchain_consensus::ConsensusError),

    #[error("validation error: {0}")]
    Validation(#[from] powchain_consensus::ValidationError),

    #[error("pool error: {0}")]
    Pool(#[from] crate::pool::PoolError),

    #[error("invariant violated: chain has no blocks")]
    EmptyChain,
}

pub type Result<T> = std::result::Result<T, BlockchainError>;

/// Blockchain configuration.
#[derive(Debug, Clone, Default)]
pub struct BlockchainConfig {
    /// Proof-of-work configuration.
    pub pow: PowConfig,
    /// Transaction pool configuration.
    pub pool: PoolConfig,
}

impl BlockchainConfig {
    /// Default configuration with the given difficulty.
    pub fn with_difficulty(difficulty: u32) -> Self {
        Self {
            pow: PowConfig::with_difficulty(difficulty),
            pool: PoolConfig::default(),
        }
    }
}

/// The chain and its pending transactions.
#[derive(Debug)]
pub struct Blockchain {
    /// Sealed blocks, genesis first. Never empty.
    chain: Vec<Block>,
    /// Difficulty each block was sealed at, indexed like `chain`.
    difficulties: Vec<u32>,
    /// Transactions waiting for the next block.
    pool: TransactionPool,
    /// Nonce search engine.
    pow: ProofOfWork,
}

impl Blockchain {
    /// Create a chain holding only the genesis block.
    pub fn new(config: BlockchainConfig) -> Result<Self> {
        let pow = ProofOfWork::new(config.pow)?;
        let mut blockchain = Self {
            chain: Vec::new(),
            difficulties: Vec::new(),
            pool: TransactionPool::with_config(config.pool),
            pow,
        };

        let genesis_prev = Block::genesis_previous_hash()?;
        blockchain.create_block(0, genesis_prev)?;

        Ok(blockchain)
    }

    /// Submit a transaction to the pool.
    pub fn add_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: f64,
    ) -> Result<()> {
        let tx = Transaction::new(sender, recipient, amount)?;
        debug!(tx = %tx, "transaction added to pool");
        self.pool.push(tx)?;
        Ok(())
    }

    /// Value copy of the pending transactions.
    pub fn copy_transaction_pool(&self) -> Vec<Transaction> {
        self.pool.snapshot()
    }

    /// Get the most recently sealed block.
    pub fn last_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(BlockchainError::EmptyChain)
    }

    /// Hash of the most recently sealed block.
    pub fn last_block_hash(&self) -> Result<Hash> {
        Ok(self.last_block()?.hash()?)
    }

    /// Seal the live pool into a block with the given nonce and append it.
    ///
    /// No proof check is made, use [`Blockchain::mine_block`] for that. The
    /// block is still held to the configured difficulty by [`Blockchain::validate`].
    pub fn create_block(&mut self, nonce: u64, previous_hash: Hash) -> Result<&Block> {
        let block = Block::new(nonce, previous_hash, self.pool.snapshot());
        self.append(block, self.pow.difficulty())?;
        self.pool.take_all();
        self.last_block()
    }

    /// Mine a block at the configured difficulty.
    pub fn mine_block(&mut self) -> Result<&Block> {
        let pow = self.pow.clone();
        self.mine_with(&pow)
    }

    /// Mine a block at an explicit difficulty.
    pub fn mine_block_with_difficulty(&mut self, difficulty: u32) -> Result<&Block> {
        let pow = ProofOfWork::new(PowConfig {
            difficulty,
            ..self.pow.config().clone()
        })?;
        self.mine_with(&pow)
    }

    /// Snapshot the pool, search for a nonce and seal exactly that snapshot.
    ///
    /// Only the snapshot's transactions leave the pool.
    fn mine_with(&mut self, pow: &ProofOfWork) -> Result<&Block> {
        let snapshot = self.copy_transaction_pool();
        let committed = snapshot.len();
        let template = BlockTemplate::new(self.last_block_hash()?, snapshot);

        let (block, _solution) = pow.mine(template)?;
        self.append(block, pow.difficulty())?;
        self.pool.remove_committed(committed);

        self.last_block()
    }

    fn append(&mut self, block: Block, difficulty: u32) -> Result<()> {
        let hash = block.hash()?;
        info!(
            height = self.chain.len(),
            nonce = block.nonce(),
            difficulty,
            transactions = block.tx_count(),
            hash = %hash,
            "block appended"
        );
        self.chain.push(block);
        self.difficulties.push(difficulty);
        Ok(())
    }

    /// All sealed blocks, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    /// Height of the last block (genesis is 0).
    pub fn height(&self) -> u64 {
        self.chain.len().saturating_sub(1) as u64
    }

    /// Pending transactions, in submission order.
    pub fn pending(&self) -> impl Iterator<Item = &Transaction> {
        self.pool.iter()
    }

    pub fn difficulty(&self) -> u32 {
        self.pow.difficulty()
    }

    /// Difficulty the block at `height` was sealed at.
    pub fn difficulty_at(&self, height: u64) -> Option<u32> {
        let index = usize::try_from(height).ok()?;
        self.difficulties.get(index).copied()
    }

    /// Re-check every link, and every proof at the difficulty its block was
    /// sealed at.
    pub fn validate(&self) -> Result<()> {
        BlockValidator::validate_chain_with(&self.chain, &self.difficulties)?;
        Ok(())
    }

    /// Get blockchain statistics.
    pub fn stats(&self) -> Result<BlockchainStats> {
        Ok(BlockchainStats {
            height: self.height(),
            latest_block_hash: self.last_block_hash()?,
            pending_transactions: self.pool.len(),
            difficulty: self.pow.difficulty(),
        })
    }
}

/// Blockchain statistics.
#[derive(Debug, Clone)]
pub struct BlockchainStats {
    /// Current chain height.
    pub height: u64,
    /// Hash of the latest block.
    pub latest_block_hash: Hash,
    /// Number of pending transactions.
    pub pending_transactions: usize,
    /// Configured difficulty.
    pub difficulty: u32,
}
