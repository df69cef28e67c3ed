//! Block and chain validation rules.
//!
//! Re-checks sealed blocks without searching: every link must point at the
//! parent's hash and every mined block must meet the difficulty.

use powchain_core::{Block, Hash, SerializationError};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("chain has no blocks")]
    EmptyChain,

    #[error("genesis block must have nonce 0 and the sentinel previous hash")]
    InvalidGenesis,

    #[error("block previous_hash mismatch (expected {expected}, got {got})")]
    InvalidPrevHash { expected: Hash, got: Hash },

    #[error("block hash {hash} does not meet difficulty {difficulty}")]
    InsufficientWork { hash: Hash, difficulty: u32 },

    #[error("got {difficulties} difficulties for {blocks} blocks")]
    DifficultyCountMismatch { blocks: usize, difficulties: usize },

    #[error("serialization error: {0}")]
    Serialization(#[from] SerializationError),
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Block validator.
pub struct BlockValidator;

impl BlockValidator {
    /// Validate that `block` points at `parent`.
    pub fn validate_link(block: &Block, parent: &Block) -> Result<()> {
        let expected = parent.hash()?;
        if *block.previous_hash() != expected {
            return Err(ValidationError::InvalidPrevHash {
                expected,
                got: *block.previous_hash(),
            });
        }
        Ok(())
    }

    /// Validate the block's own hash meets `difficulty`.
    pub fn validate_proof(block: &Block, difficulty: u32) -> Result<()> {
        let hash = block.hash()?;
        if !hash.meets_difficulty(difficulty) {
            return Err(ValidationError::InsufficientWork { hash, difficulty });
        }
        Ok(())
    }

    /// Validate the genesis block.
    pub fn validate_genesis(block: &Block) -> Result<()> {
        if block.nonce() != 0 || *block.previous_hash() != Block::genesis_previous_hash()? {
            return Err(ValidationError::InvalidGenesis);
        }
        Ok(())
    }

    /// Validate a whole chain mined at a single difficulty, genesis first.
    ///
    /// The genesis block is exempt from the difficulty check.
    pub fn validate_chain(blocks: &[Block], difficulty: u32) -> Result<()> {
        let difficulties = vec![difficulty; blocks.len()];
        Self::validate_chain_with(blocks, &difficulties)
    }

    /// Validate a whole chain where `difficulties[h]` is the difficulty the
    /// block at height `h` was mined at. The genesis entry is ignored.
    pub fn validate_chain_with(blocks: &[Block], difficulties: &[u32]) -> Result<()> {
        if blocks.len() != difficulties.len() {
            return Err(ValidationError::DifficultyCountMismatch {
                blocks: blocks.len(),
                difficulties: difficulties.len(),
            });
        }
        let genesis = blocks.first().ok_or(ValidationError::EmptyChain)?;
        Self::validate_genesis(genesis)?;

        for (height, pair) in blocks.windows(2).enumerate() {
            let (parent, block) = (&pair[0], &pair[1]);
            let difficulty = difficulties[height + 1];
            let checked = Self::validate_link(block, parent)
                .and_then(|_| Self::validate_proof(block, difficulty));
            if let Err(e) = checked {
                warn!(height = height + 1, error = %e, "chain validation failed");
                return Err(e);
            }
        }

        Ok(())
    }
}
