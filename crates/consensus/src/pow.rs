//! Proof-of-Work (PoW) nonce search.
//!
//! A nonce is valid when the hash of the candidate block built from it has
//! at least `difficulty` leading zero hex characters. The search walks nonces
//! upward from zero and always returns the smallest valid one, including when
//! the nonce space is split across worker threads.

use powchain_core::{Block, Hash, SerializationError, Transaction};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use thiserror::Error;
use tracing::{debug, info};

/// Default number of leading zero hex characters.
pub const DEFAULT_DIFFICULTY: u32 = 3;

/// A SHA-256 digest renders as 64 hex characters.
pub const MAX_DIFFICULTY: u32 = 64;

/// Errors that can occur during consensus operations.
#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("difficulty must be between 1 and 64, got {0}")]
    InvalidDifficulty(u32),

    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("no valid nonce below {limit}")]
    AttemptsExhausted { limit: u64 },

    #[error("mining worker panicked")]
    WorkerPanicked,

    #[error("serialization error: {0}")]
    Serialization(#[from] SerializationError),
}

pub type Result<T> = std::result::Result<T, ConsensusError>;

/// Proof-of-Work configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowConfig {
    /// Required leading zero hex characters.
    pub difficulty: u32,
    /// Exclusive upper bound on nonces to try (None searches forever).
    pub max_attempts: Option<u64>,
    /// Number of search threads. 1 keeps the search on the caller's thread.
    pub workers: usize,
}

impl Default for PowConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            max_attempts: None,
            workers: 1,
        }
    }
}

impl PowConfig {
    /// Create a single-threaded, unbounded configuration.
    pub fn with_difficulty(difficulty: u32) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.difficulty == 0 || self.difficulty > MAX_DIFFICULTY {
            return Err(ConsensusError::InvalidDifficulty(self.difficulty));
        }
        if self.workers == 0 {
            return Err(ConsensusError::NoWorkers);
        }
        Ok(())
    }
}

/// Everything in a candidate block except the nonce.
///
/// The timestamp is fixed when the template is built, so the block sealed
/// from a solution hashes to exactly the digest that passed the proof check.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockTemplate {
    pub timestamp: i64,
    pub previous_hash: Hash,
    pub transactions: Vec<Transaction>,
}

impl BlockTemplate {
    /// Create a template stamped with the current time.
    pub fn new(previous_hash: Hash, transactions: Vec<Transaction>) -> Self {
        Self::with_timestamp(Block::current_timestamp(), previous_hash, transactions)
    }

    /// Create a template with an explicit timestamp.
    pub fn with_timestamp(
        timestamp: i64,
        previous_hash: Hash,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            timestamp,
            previous_hash,
            transactions,
        }
    }

    /// Hash of the candidate block carrying `nonce`.
    pub fn candidate_hash(&self, nonce: u64) -> Result<Hash> {
        let bytes = powchain_core::canonical_block_bytes(
            self.timestamp,
            nonce,
            &self.previous_hash,
            &self.transactions,
        )?;
        Ok(powchain_core::sha256(&bytes))
    }

    /// Seal the template into a block.
    pub fn seal(self, nonce: u64) -> Block {
        Block::with_timestamp(self.timestamp, nonce, self.previous_hash, self.transactions)
    }
}

/// Check whether `nonce` solves `template` at `difficulty`.
pub fn is_valid_proof(template: &BlockTemplate, nonce: u64, difficulty: u32) -> Result<bool> {
    Ok(template.candidate_hash(nonce)?.meets_difficulty(difficulty))
}

/// A found nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    pub nonce: u64,
    pub hash: Hash,
    /// Candidate hashes computed across all workers.
    pub attempts: u64,
}

/// The nonce search engine.
#[derive(Debug, Clone)]
pub struct ProofOfWork {
    config: PowConfig,
}

impl ProofOfWork {
    /// Create an engine, rejecting unusable configurations.
    pub fn new(config: PowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PowConfig {
        &self.config
    }

    pub fn difficulty(&self) -> u32 {
        self.config.difficulty
    }

    /// Find the smallest nonce that solves `template`.
    ///
    /// Blocks until a nonce is found. Expect about 16^difficulty attempts.
    pub fn solve(&self, template: &BlockTemplate) -> Result<Solution> {
        debug!(
            difficulty = self.config.difficulty,
            workers = self.config.workers,
            transactions = template.transactions.len(),
            "starting nonce search"
        );

        let solution = if self.config.workers == 1 {
            self.solve_sequential(template)?
        } else {
            self.solve_parallel(template)?
        };

        info!(
            nonce = solution.nonce,
            attempts = solution.attempts,
            hash = %solution.hash,
            "found valid nonce"
        );
        Ok(solution)
    }

    /// Solve `template` and seal the result.
    pub fn mine(&self, template: BlockTemplate) -> Result<(Block, Solution)> {
        let solution = self.solve(&template)?;
        Ok((template.seal(solution.nonce), solution))
    }

    fn limit(&self) -> u64 {
        self.config.max_attempts.unwrap_or(u64::MAX)
    }

    fn solve_sequential(&self, template: &BlockTemplate) -> Result<Solution> {
        let limit = self.limit();
        let mut nonce = 0u64;

        while nonce < limit {
            let hash = template.candidate_hash(nonce)?;
            if hash.meets_difficulty(self.config.difficulty) {
                return Ok(Solution {
                    nonce,
                    hash,
                    attempts: nonce + 1,
                });
            }
            nonce += 1;
        }

        Err(ConsensusError::AttemptsExhausted { limit })
    }

    fn solve_parallel(&self, template: &BlockTemplate) -> Result<Solution> {
        let stride = self.config.workers as u64;
        let best = AtomicU64::new(u64::MAX);
        let attempts = AtomicU64::new(0);

        let results: Vec<Result<Option<(u64, Hash)>>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..stride)
                .map(|offset| {
                    let (best, attempts) = (&best, &attempts);
                    scope.spawn(move || {
                        self.search_stride(template, offset, stride, best, attempts)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or(Err(ConsensusError::WorkerPanicked)))
                .collect()
        });

        let mut found: Option<(u64, Hash)> = None;
        for result in results {
            if let Some((nonce, hash)) = result? {
                if found.map_or(true, |(best, _)| nonce < best) {
                    found = Some((nonce, hash));
                }
            }
        }

        let (nonce, hash) = found.ok_or(ConsensusError::AttemptsExhausted {
            limit: self.limit(),
        })?;
        Ok(Solution {
            nonce,
            hash,
            attempts: attempts.into_inner(),
        })
    }

    /// Try `offset, offset + stride, ...` until this worker finds a solution
    /// or passes the best nonce any worker has found so far.
    fn search_stride(
        &self,
        template: &BlockTemplate,
        offset: u64,
        stride: u64,
        best: &AtomicU64,
        attempts: &AtomicU64,
    ) -> Result<Option<(u64, Hash)>> {
        let limit = self.limit();
        let mut nonce = offset;
        let mut tries = 0u64;
        let mut found = None;

        while nonce < limit && nonce < best.load(Ordering::Acquire) {
            tries += 1;

            let hash = template.candidate_hash(nonce)?;

            if hash.meets_difficulty(self.config.difficulty) {
                best.fetch_min(nonce, Ordering::AcqRel);
                found = Some((nonce, hash));
                break;
            }

            nonce = match nonce.checked_add(stride) {
                Some(next) => next,
                None => break,
            };
        }

        attempts.fetch_add(tries, Ordering::Relaxed);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> BlockTemplate {
        let txs = vec![Transaction::new("A", "B", 1.0).unwrap()];
        BlockTemplate::with_timestamp(1_000, Hash::from_bytes([9u8; 32]), txs)
    }

    fn brute_force_min(template: &BlockTemplate, difficulty: u32) -> u64 {
        (0u64..)
            .find(|&n| is_valid_proof(template, n, difficulty).unwrap())
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = PowConfig::default();
        assert_eq!(config.difficulty, 3);
        assert_eq!(config.workers, 1);
        assert_eq!(config.max_attempts, None);
    }

    #[test]
    fn test_invalid_difficulty_rejected() {
        assert!(matches!(
            ProofOfWork::new(PowConfig::with_difficulty(0)),
            Err(ConsensusError::InvalidDifficulty(0))
        ));
        assert!(matches!(
            ProofOfWork::new(PowConfig::with_difficulty(65)),
            Err(ConsensusError::InvalidDifficulty(65))
        ));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = PowConfig {
            workers: 0,
            ..PowConfig::default()
        };
        assert!(matches!(ProofOfWork::new(config), Err(ConsensusError::NoWorkers)));
    }

    #[test]
    fn test_solution_is_valid_and_minimal() {
        let template = template();
        let pow = ProofOfWork::new(PowConfig::with_difficulty(3)).unwrap();
        let solution = pow.solve(&template).unwrap();

        assert!(solution.hash.to_hex().starts_with("000"));
        assert!(is_valid_proof(&template, solution.nonce, 3).unwrap());
        assert_eq!(solution.attempts, solution.nonce + 1);
        for nonce in 0..solution.nonce {
            assert!(!is_valid_proof(&template, nonce, 3).unwrap());
        }
    }

    #[test]
    fn test_sealed_block_hash_matches_solution() {
        let pow = ProofOfWork::new(PowConfig::with_difficulty(2)).unwrap();
        let (block, solution) = pow.mine(template()).unwrap();

        assert_eq!(block.nonce(), solution.nonce);
        assert_eq!(block.timestamp(), 1_000);
        assert_eq!(block.hash().unwrap(), solution.hash);
    }

    #[test]
    fn test_empty_transaction_list() {
        let template = BlockTemplate::with_timestamp(5, Hash::ZERO, vec![]);
        let pow = ProofOfWork::new(PowConfig::with_difficulty(3)).unwrap();
        let solution = pow.solve(&template).unwrap();
        assert!(solution.hash.meets_difficulty(3));
    }

    #[test]
    fn test_parallel_search_finds_smallest_nonce() {
        let template = template();
        let expected = brute_force_min(&template, 3);

        for workers in [2, 3, 4, 7] {
            let config = PowConfig {
                difficulty: 3,
                max_attempts: None,
                workers,
            };
            let solution = ProofOfWork::new(config).unwrap().solve(&template).unwrap();
            assert_eq!(solution.nonce, expected, "workers = {}", workers);
            assert!(solution.attempts >= 1);
        }
    }

    #[test]
    fn test_attempt_limit() {
        let template = template();
        let expected = brute_force_min(&template, 3);
        let config = PowConfig {
            difficulty: 3,
            max_attempts: Some(expected),
            workers: 1,
        };
        let result = ProofOfWork::new(config.clone()).unwrap().solve(&template);
        assert!(matches!(
            result,
            Err(ConsensusError::AttemptsExhausted { limit }) if limit == expected
        ));

        let parallel = PowConfig { workers: 4, ..config };
        assert!(matches!(
            ProofOfWork::new(parallel).unwrap().solve(&template),
            Err(ConsensusError::AttemptsExhausted { .. })
        ));
    }

    #[test]
    fn test_proof_depends_on_template() {
        let template = template();
        let pow = ProofOfWork::new(PowConfig::with_difficulty(3)).unwrap();
        let solution = pow.solve(&template).unwrap();

        let mut other = template.clone();
        other.previous_hash = Hash::ZERO;
        assert_ne!(
            other.candidate_hash(solution.nonce).unwrap(),
            template.candidate_hash(solution.nonce).unwrap()
        );
    }
}
