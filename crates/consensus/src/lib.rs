//! Proof-of-work consensus for powchain.
//!
//! This crate provides:
//! - The nonce search that seals new blocks (sequential or stride-partitioned
//!   across worker threads)
//! - The proof predicate shared by the search and by verification
//! - Chain validation (parent links, proofs, genesis)
//!
//! # Example
//!
//! ```rust
//! use powchain_consensus::{is_valid_proof, BlockTemplate, PowConfig, ProofOfWork};
//! use powchain_core::{Hash, Transaction};
//!
//! let txs = vec![Transaction::new("A", "B", 1.0).unwrap()];
//! let template = BlockTemplate::new(Hash::ZERO, txs);
//!
//! let pow = ProofOfWork::new(PowConfig::with_difficulty(2)).unwrap();
//! let solution = pow.solve(&template).unwrap();
//!
//! assert!(is_valid_proof(&template, solution.nonce, 2).unwrap());
//! ```

pub mod pow;
pub mod validator;

// Re-export commonly used types
pub use pow::{
    is_valid_proof, BlockTemplate, ConsensusError, PowConfig, ProofOfWork, Solution,
    DEFAULT_DIFFICULTY, MAX_DIFFICULTY,
};
pub use validator::{BlockValidator, ValidationError};
