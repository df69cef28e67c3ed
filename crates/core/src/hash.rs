//! SHA-256 hashing utilities for the chain.

use sha2::{Digest, Sha256};
use std::fmt;

/// A named alias for a 32-byte(u8) array, used to represent a 256-bit digest.
pub type H256 = [u8; 32];

/// A wrapper type for H256 with Display and Debug formatting.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash(pub H256);

impl Hash {
    /// The zero hash (all zeros).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create a new Hash from raw bytes.
    pub fn from_bytes(bytes: H256) -> Self {
        Self(bytes)
    }

    /// Convert to a lowercase hex string (64 chars, no prefix).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Count the leading `'0'` characters of the hex rendering.
    pub fn leading_hex_zeros(&self) -> u32 {
        let mut zeros = 0;
        for byte in self.0 {
            if byte == 0 {
                zeros += 2;
                continue;
            }
            if byte >> 4 == 0 {
                zeros += 1;
            }
            break;
        }
        zeros
    }

    /// Whether the hex rendering starts with `difficulty` zeros.
    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        self.leading_hex_zeros() >= difficulty
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash(0x{})", &self.to_hex()[..8])
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

/// Hash arbitrary data using SHA-256.
pub fn sha256(data: &[u8]) -> Hash {
    Hash(Sha256::digest(data).into())
}
