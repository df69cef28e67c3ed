//! Canonical block encoding.
//!
//! A block is hashed over a compact JSON object whose keys always appear in
//! the order `timestamp`, `nonce`, `previous_hash`, `transactions`, with each
//! transaction encoded as `sender`, `recipient`, `value`. The previous hash is
//! rendered as 64 lowercase hex characters. Field order comes from the wire
//! structs below, never from a map, so equal field values always produce
//! equal bytes.

use crate::hash::Hash;
use crate::transaction::Transaction;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while producing canonical bytes.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SerializationError>;

#[derive(Serialize)]
struct WireBlock<'a> {
    timestamp: i64,
    nonce: u64,
    previous_hash: String,
    transactions: Vec<WireTransaction<'a>>,
}

#[derive(Serialize)]
struct WireTransaction<'a> {
    sender: &'a str,
    recipient: &'a str,
    value: f64,
}

/// Encode block fields into their canonical byte form.
pub fn canonical_block_bytes(
    timestamp: i64,
    nonce: u64,
    previous_hash: &Hash,
    transactions: &[Transaction],
) -> Result<Vec<u8>> {
    // Amounts are finite by construction, so serde_json never writes `null`
    let transactions = transactions
        .iter()
        .map(|tx| WireTransaction {
            sender: tx.sender(),
            recipient: tx.recipient(),
            value: tx.amount(),
        })
        .collect();

    let wire = WireBlock {
        timestamp,
        nonce,
        previous_hash: previous_hash.to_hex(),
        transactions,
    };

    Ok(serde_json::to_vec(&wire)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_block_encoding() {
        let bytes = canonical_block_bytes(0, 0, &Hash::ZERO, &[]).unwrap();
        let expected = format!(
            r#"{{"timestamp":0,"nonce":0,"previous_hash":"{}","transactions":[]}}"#,
            "0".repeat(64)
        );
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn test_transaction_field_order() {
        let tx = Transaction::new("A", "B", 1.0).unwrap();
        let prev = Hash::from_bytes([0xab; 32]);
        let bytes = canonical_block_bytes(1_700_000_000_000_000_000, 5, &prev, &[tx]).unwrap();

        let expected = format!(
            concat!(
                r#"{{"timestamp":1700000000000000000,"nonce":5,"previous_hash":"{}","#,
                r#""transactions":[{{"sender":"A","recipient":"B","value":1.0}}]}}"#
            ),
            "ab".repeat(32)
        );
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let txs = vec![
            Transaction::new("A", "B", 1.5).unwrap(),
            Transaction::new("C", "D", 0.1).unwrap(),
        ];
        let prev = Hash::from_bytes([7u8; 32]);

        let a = canonical_block_bytes(42, 9, &prev, &txs).unwrap();
        let b = canonical_block_bytes(42, 9, &prev, &txs.clone()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_transaction_order_matters() {
        let tx1 = Transaction::new("A", "B", 1.0).unwrap();
        let tx2 = Transaction::new("B", "A", 1.0).unwrap();

        let forward =
            canonical_block_bytes(0, 0, &Hash::ZERO, &[tx1.clone(), tx2.clone()]).unwrap();
        let reverse = canonical_block_bytes(0, 0, &Hash::ZERO, &[tx2, tx1]).unwrap();
        assert_ne!(forward, reverse);
    }

    #[test]
    fn test_extreme_amounts_encode_as_numbers() {
        let txs = vec![
            Transaction::new("A", "B", f64::MAX).unwrap(),
            Transaction::new("A", "B", 1e-300).unwrap(),
            Transaction::new("A", "B", -0.5).unwrap(),
        ];
        let bytes = canonical_block_bytes(0, 0, &Hash::ZERO, &txs).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(!text.contains("null"));
        assert!(text.contains(r#""value":-0.5"#));
    }

    #[test]
    fn test_strings_are_escaped() {
        let tx = Transaction::new("a\"b", "c", 2.0).unwrap();
        let bytes = canonical_block_bytes(0, 0, &Hash::ZERO, &[tx]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains(r#""sender":"a\"b""#));
    }
}
