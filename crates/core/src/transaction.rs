//! Transaction type.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while building a transaction.
#[derive(Debug, Error, PartialEq)]
pub enum TransactionError {
    #[error("amount must be a finite number, got {0}")]
    NonFiniteAmount(f64),
}

/// A value transfer between two addresses.
///
/// Fields are private so a transaction cannot change once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    sender: String,
    recipient: String,
    amount: f64,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Non-finite amounts are rejected because the canonical encoding has
    /// no representation for them.
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: f64,
    ) -> Result<Self, TransactionError> {
        if !amount.is_finite() {
            return Err(TransactionError::NonFiniteAmount(amount));
        }
        Ok(Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        })
    }

    /// Sender's address.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Recipient's address.
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Amount transferred.
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({:.1})", self.sender, self.recipient, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction() {
        let tx = Transaction::new("A", "B", 1.0).unwrap();
        assert_eq!(tx.sender(), "A");
        assert_eq!(tx.recipient(), "B");
        assert_eq!(tx.amount(), 1.0);
    }

    #[test]
    fn test_structural_equality() {
        let tx1 = Transaction::new("A", "B", 2.5).unwrap();
        let tx2 = Transaction::new(String::from("A"), "B", 2.5).unwrap();
        let tx3 = Transaction::new("A", "C", 2.5).unwrap();

        assert_eq!(tx1, tx2);
        assert_ne!(tx1, tx3);
    }

    #[test]
    fn test_non_finite_amount_rejected() {
        assert!(matches!(
            Transaction::new("A", "B", f64::NAN),
            Err(TransactionError::NonFiniteAmount(_))
        ));
        assert_eq!(
            Transaction::new("A", "B", f64::INFINITY),
            Err(TransactionError::NonFiniteAmount(f64::INFINITY))
        );
    }

    #[test]
    fn test_display_one_decimal_place() {
        let tx = Transaction::new("alice", "bob", 3.0).unwrap();
        assert_eq!(tx.to_string(), "alice -> bob (3.0)");
    }
}
