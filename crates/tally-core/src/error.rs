//! Error taxonomy for ledger operations.
//!
//! Store-raised failures are re-mapped into this closed set before they reach
//! a caller; raw store error text never leaks through.

use rust_decimal::Decimal;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur in ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Balance lookup target has no record.
    #[error("user not found: {user_id}")]
    NotFound {
        /// The user ID that was not found.
        user_id: String,
    },

    /// Amount field failed numeric parsing.
    #[error("amount is not a number: {input:?}")]
    AmountNotANumber {
        /// The raw amount text as supplied by the caller.
        input: String,
    },

    /// Amount parsed but is zero or negative.
    #[error("amount must be greater than zero: {amount}")]
    AmountInvalid {
        /// The parsed amount.
        amount: Decimal,
    },

    /// Debit exceeds the available balance, or the user has no balance
    /// record to debit.
    #[error("insufficient funds: {user_id}")]
    InsufficientFunds {
        /// The user whose balance was insufficient.
        user_id: String,
    },

    /// Idempotency key already used by an earlier transaction.
    #[error("transaction already processed: {idempotency_key}")]
    DuplicateTransaction {
        /// The replayed idempotency key.
        idempotency_key: String,
    },

    /// Generic catch-all for any other failure while applying a transaction.
    #[error("transaction failed")]
    TransactionFailed,

    /// Generic catch-all for any other failure while reading a balance.
    #[error("request failed")]
    RequestFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_errors_carry_no_store_detail() {
        assert_eq!(LedgerError::TransactionFailed.to_string(), "transaction failed");
        assert_eq!(LedgerError::RequestFailed.to_string(), "request failed");
    }

    #[test]
    fn insufficient_funds_names_the_user() {
        let err = LedgerError::InsufficientFunds {
            user_id: "u4".into(),
        };
        assert_eq!(err.to_string(), "insufficient funds: u4");
    }
}
