//! Record and request types for the balance ledger.
//!
//! Two logical tables exist: balance records keyed by user ID, and the
//! write-once transaction ledger keyed by idempotency key.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Logical default applied when a balance record exists but carries no
/// balance attribute (absent or null).
pub const DEFAULT_BALANCE: Decimal = Decimal::ONE_HUNDRED;

/// Name of the balance attribute inside a balance record document.
pub const BALANCE_ATTRIBUTE: &str = "balance";

/// A user's balance record.
///
/// Created implicitly by the first successful credit for a user, mutated only
/// through the transaction executor, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// The user ID (primary key).
    pub id: String,

    /// Current balance. `None` covers both an absent and a null attribute;
    /// readers substitute [`DEFAULT_BALANCE`]. Once written, never negative.
    #[serde(default)]
    pub balance: Option<Decimal>,
}

impl BalanceRecord {
    /// The balance a reader should report: the stored value verbatim
    /// (including zero), or [`DEFAULT_BALANCE`] when none is stored.
    #[must_use]
    pub fn balance_or_default(&self) -> Decimal {
        self.balance.unwrap_or(DEFAULT_BALANCE)
    }
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Add to the balance (upserts a missing record, treating it as zero).
    Credit,
    /// Subtract from the balance; requires sufficient existing funds.
    Debit,
}

/// A receipt in the idempotency ledger.
///
/// Write-once: at most one record may ever exist per idempotency key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Caller-supplied unique token (primary key).
    pub idempotency_key: String,

    /// The user whose balance this transaction touched.
    pub user_id: String,

    /// The applied amount (always positive; direction lives in `kind`).
    pub amount: Decimal,

    /// Direction of the transaction.
    pub kind: TransactionKind,

    /// When the transaction was accepted.
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Create a receipt stamped with the current time.
    #[must_use]
    pub fn new(
        idempotency_key: String,
        user_id: String,
        amount: Decimal,
        kind: TransactionKind,
    ) -> Self {
        Self {
            idempotency_key,
            user_id,
            amount,
            kind,
            created_at: Utc::now(),
        }
    }
}

/// A request to apply one credit or debit transaction.
///
/// The amount arrives as text (the external contract) and is parsed into a
/// [`Decimal`] during validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactRequest {
    /// Caller-supplied unique token; replaying it never double-applies.
    pub idempotency_key: String,

    /// The user whose balance to change.
    pub user_id: String,

    /// The amount as text; must parse to a value strictly greater than zero.
    pub amount: String,

    /// Direction of the transaction.
    pub kind: TransactionKind,
}
