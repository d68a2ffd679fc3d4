//! Error types for tally storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An atomic write was rejected because a precondition failed.
    ///
    /// `reasons[i]` describes the outcome of the i-th submitted operation,
    /// in the same order the operations were submitted.
    #[error("transaction canceled")]
    TransactionCanceled {
        /// Per-item outcome, positionally aligned with the submitted ops.
        reasons: Vec<CancellationReason>,
    },
}

/// Why an individual item inside a rejected atomic write was canceled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationReason {
    /// The item itself was fine; a sibling's precondition failed.
    None,

    /// This item's precondition did not hold against the current state.
    ConditionalCheckFailed,
}

impl CancellationReason {
    /// Whether this item is the one whose precondition failed.
    #[must_use]
    pub fn is_condition_failure(self) -> bool {
        matches!(self, Self::ConditionalCheckFailed)
    }
}
