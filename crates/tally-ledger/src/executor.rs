//! The transactional balance-update protocol.
//!
//! One `execute` call is one atomic unit: insert the transaction receipt
//! (insert-only, so a replayed idempotency key is rejected) and mutate the
//! balance, both or neither. The store's per-item cancellation reasons are
//! what lets a rejection be attributed to the right cause.

use std::sync::Arc;

use rust_decimal::Decimal;
use tally_core::{
    LedgerError, Result, TransactRequest, TransactionKind, TransactionRecord, BALANCE_ATTRIBUTE,
};
use tally_store::{
    schema::table, CancellationReason, Condition, Store, StoreError, UpdateExpr, WriteOp,
};

/// Position of the receipt insert within the submitted write group.
const INSERT_ITEM: usize = 0;

/// Position of the balance update within the submitted write group.
const UPDATE_ITEM: usize = 1;

/// Applies credit/debit transactions idempotently and atomically.
pub struct TransactionExecutor {
    store: Arc<dyn Store>,
}

impl TransactionExecutor {
    /// Create an executor over the given store client.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Apply one transaction.
    ///
    /// Validation happens before any store access: the amount must parse as
    /// a decimal and be strictly greater than zero. A debit requires an
    /// existing balance of at least the amount; a credit upserts, treating a
    /// missing balance as zero. Replaying an idempotency key never
    /// double-applies.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::AmountNotANumber`] / [`LedgerError::AmountInvalid`]
    ///   from validation (the store is never touched).
    /// - [`LedgerError::InsufficientFunds`] when a debit exceeds the balance
    ///   or the user has no balance record.
    /// - [`LedgerError::DuplicateTransaction`] when the idempotency key was
    ///   already used.
    /// - [`LedgerError::TransactionFailed`] for any other store failure.
    pub async fn execute(&self, request: TransactRequest) -> Result<()> {
        let amount: Decimal =
            request
                .amount
                .parse()
                .map_err(|_| LedgerError::AmountNotANumber {
                    input: request.amount.clone(),
                })?;
        if amount <= Decimal::ZERO {
            return Err(LedgerError::AmountInvalid { amount });
        }

        let receipt = TransactionRecord::new(
            request.idempotency_key.clone(),
            request.user_id.clone(),
            amount,
            request.kind,
        );
        let receipt = serde_json::to_value(&receipt).map_err(|e| {
            tracing::error!(error = %e, "receipt serialization failed");
            LedgerError::TransactionFailed
        })?;

        let update = match request.kind {
            TransactionKind::Debit => WriteOp::Update {
                table: table::BALANCES,
                key: request.user_id.clone(),
                expr: UpdateExpr::Subtract {
                    attribute: BALANCE_ATTRIBUTE,
                    amount,
                },
                condition: Some(Condition::AttributeAtLeast {
                    attribute: BALANCE_ATTRIBUTE,
                    value: amount,
                }),
            },
            TransactionKind::Credit => WriteOp::Update {
                table: table::BALANCES,
                key: request.user_id.clone(),
                expr: UpdateExpr::Add {
                    attribute: BALANCE_ATTRIBUTE,
                    amount,
                },
                condition: None,
            },
        };

        let ops = vec![
            WriteOp::Insert {
                table: table::TRANSACTIONS,
                key: request.idempotency_key.clone(),
                value: receipt,
            },
            update,
        ];

        match self.store.transact_write(ops).await {
            Ok(()) => {
                tracing::debug!(
                    user_id = %request.user_id,
                    kind = ?request.kind,
                    %amount,
                    "transaction committed"
                );
                Ok(())
            }
            Err(StoreError::TransactionCanceled { reasons }) => {
                Err(Self::classify(&reasons, &request))
            }
            Err(e) => {
                tracing::error!(error = %e, "atomic write failed");
                Err(LedgerError::TransactionFailed)
            }
        }
    }

    /// Map a cancellation onto the error taxonomy.
    ///
    /// The balance update's failure is checked before the receipt insert's,
    /// so a replayed debit against a drained balance reports insufficient
    /// funds rather than a duplicate.
    fn classify(reasons: &[CancellationReason], request: &TransactRequest) -> LedgerError {
        if reasons
            .get(UPDATE_ITEM)
            .copied()
            .is_some_and(CancellationReason::is_condition_failure)
        {
            return LedgerError::InsufficientFunds {
                user_id: request.user_id.clone(),
            };
        }
        if reasons
            .get(INSERT_ITEM)
            .copied()
            .is_some_and(CancellationReason::is_condition_failure)
        {
            return LedgerError::DuplicateTransaction {
                idempotency_key: request.idempotency_key.clone(),
            };
        }
        LedgerError::TransactionFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CancelingStore, FailingStore};

    fn request(amount: &str, kind: TransactionKind) -> TransactRequest {
        TransactRequest {
            idempotency_key: "t1".into(),
            user_id: "u1".into(),
            amount: amount.into(),
            kind,
        }
    }

    #[tokio::test]
    async fn non_numeric_amount_never_reaches_the_store() {
        // FailingStore would turn any store access into TransactionFailed.
        let executor = TransactionExecutor::new(Arc::new(FailingStore));

        let err = executor
            .execute(request("foo", TransactionKind::Credit))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AmountNotANumber { .. }));
    }

    #[tokio::test]
    async fn zero_and_negative_amounts_never_reach_the_store() {
        let executor = TransactionExecutor::new(Arc::new(FailingStore));

        let err = executor
            .execute(request("0", TransactionKind::Credit))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AmountInvalid { .. }));

        let err = executor
            .execute(request("-10", TransactionKind::Debit))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AmountInvalid { .. }));
    }

    #[tokio::test]
    async fn store_failure_is_reported_generically() {
        let executor = TransactionExecutor::new(Arc::new(FailingStore));

        let err = executor
            .execute(request("20", TransactionKind::Credit))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::TransactionFailed));
        assert_eq!(err.to_string(), "transaction failed");
    }

    #[tokio::test]
    async fn update_failure_maps_to_insufficient_funds() {
        let executor = TransactionExecutor::new(Arc::new(CancelingStore {
            reasons: vec![
                CancellationReason::None,
                CancellationReason::ConditionalCheckFailed,
            ],
        }));

        let err = executor
            .execute(request("30", TransactionKind::Debit))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    }

    #[tokio::test]
    async fn insert_failure_maps_to_duplicate_transaction() {
        let executor = TransactionExecutor::new(Arc::new(CancelingStore {
            reasons: vec![
                CancellationReason::ConditionalCheckFailed,
                CancellationReason::None,
            ],
        }));

        let err = executor
            .execute(request("30", TransactionKind::Debit))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateTransaction { .. }));
    }

    #[tokio::test]
    async fn update_failure_takes_precedence_when_both_fail() {
        let executor = TransactionExecutor::new(Arc::new(CancelingStore {
            reasons: vec![
                CancellationReason::ConditionalCheckFailed,
                CancellationReason::ConditionalCheckFailed,
            ],
        }));

        let err = executor
            .execute(request("30", TransactionKind::Debit))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    }

    #[tokio::test]
    async fn cancellation_without_reasons_is_generic() {
        let executor = TransactionExecutor::new(Arc::new(CancelingStore { reasons: vec![] }));

        let err = executor
            .execute(request("30", TransactionKind::Debit))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::TransactionFailed));
    }
}
