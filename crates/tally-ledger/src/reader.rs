//! Balance reads.

use std::sync::Arc;

use rust_decimal::Decimal;
use tally_core::{BalanceRecord, LedgerError, Result};
use tally_store::{schema::table, Store};

/// Reads a user's balance from the store.
pub struct BalanceReader {
    store: Arc<dyn Store>,
}

impl BalanceReader {
    /// Create a reader over the given store client.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Fetch the balance for `user_id`.
    ///
    /// A record with an absent or null balance attribute reads as the
    /// logical default; a stored balance (including zero) is returned
    /// verbatim.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if no record exists for `user_id`.
    /// - [`LedgerError::RequestFailed`] for any store failure; the store's
    ///   own error detail is logged, not surfaced.
    pub async fn get_balance(&self, user_id: &str) -> Result<Decimal> {
        let doc = self
            .store
            .get(table::BALANCES, user_id)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, %user_id, "balance read failed");
                LedgerError::RequestFailed
            })?;

        let Some(doc) = doc else {
            return Err(LedgerError::NotFound {
                user_id: user_id.to_string(),
            });
        };

        let record: BalanceRecord = serde_json::from_value(doc).map_err(|e| {
            tracing::warn!(error = %e, %user_id, "balance record malformed");
            LedgerError::RequestFailed
        })?;

        Ok(record.balance_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FailingStore;

    #[tokio::test]
    async fn store_failure_reads_as_generic_request_failed() {
        let reader = BalanceReader::new(Arc::new(FailingStore));

        let err = reader.get_balance("u1").await.unwrap_err();
        assert!(matches!(err, LedgerError::RequestFailed));
        assert_eq!(err.to_string(), "request failed");
    }
}
