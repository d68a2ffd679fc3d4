//! Common test utilities for tally-ledger integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use serde_json::{json, Value};
use tally_core::{TransactRequest, TransactionKind};
use tally_ledger::{BalanceReader, TransactionExecutor};
use tally_store::schema::table;
use tally_store::RocksStore;
use tempfile::TempDir;

/// Test harness: a fresh store with a reader and an executor over it.
pub struct TestHarness {
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// The store, also handed to the reader and executor.
    pub store: Arc<RocksStore>,
    /// Balance reader under test.
    pub reader: BalanceReader,
    /// Transaction executor under test.
    pub executor: TransactionExecutor,
}

impl TestHarness {
    /// Create a new harness with a fresh database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("failed to open store"));

        Self {
            reader: BalanceReader::new(store.clone()),
            executor: TransactionExecutor::new(store.clone()),
            store,
            _temp_dir: temp_dir,
        }
    }

    /// Seed a balance record as stored JSON, balance field verbatim.
    pub fn seed_balance(&self, user_id: &str, balance: Value) {
        self.store
            .put_document(
                table::BALANCES,
                user_id,
                &json!({ "id": user_id, "balance": balance }),
            )
            .expect("failed to seed balance");
    }

    /// Seed a balance record with no balance attribute at all.
    pub fn seed_record_without_balance(&self, user_id: &str) {
        self.store
            .put_document(table::BALANCES, user_id, &json!({ "id": user_id }))
            .expect("failed to seed record");
    }
}

/// Build a transaction request.
pub fn request(
    idempotency_key: &str,
    user_id: &str,
    amount: &str,
    kind: TransactionKind,
) -> TransactRequest {
    TransactRequest {
        idempotency_key: idempotency_key.into(),
        user_id: user_id.into(),
        amount: amount.into(),
        kind,
    }
}
