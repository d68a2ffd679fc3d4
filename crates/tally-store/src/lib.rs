//! Transactional key-value storage layer for tally.
//!
//! This crate abstracts the store the ledger runs against: named tables of
//! JSON documents with point reads and an atomic multi-item conditional
//! write. The one primitive that matters is [`Store::transact_write`]: submit
//! N item operations, each carrying its own precondition, as a single
//! all-or-nothing unit, and get back per-item failure reasons in submission
//! order so the caller can tell *which* precondition sank the write.
//!
//! The shipped implementation is [`RocksStore`], one column family per table
//! with CBOR-encoded documents.
//!
//! # Example
//!
//! ```no_run
//! use tally_store::{RocksStore, Store, WriteOp};
//! use serde_json::json;
//!
//! # async fn demo() -> Result<(), tally_store::StoreError> {
//! let store = RocksStore::open("/tmp/tally-db")?;
//!
//! store
//!     .transact_write(vec![WriteOp::Insert {
//!         table: tally_store::schema::table::TRANSACTIONS,
//!         key: "t1".into(),
//!         value: json!({ "idempotency_key": "t1", "user_id": "u1" }),
//!     }])
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ops;
pub mod rocks;
pub mod schema;

pub use error::{CancellationReason, Result, StoreError};
pub use ops::{Condition, Document, UpdateExpr, WriteOp};
pub use rocks::RocksStore;

use async_trait::async_trait;

/// The storage trait the ledger is written against.
///
/// Implementations must provide conditional transactional writes: without
/// that primitive the ledger's atomicity guarantee cannot be reproduced.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the document stored under `key` in `table`.
    ///
    /// Absence is not an error; it is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is unknown or the read fails.
    async fn get(&self, table: &str, key: &str) -> Result<Option<Document>>;

    /// Apply a group of item operations atomically.
    ///
    /// Either every operation commits or none does. When any precondition
    /// fails, the whole group is rejected with
    /// [`StoreError::TransactionCanceled`], whose `reasons` line up
    /// positionally with the submitted operations.
    ///
    /// Operations within one group must target distinct `(table, key)` pairs;
    /// preconditions are evaluated against the state before the group.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TransactionCanceled`] on a failed precondition,
    /// or another [`StoreError`] if the write cannot be attempted at all.
    async fn transact_write(&self, ops: Vec<WriteOp>) -> Result<()>;
}
