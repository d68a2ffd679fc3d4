//! Balance reads and idempotent atomic transactions for tally.
//!
//! Two independent consumers of the store abstraction:
//!
//! - [`BalanceReader`] fetches a user's balance, substituting the logical
//!   default when the record carries no balance attribute.
//! - [`TransactionExecutor`] validates an amount, builds a two-item atomic
//!   write (receipt insert plus balance mutation), submits it, and maps the
//!   store's per-item rejection reasons onto the ledger error taxonomy.
//!
//! Both hold an explicitly injected store client; neither keeps any other
//! mutable state, so concurrent calls for the same user are serialized by the
//! store's conditional-write semantics alone.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tally_core::{TransactRequest, TransactionKind};
//! use tally_ledger::{BalanceReader, TransactionExecutor};
//! use tally_store::RocksStore;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(RocksStore::open("/var/lib/tally")?);
//! let executor = TransactionExecutor::new(store.clone());
//! let reader = BalanceReader::new(store);
//!
//! executor
//!     .execute(TransactRequest {
//!         idempotency_key: "t1".into(),
//!         user_id: "u1".into(),
//!         amount: "50".into(),
//!         kind: TransactionKind::Credit,
//!     })
//!     .await?;
//!
//! let balance = reader.get_balance("u1").await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod executor;
pub mod reader;

pub use executor::TransactionExecutor;
pub use reader::BalanceReader;
