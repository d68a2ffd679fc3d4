//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.
//! Documents live in one column family per table, CBOR-encoded. Conditional
//! evaluation and the batched write are serialized under an internal mutex,
//! so concurrent `transact_write` calls observe each other's commits; the
//! batch itself goes through a `RocksDB` `WriteBatch` and is all-or-nothing.

use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, MultiThreaded, Options,
    WriteBatch,
};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{CancellationReason, Result, StoreError};
use crate::ops::{Condition, Document, UpdateExpr, WriteOp};
use crate::schema::{all_column_families, key_attribute};
use crate::Store;

/// `RocksDB`-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// Missing column families are created, so opening also provisions the
    /// tables; reopening an existing database is a no-op in that regard.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::info!("store opened");

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Write a document directly, bypassing transactional semantics.
    ///
    /// Intended for provisioning and test seeding; the ledger itself only
    /// mutates state through [`Store::transact_write`].
    ///
    /// # Errors
    ///
    /// Returns an error if the table is unknown or the write fails.
    pub fn put_document(&self, table: &str, key: &str, value: &Document) -> Result<()> {
        let cf = self.cf(table)?;
        let bytes = Self::serialize(value)?;
        self.db
            .put_cf(&cf, key.as_bytes(), bytes)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a document using CBOR.
    fn serialize(value: &Document) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a document from CBOR.
    fn deserialize(data: &[u8]) -> Result<Document> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Synchronous point read.
    fn read(&self, table: &str, key: &str) -> Result<Option<Document>> {
        let cf = self.cf(table)?;
        self.db
            .get_cf(&cf, key.as_bytes())
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Read a numeric attribute from a document.
    ///
    /// An absent document, absent attribute, or null attribute all read as
    /// `None`. Both JSON numbers and decimal strings are accepted.
    fn attribute_decimal(doc: Option<&Document>, attribute: &str) -> Result<Option<Decimal>> {
        let Some(value) = doc.and_then(|d| d.get(attribute)) else {
            return Ok(None);
        };
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Decimal::from_str(s)
                .map(Some)
                .map_err(|e| StoreError::Serialization(format!("attribute {attribute}: {e}"))),
            Value::Number(n) => {
                let text = n.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map(Some)
                    .map_err(|e| StoreError::Serialization(format!("attribute {attribute}: {e}")))
            }
            other => Err(StoreError::Serialization(format!(
                "attribute {attribute} is not numeric: {other}"
            ))),
        }
    }

    /// Return `doc` with `attribute` set to `value`, creating a fresh
    /// document seeded with the table's key attribute when none exists.
    fn with_attribute(
        doc: Option<Document>,
        table: &str,
        key: &str,
        attribute: &str,
        value: Decimal,
    ) -> Result<Document> {
        let mut doc = doc.unwrap_or_else(|| {
            let mut map = serde_json::Map::new();
            map.insert(
                key_attribute(table).to_string(),
                Value::String(key.to_string()),
            );
            Value::Object(map)
        });

        let map = doc
            .as_object_mut()
            .ok_or_else(|| StoreError::Serialization("document is not an object".to_string()))?;
        let encoded = serde_json::to_value(value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        map.insert(attribute.to_string(), encoded);

        Ok(doc)
    }
}

#[async_trait]
impl Store for RocksStore {
    async fn get(&self, table: &str, key: &str) -> Result<Option<Document>> {
        self.read(table, key)
    }

    async fn transact_write(&self, ops: Vec<WriteOp>) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".to_string()))?;

        // Evaluate every precondition against the pre-group state before
        // staging anything, so the reasons vector covers all items and a
        // late failure cannot leave an early write behind.
        let mut reasons = Vec::with_capacity(ops.len());
        let mut staged: Vec<(&'static str, String, Document)> = Vec::with_capacity(ops.len());

        for op in &ops {
            match op {
                WriteOp::Insert { table, key, value } => {
                    if self.read(table, key)?.is_some() {
                        reasons.push(CancellationReason::ConditionalCheckFailed);
                    } else {
                        reasons.push(CancellationReason::None);
                        staged.push((*table, key.clone(), value.clone()));
                    }
                }
                WriteOp::Update {
                    table,
                    key,
                    expr,
                    condition,
                } => {
                    let current = self.read(table, key)?;

                    if let Some(Condition::AttributeAtLeast { attribute, value }) = condition {
                        let held = Self::attribute_decimal(current.as_ref(), attribute)?
                            .is_some_and(|held| held >= *value);
                        if !held {
                            reasons.push(CancellationReason::ConditionalCheckFailed);
                            continue;
                        }
                    }

                    match expr {
                        UpdateExpr::Add { attribute, amount } => {
                            let next = Self::attribute_decimal(current.as_ref(), attribute)?
                                .unwrap_or(Decimal::ZERO)
                                + *amount;
                            let doc =
                                Self::with_attribute(current, table, key, attribute, next)?;
                            reasons.push(CancellationReason::None);
                            staged.push((*table, key.clone(), doc));
                        }
                        UpdateExpr::Subtract { attribute, amount } => {
                            match Self::attribute_decimal(current.as_ref(), attribute)? {
                                Some(held) => {
                                    let doc = Self::with_attribute(
                                        current,
                                        table,
                                        key,
                                        attribute,
                                        held - *amount,
                                    )?;
                                    reasons.push(CancellationReason::None);
                                    staged.push((*table, key.clone(), doc));
                                }
                                // Subtracting from nothing: the operand
                                // requirement is itself a condition.
                                None => {
                                    reasons.push(CancellationReason::ConditionalCheckFailed);
                                }
                            }
                        }
                    }
                }
            }
        }

        if reasons.iter().any(|r| r.is_condition_failure()) {
            return Err(StoreError::TransactionCanceled { reasons });
        }

        let mut batch = WriteBatch::default();
        for (table, key, doc) in &staged {
            let cf = self.cf(table)?;
            batch.put_cf(&cf, key.as_bytes(), Self::serialize(doc)?);
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(items = ops.len(), "atomic write committed");
        Ok(())
    }
}
