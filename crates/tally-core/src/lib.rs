//! Core types for the tally balance ledger.
//!
//! This crate provides the foundational types shared by the storage and
//! ledger layers:
//!
//! - **Records**: `BalanceRecord`, `TransactionRecord`, `TransactionKind`
//! - **Requests**: `TransactRequest`
//! - **Errors**: `LedgerError`
//!
//! # Amounts
//!
//! Callers supply amounts as text; the ledger parses them once into
//! [`rust_decimal::Decimal`] during validation and never carries the string
//! form past that point. Balances are fixed-precision decimals throughout.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod records;

pub use error::{LedgerError, Result};
pub use records::{
    BalanceRecord, TransactRequest, TransactionKind, TransactionRecord, BALANCE_ATTRIBUTE,
    DEFAULT_BALANCE,
};
