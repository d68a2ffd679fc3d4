//! The atomic-write vocabulary: item operations, update expressions, and
//! preconditions.
//!
//! Each [`WriteOp`] carries its own precondition. Inserts are insert-only by
//! definition (the key must be absent); updates may attach a [`Condition`]
//! on existing record state.

use rust_decimal::Decimal;

/// A stored record in document form: a JSON object whose fields are the
/// record's attributes.
pub type Document = serde_json::Value;

/// One item operation inside an atomic write group.
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Insert a new document under `key`.
    ///
    /// Implicit precondition: no document may already exist under `key`
    /// (insert-only; the group is rejected if one does).
    Insert {
        /// Target table.
        table: &'static str,
        /// Primary key of the new document.
        key: String,
        /// The document to store.
        value: Document,
    },

    /// Mutate one numeric attribute of the document under `key`.
    Update {
        /// Target table.
        table: &'static str,
        /// Primary key of the document to mutate.
        key: String,
        /// The mutation to apply.
        expr: UpdateExpr,
        /// Optional precondition on the current state.
        condition: Option<Condition>,
    },
}

/// A numeric update expression.
#[derive(Debug, Clone)]
pub enum UpdateExpr {
    /// `attribute = (attribute or 0) + amount`, upserting the document if it
    /// does not exist (a fresh document carries only its key attribute).
    Add {
        /// Attribute to increase.
        attribute: &'static str,
        /// Amount to add.
        amount: Decimal,
    },

    /// `attribute = attribute - amount`. The attribute must already exist;
    /// an absent document or attribute counts as a failed conditional check.
    Subtract {
        /// Attribute to decrease.
        attribute: &'static str,
        /// Amount to subtract.
        amount: Decimal,
    },
}

/// A precondition on existing record state.
#[derive(Debug, Clone)]
pub enum Condition {
    /// The attribute exists and its numeric value is at least `value`.
    AttributeAtLeast {
        /// Attribute to inspect.
        attribute: &'static str,
        /// Minimum acceptable value.
        value: Decimal,
    },
}
