//! Table definitions and column families.
//!
//! Each logical table maps to one `RocksDB` column family.

/// Column family names for the `RocksDB` database.
pub mod table {
    /// Balance records, keyed by user ID (`id`).
    pub const BALANCES: &str = "balances";

    /// The write-once transaction ledger, keyed by `idempotency_key`.
    pub const TRANSACTIONS: &str = "transactions";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![table::BALANCES, table::TRANSACTIONS]
}

/// The name of a table's primary-key attribute.
///
/// Upserting updates seed a fresh document with this attribute so a record
/// created through an update still carries its key, as an inserted one would.
#[must_use]
pub fn key_attribute(table: &str) -> &'static str {
    match table {
        self::table::TRANSACTIONS => "idempotency_key",
        _ => "id",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_attributes_per_table() {
        assert_eq!(key_attribute(table::BALANCES), "id");
        assert_eq!(key_attribute(table::TRANSACTIONS), "idempotency_key");
    }
}
