//! The ledger handle: one SQLite connection, owned for the process lifetime
//! and passed explicitly to everything that reads or writes.

use std::path::Path;
use std::str::FromStr;

use rusqlite::{Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use stockbook_core::{LedgerError, LedgerResult};

use crate::schema::SCHEMA;

/// Durable keyed storage for the master and fact tables.
///
/// Reads take `&self`; anything that writes takes `&mut self`. There is
/// exactly one writer and one reader at any instant, so no pooling and no
/// interior locking.
pub struct Ledger {
    pub(crate) conn: Connection,
}

impl Ledger {
    /// Open (or create) the ledger database at `path` and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(storage)?;
        let ledger = Self::bootstrap(conn)?;
        tracing::info!(path = %path.display(), "opened ledger database");
        Ok(ledger)
    }

    /// In-memory ledger, used by tests.
    pub fn open_in_memory() -> LedgerResult<Self> {
        let conn = Connection::open_in_memory().map_err(storage)?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> LedgerResult<Self> {
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(storage)?;
        conn.execute_batch(SCHEMA).map_err(storage)?;
        Ok(Self { conn })
    }

    /// Run a read-only query against the underlying connection.
    ///
    /// The report layer builds its aggregations on this seam without the
    /// store having to know every projection.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> LedgerResult<T> {
        f(&self.conn).map_err(storage)
    }

    /// `true` if the given single-column existence query returns a row.
    pub(crate) fn row_exists(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> LedgerResult<bool> {
        self.conn
            .query_row(sql, params, |_| Ok(()))
            .optional()
            .map(|found| found.is_some())
            .map_err(storage)
    }
}

/// Wrap a storage-engine failure.
pub(crate) fn storage(err: rusqlite::Error) -> LedgerError {
    LedgerError::Storage(err.to_string())
}

/// Whether an insert failed on a uniqueness/PK constraint.
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Read a money column stored as TEXT into an exact decimal.
pub fn decimal_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Re-validate a code column on the way out of the store.
pub fn code_col<T, E>(
    row: &Row<'_>,
    idx: usize,
    parse: impl FnOnce(String) -> Result<T, E>,
) -> rusqlite::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    parse(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_memory_applies_schema() {
        let ledger = Ledger::open_in_memory().unwrap();
        let exists = ledger
            .row_exists(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'inventory_movements'",
                [],
            )
            .unwrap();
        assert!(exists);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let ledger = Ledger::open_in_memory().unwrap();
        let err = ledger.conn.execute(
            "INSERT INTO inventory_movements (product_code, direction, quantity, date)
             VALUES ('missing', 'in', 1, '2026-01-02')",
            [],
        );
        assert!(is_constraint_violation(&err.unwrap_err()));
    }
}
