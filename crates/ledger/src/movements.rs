//! The append-only movement log.
//!
//! Movements are facts: inserted by invoice commits or manual stock
//! adjustments, never updated or deleted. A correction is a new offsetting
//! movement.

use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};
use stockbook_core::{Direction, LedgerError, LedgerResult, Movement, ProductCode};

use crate::store::{Ledger, code_col, storage};

fn movement_from_row(row: &Row<'_>) -> rusqlite::Result<Movement> {
    Ok(Movement {
        id: row.get(0)?,
        product: code_col(row, 1, ProductCode::new)?,
        direction: code_col(row, 2, |raw| Direction::parse(&raw))?,
        quantity: row.get(3)?,
        date: row.get(4)?,
        reference: row.get(5)?,
    })
}

/// Raw movement insert, shared by the public append path and the invoice
/// commit protocol (which runs it inside a transaction).
pub(crate) fn insert_movement(
    conn: &Connection,
    product: &ProductCode,
    direction: Direction,
    quantity: i64,
    date: NaiveDate,
    reference: Option<&str>,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO inventory_movements (product_code, direction, quantity, date, reference)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![product.as_str(), direction.as_str(), quantity, date, reference],
    )?;
    Ok(())
}

impl Ledger {
    /// Append one movement fact. Manual stock adjustments come through here
    /// with a free-text reference.
    pub fn append_movement(
        &mut self,
        product: &ProductCode,
        direction: Direction,
        quantity: i64,
        date: NaiveDate,
        reference: Option<&str>,
    ) -> LedgerResult<()> {
        if quantity <= 0 {
            return Err(LedgerError::InvalidQuantity(quantity));
        }
        if !self.row_exists(
            "SELECT 1 FROM products WHERE code = ?1",
            params![product.as_str()],
        )? {
            return Err(LedgerError::not_found("product", product.as_str()));
        }
        insert_movement(&self.conn, product, direction, quantity, date, reference)
            .map_err(storage)?;
        tracing::debug!(
            product = %product,
            direction = direction.as_str(),
            quantity,
            "appended movement"
        );
        Ok(())
    }

    /// Movement history for one product, newest first.
    pub fn list_movements(&self, product: &ProductCode) -> LedgerResult<Vec<Movement>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, product_code, direction, quantity, date, reference
                 FROM inventory_movements
                 WHERE product_code = ?1
                 ORDER BY id DESC",
            )
            .map_err(storage)?;
        let rows = stmt
            .query_map(params![product.as_str()], movement_from_row)
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;
        Ok(rows)
    }
}
