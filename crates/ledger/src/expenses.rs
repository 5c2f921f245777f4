//! The expense ledger. Independent of inventory; expense rows never touch
//! the movement log.

use chrono::NaiveDate;
use rusqlite::{Row, params};
use rust_decimal::Decimal;
use stockbook_core::{Expense, LedgerError, LedgerResult};

use crate::store::{Ledger, decimal_col, storage};

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: decimal_col(row, 2)?,
        date: row.get(3)?,
        notes: row.get(4)?,
    })
}

impl Ledger {
    /// Record an expense, returning its id.
    pub fn add_expense(
        &mut self,
        title: &str,
        amount: Decimal,
        date: NaiveDate,
        notes: Option<&str>,
    ) -> LedgerResult<i64> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LedgerError::validation("title", "must not be empty"));
        }
        if amount.is_sign_negative() {
            return Err(LedgerError::validation("amount", "must not be negative"));
        }
        self.conn
            .execute(
                "INSERT INTO expenses (title, amount, date, notes) VALUES (?1, ?2, ?3, ?4)",
                params![title, amount.to_string(), date, notes],
            )
            .map_err(storage)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All expenses, newest first.
    pub fn list_expenses(&self) -> LedgerResult<Vec<Expense>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, title, amount, date, notes FROM expenses
                 ORDER BY date DESC, id DESC",
            )
            .map_err(storage)?;
        let rows = stmt
            .query_map([], expense_from_row)
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;
        Ok(rows)
    }

    pub fn delete_expense(&mut self, id: i64) -> LedgerResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])
            .map_err(storage)?;
        if changed == 0 {
            return Err(LedgerError::not_found("expense", id.to_string()));
        }
        Ok(())
    }

    /// Sum of expense amounts with a date within `[from, to]`.
    pub fn expense_total(&self, from: NaiveDate, to: NaiveDate) -> LedgerResult<Decimal> {
        let mut stmt = self
            .conn
            .prepare("SELECT amount FROM expenses WHERE date BETWEEN ?1 AND ?2")
            .map_err(storage)?;
        let amounts = stmt
            .query_map(params![from, to], |row| decimal_col(row, 0))
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;
        Ok(amounts.into_iter().sum())
    }
}
