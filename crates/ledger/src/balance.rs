//! The balance aggregator.
//!
//! One grouped pass over the movement log per call: every product's in/out
//! totals come from a single `GROUP BY`, never from per-product round trips.
//! Nothing here is cached; a read after a committed movement always sees it.

use rusqlite::{Row, params};
use stockbook_core::{LedgerError, LedgerResult, ProductCode, StockLevel};

use crate::store::{Ledger, code_col, storage};

/// Shared aggregation body. Single-product and all-product queries differ
/// only in the WHERE clause.
fn stock_query(filter: &str) -> String {
    format!(
        "SELECT p.code, p.name, p.unit, p.minimum_limit,
                COALESCE(SUM(CASE WHEN m.direction = 'in' THEN m.quantity ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN m.direction = 'out' THEN m.quantity ELSE 0 END), 0)
         FROM products p
         LEFT JOIN inventory_movements m ON m.product_code = p.code
         {filter}
         GROUP BY p.code
         ORDER BY p.code"
    )
}

fn level_from_row(row: &Row<'_>) -> rusqlite::Result<StockLevel> {
    Ok(StockLevel::from_totals(
        code_col(row, 0, ProductCode::new)?,
        row.get(1)?,
        row.get(2)?,
        row.get(4)?,
        row.get(5)?,
        row.get(3)?,
    ))
}

impl Ledger {
    /// Derived stock level for one product.
    pub fn stock_level(&self, product: &ProductCode) -> LedgerResult<StockLevel> {
        self.conn
            .query_row(
                &stock_query("WHERE p.code = ?1"),
                params![product.as_str()],
                level_from_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    LedgerError::not_found("product", product.as_str())
                }
                other => storage(other),
            })
    }

    /// Derived stock levels for every product, ordered by product code.
    pub fn stock_levels(&self) -> LedgerResult<Vec<StockLevel>> {
        let mut stmt = self.conn.prepare(&stock_query("")).map_err(storage)?;
        let rows = stmt
            .query_map([], level_from_row)
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use stockbook_core::{Direction, StockStatus};

    fn code(s: &str) -> ProductCode {
        ProductCode::new(s).unwrap()
    }

    #[test]
    fn balance_is_total_in_minus_total_out() {
        let mut ledger = testutil::ledger();
        testutil::seed_product(&mut ledger, "P1");
        let p1 = code("P1");

        ledger
            .append_movement(&p1, Direction::In, 20, testutil::date(2026, 2, 1), None)
            .unwrap();
        ledger
            .append_movement(&p1, Direction::In, 5, testutil::date(2026, 2, 2), None)
            .unwrap();
        ledger
            .append_movement(&p1, Direction::Out, 8, testutil::date(2026, 2, 3), None)
            .unwrap();

        let level = ledger.stock_level(&p1).unwrap();
        assert_eq!(level.total_in, 25);
        assert_eq!(level.total_out, 8);
        assert_eq!(level.balance, 17);
        assert_eq!(level.status, StockStatus::Normal);
    }

    #[test]
    fn product_without_movements_is_out_of_stock() {
        let mut ledger = testutil::ledger();
        testutil::seed_product(&mut ledger, "P1");

        let level = ledger.stock_level(&code("P1")).unwrap();
        assert_eq!(level.total_in, 0);
        assert_eq!(level.total_out, 0);
        assert_eq!(level.balance, 0);
        assert_eq!(level.status, StockStatus::OutOfStock);
    }

    #[test]
    fn negative_balance_is_out_of_stock() {
        let mut ledger = testutil::ledger();
        testutil::seed_product(&mut ledger, "P1");
        let p1 = code("P1");
        ledger
            .append_movement(&p1, Direction::Out, 3, testutil::date(2026, 2, 1), None)
            .unwrap();

        let level = ledger.stock_level(&p1).unwrap();
        assert_eq!(level.balance, -3);
        assert_eq!(level.status, StockStatus::OutOfStock);
    }

    #[test]
    fn all_products_share_one_aggregation() {
        let mut ledger = testutil::ledger();
        testutil::seed_product(&mut ledger, "P1");
        testutil::seed_product(&mut ledger, "P2");
        testutil::seed_product(&mut ledger, "P3");
        let p1 = code("P1");
        let p2 = code("P2");

        // P1 normal, P2 low, P3 untouched (out of stock).
        ledger
            .append_movement(&p1, Direction::In, 50, testutil::date(2026, 2, 1), None)
            .unwrap();
        ledger
            .append_movement(&p2, Direction::In, 12, testutil::date(2026, 2, 1), None)
            .unwrap();
        ledger
            .append_movement(&p2, Direction::Out, 9, testutil::date(2026, 2, 2), None)
            .unwrap();

        let levels = ledger.stock_levels().unwrap();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0].status, StockStatus::Normal);
        assert_eq!(levels[1].balance, 3);
        assert_eq!(levels[1].status, StockStatus::Low);
        assert_eq!(levels[2].status, StockStatus::OutOfStock);

        // The single-product query agrees with the all-products pass.
        assert_eq!(ledger.stock_level(&p2).unwrap(), levels[1]);
    }

    #[test]
    fn unknown_product_is_not_found() {
        let ledger = testutil::ledger();
        let err = ledger.stock_level(&code("ghost")).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }
}
