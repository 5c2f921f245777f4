//! Product repository.

use rusqlite::{Row, params};
use stockbook_core::{LedgerError, LedgerResult, Product, ProductCode};

use crate::store::{Ledger, code_col, decimal_col, is_constraint_violation, storage};

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        code: code_col(row, 0, ProductCode::new)?,
        name: row.get(1)?,
        unit: row.get(2)?,
        purchase_price: decimal_col(row, 3)?,
        sale_price: decimal_col(row, 4)?,
        minimum_limit: row.get(5)?,
        date_added: row.get(6)?,
    })
}

const PRODUCT_COLUMNS: &str =
    "code, name, unit, purchase_price, sale_price, minimum_limit, date_added";

impl Ledger {
    /// Insert a new product. Fails with `DuplicateKey` if the code is taken.
    pub fn add_product(&mut self, product: &Product) -> LedgerResult<()> {
        product.validate()?;
        if self.row_exists(
            "SELECT 1 FROM products WHERE code = ?1",
            params![product.code.as_str()],
        )? {
            return Err(LedgerError::duplicate_key(
                "product",
                product.code.as_str(),
            ));
        }
        self.conn
            .execute(
                "INSERT INTO products (code, name, unit, purchase_price, sale_price, minimum_limit, date_added)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    product.code.as_str(),
                    product.name,
                    product.unit,
                    product.purchase_price.to_string(),
                    product.sale_price.to_string(),
                    product.minimum_limit,
                    product.date_added,
                ],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    LedgerError::duplicate_key("product", product.code.as_str())
                } else {
                    storage(e)
                }
            })?;
        tracing::debug!(code = %product.code, "added product");
        Ok(())
    }

    /// Update mutable fields (name, unit, prices, minimum limit). The date
    /// the product was added never changes.
    pub fn update_product(&mut self, product: &Product) -> LedgerResult<()> {
        product.validate()?;
        let changed = self
            .conn
            .execute(
                "UPDATE products
                 SET name = ?2, unit = ?3, purchase_price = ?4, sale_price = ?5, minimum_limit = ?6
                 WHERE code = ?1",
                params![
                    product.code.as_str(),
                    product.name,
                    product.unit,
                    product.purchase_price.to_string(),
                    product.sale_price.to_string(),
                    product.minimum_limit,
                ],
            )
            .map_err(storage)?;
        if changed == 0 {
            return Err(LedgerError::not_found("product", product.code.as_str()));
        }
        Ok(())
    }

    /// Delete a product. Blocked with `InUse` while movements or invoice
    /// line items reference it, so historical rows are never orphaned.
    pub fn delete_product(&mut self, code: &ProductCode) -> LedgerResult<()> {
        let referenced = self.row_exists(
            "SELECT 1 FROM inventory_movements WHERE product_code = ?1 LIMIT 1",
            params![code.as_str()],
        )? || self.row_exists(
            "SELECT 1 FROM sales_details WHERE product_code = ?1 LIMIT 1",
            params![code.as_str()],
        )? || self.row_exists(
            "SELECT 1 FROM purchase_details WHERE product_code = ?1 LIMIT 1",
            params![code.as_str()],
        )?;
        if referenced {
            return Err(LedgerError::in_use("product", code.as_str()));
        }
        let changed = self
            .conn
            .execute(
                "DELETE FROM products WHERE code = ?1",
                params![code.as_str()],
            )
            .map_err(storage)?;
        if changed == 0 {
            return Err(LedgerError::not_found("product", code.as_str()));
        }
        tracing::debug!(code = %code, "deleted product");
        Ok(())
    }

    pub fn get_product(&self, code: &ProductCode) -> LedgerResult<Product> {
        self.conn
            .query_row(
                &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE code = ?1"),
                params![code.as_str()],
                product_from_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    LedgerError::not_found("product", code.as_str())
                }
                other => storage(other),
            })
    }

    /// Full row set, ordered by code ascending.
    pub fn list_products(&self) -> LedgerResult<Vec<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY code"
            ))
            .map_err(storage)?;
        let rows = stmt
            .query_map([], product_from_row)
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
    use rust_decimal::Decimal;
    use stockbook_core::Direction;

    #[test]
    fn product_round_trips_with_exact_prices() {
        let mut ledger = testutil::ledger();
        let mut product = testutil::product("P1", 5, 8, 10);
        product.purchase_price = Decimal::new(1999, 2); // 19.99
        ledger.add_product(&product).unwrap();

        let stored = ledger.get_product(&product.code).unwrap();
        assert_eq!(stored.purchase_price, Decimal::new(1999, 2));
        assert_eq!(stored, product);
    }

    #[test]
    fn duplicate_product_code_is_rejected() {
        let mut ledger = testutil::ledger();
        testutil::seed_product(&mut ledger, "P1");
        let err = ledger
            .add_product(&testutil::product("P1", 1, 2, 3))
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateKey { .. }));
    }

    #[test]
    fn update_edits_prices_and_limit() {
        let mut ledger = testutil::ledger();
        testutil::seed_product(&mut ledger, "P1");
        let mut product = testutil::product("P1", 6, 9, 4);
        product.name = "Renamed".to_string();
        ledger.update_product(&product).unwrap();

        let stored = ledger.get_product(&product.code).unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.minimum_limit, 4);
        assert_eq!(stored.sale_price, Decimal::from(9));
    }

    #[test]
    fn delete_with_movement_history_is_blocked() {
        let mut ledger = testutil::ledger();
        testutil::seed_product(&mut ledger, "P1");
        let code = ProductCode::new("P1").unwrap();
        ledger
            .append_movement(
                &code,
                Direction::In,
                5,
                testutil::date(2026, 2, 3),
                Some("adjustment"),
            )
            .unwrap();

        let err = ledger.delete_product(&code).unwrap_err();
        assert_eq!(err, LedgerError::in_use("product", "P1".to_string()));
        // Still present.
        assert!(ledger.get_product(&code).is_ok());
    }
}
