//! Dashboard rollups: cheap scalar metrics recomputed on demand.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use stockbook_core::LedgerResult;
use stockbook_ledger::Ledger;
use stockbook_ledger::store::decimal_col;

/// The dashboard's scalar metrics. Every field is independently computable
/// and defaults to zero on an empty dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub today_sales: Decimal,
    pub today_purchases: Decimal,
    pub net_profit: Decimal,
    pub customer_count: i64,
    pub product_count: i64,
    pub inventory_value: Decimal,
}

fn net_total_sum(ledger: &Ledger, table: &str, on: NaiveDate) -> LedgerResult<Decimal> {
    let amounts = ledger.with_connection(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT net_total FROM {table} WHERE invoice_date = ?1"
        ))?;
        let rows = stmt.query_map(rusqlite::params![on], |row| decimal_col(row, 0))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
    })?;
    Ok(amounts.into_iter().sum())
}

fn count(ledger: &Ledger, table: &str) -> LedgerResult<i64> {
    ledger.with_connection(|conn| {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
    })
}

/// Inventory valuation: Σ balance × purchase price over all products, from
/// one grouped pass over the movement log.
fn inventory_value(ledger: &Ledger) -> LedgerResult<Decimal> {
    let rows = ledger.with_connection(|conn| {
        let mut stmt = conn.prepare(
            "SELECT p.purchase_price,
                    COALESCE(SUM(CASE WHEN m.direction = 'in' THEN m.quantity ELSE 0 END), 0)
                  - COALESCE(SUM(CASE WHEN m.direction = 'out' THEN m.quantity ELSE 0 END), 0)
             FROM products p
             LEFT JOIN inventory_movements m ON m.product_code = p.code
             GROUP BY p.code",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((decimal_col(row, 0)?, row.get::<_, i64>(1)?))
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
    })?;
    Ok(rows
        .into_iter()
        .map(|(price, balance)| price * Decimal::from(balance))
        .sum())
}

/// Compute every dashboard metric for `today`.
pub fn dashboard_metrics(ledger: &Ledger, today: NaiveDate) -> LedgerResult<DashboardMetrics> {
    let today_sales = net_total_sum(ledger, "sales", today)?;
    let today_purchases = net_total_sum(ledger, "purchases", today)?;
    Ok(DashboardMetrics {
        net_profit: today_sales - today_purchases,
        today_sales,
        today_purchases,
        customer_count: count(ledger, "customers")?,
        product_count: count(ledger, "products")?,
        inventory_value: inventory_value(ledger)?,
    })
}
