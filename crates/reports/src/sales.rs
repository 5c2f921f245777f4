//! Sales reports: period listing, monthly rollup, top customers.
//!
//! Money sums are accumulated as exact decimals in Rust rather than summed
//! over the TEXT columns in SQL, so report totals match invoice totals to
//! the cent.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use stockbook_core::{InvoiceNumber, InvoiceStatus, LedgerResult};
use stockbook_ledger::Ledger;
use stockbook_ledger::store::{code_col, decimal_col};

/// One invoice in a period sales report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesReportRow {
    pub number: InvoiceNumber,
    pub date: NaiveDate,
    pub customer_name: String,
    pub total: Decimal,
    pub discount: Decimal,
    pub net_total: Decimal,
    pub status: InvoiceStatus,
}

/// Sales invoices with a date within `[from, to]`, joined to the customer
/// name, newest first. Daily sales is the `from == to` case.
pub fn sales_between(
    ledger: &Ledger,
    from: NaiveDate,
    to: NaiveDate,
) -> LedgerResult<Vec<SalesReportRow>> {
    ledger.with_connection(|conn| {
        let mut stmt = conn.prepare(
            "SELECT s.invoice_number, s.invoice_date, c.name,
                    s.total, s.discount, s.net_total, s.status
             FROM sales s
             JOIN customers c ON c.code = s.counterparty_code
             WHERE s.invoice_date BETWEEN ?1 AND ?2
             ORDER BY s.invoice_date DESC, s.invoice_number DESC",
        )?;
        let rows = stmt.query_map(rusqlite::params![from, to], |row| {
            Ok(SalesReportRow {
                number: code_col(row, 0, InvoiceNumber::new)?,
                date: row.get(1)?,
                customer_name: row.get(2)?,
                total: decimal_col(row, 3)?,
                discount: decimal_col(row, 4)?,
                net_total: decimal_col(row, 5)?,
                status: code_col(row, 6, |raw| InvoiceStatus::parse(&raw))?,
            })
        })?;
        rows.collect()
    })
}

/// One calendar month of sales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySalesRow {
    /// `YYYY-MM`.
    pub month: String,
    pub invoice_count: i64,
    pub total: Decimal,
    pub discount: Decimal,
    pub net_total: Decimal,
}

/// Sales rolled up per calendar month, newest month first.
pub fn monthly_sales(ledger: &Ledger) -> LedgerResult<Vec<MonthlySalesRow>> {
    let raw = ledger.with_connection(|conn| {
        let mut stmt = conn.prepare(
            "SELECT invoice_date, total, discount, net_total FROM sales",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, NaiveDate>(0)?,
                decimal_col(row, 1)?,
                decimal_col(row, 2)?,
                decimal_col(row, 3)?,
            ))
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
    })?;

    let mut months: BTreeMap<String, MonthlySalesRow> = BTreeMap::new();
    for (date, total, discount, net_total) in raw {
        let month = date.format("%Y-%m").to_string();
        let entry = months
            .entry(month.clone())
            .or_insert_with(|| MonthlySalesRow {
                month,
                invoice_count: 0,
                total: Decimal::ZERO,
                discount: Decimal::ZERO,
                net_total: Decimal::ZERO,
            });
        entry.invoice_count += 1;
        entry.total += total;
        entry.discount += discount;
        entry.net_total += net_total;
    }
    Ok(months.into_values().rev().collect())
}

/// One customer in the top-customers ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopCustomerRow {
    pub name: String,
    pub invoice_count: i64,
    pub net_total: Decimal,
}

/// Customers ranked by summed net invoice totals, descending, limited to
/// `limit`. Customers with no invoices or a zero aggregate are excluded.
pub fn top_customers(ledger: &Ledger, limit: usize) -> LedgerResult<Vec<TopCustomerRow>> {
    let raw = ledger.with_connection(|conn| {
        let mut stmt = conn.prepare(
            "SELECT s.counterparty_code, c.name, s.net_total
             FROM sales s
             JOIN customers c ON c.code = s.counterparty_code",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                decimal_col(row, 2)?,
            ))
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
    })?;

    let mut by_customer: BTreeMap<String, TopCustomerRow> = BTreeMap::new();
    for (code, name, net_total) in raw {
        let entry = by_customer.entry(code).or_insert_with(|| TopCustomerRow {
            name,
            invoice_count: 0,
            net_total: Decimal::ZERO,
        });
        entry.invoice_count += 1;
        entry.net_total += net_total;
    }

    let mut ranked: Vec<TopCustomerRow> = by_customer
        .into_values()
        .filter(|row| row.net_total > Decimal::ZERO)
        .collect();
    ranked.sort_by(|a, b| b.net_total.cmp(&a.net_total).then(a.name.cmp(&b.name)));
    ranked.truncate(limit);
    Ok(ranked)
}

/// Default ranking size for the top-customers report.
pub const TOP_CUSTOMERS_DEFAULT_LIMIT: usize = 20;
