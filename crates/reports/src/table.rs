//! Tabular report output for the presentation boundary.
//!
//! Reports are computed as typed row structs; a `ReportTable` is the last
//! step before display, never an internal exchange format.

use serde::Serialize;
use stockbook_core::StockLevel;

use crate::sales::{MonthlySalesRow, SalesReportRow, TopCustomerRow};

/// Named columns plus stringified rows, ready for a table widget or a
/// terminal printer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn from_sales(rows: &[SalesReportRow]) -> Self {
        Self {
            columns: vec![
                "Invoice Number",
                "Date",
                "Customer",
                "Total",
                "Discount",
                "Net Total",
                "Status",
            ],
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        r.number.to_string(),
                        r.date.to_string(),
                        r.customer_name.clone(),
                        r.total.to_string(),
                        r.discount.to_string(),
                        r.net_total.to_string(),
                        r.status.as_str().to_string(),
                    ]
                })
                .collect(),
        }
    }

    pub fn from_monthly_sales(rows: &[MonthlySalesRow]) -> Self {
        Self {
            columns: vec!["Month", "Invoice Count", "Total", "Discount", "Net Total"],
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        r.month.clone(),
                        r.invoice_count.to_string(),
                        r.total.to_string(),
                        r.discount.to_string(),
                        r.net_total.to_string(),
                    ]
                })
                .collect(),
        }
    }

    pub fn from_top_customers(rows: &[TopCustomerRow]) -> Self {
        Self {
            columns: vec!["Customer Name", "Invoice Count", "Net Total"],
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        r.name.clone(),
                        r.invoice_count.to_string(),
                        r.net_total.to_string(),
                    ]
                })
                .collect(),
        }
    }

    pub fn from_stock_levels(levels: &[StockLevel]) -> Self {
        Self {
            columns: vec![
                "Product Code",
                "Product Name",
                "Current Balance",
                "Minimum Limit",
                "Status",
            ],
            rows: levels
                .iter()
                .map(|l| {
                    vec![
                        l.product.to_string(),
                        l.name.clone(),
                        l.balance.to_string(),
                        l.minimum_limit.to_string(),
                        l.status.as_str().to_string(),
                    ]
                })
                .collect(),
        }
    }
}
