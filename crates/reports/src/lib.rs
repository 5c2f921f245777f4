//! `stockbook-reports` — read-only aggregations over the ledger store.
//!
//! Every report is stateless and recomputed per invocation; there is no
//! caching layer between these queries and the tables.

pub mod dashboard;
pub mod sales;
pub mod stock;
pub mod table;

pub use dashboard::{DashboardMetrics, dashboard_metrics};
pub use sales::{MonthlySalesRow, SalesReportRow, TopCustomerRow};
pub use table::ReportTable;
