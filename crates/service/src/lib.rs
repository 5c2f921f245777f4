//! `stockbook-service` — the boundary contract consumed by a presentation
//! layer (forms, CLI, or web UI).
//!
//! `BusinessService` wraps the ledger handle and exposes the full operation
//! set: master-entity CRUD, invoice commits, balances, reports, dashboard
//! metrics, and expenses. It holds no state of its own beyond the handle;
//! every read goes back to the store.

pub mod config;
pub mod refresh;

use std::path::Path;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use stockbook_core::{
    Direction, Expense, InvoiceDraft, InvoiceHeader, InvoiceKind, InvoiceNumber, LedgerResult,
    LineItem, Movement, Party, PartyCode, PartyKind, Product, ProductCode, StockLevel,
};
use stockbook_ledger::Ledger;
use stockbook_reports::sales::TOP_CUSTOMERS_DEFAULT_LIMIT;
use stockbook_reports::{DashboardMetrics, ReportTable, dashboard_metrics, sales, stock};

pub use refresh::RefreshGate;

/// Report selector for [`BusinessService::query_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    DailySales,
    MonthlySales,
    TopCustomers,
    LowStock,
    OutOfStock,
}

/// Optional report parameters. Missing dates default to today; a missing
/// limit defaults to the report's own default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

/// The application facade over one open ledger.
pub struct BusinessService {
    ledger: Ledger,
}

impl BusinessService {
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        Ok(Self {
            ledger: Ledger::open(path)?,
        })
    }

    pub fn open_in_memory() -> LedgerResult<Self> {
        Ok(Self {
            ledger: Ledger::open_in_memory()?,
        })
    }

    // --- customers ---

    pub fn list_customers(&self) -> LedgerResult<Vec<Party>> {
        self.ledger.list_parties(PartyKind::Customer)
    }

    pub fn add_customer(&mut self, customer: &Party) -> LedgerResult<()> {
        self.ledger.add_party(PartyKind::Customer, customer)
    }

    pub fn update_customer(&mut self, customer: &Party) -> LedgerResult<()> {
        self.ledger.update_party(PartyKind::Customer, customer)
    }

    pub fn delete_customer(&mut self, code: &PartyCode) -> LedgerResult<()> {
        self.ledger.delete_party(PartyKind::Customer, code)
    }

    // --- suppliers ---

    pub fn list_suppliers(&self) -> LedgerResult<Vec<Party>> {
        self.ledger.list_parties(PartyKind::Supplier)
    }

    pub fn add_supplier(&mut self, supplier: &Party) -> LedgerResult<()> {
        self.ledger.add_party(PartyKind::Supplier, supplier)
    }

    pub fn update_supplier(&mut self, supplier: &Party) -> LedgerResult<()> {
        self.ledger.update_party(PartyKind::Supplier, supplier)
    }

    pub fn delete_supplier(&mut self, code: &PartyCode) -> LedgerResult<()> {
        self.ledger.delete_party(PartyKind::Supplier, code)
    }

    // --- products ---

    pub fn list_products(&self) -> LedgerResult<Vec<Product>> {
        self.ledger.list_products()
    }

    pub fn add_product(&mut self, product: &Product) -> LedgerResult<()> {
        self.ledger.add_product(product)
    }

    pub fn update_product(&mut self, product: &Product) -> LedgerResult<()> {
        self.ledger.update_product(product)
    }

    pub fn delete_product(&mut self, code: &ProductCode) -> LedgerResult<()> {
        self.ledger.delete_product(code)
    }

    // --- invoices ---

    /// Commit a draft to the given ledger; see the store for the atomicity
    /// contract.
    pub fn commit_invoice(
        &mut self,
        kind: InvoiceKind,
        draft: &InvoiceDraft,
    ) -> LedgerResult<InvoiceNumber> {
        self.ledger.commit_invoice(kind, draft)
    }

    pub fn list_invoices(&self, kind: InvoiceKind) -> LedgerResult<Vec<InvoiceHeader>> {
        self.ledger.list_invoices(kind)
    }

    pub fn invoice_lines(
        &self,
        kind: InvoiceKind,
        number: &InvoiceNumber,
    ) -> LedgerResult<Vec<LineItem>> {
        self.ledger.invoice_lines(kind, number)
    }

    pub fn close_invoice(&mut self, kind: InvoiceKind, number: &InvoiceNumber) -> LedgerResult<()> {
        self.ledger.close_invoice(kind, number)
    }

    pub fn next_invoice_number(&self, kind: InvoiceKind) -> LedgerResult<InvoiceNumber> {
        self.ledger.next_invoice_number(kind)
    }

    // --- stock ---

    /// Manual stock adjustment, outside any invoice.
    pub fn record_adjustment(
        &mut self,
        product: &ProductCode,
        direction: Direction,
        quantity: i64,
        date: NaiveDate,
        reference: Option<&str>,
    ) -> LedgerResult<()> {
        self.ledger
            .append_movement(product, direction, quantity, date, reference)
    }

    pub fn movement_history(&self, product: &ProductCode) -> LedgerResult<Vec<Movement>> {
        self.ledger.list_movements(product)
    }

    pub fn get_balance(&self, product: &ProductCode) -> LedgerResult<StockLevel> {
        self.ledger.stock_level(product)
    }

    pub fn get_all_balances(&self) -> LedgerResult<Vec<StockLevel>> {
        self.ledger.stock_levels()
    }

    // --- reports ---

    pub fn query_report(&self, kind: ReportKind, params: ReportParams) -> LedgerResult<ReportTable> {
        let today = today();
        match kind {
            ReportKind::DailySales => {
                let from = params.from.unwrap_or(today);
                let to = params.to.unwrap_or(from);
                let rows = sales::sales_between(&self.ledger, from, to)?;
                Ok(ReportTable::from_sales(&rows))
            }
            ReportKind::MonthlySales => {
                let rows = sales::monthly_sales(&self.ledger)?;
                Ok(ReportTable::from_monthly_sales(&rows))
            }
            ReportKind::TopCustomers => {
                let limit = params.limit.unwrap_or(TOP_CUSTOMERS_DEFAULT_LIMIT);
                let rows = sales::top_customers(&self.ledger, limit)?;
                Ok(ReportTable::from_top_customers(&rows))
            }
            ReportKind::LowStock => {
                let rows = stock::low_stock(&self.ledger)?;
                Ok(ReportTable::from_stock_levels(&rows))
            }
            ReportKind::OutOfStock => {
                let rows = stock::out_of_stock(&self.ledger)?;
                Ok(ReportTable::from_stock_levels(&rows))
            }
        }
    }

    // --- dashboard ---

    pub fn dashboard_metrics(&self) -> LedgerResult<DashboardMetrics> {
        dashboard_metrics(&self.ledger, today())
    }

    /// Dashboard metrics for an explicit date (tests, backdated views).
    pub fn dashboard_metrics_on(&self, date: NaiveDate) -> LedgerResult<DashboardMetrics> {
        dashboard_metrics(&self.ledger, date)
    }

    // --- expenses ---

    pub fn add_expense(
        &mut self,
        title: &str,
        amount: Decimal,
        date: NaiveDate,
        notes: Option<&str>,
    ) -> LedgerResult<i64> {
        self.ledger.add_expense(title, amount, date, notes)
    }

    pub fn list_expenses(&self) -> LedgerResult<Vec<Expense>> {
        self.ledger.list_expenses()
    }

    pub fn delete_expense(&mut self, id: i64) -> LedgerResult<()> {
        self.ledger.delete_expense(id)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
