//! `stockbook-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** types (no storage concerns): the error
//! taxonomy, natural-key newtypes, entity records, invoice draft validation,
//! and stock status classification.

pub mod codes;
pub mod error;
pub mod invoice;
pub mod records;
pub mod stock;

pub use codes::{InvoiceNumber, PartyCode, ProductCode};
pub use error::{LedgerError, LedgerResult};
pub use invoice::{
    DraftLine, InvoiceDraft, InvoiceHeader, InvoiceKind, InvoiceStatus, LineItem,
    ValidatedInvoice,
};
pub use records::{Contact, Direction, Expense, Movement, Party, PartyKind, Product};
pub use stock::{StockLevel, StockStatus};
