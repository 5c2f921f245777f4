//! `stockbook-ledger` — the durable ledger store.
//!
//! A single synchronous SQLite connection holds the master tables
//! (customers, suppliers, products), the append-only movement log, both
//! invoice ledgers, and the expense ledger. Stock levels are never stored;
//! they are derived on every read from the movement log.

pub mod balance;
pub mod expenses;
pub mod invoices;
pub mod movements;
pub mod parties;
pub mod products;
pub mod schema;
pub mod store;

pub use store::Ledger;
