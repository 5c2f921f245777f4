//! Typed entity records.
//!
//! Records are constructed once at the store boundary and passed around as
//! structs, never as positional row tuples.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::codes::{PartyCode, ProductCode};
use crate::error::{LedgerError, LedgerResult};

/// Party kind: customer or supplier. The two are structurally identical and
/// stored in separate tables; the kind picks the table and the invoice
/// ledger the party can appear on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    Customer,
    Supplier,
}

impl PartyKind {
    /// Entity name used in error messages.
    pub fn entity_name(self) -> &'static str {
        match self {
            PartyKind::Customer => "customer",
            PartyKind::Supplier => "supplier",
        }
    }
}

/// Contact information for a party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
}

/// A customer or supplier.
///
/// `registration_date` is set at creation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub code: PartyCode,
    pub name: String,
    pub contact: Contact,
    pub registration_date: NaiveDate,
}

impl Party {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::validation("name", "must not be empty"));
        }
        Ok(())
    }
}

/// A product. Prices and the minimum stock limit are mutable; there is no
/// stored "current quantity" field — stock is always derived from movements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub code: ProductCode,
    pub name: String,
    pub unit: Option<String>,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    /// Threshold below which the product is classified as low stock.
    pub minimum_limit: i64,
    pub date_added: NaiveDate,
}

/// Default minimum stock limit for new products.
pub const DEFAULT_MINIMUM_LIMIT: i64 = 10;

impl Product {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::validation("name", "must not be empty"));
        }
        if self.purchase_price.is_sign_negative() {
            return Err(LedgerError::validation(
                "purchase price",
                "must not be negative",
            ));
        }
        if self.sale_price.is_sign_negative() {
            return Err(LedgerError::validation("sale price", "must not be negative"));
        }
        if self.minimum_limit < 0 {
            return Err(LedgerError::validation(
                "minimum limit",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }

    pub fn parse(s: &str) -> LedgerResult<Self> {
        match s {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            other => Err(LedgerError::validation(
                "direction",
                format!("unknown direction '{other}'"),
            )),
        }
    }
}

/// An append-only stock movement fact. Never edited after creation;
/// corrections are new offsetting movements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: i64,
    pub product: ProductCode,
    pub direction: Direction,
    pub quantity: i64,
    pub date: NaiveDate,
    /// Free text, typically the invoice number that produced the movement.
    pub reference: Option<String>,
}

/// An expense row: an independent ledger, not linked to inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub title: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
}
