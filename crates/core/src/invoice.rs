//! Invoice drafts, headers, and line items.
//!
//! A draft is the in-memory, not-yet-committed header + line-item set built
//! by the presentation layer. [`InvoiceDraft::validate`] is the fail-fast
//! half of the commit protocol: it runs before any write and produces the
//! computed totals the store persists.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::codes::{InvoiceNumber, PartyCode, ProductCode};
use crate::error::{LedgerError, LedgerResult};
use crate::records::{Direction, PartyKind};

/// The two invoice ledgers. Structurally identical; the kind selects the
/// counterparty side and the movement direction emitted on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceKind {
    Sales,
    Purchase,
}

impl InvoiceKind {
    /// A sale moves stock out; a purchase moves stock in.
    pub fn movement_direction(self) -> Direction {
        match self {
            InvoiceKind::Sales => Direction::Out,
            InvoiceKind::Purchase => Direction::In,
        }
    }

    pub fn counterparty_kind(self) -> PartyKind {
        match self {
            InvoiceKind::Sales => PartyKind::Customer,
            InvoiceKind::Purchase => PartyKind::Supplier,
        }
    }

    pub fn entity_name(self) -> &'static str {
        match self {
            InvoiceKind::Sales => "sales invoice",
            InvoiceKind::Purchase => "purchase invoice",
        }
    }
}

/// Invoice status. The only transition is `open -> closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Open,
    Closed,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Open => "open",
            InvoiceStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> LedgerResult<Self> {
        match s {
            "open" => Ok(InvoiceStatus::Open),
            "closed" => Ok(InvoiceStatus::Closed),
            other => Err(LedgerError::validation(
                "status",
                format!("unknown invoice status '{other}'"),
            )),
        }
    }
}

/// A line item as entered on a draft: the line total is computed, not typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    pub product: ProductCode,
    pub quantity: i64,
    pub price: Decimal,
}

/// A committed line item. `total` is the stored value; historical invoices
/// are never recomputed at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product: ProductCode,
    pub quantity: i64,
    pub price: Decimal,
    pub total: Decimal,
}

/// A committed invoice header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    pub number: InvoiceNumber,
    pub date: NaiveDate,
    pub counterparty: PartyCode,
    pub total: Decimal,
    pub discount: Decimal,
    pub net_total: Decimal,
    pub status: InvoiceStatus,
}

/// An in-memory invoice awaiting validation and persistence.
///
/// `discount` is an absolute amount subtracted from the line-item total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub number: InvoiceNumber,
    pub date: NaiveDate,
    pub counterparty: PartyCode,
    pub discount: Decimal,
    pub lines: Vec<DraftLine>,
}

/// A draft that passed validation, with totals computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInvoice {
    pub total: Decimal,
    pub net_total: Decimal,
    pub lines: Vec<LineItem>,
}

impl InvoiceDraft {
    /// Validate the draft and compute its totals.
    ///
    /// Checks, in order: at least one line; per line a positive quantity and
    /// a non-negative price; a discount within `0..=total`. Product
    /// resolvability and invoice-number uniqueness are checked by the store,
    /// which sees the tables.
    pub fn validate(&self) -> LedgerResult<ValidatedInvoice> {
        if self.lines.is_empty() {
            return Err(LedgerError::EmptyInvoice);
        }

        let mut total = Decimal::ZERO;
        let mut lines = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            if line.quantity <= 0 {
                return Err(LedgerError::validation(
                    "quantity",
                    format!(
                        "line for product '{}' has non-positive quantity {}",
                        line.product, line.quantity
                    ),
                ));
            }
            if line.price.is_sign_negative() {
                return Err(LedgerError::validation(
                    "price",
                    format!("line for product '{}' has negative price", line.product),
                ));
            }
            let line_total = line.price * Decimal::from(line.quantity);
            total += line_total;
            lines.push(LineItem {
                product: line.product.clone(),
                quantity: line.quantity,
                price: line.price,
                total: line_total,
            });
        }

        if self.discount.is_sign_negative() {
            return Err(LedgerError::validation("discount", "must not be negative"));
        }
        if self.discount > total {
            return Err(LedgerError::validation(
                "discount",
                format!("discount {} exceeds invoice total {}", self.discount, total),
            ));
        }

        Ok(ValidatedInvoice {
            total,
            net_total: total - self.discount,
            lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(discount: Decimal, lines: Vec<DraftLine>) -> InvoiceDraft {
        InvoiceDraft {
            number: InvoiceNumber::new("INV-1").unwrap(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            counterparty: PartyCode::new("C1").unwrap(),
            discount,
            lines,
        }
    }

    fn line(product: &str, quantity: i64, price: i64) -> DraftLine {
        DraftLine {
            product: ProductCode::new(product).unwrap(),
            quantity,
            price: Decimal::from(price),
        }
    }

    #[test]
    fn totals_are_computed_from_lines() {
        let validated = draft(Decimal::from(5), vec![line("P1", 3, 10), line("P2", 2, 5)])
            .validate()
            .unwrap();
        assert_eq!(validated.total, Decimal::from(40));
        assert_eq!(validated.net_total, Decimal::from(35));
        assert_eq!(validated.lines[0].total, Decimal::from(30));
        assert_eq!(validated.lines[1].total, Decimal::from(10));
    }

    #[test]
    fn empty_draft_is_rejected() {
        let err = draft(Decimal::ZERO, vec![]).validate().unwrap_err();
        assert_eq!(err, LedgerError::EmptyInvoice);
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let err = draft(Decimal::ZERO, vec![line("P1", 0, 10)])
            .validate()
            .unwrap_err();
        match err {
            LedgerError::Validation { field, .. } => assert_eq!(field, "quantity"),
            _ => panic!("expected validation error"),
        }
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = draft(Decimal::ZERO, vec![line("P1", 1, -10)])
            .validate()
            .unwrap_err();
        match err {
            LedgerError::Validation { field, .. } => assert_eq!(field, "price"),
            _ => panic!("expected validation error"),
        }
    }

    #[test]
    fn discount_cannot_exceed_total() {
        let err = draft(Decimal::from(41), vec![line("P1", 4, 10)])
            .validate()
            .unwrap_err();
        match err {
            LedgerError::Validation { field, .. } => assert_eq!(field, "discount"),
            _ => panic!("expected validation error"),
        }
    }

    #[test]
    fn sales_move_stock_out_purchases_move_stock_in() {
        assert_eq!(InvoiceKind::Sales.movement_direction(), Direction::Out);
        assert_eq!(InvoiceKind::Purchase.movement_direction(), Direction::In);
        assert_eq!(InvoiceKind::Sales.counterparty_kind(), PartyKind::Customer);
        assert_eq!(
            InvoiceKind::Purchase.counterparty_kind(),
            PartyKind::Supplier
        );
    }
}
