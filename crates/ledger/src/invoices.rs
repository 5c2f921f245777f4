//! The invoice commit protocol and invoice queries.
//!
//! A commit turns a validated draft into one header row, N detail rows, and
//! N movement rows inside a single transaction. On any failure nothing from
//! the invoice is visible to subsequent reads.

use rusqlite::{Connection, Row, Transaction, params};
use stockbook_core::{
    InvoiceDraft, InvoiceHeader, InvoiceKind, InvoiceNumber, InvoiceStatus, LedgerError,
    LedgerResult, LineItem, ProductCode, ValidatedInvoice,
};

use crate::movements::insert_movement;
use crate::parties::party_table;
use crate::store::{Ledger, code_col, decimal_col, storage};

pub(crate) fn header_table(kind: InvoiceKind) -> &'static str {
    match kind {
        InvoiceKind::Sales => "sales",
        InvoiceKind::Purchase => "purchases",
    }
}

fn detail_table(kind: InvoiceKind) -> &'static str {
    match kind {
        InvoiceKind::Sales => "sales_details",
        InvoiceKind::Purchase => "purchase_details",
    }
}

fn number_prefix(kind: InvoiceKind) -> &'static str {
    match kind {
        InvoiceKind::Sales => "INV-",
        InvoiceKind::Purchase => "PUR-",
    }
}

fn header_from_row(row: &Row<'_>) -> rusqlite::Result<InvoiceHeader> {
    Ok(InvoiceHeader {
        number: code_col(row, 0, InvoiceNumber::new)?,
        date: row.get(1)?,
        counterparty: code_col(row, 2, stockbook_core::PartyCode::new)?,
        total: decimal_col(row, 3)?,
        discount: decimal_col(row, 4)?,
        net_total: decimal_col(row, 5)?,
        status: code_col(row, 6, |raw| InvoiceStatus::parse(&raw))?,
    })
}

fn line_from_row(row: &Row<'_>) -> rusqlite::Result<LineItem> {
    Ok(LineItem {
        product: code_col(row, 0, ProductCode::new)?,
        quantity: row.get(1)?,
        price: decimal_col(row, 2)?,
        total: decimal_col(row, 3)?,
    })
}

/// Write header + details + movements. Runs inside the caller's transaction;
/// the first failing insert aborts the whole group.
fn write_invoice(
    tx: &Transaction<'_>,
    kind: InvoiceKind,
    draft: &InvoiceDraft,
    validated: &ValidatedInvoice,
) -> LedgerResult<()> {
    let header = header_table(kind);
    tx.execute(
        &format!(
            "INSERT INTO {header}
                 (invoice_number, invoice_date, counterparty_code, total, discount, net_total, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
        ),
        params![
            draft.number.as_str(),
            draft.date,
            draft.counterparty.as_str(),
            validated.total.to_string(),
            draft.discount.to_string(),
            validated.net_total.to_string(),
            InvoiceStatus::Open.as_str(),
        ],
    )
    .map_err(storage)?;

    let detail = detail_table(kind);
    let direction = kind.movement_direction();
    for line in &validated.lines {
        tx.execute(
            &format!(
                "INSERT INTO {detail} (invoice_number, product_code, quantity, price, total)
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            ),
            params![
                draft.number.as_str(),
                line.product.as_str(),
                line.quantity,
                line.price.to_string(),
                line.total.to_string(),
            ],
        )
        .map_err(storage)?;
        insert_movement(
            tx,
            &line.product,
            direction,
            line.quantity,
            draft.date,
            Some(draft.number.as_str()),
        )
        .map_err(storage)?;
    }
    Ok(())
}

fn invoice_exists(
    conn: &Connection,
    kind: InvoiceKind,
    number: &InvoiceNumber,
) -> LedgerResult<bool> {
    let header = header_table(kind);
    conn.query_row(
        &format!("SELECT 1 FROM {header} WHERE invoice_number = ?1"),
        params![number.as_str()],
        |_| Ok(()),
    )
    .map(|_| true)
    .or_else(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(false),
        other => Err(storage(other)),
    })
}

impl Ledger {
    /// Commit an invoice draft as one atomic unit.
    ///
    /// Preconditions run before any write: the number must be free in the
    /// target ledger, the counterparty must exist, and every line must name
    /// an existing product (quantities/prices are checked by
    /// [`InvoiceDraft::validate`]). Then header, details, and one movement
    /// per line (out for sales, in for purchases) are written inside a
    /// single transaction.
    pub fn commit_invoice(
        &mut self,
        kind: InvoiceKind,
        draft: &InvoiceDraft,
    ) -> LedgerResult<InvoiceNumber> {
        let validated = draft.validate()?;

        if invoice_exists(&self.conn, kind, &draft.number)? {
            return Err(LedgerError::DuplicateInvoiceNumber(
                draft.number.as_str().to_string(),
            ));
        }

        let counterparty_kind = kind.counterparty_kind();
        let party = party_table(counterparty_kind);
        if !self.row_exists(
            &format!("SELECT 1 FROM {party} WHERE code = ?1"),
            params![draft.counterparty.as_str()],
        )? {
            return Err(LedgerError::not_found(
                counterparty_kind.entity_name(),
                draft.counterparty.as_str(),
            ));
        }

        for line in &validated.lines {
            if !self.row_exists(
                "SELECT 1 FROM products WHERE code = ?1",
                params![line.product.as_str()],
            )? {
                return Err(LedgerError::validation(
                    "product",
                    format!("unknown product '{}'", line.product),
                ));
            }
        }

        let tx = self.conn.transaction().map_err(storage)?;
        write_invoice(&tx, kind, draft, &validated)?;
        tx.commit().map_err(storage)?;

        tracing::info!(
            kind = ?kind,
            number = %draft.number,
            lines = validated.lines.len(),
            net_total = %validated.net_total,
            "committed invoice"
        );
        Ok(draft.number.clone())
    }

    pub fn get_invoice(
        &self,
        kind: InvoiceKind,
        number: &InvoiceNumber,
    ) -> LedgerResult<InvoiceHeader> {
        let header = header_table(kind);
        self.conn
            .query_row(
                &format!(
                    "SELECT invoice_number, invoice_date, counterparty_code,
                            total, discount, net_total, status
                     FROM {header} WHERE invoice_number = ?1"
                ),
                params![number.as_str()],
                header_from_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    LedgerError::not_found(kind.entity_name(), number.as_str())
                }
                other => storage(other),
            })
    }

    /// Invoice headers of one ledger, newest first.
    pub fn list_invoices(&self, kind: InvoiceKind) -> LedgerResult<Vec<InvoiceHeader>> {
        let header = header_table(kind);
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT invoice_number, invoice_date, counterparty_code,
                        total, discount, net_total, status
                 FROM {header}
                 ORDER BY invoice_date DESC, invoice_number DESC"
            ))
            .map_err(storage)?;
        let rows = stmt
            .query_map([], header_from_row)
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;
        Ok(rows)
    }

    /// Stored line items of one invoice, in insertion order. Totals come
    /// back exactly as persisted; historical rows are never recomputed.
    pub fn invoice_lines(
        &self,
        kind: InvoiceKind,
        number: &InvoiceNumber,
    ) -> LedgerResult<Vec<LineItem>> {
        if !invoice_exists(&self.conn, kind, number)? {
            return Err(LedgerError::not_found(kind.entity_name(), number.as_str()));
        }
        let detail = detail_table(kind);
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT product_code, quantity, price, total
                 FROM {detail} WHERE invoice_number = ?1
                 ORDER BY id"
            ))
            .map_err(storage)?;
        let rows = stmt
            .query_map(params![number.as_str()], line_from_row)
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;
        Ok(rows)
    }

    /// Close an open invoice. The transition is append-only: a closed
    /// invoice cannot be reopened, and closing it twice is an error.
    pub fn close_invoice(&mut self, kind: InvoiceKind, number: &InvoiceNumber) -> LedgerResult<()> {
        let current = self.get_invoice(kind, number)?;
        if current.status == InvoiceStatus::Closed {
            return Err(LedgerError::validation(
                "status",
                format!("invoice '{number}' is already closed"),
            ));
        }
        let header = header_table(kind);
        self.conn
            .execute(
                &format!("UPDATE {header} SET status = 'closed' WHERE invoice_number = ?1"),
                params![number.as_str()],
            )
            .map_err(storage)?;
        tracing::info!(kind = ?kind, number = %number, "closed invoice");
        Ok(())
    }

    /// Next free number in the ledger's `INV-`/`PUR-` sequence.
    ///
    /// Caller-assigned numbers outside the pattern are ignored by the
    /// generator but still occupy their own uniqueness slot.
    pub fn next_invoice_number(&self, kind: InvoiceKind) -> LedgerResult<InvoiceNumber> {
        let header = header_table(kind);
        let prefix = number_prefix(kind);
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT invoice_number FROM {header} WHERE invoice_number LIKE ?1"
            ))
            .map_err(storage)?;
        let numbers = stmt
            .query_map(params![format!("{prefix}%")], |row| {
                row.get::<_, String>(0)
            })
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;

        let max = numbers
            .iter()
            .filter_map(|n| n[prefix.len()..].parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        InvoiceNumber::new(format!("{prefix}{:04}", max + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use rust_decimal::Decimal;
    use stockbook_core::{Direction, DraftLine, PartyCode, PartyKind};

    fn draft(number: &str, counterparty: &str, discount: i64, lines: &[(&str, i64, i64)]) -> InvoiceDraft {
        InvoiceDraft {
            number: InvoiceNumber::new(number).unwrap(),
            date: testutil::date(2026, 3, 14),
            counterparty: PartyCode::new(counterparty).unwrap(),
            discount: Decimal::from(discount),
            lines: lines
                .iter()
                .map(|(product, quantity, price)| DraftLine {
                    product: ProductCode::new(product).unwrap(),
                    quantity: *quantity,
                    price: Decimal::from(*price),
                })
                .collect(),
        }
    }

    fn seeded_ledger() -> Ledger {
        let mut ledger = testutil::ledger();
        testutil::seed_party(&mut ledger, PartyKind::Customer, "C1", "Alpha");
        testutil::seed_party(&mut ledger, PartyKind::Supplier, "S1", "Mill");
        testutil::seed_product(&mut ledger, "P1");
        testutil::seed_product(&mut ledger, "P2");
        // Opening stock so sales have something to move out.
        for code in ["P1", "P2"] {
            let code = ProductCode::new(code).unwrap();
            ledger
                .append_movement(&code, Direction::In, 100, testutil::date(2026, 3, 1), None)
                .unwrap();
        }
        ledger
    }

    #[test]
    fn sales_commit_writes_header_lines_and_out_movements() {
        let mut ledger = seeded_ledger();
        let draft = draft("INV-0001", "C1", 5, &[("P1", 3, 10), ("P2", 2, 5)]);

        ledger.commit_invoice(InvoiceKind::Sales, &draft).unwrap();

        let header = ledger
            .get_invoice(InvoiceKind::Sales, &draft.number)
            .unwrap();
        assert_eq!(header.total, Decimal::from(40));
        assert_eq!(header.discount, Decimal::from(5));
        assert_eq!(header.net_total, Decimal::from(35));
        assert_eq!(header.status, InvoiceStatus::Open);

        let lines = ledger
            .invoice_lines(InvoiceKind::Sales, &draft.number)
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].total, Decimal::from(30));
        assert_eq!(lines[1].total, Decimal::from(10));

        // One 'out' movement per line, referencing the invoice number.
        let p1 = ProductCode::new("P1").unwrap();
        let p2 = ProductCode::new("P2").unwrap();
        let movement = &ledger.list_movements(&p1).unwrap()[0];
        assert_eq!(movement.direction, Direction::Out);
        assert_eq!(movement.quantity, 3);
        assert_eq!(movement.reference.as_deref(), Some("INV-0001"));

        // Balances reflect the new movements exactly once.
        assert_eq!(ledger.stock_level(&p1).unwrap().balance, 97);
        assert_eq!(ledger.stock_level(&p2).unwrap().balance, 98);
    }

    #[test]
    fn purchase_commit_emits_in_movements() {
        let mut ledger = seeded_ledger();
        let draft = draft("PUR-0001", "S1", 0, &[("P1", 7, 4)]);

        ledger
            .commit_invoice(InvoiceKind::Purchase, &draft)
            .unwrap();

        let p1 = ProductCode::new("P1").unwrap();
        let movement = &ledger.list_movements(&p1).unwrap()[0];
        assert_eq!(movement.direction, Direction::In);
        assert_eq!(movement.quantity, 7);
        assert_eq!(ledger.stock_level(&p1).unwrap().balance, 107);
    }

    #[test]
    fn duplicate_invoice_number_has_zero_side_effects() {
        let mut ledger = seeded_ledger();
        let first = draft("INV-0001", "C1", 0, &[("P1", 3, 10)]);
        ledger.commit_invoice(InvoiceKind::Sales, &first).unwrap();

        let p1 = ProductCode::new("P1").unwrap();
        let balance_before = ledger.stock_level(&p1).unwrap().balance;
        let movements_before = ledger.list_movements(&p1).unwrap().len();

        let second = draft("INV-0001", "C1", 0, &[("P1", 50, 10)]);
        let err = ledger
            .commit_invoice(InvoiceKind::Sales, &second)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::DuplicateInvoiceNumber("INV-0001".to_string())
        );

        assert_eq!(ledger.stock_level(&p1).unwrap().balance, balance_before);
        assert_eq!(ledger.list_movements(&p1).unwrap().len(), movements_before);
        // The stored invoice is still the first one.
        let lines = ledger
            .invoice_lines(InvoiceKind::Sales, &first.number)
            .unwrap();
        assert_eq!(lines[0].quantity, 3);
    }

    #[test]
    fn sales_and_purchase_numbers_are_separate_namespaces() {
        let mut ledger = seeded_ledger();
        ledger
            .commit_invoice(InvoiceKind::Sales, &draft("N-1", "C1", 0, &[("P1", 1, 10)]))
            .unwrap();
        // Same number on the purchase ledger is fine.
        ledger
            .commit_invoice(
                InvoiceKind::Purchase,
                &draft("N-1", "S1", 0, &[("P1", 1, 4)]),
            )
            .unwrap();
    }

    #[test]
    fn unknown_counterparty_fails_before_any_write() {
        let mut ledger = seeded_ledger();
        let err = ledger
            .commit_invoice(
                InvoiceKind::Sales,
                &draft("INV-0001", "C9", 0, &[("P1", 1, 10)]),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
        assert!(ledger.list_invoices(InvoiceKind::Sales).unwrap().is_empty());
    }

    #[test]
    fn unknown_product_fails_before_any_write() {
        let mut ledger = seeded_ledger();
        let err = ledger
            .commit_invoice(
                InvoiceKind::Sales,
                &draft("INV-0001", "C1", 0, &[("P1", 1, 10), ("P9", 1, 10)]),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation { field: "product", .. }));
        assert!(ledger.list_invoices(InvoiceKind::Sales).unwrap().is_empty());
        // No movement for the valid first line either.
        let p1 = ProductCode::new("P1").unwrap();
        assert_eq!(ledger.list_movements(&p1).unwrap().len(), 1); // opening stock only
    }

    #[test]
    fn failure_mid_write_rolls_back_header_lines_and_movements() {
        let mut ledger = seeded_ledger();
        let draft = draft("INV-0001", "C1", 0, &[("P1", 3, 10), ("P2", 2, 5)]);

        // Bypass draft validation to hit the store's CHECK constraint on the
        // second detail row, after the header and first line were written.
        let mut validated = draft.validate().unwrap();
        validated.lines[1].quantity = 0;

        let tx = ledger.conn.transaction().unwrap();
        let err = write_invoice(&tx, InvoiceKind::Sales, &draft, &validated).unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
        drop(tx); // rollback

        assert!(ledger.list_invoices(InvoiceKind::Sales).unwrap().is_empty());
        let count: i64 = ledger
            .conn
            .query_row("SELECT COUNT(*) FROM sales_details", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        let p1 = ProductCode::new("P1").unwrap();
        assert_eq!(ledger.stock_level(&p1).unwrap().balance, 100);
    }

    #[test]
    fn close_invoice_is_append_only() {
        let mut ledger = seeded_ledger();
        let draft = draft("INV-0001", "C1", 0, &[("P1", 1, 10)]);
        ledger.commit_invoice(InvoiceKind::Sales, &draft).unwrap();

        ledger
            .close_invoice(InvoiceKind::Sales, &draft.number)
            .unwrap();
        let header = ledger
            .get_invoice(InvoiceKind::Sales, &draft.number)
            .unwrap();
        assert_eq!(header.status, InvoiceStatus::Closed);

        let err = ledger
            .close_invoice(InvoiceKind::Sales, &draft.number)
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation { field: "status", .. }));

        let missing = InvoiceNumber::new("INV-9999").unwrap();
        let err = ledger
            .close_invoice(InvoiceKind::Sales, &missing)
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[test]
    fn next_invoice_number_continues_the_sequence() {
        let mut ledger = seeded_ledger();
        assert_eq!(
            ledger.next_invoice_number(InvoiceKind::Sales).unwrap().as_str(),
            "INV-0001"
        );
        ledger
            .commit_invoice(InvoiceKind::Sales, &draft("INV-0007", "C1", 0, &[("P1", 1, 10)]))
            .unwrap();
        // Caller-assigned numbers outside the pattern are skipped.
        ledger
            .commit_invoice(InvoiceKind::Sales, &draft("LEGACY-3", "C1", 0, &[("P1", 1, 10)]))
            .unwrap();
        assert_eq!(
            ledger.next_invoice_number(InvoiceKind::Sales).unwrap().as_str(),
            "INV-0008"
        );
        assert_eq!(
            ledger.next_invoice_number(InvoiceKind::Purchase).unwrap().as_str(),
            "PUR-0001"
        );
    }

    #[test]
    fn invoices_are_listed_newest_first() {
        let mut ledger = seeded_ledger();
        let mut early = draft("INV-0001", "C1", 0, &[("P1", 1, 10)]);
        early.date = testutil::date(2026, 3, 1);
        let mut late = draft("INV-0002", "C1", 0, &[("P1", 1, 10)]);
        late.date = testutil::date(2026, 3, 20);
        ledger.commit_invoice(InvoiceKind::Sales, &early).unwrap();
        ledger.commit_invoice(InvoiceKind::Sales, &late).unwrap();

        let headers = ledger.list_invoices(InvoiceKind::Sales).unwrap();
        assert_eq!(headers[0].number.as_str(), "INV-0002");
        assert_eq!(headers[1].number.as_str(), "INV-0001");
    }
}
