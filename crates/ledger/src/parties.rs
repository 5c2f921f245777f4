//! Customer/supplier repository.
//!
//! The two party kinds share one code path; the kind selects the table.

use rusqlite::{Row, params};
use stockbook_core::{Contact, LedgerError, LedgerResult, Party, PartyCode, PartyKind};

use crate::store::{Ledger, code_col, is_constraint_violation, storage};

/// Table holding a party kind.
pub(crate) fn party_table(kind: PartyKind) -> &'static str {
    match kind {
        PartyKind::Customer => "customers",
        PartyKind::Supplier => "suppliers",
    }
}

/// Invoice ledger that references a party kind.
fn referencing_table(kind: PartyKind) -> &'static str {
    match kind {
        PartyKind::Customer => "sales",
        PartyKind::Supplier => "purchases",
    }
}

fn party_from_row(row: &Row<'_>) -> rusqlite::Result<Party> {
    Ok(Party {
        code: code_col(row, 0, PartyCode::new)?,
        name: row.get(1)?,
        contact: Contact {
            phone: row.get(2)?,
            address: row.get(3)?,
            email: row.get(4)?,
        },
        registration_date: row.get(5)?,
    })
}

impl Ledger {
    /// Insert a new party. Fails with `DuplicateKey` if the code is taken.
    pub fn add_party(&mut self, kind: PartyKind, party: &Party) -> LedgerResult<()> {
        party.validate()?;
        let table = party_table(kind);
        if self.row_exists(
            &format!("SELECT 1 FROM {table} WHERE code = ?1"),
            params![party.code.as_str()],
        )? {
            return Err(LedgerError::duplicate_key(
                kind.entity_name(),
                party.code.as_str(),
            ));
        }
        self.conn
            .execute(
                &format!(
                    "INSERT INTO {table} (code, name, phone, address, email, registration_date)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
                ),
                params![
                    party.code.as_str(),
                    party.name,
                    party.contact.phone,
                    party.contact.address,
                    party.contact.email,
                    party.registration_date,
                ],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    LedgerError::duplicate_key(kind.entity_name(), party.code.as_str())
                } else {
                    storage(e)
                }
            })?;
        tracing::debug!(kind = ?kind, code = %party.code, "added party");
        Ok(())
    }

    /// Update name and contact fields. The registration date is immutable.
    pub fn update_party(&mut self, kind: PartyKind, party: &Party) -> LedgerResult<()> {
        party.validate()?;
        let table = party_table(kind);
        let changed = self
            .conn
            .execute(
                &format!(
                    "UPDATE {table} SET name = ?2, phone = ?3, address = ?4, email = ?5
                     WHERE code = ?1"
                ),
                params![
                    party.code.as_str(),
                    party.name,
                    party.contact.phone,
                    party.contact.address,
                    party.contact.email,
                ],
            )
            .map_err(storage)?;
        if changed == 0 {
            return Err(LedgerError::not_found(
                kind.entity_name(),
                party.code.as_str(),
            ));
        }
        Ok(())
    }

    /// Delete a party. Blocked with `InUse` while invoices reference it.
    pub fn delete_party(&mut self, kind: PartyKind, code: &PartyCode) -> LedgerResult<()> {
        let referencing = referencing_table(kind);
        if self.row_exists(
            &format!("SELECT 1 FROM {referencing} WHERE counterparty_code = ?1 LIMIT 1"),
            params![code.as_str()],
        )? {
            return Err(LedgerError::in_use(kind.entity_name(), code.as_str()));
        }
        let table = party_table(kind);
        let changed = self
            .conn
            .execute(
                &format!("DELETE FROM {table} WHERE code = ?1"),
                params![code.as_str()],
            )
            .map_err(storage)?;
        if changed == 0 {
            return Err(LedgerError::not_found(kind.entity_name(), code.as_str()));
        }
        tracing::debug!(kind = ?kind, code = %code, "deleted party");
        Ok(())
    }

    pub fn get_party(&self, kind: PartyKind, code: &PartyCode) -> LedgerResult<Party> {
        let table = party_table(kind);
        self.conn
            .query_row(
                &format!(
                    "SELECT code, name, phone, address, email, registration_date
                     FROM {table} WHERE code = ?1"
                ),
                params![code.as_str()],
                party_from_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    LedgerError::not_found(kind.entity_name(), code.as_str())
                }
                other => storage(other),
            })
    }

    /// Full row set, ordered by code ascending.
    pub fn list_parties(&self, kind: PartyKind) -> LedgerResult<Vec<Party>> {
        let table = party_table(kind);
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT code, name, phone, address, email, registration_date
                 FROM {table} ORDER BY code"
            ))
            .map_err(storage)?;
        let rows = stmt
            .query_map([], party_from_row)
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;
        Ok(rows)
    }
}
