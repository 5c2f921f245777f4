//! Domain error model.

use thiserror::Error;

/// Result type used across the ledger and its callers.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Deterministic business failures (validation, key collisions, missing
/// rows) have their own variants; anything the storage engine throws at us
/// is wrapped in [`LedgerError::Storage`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A natural key already exists on insert.
    #[error("{entity} '{key}' already exists")]
    DuplicateKey { entity: &'static str, key: String },

    /// The update/delete target does not exist.
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    /// A field failed validation (required field empty, negative price, ...).
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A movement quantity was zero or negative.
    #[error("invalid movement quantity: {0} (must be positive)")]
    InvalidQuantity(i64),

    /// An invoice commit was attempted with no line items.
    #[error("invoice has no line items")]
    EmptyInvoice,

    /// The invoice number is already present in the target ledger.
    #[error("invoice number '{0}' already exists")]
    DuplicateInvoiceNumber(String),

    /// Deletion was blocked because historical rows reference the key.
    #[error("{entity} '{key}' is referenced by existing records")]
    InUse { entity: &'static str, key: String },

    /// Underlying store failure. During an invoice commit this always means
    /// the whole transaction was rolled back.
    #[error("storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn duplicate_key(entity: &'static str, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            entity,
            key: key.into(),
        }
    }

    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn in_use(entity: &'static str, key: impl Into<String>) -> Self {
        Self::InUse {
            entity,
            key: key.into(),
        }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
