//! Natural-key newtypes used across the ledger.
//!
//! Every master entity is keyed by a caller-meaningful code (customer code,
//! product code, invoice number), not a surrogate id. The newtypes guarantee
//! the code is trimmed and non-empty at construction, so downstream layers
//! never re-check.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Code of a customer or supplier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyCode(String);

/// Code of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCode(String);

/// Invoice number. Sales and purchases are separate namespaces; uniqueness
/// is enforced per ledger, not across both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceNumber(String);

macro_rules! impl_code_newtype {
    ($t:ty, $field:literal) => {
        impl $t {
            /// Create a code from user input. Leading/trailing whitespace is
            /// trimmed; an empty result is rejected.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, LedgerError> {
                let trimmed = raw.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(LedgerError::validation($field, "must not be empty"));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = LedgerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_code_newtype!(PartyCode, "code");
impl_code_newtype!(ProductCode, "product code");
impl_code_newtype!(InvoiceNumber, "invoice number");
