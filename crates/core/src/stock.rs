//! Stock status classification and the derived stock-level record.

use serde::{Deserialize, Serialize};

use crate::codes::ProductCode;

/// Stock status of a product, derived from its balance and minimum limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    OutOfStock,
    Low,
    Normal,
}

impl StockStatus {
    /// Classify a balance against a minimum limit.
    ///
    /// Fixed priority order: a balance of zero or less is out of stock even
    /// when the limit is zero; otherwise anything under the limit is low.
    pub fn classify(balance: i64, minimum_limit: i64) -> Self {
        if balance <= 0 {
            StockStatus::OutOfStock
        } else if balance < minimum_limit {
            StockStatus::Low
        } else {
            StockStatus::Normal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::Low => "Low",
            StockStatus::Normal => "Normal",
        }
    }
}

/// Derived stock level for one product. Recomputed on every read; never
/// persisted, so it is always consistent with the latest committed movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub product: ProductCode,
    pub name: String,
    pub unit: Option<String>,
    pub total_in: i64,
    pub total_out: i64,
    pub balance: i64,
    pub minimum_limit: i64,
    pub status: StockStatus,
}

impl StockLevel {
    /// Build a stock level from aggregated in/out totals.
    pub fn from_totals(
        product: ProductCode,
        name: String,
        unit: Option<String>,
        total_in: i64,
        total_out: i64,
        minimum_limit: i64,
    ) -> Self {
        let balance = total_in - total_out;
        Self {
            product,
            name,
            unit,
            total_in,
            total_out,
            balance,
            minimum_limit,
            status: StockStatus::classify(balance, minimum_limit),
        }
    }
}
