//! Low-stock and out-of-stock reports, built on the balance aggregator.

use stockbook_core::{LedgerResult, StockLevel, StockStatus};
use stockbook_ledger::Ledger;

/// Products whose balance is below their minimum limit (this includes the
/// out-of-stock ones), ascending by balance: worst first.
pub fn low_stock(ledger: &Ledger) -> LedgerResult<Vec<StockLevel>> {
    let mut levels: Vec<StockLevel> = ledger
        .stock_levels()?
        .into_iter()
        .filter(|l| l.balance < l.minimum_limit)
        .collect();
    levels.sort_by(|a, b| a.balance.cmp(&b.balance).then(a.product.cmp(&b.product)));
    Ok(levels)
}

/// Products with no stock left (balance of zero or less), ascending by
/// balance.
pub fn out_of_stock(ledger: &Ledger) -> LedgerResult<Vec<StockLevel>> {
    let mut levels: Vec<StockLevel> = ledger
        .stock_levels()?
        .into_iter()
        .filter(|l| l.status == StockStatus::OutOfStock)
        .collect();
    levels.sort_by(|a, b| a.balance.cmp(&b.balance).then(a.product.cmp(&b.product)));
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use stockbook_core::{Direction, Product, ProductCode};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed_product(ledger: &mut Ledger, code: &str, minimum_limit: i64) {
        ledger
            .add_product(&Product {
                code: ProductCode::new(code).unwrap(),
                name: format!("Product {code}"),
                unit: None,
                purchase_price: Decimal::from(5),
                sale_price: Decimal::from(8),
                minimum_limit,
                date_added: date(2026, 1, 2),
            })
            .unwrap();
    }

    fn adjust(ledger: &mut Ledger, code: &str, direction: Direction, quantity: i64) {
        ledger
            .append_movement(
                &ProductCode::new(code).unwrap(),
                direction,
                quantity,
                date(2026, 2, 1),
                None,
            )
            .unwrap();
    }

    fn seeded_ledger() -> Ledger {
        let mut ledger = Ledger::open_in_memory().unwrap();
        seed_product(&mut ledger, "P1", 10); // healthy
        seed_product(&mut ledger, "P2", 10); // low
        seed_product(&mut ledger, "P3", 10); // negative balance
        seed_product(&mut ledger, "P4", 10); // untouched, zero balance
        adjust(&mut ledger, "P1", Direction::In, 50);
        adjust(&mut ledger, "P2", Direction::In, 4);
        adjust(&mut ledger, "P3", Direction::Out, 2);
        ledger
    }

    #[test]
    fn low_stock_is_ascending_by_balance() {
        let ledger = seeded_ledger();
        let rows = low_stock(&ledger).unwrap();
        let balances: Vec<i64> = rows.iter().map(|l| l.balance).collect();
        assert_eq!(balances, vec![-2, 0, 4]);
        assert!(rows.iter().all(|l| l.balance < l.minimum_limit));
    }

    #[test]
    fn out_of_stock_only_lists_zero_or_negative_balances() {
        let ledger = seeded_ledger();
        let rows = out_of_stock(&ledger).unwrap();
        let codes: Vec<&str> = rows.iter().map(|l| l.product.as_str()).collect();
        assert_eq!(codes, vec!["P3", "P4"]);
        assert!(rows.iter().all(|l| l.status == StockStatus::OutOfStock));
    }

    #[test]
    fn empty_ledger_produces_empty_reports() {
        let ledger = Ledger::open_in_memory().unwrap();
        assert!(low_stock(&ledger).unwrap().is_empty());
        assert!(out_of_stock(&ledger).unwrap().is_empty());
    }
}
