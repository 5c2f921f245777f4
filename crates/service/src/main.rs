//! `stockbook` — open the ledger and print the dashboard snapshot.
//!
//! Usage: `stockbook [--json] [DB_PATH]`

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use stockbook_service::config::{database_path, ensure_parent_dir};
use stockbook_service::{BusinessService, RefreshGate};

struct Args {
    db_path: Option<PathBuf>,
    json: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        db_path: None,
        json: false,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => args.json = true,
            "--help" | "-h" => {
                println!("usage: stockbook [--json] [DB_PATH]");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown flag: {flag}"),
            path => {
                if args.db_path.replace(PathBuf::from(path)).is_some() {
                    bail!("expected at most one database path");
                }
            }
        }
    }
    Ok(args)
}

fn print_table(table: &stockbook_reports::ReportTable) {
    println!("{}", table.columns.join(" | "));
    for row in &table.rows {
        println!("{}", row.join(" | "));
    }
}

fn main() -> Result<()> {
    stockbook_observability::init();
    let args = parse_args()?;

    let db_path = database_path(args.db_path);
    ensure_parent_dir(&db_path)
        .with_context(|| format!("creating data directory for {}", db_path.display()))?;
    tracing::info!(path = %db_path.display(), "opening ledger");

    let service = BusinessService::open(&db_path)
        .with_context(|| format!("opening ledger at {}", db_path.display()))?;

    let gate = RefreshGate::new();
    let metrics = gate
        .run(|| service.dashboard_metrics())
        .completed()
        .context("dashboard refresh already in flight")??;
    let levels = service.get_all_balances()?;

    if args.json {
        let snapshot = serde_json::json!({
            "dashboard": metrics,
            "stock": levels,
        });
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("Today's sales:     {}", metrics.today_sales);
    println!("Today's purchases: {}", metrics.today_purchases);
    println!("Net profit:        {}", metrics.net_profit);
    println!("Customers:         {}", metrics.customer_count);
    println!("Products:          {}", metrics.product_count);
    println!("Inventory value:   {}", metrics.inventory_value);
    println!();
    print_table(&stockbook_reports::ReportTable::from_stock_levels(&levels));
    Ok(())
}
