//! Table definitions.
//!
//! Natural keys are primary keys throughout; the only autoincrement ids are
//! on movement, detail, and expense rows. CHECK constraints are the second
//! line of defense behind the domain-level validation.

/// Full schema, applied idempotently on every open.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    code              TEXT PRIMARY KEY,
    name              TEXT NOT NULL,
    phone             TEXT,
    address           TEXT,
    email             TEXT,
    registration_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS suppliers (
    code              TEXT PRIMARY KEY,
    name              TEXT NOT NULL,
    phone             TEXT,
    address           TEXT,
    email             TEXT,
    registration_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    code           TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    unit           TEXT,
    purchase_price TEXT NOT NULL DEFAULT '0',
    sale_price     TEXT NOT NULL DEFAULT '0',
    minimum_limit  INTEGER NOT NULL DEFAULT 10 CHECK (minimum_limit >= 0),
    date_added     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS inventory_movements (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    product_code TEXT NOT NULL REFERENCES products(code),
    direction    TEXT NOT NULL CHECK (direction IN ('in', 'out')),
    quantity     INTEGER NOT NULL CHECK (quantity > 0),
    date         TEXT NOT NULL,
    reference    TEXT
);

CREATE INDEX IF NOT EXISTS idx_movements_product
    ON inventory_movements(product_code);

CREATE TABLE IF NOT EXISTS sales (
    invoice_number    TEXT PRIMARY KEY,
    invoice_date      TEXT NOT NULL,
    counterparty_code TEXT NOT NULL REFERENCES customers(code),
    total             TEXT NOT NULL,
    discount          TEXT NOT NULL,
    net_total         TEXT NOT NULL,
    status            TEXT NOT NULL DEFAULT 'open' CHECK (status IN ('open', 'closed'))
);

CREATE TABLE IF NOT EXISTS sales_details (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    invoice_number TEXT NOT NULL REFERENCES sales(invoice_number),
    product_code   TEXT NOT NULL REFERENCES products(code),
    quantity       INTEGER NOT NULL CHECK (quantity > 0),
    price          TEXT NOT NULL,
    total          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS purchases (
    invoice_number    TEXT PRIMARY KEY,
    invoice_date      TEXT NOT NULL,
    counterparty_code TEXT NOT NULL REFERENCES suppliers(code),
    total             TEXT NOT NULL,
    discount          TEXT NOT NULL,
    net_total         TEXT NOT NULL,
    status            TEXT NOT NULL DEFAULT 'open' CHECK (status IN ('open', 'closed'))
);

CREATE TABLE IF NOT EXISTS purchase_details (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    invoice_number TEXT NOT NULL REFERENCES purchases(invoice_number),
    product_code   TEXT NOT NULL REFERENCES products(code),
    quantity       INTEGER NOT NULL CHECK (quantity > 0),
    price          TEXT NOT NULL,
    total          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    id     INTEGER PRIMARY KEY AUTOINCREMENT,
    title  TEXT NOT NULL,
    amount TEXT NOT NULL,
    date   TEXT NOT NULL,
    notes  TEXT
);
"#;
