use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

// Both ledgers share one column layout. Amounts are decimal text so no
// precision is lost on the way through SQLite.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS trucking_accounts (
    id INTEGER PRIMARY KEY,
    account_number TEXT NOT NULL CHECK(length(account_number) BETWEEN 1 AND 255),
    account_type TEXT NOT NULL DEFAULT '' CHECK(length(account_type) <= 255),
    truck_type TEXT NOT NULL DEFAULT '' CHECK(length(truck_type) <= 255),
    plate_number TEXT CHECK(length(plate_number) <= 255),
    description TEXT NOT NULL DEFAULT '',
    debit TEXT NOT NULL DEFAULT '0',
    credit TEXT NOT NULL DEFAULT '0',
    final_total TEXT NOT NULL DEFAULT '0',
    remarks TEXT,
    reference_number TEXT CHECK(length(reference_number) <= 255),
    date TEXT,
    quantity TEXT,
    price TEXT,
    driver TEXT CHECK(length(driver) <= 255),
    route TEXT CHECK(length(route) <= 255),
    front_load TEXT CHECK(length(front_load) <= 255),
    back_load TEXT CHECK(length(back_load) <= 255),
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS salary_accounts (
    id INTEGER PRIMARY KEY,
    account_number TEXT NOT NULL CHECK(length(account_number) BETWEEN 1 AND 255),
    account_type TEXT NOT NULL DEFAULT '' CHECK(length(account_type) <= 255),
    truck_type TEXT NOT NULL DEFAULT '' CHECK(length(truck_type) <= 255),
    plate_number TEXT CHECK(length(plate_number) <= 255),
    description TEXT NOT NULL DEFAULT '',
    debit TEXT NOT NULL DEFAULT '0',
    credit TEXT NOT NULL DEFAULT '0',
    final_total TEXT NOT NULL DEFAULT '0',
    remarks TEXT,
    reference_number TEXT CHECK(length(reference_number) <= 255),
    date TEXT,
    quantity TEXT,
    price TEXT,
    driver TEXT CHECK(length(driver) <= 255),
    route TEXT CHECK(length(route) <= 255),
    front_load TEXT CHECK(length(front_load) <= 255),
    back_load TEXT CHECK(length(back_load) <= 255),
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    account_kind TEXT NOT NULL,
    import_date TEXT DEFAULT (datetime('now')),
    record_count INTEGER,
    checksum TEXT
);

CREATE INDEX IF NOT EXISTS idx_trucking_account_number ON trucking_accounts(account_number);
CREATE INDEX IF NOT EXISTS idx_salary_account_number ON salary_accounts(account_number);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
