use rusqlite::Connection;

use crate::error::Result;
use crate::models::{AccountKind, LedgerRow};
use crate::runner::RecordSink;

/// Writes each row to the ledger table of its account kind.
pub struct SqliteSink<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteSink<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl RecordSink for SqliteSink<'_> {
    fn persist(&mut self, kind: AccountKind, row: &LedgerRow) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (account_number, account_type, truck_type, plate_number, description, \
             debit, credit, final_total, remarks, reference_number, date, quantity, price, \
             driver, route, front_load, back_load) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            kind.table()
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        stmt.execute(rusqlite::params![
            row.account_number,
            row.account_type,
            row.truck_type,
            row.plate_number,
            row.description,
            row.debit.to_string(),
            row.credit.to_string(),
            row.final_total.to_string(),
            row.remarks,
            row.reference_number,
            row.date.map(|d| d.format("%Y-%m-%d").to_string()),
            row.quantity.map(|q| q.to_string()),
            row.price.map(|p| p.to_string()),
            row.trip.driver,
            row.trip.route,
            row.trip.front_load,
            row.trip.back_load,
        ])?;
        Ok(())
    }
}

/// Number of rows stored in a ledger.
pub fn count_entries(conn: &Connection, kind: AccountKind) -> Result<i64> {
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", kind.table()), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}
