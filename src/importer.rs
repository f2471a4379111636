use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{AccountKind, EnrichMode};
use crate::runner::{IngestionRunner, PreviewSummary, UploadSummary};
use crate::store::SqliteSink;
use crate::table::{Record, Table};

/// Spreadsheet header → ledger field. Headers not listed pass through.
pub const COLUMN_MAPPING: &[(&str, &str)] = &[
    ("AccountNumber", "account_number"),
    ("AccountType", "account_type"),
    ("TruckType", "truck_type"),
    ("PlateNumber", "plate_number"),
    ("Description", "description"),
    ("Debit", "debit"),
    ("Credit", "credit"),
    ("FinalTotal", "final_total"),
    ("Remarks", "remarks"),
    ("ReferenceNumber", "reference_number"),
    ("Date", "date"),
    ("Quantity", "quantity"),
    ("Price", "price"),
    ("Driver", "driver"),
    ("Route", "route"),
    ("Front_Load", "front_load"),
    ("Back_Load", "back_load"),
];

const SUBTOTAL_MARKER: &str = "total for";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    // Two-digit years first; "%Y" would read "25" as year 25.
    "%m/%d/%y",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn parse_amount(raw: &str) -> Decimal {
    let s: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '"' | '$' | '₱') && !c.is_whitespace())
        .collect();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        let value = parse_plain_amount(inner);
        return if value.is_zero() { value } else { -value };
    }
    parse_plain_amount(&s)
}

fn parse_plain_amount(s: &str) -> Decimal {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .unwrap_or(Decimal::ZERO)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

fn is_subtotal_row(record: &Record<'_>) -> bool {
    record
        .cells()
        .iter()
        .any(|cell| cell.to_lowercase().contains(SUBTOTAL_MARKER))
}

// ---------------------------------------------------------------------------
// Table preparation
// ---------------------------------------------------------------------------

/// Rename headers to ledger fields and drop the sheet's subtotal rows.
/// A sheet without an account number column yields no ledger rows.
pub fn prepare_table(table: &mut Table) -> Result<()> {
    table.rename_columns(COLUMN_MAPPING);
    if !table.has_column("account_number") {
        tracing::warn!("sheet has no AccountNumber column; every row will be skipped");
    }
    let before = table.len();
    table.retain_rows(|record| !is_subtotal_row(record));
    tracing::debug!(
        columns = ?table.headers(),
        dropped = before - table.len(),
        "prepared ledger table"
    );
    Ok(())
}

pub fn load_ledger_table(file_path: &Path) -> Result<Table> {
    let mut table = Table::from_path(file_path)?;
    prepare_table(&mut table)?;
    if table.is_empty() {
        tracing::warn!("{} has no ledger rows", file_path.display());
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// upload / preview
// ---------------------------------------------------------------------------

/// Normalize every row of the file and persist it to the kind's ledger.
/// Rows that fail to save are reported in the summary, not as an error.
pub fn upload_file(
    conn: &Connection,
    file_path: &Path,
    kind: AccountKind,
    mode: EnrichMode,
) -> Result<UploadSummary> {
    let table = load_ledger_table(file_path)?;
    let checksum = compute_checksum(file_path)?;

    if let Some(previous) = previous_upload(conn, &checksum, kind)? {
        tracing::info!(%previous, "file was uploaded before; re-normalizing");
    }

    let runner = IngestionRunner::new(kind, mode);
    let tx = conn.unchecked_transaction()?;
    let summary = {
        let mut sink = SqliteSink::new(&tx);
        runner.upload(&table, &mut sink)
    };
    tx.execute(
        "INSERT INTO imports (filename, account_kind, record_count, checksum) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            file_path.file_name().and_then(|n| n.to_str()).unwrap_or(""),
            kind.key(),
            summary.created_count as i64,
            checksum,
        ],
    )?;
    tx.commit()?;
    Ok(summary)
}

/// Same normalization as [`upload_file`] without touching any store.
pub fn preview_file(file_path: &Path, kind: AccountKind, mode: EnrichMode) -> Result<PreviewSummary> {
    let table = load_ledger_table(file_path)?;
    Ok(IngestionRunner::new(kind, mode).preview(&table))
}

fn previous_upload(conn: &Connection, checksum: &str, kind: AccountKind) -> Result<Option<String>> {
    let mut stmt = conn.prepare(
        "SELECT import_date FROM imports WHERE checksum = ?1 AND account_kind = ?2 ORDER BY id DESC LIMIT 1",
    )?;
    let mut rows = stmt.query(rusqlite::params![checksum, kind.key()])?;
    match rows.next()? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::error::HaulbookError;
    use rust_decimal_macros::dec;

    const LEDGER_HEADER: &str = "AccountNumber,AccountType,Description,Debit,Credit,FinalTotal,Remarks,Date,Driver,Route,Front_Load,Back_Load";

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn write_ledger_csv(dir: &Path, name: &str, rows: &[&str]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut content = format!("{LEDGER_HEADER}\n");
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        std::fs::write(&path, &content).unwrap();
        path
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), dec!(1234.56));
        assert_eq!(parse_amount("\"500.00\""), dec!(500.00));
        assert_eq!(parse_amount("  -42.50  "), dec!(-42.50));
        assert_eq!(parse_amount("0"), Decimal::ZERO);
        assert_eq!(parse_amount("not_a_number"), Decimal::ZERO);
        assert_eq!(parse_amount(""), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_parenthesized_negatives() {
        assert_eq!(parse_amount("(500.00)"), dec!(-500.00));
        assert_eq!(parse_amount("($1,200.00)"), dec!(-1200.00));
    }

    #[test]
    fn test_parse_amount_currency_symbol() {
        assert_eq!(parse_amount("$50.00"), dec!(50.00));
        assert_eq!(parse_amount("₱ 2,500"), dec!(2500));
        assert_eq!(parse_amount("-$50.00"), dec!(-50.00));
    }

    #[test]
    fn test_parse_amount_scientific_notation() {
        assert_eq!(parse_amount("1.5e3"), dec!(1500));
    }

    #[test]
    fn test_parse_date_formats() {
        let jan15 = NaiveDate::from_ymd_opt(2025, 1, 15);
        assert_eq!(parse_date("2025-01-15"), jan15);
        assert_eq!(parse_date("2025-01-15 00:00:00"), jan15);
        assert_eq!(parse_date("2025-01-15T08:30:00"), jan15);
        assert_eq!(parse_date("2025/01/15"), jan15);
        assert_eq!(parse_date("01/15/2025"), jan15);
        assert_eq!(parse_date("1/15/25"), jan15);
        assert_eq!(parse_date("15-Jan-2025"), jan15);
        assert_eq!(parse_date("Jan 15, 2025"), jan15);
        assert_eq!(parse_date("January 15, 2025"), jan15);
    }

    #[test]
    fn test_parse_date_rejects_invalid_dates() {
        assert_eq!(parse_date("13/45/2025"), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_prepare_table_renames_and_drops_subtotals() {
        let csv = "AccountNumber,Description,Front_Load\nA1,Fuel,\nA1,Total for A1,\n,x,TOTAL FOR ALL\n";
        let mut table = Table::from_csv_reader(csv.as_bytes()).unwrap();
        prepare_table(&mut table).unwrap();
        assert!(table.has_column("account_number"));
        assert!(table.has_column("front_load"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_prepare_table_without_account_number_column() {
        let mut table = Table::from_csv_reader("Account,Debit\nA1,1\n".as_bytes()).unwrap();
        prepare_table(&mut table).unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.has_column("account_number"));
    }

    #[test]
    fn test_preview_file_without_account_number_column_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        std::fs::write(&path, "Description,Remarks\nTrip,x\n").unwrap();
        let preview = preview_file(&path, AccountKind::Trucking, EnrichMode::Overwrite).unwrap();
        assert_eq!(preview.total_rows, 0);
        assert!(preview.preview_data.is_empty());
    }

    #[test]
    fn test_upload_file_without_account_number_column_creates_nothing() {
        let (dir, conn) = test_db();
        let path = dir.path().join("sheet.csv");
        std::fs::write(&path, "Description,Remarks\nTrip,x\n").unwrap();
        let summary = upload_file(&conn, &path, AccountKind::Trucking, EnrichMode::Overwrite).unwrap();
        assert_eq!(summary.created_count, 0);
        assert!(summary.errors.is_empty());
        assert_eq!(count(&conn, "trucking_accounts"), 0);
    }

    #[test]
    fn test_upload_file_persists_rows() {
        let (dir, conn) = test_db();
        let path = write_ledger_csv(
            dir.path(),
            "ledger.csv",
            &[
                "4010,Hauling Income,Trip,0,500,500.00,Roque Oling: PAG-ILIGAN: Strike/Cement:,2025-01-15,,,,",
                "5010,Fuel,Beginning Balance,100,0,100,,2025-01-01,,,,",
                ",Fuel,Total for Fuel,100,0,100,,,,,,",
            ],
        );
        let summary = upload_file(&conn, &path, AccountKind::Trucking, EnrichMode::Overwrite).unwrap();
        assert_eq!(summary.created_count, 2);
        assert!(summary.errors.is_empty());
        assert_eq!(summary.parsing_stats.drivers_extracted, 1);
        assert_eq!(summary.parsing_stats.routes_extracted, 1);
        assert_eq!(summary.parsing_stats.loads_extracted, 1);
        assert_eq!(count(&conn, "trucking_accounts"), 2);
        assert_eq!(count(&conn, "salary_accounts"), 0);

        let (driver, final_total): (String, String) = conn
            .query_row(
                "SELECT driver, final_total FROM trucking_accounts WHERE account_number = '4010'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(driver, "Roque Oling");
        assert_eq!(final_total, "-500.00");
    }

    #[test]
    fn test_upload_file_routes_salary_to_its_table() {
        let (dir, conn) = test_db();
        let path = write_ledger_csv(dir.path(), "salary.csv", &["6010,Salaries,Wages,1000,0,1000,,,,,,"]);
        let summary = upload_file(&conn, &path, AccountKind::Salary, EnrichMode::FillEmpty).unwrap();
        assert_eq!(summary.created_count, 1);
        assert_eq!(count(&conn, "salary_accounts"), 1);
        assert_eq!(count(&conn, "trucking_accounts"), 0);
    }

    #[test]
    fn test_upload_file_records_batch_and_allows_reupload() {
        let (dir, conn) = test_db();
        let path = write_ledger_csv(dir.path(), "ledger.csv", &["5010,Fuel,Diesel,10,0,10,,,,,,"]);
        upload_file(&conn, &path, AccountKind::Trucking, EnrichMode::Overwrite).unwrap();
        let again = upload_file(&conn, &path, AccountKind::Trucking, EnrichMode::Overwrite).unwrap();
        assert_eq!(again.created_count, 1);
        assert_eq!(count(&conn, "trucking_accounts"), 2);

        let (batches, distinct): (i64, i64) = conn
            .query_row(
                "SELECT COUNT(*), COUNT(DISTINCT checksum) FROM imports WHERE filename = 'ledger.csv'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(batches, 2);
        assert_eq!(distinct, 1);
    }

    #[test]
    fn test_upload_file_reports_row_errors() {
        let (dir, conn) = test_db();
        let path = dir.path().join("ledger.csv");
        let long_plate = "x".repeat(300);
        std::fs::write(
            &path,
            format!("AccountNumber,PlateNumber,Debit\n5010,ABC-123,10\n5011,{long_plate},10\n"),
        )
        .unwrap();
        let summary = upload_file(&conn, &path, AccountKind::Trucking, EnrichMode::Overwrite).unwrap();
        assert_eq!(summary.created_count, 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].starts_with("Row 2: "), "{}", summary.errors[0]);
        assert_eq!(count(&conn, "trucking_accounts"), 1);
    }

    #[test]
    fn test_upload_file_keeps_long_remarks() {
        let (dir, conn) = test_db();
        let remarks = format!("Roque Oling: PAG-ILIGAN: Strike/Cement: {}", "note ".repeat(70));
        let row = format!("4010,Hauling Income,Trip,0,500,500.00,{},2025-01-15,,,,", remarks.trim());
        let path = write_ledger_csv(dir.path(), "ledger.csv", &[&row]);
        let summary = upload_file(&conn, &path, AccountKind::Trucking, EnrichMode::Overwrite).unwrap();
        assert!(summary.errors.is_empty(), "{:?}", summary.errors);
        assert_eq!(summary.created_count, 1);

        let stored: String = conn
            .query_row("SELECT remarks FROM trucking_accounts", [], |r| r.get(0))
            .unwrap();
        assert!(stored.len() > 255);
    }

    #[test]
    fn test_upload_file_missing_file() {
        let (dir, conn) = test_db();
        let err = upload_file(
            &conn,
            &dir.path().join("nope.csv"),
            AccountKind::Trucking,
            EnrichMode::Overwrite,
        )
        .unwrap_err();
        assert!(matches!(err, HaulbookError::MissingFile(_)));
        assert_eq!(count(&conn, "imports"), 0);
    }

    #[test]
    fn test_preview_file_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_ledger_csv(
            dir.path(),
            "ledger.csv",
            &[
                "4010,Hauling Income,Trip,0,500,500.00,Roque Oling: PAG-ILIGAN: Strike/Cement:,,,,,",
                "4011,Hauling Income,Trip,0,500,500.00,misc,,,,,",
            ],
        );
        let preview = preview_file(&path, AccountKind::Trucking, EnrichMode::Overwrite).unwrap();
        assert_eq!(preview.total_rows, 2);
        assert_eq!(preview.preview_data.len(), 2);
        assert_eq!(preview.parsing_stats.drivers_extracted, 1);
        assert_eq!(preview.preview_data[0].trip.route.as_deref(), Some("PAG-ILIGAN"));
        assert_eq!(preview.preview_data[1].trip.driver, None);
    }
}
