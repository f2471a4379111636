use std::path::PathBuf;

use colored::Colorize;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::importer::upload_file;
use crate::models::{AccountKind, EnrichMode};
use crate::settings::db_path;
use crate::store::count_entries;

pub fn run(file: &str, kind: Option<AccountKind>, mode: Option<EnrichMode>) -> Result<()> {
    let (kind, mode) = super::resolve_kind_mode(kind, mode);
    let file_path = PathBuf::from(file);

    let db_path = db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = get_connection(&db_path)?;
    init_db(&conn)?;

    let summary = upload_file(&conn, &file_path, kind, mode)?;

    println!(
        "{} {} entries created ({} in ledger)",
        summary.created_count.to_string().green().bold(),
        kind.key(),
        count_entries(&conn, kind)?
    );
    let stats = summary.parsing_stats;
    println!(
        "Drivers extracted: {}  Routes extracted: {}  Loads extracted: {}",
        stats.drivers_extracted, stats.routes_extracted, stats.loads_extracted
    );

    if !summary.errors.is_empty() {
        println!("{}", "Rows not saved:".red().bold());
        for error in &summary.errors {
            println!("  {error}");
        }
    }
    Ok(())
}
