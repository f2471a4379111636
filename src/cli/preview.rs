use std::path::PathBuf;

use comfy_table::{Cell, CellAlignment, Table};

use crate::error::{HaulbookError, Result};
use crate::fmt::{amount, or_dash};
use crate::importer::preview_file;
use crate::models::{AccountKind, EnrichMode};

pub fn run(file: &str, kind: Option<AccountKind>, mode: Option<EnrichMode>, json: bool) -> Result<()> {
    let (kind, mode) = super::resolve_kind_mode(kind, mode);
    let preview = preview_file(&PathBuf::from(file), kind, mode)?;

    if json {
        let out = serde_json::to_string_pretty(&preview)
            .map_err(|e| HaulbookError::Other(e.to_string()))?;
        println!("{out}");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Row", "Account", "Description", "Driver", "Route", "Front Load", "Back Load", "Final Total",
    ]);
    for row in &preview.preview_data {
        let trip = &row.trip;
        table.add_row(vec![
            Cell::new(row.row_number),
            Cell::new(&row.account_number),
            Cell::new(&row.description),
            Cell::new(or_dash(trip.driver.as_deref())),
            Cell::new(or_dash(trip.route.as_deref())),
            Cell::new(or_dash(trip.front_load.as_deref())),
            Cell::new(or_dash(trip.back_load.as_deref())),
            Cell::new(amount(row.final_total)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");

    let stats = preview.parsing_stats;
    println!(
        "{} rows  Drivers: {}  Routes: {}  Loads: {}",
        preview.total_rows, stats.drivers_extracted, stats.routes_extracted, stats.loads_extracted
    );
    Ok(())
}
