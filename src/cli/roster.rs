use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::extract::vocab::{KNOWN_DRIVERS, KNOWN_LOADS, KNOWN_ROUTES};

fn print_list(title: &str, entries: &[&str]) {
    let mut table = Table::new();
    table.set_header(vec!["#", title]);
    for (i, entry) in entries.iter().enumerate() {
        table.add_row(vec![Cell::new(i + 1), Cell::new(entry)]);
    }
    println!("{table}");
}

pub fn drivers() -> Result<()> {
    print_list("Driver", KNOWN_DRIVERS);
    Ok(())
}

/// Listed in match order: the first route found in a remark wins.
pub fn routes() -> Result<()> {
    print_list("Route", KNOWN_ROUTES);
    Ok(())
}

pub fn loads() -> Result<()> {
    print_list("Load", KNOWN_LOADS);
    Ok(())
}
