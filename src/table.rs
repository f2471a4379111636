//! Column-oriented view of an uploaded spreadsheet. Every cell is read as
//! text; typed coercion happens per field when a row is normalized.

use std::io::Read;
use std::path::Path;

use crate::error::{HaulbookError, Result};

/// Values spreadsheet exports use for "no value".
const NULL_SENTINELS: &[&str] = &["nan", "NaN", "None"];

#[derive(Debug, Clone)]
struct TableRow {
    number: usize,
    cells: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<TableRow>,
}

/// Borrowed view of one data row.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    /// 1-based position among the data rows, header excluded. Survives
    /// filtering so errors point at the spreadsheet row the user sees.
    pub number: usize,
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> Record<'a> {
    /// Trimmed cell value, `None` when the column is missing or the cell is blank.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.headers.iter().position(|h| h == column)?;
        let value = self.cells.get(idx)?.trim();
        if value.is_empty() || NULL_SENTINELS.contains(&value) {
            None
        } else {
            Some(value)
        }
    }

    pub fn cells(&self) -> &'a [String] {
        self.cells
    }

    /// Non-blank `(header, value)` pairs, in sheet order.
    pub fn values(self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.headers
            .iter()
            .filter(|h| !h.is_empty())
            .filter_map(move |h| self.get(h).map(|v| (h.as_str(), v)))
    }
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: headers.into_iter().map(|h| h.trim().to_string()).collect(),
            rows: rows
                .into_iter()
                .enumerate()
                .map(|(i, cells)| TableRow { number: i + 1, cells })
                .collect(),
        }
    }

    /// Read a CSV or spreadsheet file, picking the reader by extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(HaulbookError::MissingFile(path.display().to_string()));
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Self::from_csv_reader(std::fs::File::open(path)?),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Self::from_workbook(path),
            _ => Err(HaulbookError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self::new(headers, rows))
    }

    /// First worksheet, first row as header.
    #[cfg(feature = "xlsx")]
    fn from_workbook(path: &Path) -> Result<Self> {
        use calamine::Reader;

        let mut workbook = calamine::open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| HaulbookError::Other("Workbook has no worksheets".to_string()))??;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(Self::default());
        };
        let headers = header_row.iter().map(cell_text).collect();
        let body = rows.map(|row| row.iter().map(cell_text).collect()).collect();
        Ok(Self::new(headers, body))
    }

    #[cfg(not(feature = "xlsx"))]
    fn from_workbook(path: &Path) -> Result<Self> {
        Err(HaulbookError::UnsupportedFormat(format!(
            "{} (built without spreadsheet support)",
            path.display()
        )))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rename headers by exact match; unmapped headers are left alone.
    pub fn rename_columns(&mut self, mapping: &[(&str, &str)]) {
        for header in &mut self.headers {
            if let Some((_, to)) = mapping.iter().find(|(from, _)| *from == header.as_str()) {
                *header = (*to).to_string();
            }
        }
    }

    /// Keep only the rows the predicate accepts.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(&Record<'_>) -> bool) {
        let headers = &self.headers;
        self.rows.retain(|row| {
            keep(&Record {
                number: row.number,
                headers,
                cells: &row.cells,
            })
        });
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.rows.iter().map(|row| Record {
            number: row.number,
            headers: &self.headers,
            cells: &row.cells,
        })
    }
}

#[cfg(feature = "xlsx")]
fn cell_text(cell: &calamine::Data) -> String {
    use calamine::Data;

    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => {
            excel_serial_to_date(dt.as_f64()).unwrap_or_else(|| dt.as_f64().to_string())
        }
    }
}

/// Convert an Excel serial day number to `YYYY-MM-DD`.
pub fn excel_serial_to_date(serial: f64) -> Option<String> {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = base.checked_add_signed(chrono::Duration::try_days(serial.trunc() as i64)?)?;
    Some(date.format("%Y-%m-%d").to_string())
}
