//! Drives a prepared table through the enrichment pipeline and into a sink.

use serde::Serialize;

use crate::error::Result;
use crate::models::{AccountKind, EnrichMode, LedgerRow, ParsingStats};
use crate::pipeline::RowEnrichmentPipeline;
use crate::table::Table;

/// Callers only ever see this many row errors; the rest are logged.
pub const MAX_REPORTED_ERRORS: usize = 10;

/// Destination for normalized rows.
pub trait RecordSink {
    fn persist(&mut self, kind: AccountKind, row: &LedgerRow) -> Result<()>;
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadSummary {
    pub created_count: usize,
    pub parsing_stats: ParsingStats,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PreviewSummary {
    pub preview_data: Vec<LedgerRow>,
    pub parsing_stats: ParsingStats,
    pub total_rows: usize,
}

pub struct IngestionRunner {
    kind: AccountKind,
    pipeline: RowEnrichmentPipeline,
}

impl IngestionRunner {
    pub fn new(kind: AccountKind, mode: EnrichMode) -> Self {
        Self {
            kind,
            pipeline: RowEnrichmentPipeline::new(mode),
        }
    }

    /// Normalize and persist every row. One row failing never stops the
    /// batch; stats count every ledger row, saved or not.
    pub fn upload(&self, table: &Table, sink: &mut impl RecordSink) -> UploadSummary {
        tracing::info!(
            kind = self.kind.key(),
            mode = ?self.pipeline.mode(),
            rows = table.len(),
            "upload started"
        );
        let mut summary = UploadSummary::default();

        for row in self.rows(table) {
            summary.parsing_stats.record(&row.trip);
            match sink.persist(self.kind, &row) {
                Ok(()) => summary.created_count += 1,
                Err(e) => {
                    let message = format!("Row {}: {}", row.row_number, e);
                    tracing::warn!("{message}");
                    summary.errors.push(message);
                }
            }
        }

        let total_errors = summary.errors.len();
        summary.errors.truncate(MAX_REPORTED_ERRORS);
        tracing::info!(
            created = summary.created_count,
            errors = total_errors,
            "upload finished"
        );
        summary
    }

    /// Normalize every row without persisting anything.
    pub fn preview(&self, table: &Table) -> PreviewSummary {
        let mut parsing_stats = ParsingStats::default();
        let preview_data: Vec<LedgerRow> = self
            .rows(table)
            .inspect(|row| parsing_stats.record(&row.trip))
            .collect();
        tracing::info!(
            kind = self.kind.key(),
            rows = preview_data.len(),
            "preview built"
        );
        PreviewSummary {
            total_rows: preview_data.len(),
            preview_data,
            parsing_stats,
        }
    }

    fn rows<'a>(&'a self, table: &'a Table) -> impl Iterator<Item = LedgerRow> + 'a {
        table
            .records()
            .filter_map(move |record| self.pipeline.process(&record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HaulbookError;

    /// Keeps rows in memory; fails any row whose account number is listed.
    #[derive(Default)]
    struct MemorySink {
        rows: Vec<(AccountKind, LedgerRow)>,
        reject: Vec<&'static str>,
    }

    impl RecordSink for MemorySink {
        fn persist(&mut self, kind: AccountKind, row: &LedgerRow) -> Result<()> {
            if self.reject.contains(&row.account_number.as_str()) {
                return Err(HaulbookError::Other("value too long for account_type".to_string()));
            }
            self.rows.push((kind, row.clone()));
            Ok(())
        }
    }

    fn table(rows: &[(&str, &str)]) -> Table {
        Table::new(
            vec!["account_number".to_string(), "remarks".to_string()],
            rows.iter()
                .map(|(acct, remarks)| vec![acct.to_string(), remarks.to_string()])
                .collect(),
        )
    }

    #[test]
    fn test_upload_continues_past_failing_row() {
        crate::logging::init_test();
        let table = table(&[
            ("A1", "Roque Oling: PAG-ILIGAN: Strike/Cement:"),
            ("A2", "Pablo Hamo: PAG-CDO: Copra/Rice:"),
            ("BAD", "Roque Oling: PAG-BUK: Sand/Gravel:"),
            ("A4", "office supplies"),
        ]);
        let mut sink = MemorySink {
            reject: vec!["BAD"],
            ..Default::default()
        };
        let summary = IngestionRunner::new(AccountKind::Trucking, EnrichMode::Overwrite)
            .upload(&table, &mut sink);

        assert_eq!(summary.created_count, 3);
        assert_eq!(
            summary.errors,
            vec!["Row 3: value too long for account_type".to_string()]
        );
        // Extractions on the rejected row still count.
        assert_eq!(summary.parsing_stats.drivers_extracted, 3);
        assert_eq!(summary.parsing_stats.routes_extracted, 3);
        assert_eq!(summary.parsing_stats.loads_extracted, 3);
        assert!(sink.rows.iter().all(|(kind, _)| *kind == AccountKind::Trucking));
    }

    #[test]
    fn test_upload_reports_at_most_ten_errors() {
        let rows: Vec<(&str, &str)> = (0..15).map(|_| ("BAD", "")).collect();
        let mut sink = MemorySink {
            reject: vec!["BAD"],
            ..Default::default()
        };
        let summary = IngestionRunner::new(AccountKind::Salary, EnrichMode::FillEmpty)
            .upload(&table(&rows), &mut sink);
        assert_eq!(summary.created_count, 0);
        assert_eq!(summary.errors.len(), MAX_REPORTED_ERRORS);
        assert!(summary.errors[0].starts_with("Row 1: "));
        assert!(summary.errors[9].starts_with("Row 10: "));
    }

    #[test]
    fn test_rows_without_account_number_are_skipped_silently() {
        let table = table(&[("", "Roque Oling"), ("A2", ""), ("nan", "x")]);
        let mut sink = MemorySink::default();
        let summary = IngestionRunner::new(AccountKind::Trucking, EnrichMode::Overwrite)
            .upload(&table, &mut sink);
        assert_eq!(summary.created_count, 1);
        assert!(summary.errors.is_empty());
        assert_eq!(sink.rows[0].1.row_number, 2);
    }

    #[test]
    fn test_preview_counts_without_persisting() {
        let table = table(&[
            ("A1", "Roque Oling: PAG-ILIGAN: Strike/Cement:"),
            ("A2", "kuha ug humay"),
            ("", "Roque Oling"),
        ]);
        let preview = IngestionRunner::new(AccountKind::Trucking, EnrichMode::Overwrite).preview(&table);
        assert_eq!(preview.total_rows, 2);
        assert_eq!(preview.parsing_stats.drivers_extracted, 1);
        assert_eq!(preview.parsing_stats.routes_extracted, 1);
        assert_eq!(preview.parsing_stats.loads_extracted, 1);
        // No driver or route, so the pickup is not read as a load.
        assert_eq!(preview.preview_data[1].trip.back_load, None);
    }

    #[test]
    fn test_preview_serializes_expected_shape() {
        let table = table(&[("A1", "Roque Oling: PAG-ILIGAN: Strike/Cement:")]);
        let preview = IngestionRunner::new(AccountKind::Trucking, EnrichMode::Overwrite).preview(&table);
        let json = serde_json::to_value(&preview).unwrap();
        assert_eq!(json["total_rows"], 1);
        assert_eq!(json["parsing_stats"]["drivers_extracted"], 1);
        assert_eq!(json["preview_data"][0]["driver"], "Roque Oling");
        assert_eq!(json["preview_data"][0]["front_load"], "Strike");
        assert_eq!(json["preview_data"][0]["account_number"], "A1");
    }
}
