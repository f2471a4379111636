//! Per-row enrichment: infer trip details from remarks, coerce the typed
//! columns, then apply the ledger's bookkeeping corrections.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::extract::{DriverExtractor, LoadPairExtractor, RouteExtractor};
use crate::importer::{parse_amount, parse_date, COLUMN_MAPPING};
use crate::models::{EnrichMode, LedgerRow, TripDetails};
use crate::table::Record;

const BEGINNING_BALANCE: &str = "beginning balance";
const HAULING_INCOME: &str = "hauling income";

pub struct RowEnrichmentPipeline {
    mode: EnrichMode,
    drivers: DriverExtractor,
    routes: RouteExtractor,
    loads: LoadPairExtractor,
}

impl RowEnrichmentPipeline {
    pub fn new(mode: EnrichMode) -> Self {
        Self {
            mode,
            drivers: DriverExtractor::new(),
            routes: RouteExtractor::new(),
            loads: LoadPairExtractor::new(),
        }
    }

    pub fn mode(&self) -> EnrichMode {
        self.mode
    }

    /// Build the normalized row for one spreadsheet record. Returns `None`
    /// for rows without an account number, which are not ledger entries.
    pub fn process(&self, record: &Record<'_>) -> Option<LedgerRow> {
        let account_number = record.get("account_number")?.to_string();
        let remarks = record.get("remarks");

        let mut trip = TripDetails {
            driver: text(record, "driver"),
            route: text(record, "route"),
            front_load: text(record, "front_load"),
            back_load: text(record, "back_load"),
        };
        self.infer_trip(remarks, &mut trip);

        let mut row = LedgerRow {
            row_number: record.number,
            account_number,
            account_type: text(record, "account_type").unwrap_or_default(),
            truck_type: text(record, "truck_type").unwrap_or_default(),
            plate_number: text(record, "plate_number"),
            description: text(record, "description").unwrap_or_default(),
            debit: amount(record, "debit"),
            credit: amount(record, "credit"),
            final_total: amount(record, "final_total"),
            remarks: remarks.map(str::to_string),
            reference_number: text(record, "reference_number"),
            date: record.get("date").and_then(parse_date),
            quantity: nonzero(amount(record, "quantity")),
            price: nonzero(amount(record, "price")),
            trip,
            extra: unmapped(record),
        };
        apply_ledger_rules(&mut row);
        Some(row)
    }

    /// Fill driver, route and loads from the remarks.
    ///
    /// Loads are only looked for once both driver and route are known.
    /// In fill-empty mode present values are never touched, and loads are
    /// skipped if either side is already set.
    pub fn infer_trip(&self, remarks: Option<&str>, trip: &mut TripDetails) {
        let overwrite = self.mode == EnrichMode::Overwrite;

        if overwrite || trip.driver.is_none() {
            if let Some(driver) = self.drivers.extract(remarks) {
                trip.driver = Some(driver);
            }
        }
        if overwrite || trip.route.is_none() {
            if let Some(route) = self.routes.extract(remarks) {
                trip.route = Some(route);
            }
        }

        let loads_blank = trip.front_load.is_none() && trip.back_load.is_none();
        if trip.driver.is_some() && trip.route.is_some() && (overwrite || loads_blank) {
            let pair = self.loads.extract(remarks);
            if pair.is_empty() {
                return;
            }
            if let Some(front) = pair.front {
                trip.front_load = Some(front);
            }
            if let Some(back) = pair.back {
                trip.back_load = Some(back);
            }
        }
    }
}

/// Opening balances carry no amounts; hauling income is exported with the
/// opposite sign from how the ledger stores it.
pub fn apply_ledger_rules(row: &mut LedgerRow) {
    if contains_ignore_case(&row.description, BEGINNING_BALANCE) {
        row.debit = Decimal::ZERO;
        row.credit = Decimal::ZERO;
        row.final_total = Decimal::ZERO;
    }
    if contains_ignore_case(&row.account_type, HAULING_INCOME) && !row.final_total.is_zero() {
        row.final_total = -row.final_total;
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn text(record: &Record<'_>, column: &str) -> Option<String> {
    record.get(column).map(str::to_string)
}

/// Amounts are stored with two decimal places.
fn amount(record: &Record<'_>, column: &str) -> Decimal {
    record
        .get(column)
        .map(parse_amount)
        .unwrap_or_default()
        .round_dp(2)
}

fn unmapped(record: &Record<'_>) -> BTreeMap<String, String> {
    record
        .values()
        .filter(|(header, _)| !COLUMN_MAPPING.iter().any(|(_, field)| field == header))
        .map(|(header, value)| (header.to_string(), value.to_string()))
        .collect()
}

fn nonzero(value: Decimal) -> Option<Decimal> {
    (!value.is_zero()).then_some(value)
}
