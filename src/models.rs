use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which ledger an upload is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    #[default]
    Trucking,
    Salary,
}

impl AccountKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Trucking => "trucking",
            Self::Salary => "salary",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Self::Trucking => "trucking_accounts",
            Self::Salary => "salary_accounts",
        }
    }

    /// Trucking exports are routinely re-imported to clean up earlier
    /// entries, so their inferred fields are always re-derived.
    pub fn default_mode(&self) -> EnrichMode {
        match self {
            Self::Trucking => EnrichMode::Overwrite,
            Self::Salary => EnrichMode::FillEmpty,
        }
    }
}

/// How inferred fields treat values already present in the spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EnrichMode {
    /// Only extract into blank fields.
    FillEmpty,
    /// Re-run every extractor; a successful extraction replaces the value.
    Overwrite,
}

/// Driver, route and loads for one row, given or inferred from remarks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TripDetails {
    pub driver: Option<String>,
    pub route: Option<String>,
    pub front_load: Option<String>,
    pub back_load: Option<String>,
}

/// One normalized spreadsheet row, ready for a sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerRow {
    pub row_number: usize,
    pub account_number: String,
    pub account_type: String,
    pub truck_type: String,
    pub plate_number: Option<String>,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub final_total: Decimal,
    pub remarks: Option<String>,
    pub reference_number: Option<String>,
    pub date: Option<NaiveDate>,
    pub quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    #[serde(flatten)]
    pub trip: TripDetails,
    /// Sheet columns with no ledger field, kept so previews show them.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// How many accepted rows ended up with each inferred field populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParsingStats {
    pub drivers_extracted: usize,
    pub routes_extracted: usize,
    pub loads_extracted: usize,
}

impl ParsingStats {
    pub fn record(&mut self, trip: &TripDetails) {
        if trip.driver.is_some() {
            self.drivers_extracted += 1;
        }
        if trip.route.is_some() {
            self.routes_extracted += 1;
        }
        if trip.front_load.is_some() {
            self.loads_extracted += 1;
        }
    }
}
