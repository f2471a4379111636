pub mod init;
pub mod preview;
pub mod roster;
pub mod upload;

use clap::{Parser, Subcommand};

use crate::models::{AccountKind, EnrichMode};
use crate::settings::load_settings;

#[derive(Parser)]
#[command(
    name = "haulbook",
    version,
    about = "Import trucking and salary ledger spreadsheets, filling in driver, route and load details from remarks."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for haulbook data (default: ~/Documents/haulbook)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import a ledger spreadsheet into the database.
    Upload {
        /// Path to an XLSX/XLS/ODS or CSV export
        file: String,
        /// Ledger to write to (default from settings)
        #[arg(long, value_enum)]
        kind: Option<AccountKind>,
        /// How inferred fields treat values already in the sheet
        /// (default: overwrite for trucking, fill-empty for salary)
        #[arg(long, value_enum)]
        mode: Option<EnrichMode>,
    },
    /// Show what an upload would produce without saving anything.
    Preview {
        /// Path to an XLSX/XLS/ODS or CSV export
        file: String,
        #[arg(long, value_enum)]
        kind: Option<AccountKind>,
        #[arg(long, value_enum)]
        mode: Option<EnrichMode>,
        /// Print the preview as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the built-in vocabularies remarks are matched against.
    Roster {
        #[command(subcommand)]
        command: RosterCommands,
    },
}

#[derive(Subcommand)]
pub enum RosterCommands {
    /// Known drivers.
    Drivers,
    /// Known route codes.
    Routes,
    /// Load names accepted without further checks.
    Loads,
}

/// Fill in kind and mode from settings and the kind's default.
pub(crate) fn resolve_kind_mode(
    kind: Option<AccountKind>,
    mode: Option<EnrichMode>,
) -> (AccountKind, EnrichMode) {
    let kind = kind.unwrap_or_else(|| load_settings().default_kind);
    (kind, mode.unwrap_or_else(|| kind.default_mode()))
}
