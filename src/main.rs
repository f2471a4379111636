mod cli;
mod db;
mod error;
mod extract;
mod fmt;
mod importer;
mod logging;
mod models;
mod pipeline;
mod runner;
mod settings;
mod store;
mod table;

use clap::Parser;

use cli::{Cli, Commands, RosterCommands};

fn main() {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Upload { file, kind, mode } => cli::upload::run(&file, kind, mode),
        Commands::Preview {
            file,
            kind,
            mode,
            json,
        } => cli::preview::run(&file, kind, mode, json),
        Commands::Roster { command } => match command {
            RosterCommands::Drivers => cli::roster::drivers(),
            RosterCommands::Routes => cli::roster::routes(),
            RosterCommands::Loads => cli::roster::loads(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
