use std::path::PathBuf;

use clap::{Parser, Subcommand};
use skl::{OutputFormat, SklConfig};
use tracing::Level;

mod commands;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.skl/skl.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Database file to open, overrides the configured path
    #[clap(long, global = true)]
    db: Option<PathBuf>,

    /// Output format: table, markdown, json, json-pretty, json-line, psv
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every table of the database file with its fields
    Tables,

    /// Print all rows of a table
    Rows {
        /// Table name
        table: String,
    },

    /// Print one row by primary key
    Get {
        /// Table name
        table: String,

        /// Primary key value
        key: String,
    },

    /// Delete one row by primary key
    Delete {
        /// Table name
        table: String,

        /// Primary key value
        key: String,
    },

    /// Show configuration, tables and row counts
    Status,
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level DEBUG or higher.
            .with_max_level(Level::DEBUG)
            .init();
    }

    let config = match SklConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Tables => commands::tables::run_tables(&config, &cli.db, cli.format),
        Commands::Rows { table } => commands::rows::run_rows(&config, &cli.db, &table, cli.format),
        Commands::Get { table, key } => {
            commands::rows::run_get(&config, &cli.db, &table, &key, cli.format)
        }
        Commands::Delete { table, key } => {
            commands::rows::run_delete(&config, &cli.db, &table, &key)
        }
        Commands::Status => commands::tables::run_status(&config, &cli.db),
    }
}
