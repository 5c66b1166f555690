use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;

use config::RowguardConfig;
use error::CliResult;

#[derive(Parser)]
#[command(name = "rowguard")]
#[command(about = "Rowguard CLI - Schema validation for CSV data")]
#[command(version)]
struct Cli {
    /// Project configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a data file against a schema
    Validate {
        /// Data file (CSV)
        data: Option<PathBuf>,

        /// Schema file (JSON); inferred from the first row when omitted
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Field delimiter
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Write a `row,errors` CSV report here
        #[arg(short, long)]
        error_report: Option<PathBuf>,

        /// Print the full report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Infer a schema from the first data row
    Infer {
        /// Data file (CSV)
        data: Option<PathBuf>,

        /// Field delimiter
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Write the schema here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a schema document for authoring mistakes
    CheckSchema {
        /// Schema file (JSON)
        schema: Option<PathBuf>,
    },

    /// Export rows as JSON with typed values
    Export {
        /// Data file (CSV)
        data: Option<PathBuf>,

        /// Schema file (JSON); inferred from the first row when omitted
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Field delimiter
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Export only these columns, in this order
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Export even when some rows fail validation
        #[arg(long)]
        allow_errors: bool,

        /// Write the JSON here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    let base = RowguardConfig::load_optional(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate {
            data,
            schema,
            delimiter,
            error_report,
            json,
        } => {
            let config = base.merge(RowguardConfig {
                data,
                schema,
                delimiter,
                error_report,
                ..Default::default()
            });
            commands::validate::execute(&config, json)
        }

        Commands::Infer {
            data,
            delimiter,
            output,
        } => {
            let config = base.merge(RowguardConfig {
                data,
                delimiter,
                output,
                ..Default::default()
            });
            commands::infer::execute(&config)
        }

        Commands::CheckSchema { schema } => {
            let config = base.merge(RowguardConfig {
                schema,
                ..Default::default()
            });
            commands::check_schema::execute(&config)
        }

        Commands::Export {
            data,
            schema,
            delimiter,
            columns,
            allow_errors,
            output,
        } => {
            let config = base.merge(RowguardConfig {
                data,
                schema,
                delimiter,
                columns,
                allow_errors,
                output,
                ..Default::default()
            });
            commands::export::execute(&config)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
