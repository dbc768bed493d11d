//! modelsql CLI - compile analysis requests to SQL
//!
//! Usage:
//!   modelsql compile <request.json> [--db <path>] [--dialect <dialect>] [--execute]
//!   modelsql preview <request.json> [--dialect <dialect>]
//!   modelsql load <data.json> --db <path>
//!   modelsql tables --db <path>
//!   modelsql samples <table> <field> --db <path>
//!
//! Examples:
//!   modelsql load demos/jobs.json --db jobs.db
//!   modelsql compile demos/request.json --db jobs.db --execute

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use modelsql::compiler::{QueryCompiler, QueryRequest};
use modelsql::config::Settings;
use modelsql::model::Dataset;
use modelsql::sql::Dialect;
use modelsql::store::{RelationalStore, SqliteStore};

#[derive(Parser)]
#[command(name = "modelsql")]
#[command(about = "modelsql - compile data models, joins, filters and pivots to SQL")]
#[command(version)]
struct Cli {
    /// Database file (overrides the settings file; ":memory:" for scratch)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an analysis request to SQL
    Compile {
        /// Path to the request JSON (UI state shape)
        request: PathBuf,

        /// SQL dialect to generate (defaults to the settings file)
        #[arg(short, long, value_parser = Dialect::from_str)]
        dialect: Option<Dialect>,

        /// Run the query and print the rows as JSON
        #[arg(short, long)]
        execute: bool,
    },

    /// Print the preview query for a request
    Preview {
        /// Path to the request JSON
        request: PathBuf,

        /// SQL dialect to generate
        #[arg(short, long, value_parser = Dialect::from_str)]
        dialect: Option<Dialect>,
    },

    /// Replace every table in the store with the tables of a JSON dataset
    Load {
        /// Path to `{"table": [rows]}` JSON
        data: PathBuf,
    },

    /// List the store's tables and their fields
    Tables,

    /// Show up to 50 distinct values of a field
    Samples { table: String, field: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let default_dialect = settings.store.dialect;
    if let Commands::Preview { request, dialect } = &cli.command {
        return cmd_preview(request, dialect.unwrap_or(default_dialect));
    }

    let db = match cli.db.clone() {
        Some(path) => path,
        None => match settings.store.resolved_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let store = match SqliteStore::open(&db) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening store '{}': {}", db.display(), e);
            return ExitCode::FAILURE;
        }
    };
    debug!(db = %db.display(), "store ready");

    match cli.command {
        Commands::Compile {
            request,
            dialect,
            execute,
        } => {
            cmd_compile(&store, &request, dialect.unwrap_or(default_dialect), execute).await
        }
        Commands::Preview { request, dialect } => {
            cmd_preview(&request, dialect.unwrap_or(default_dialect))
        }
        Commands::Load { data } => cmd_load(&store, &data).await,
        Commands::Tables => cmd_tables(&store).await,
        Commands::Samples { table, field } => cmd_samples(&store, &table, &field).await,
    }
}

async fn cmd_compile(store: &SqliteStore, path: &Path, dialect: Dialect, execute: bool) -> ExitCode {
    let Some(mut request) = read_json::<QueryRequest>(path) else {
        return ExitCode::FAILURE;
    };

    if request.discovered_tables.is_empty() {
        match store.discover_tables().await {
            Ok(tables) => request.discovered_tables = tables,
            Err(e) => {
                eprintln!("Error discovering tables: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let sql = match QueryCompiler::new(dialect).generate_query(&request, store).await {
        Ok(Some(sql)) => sql,
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if !execute {
        println!("{}", sql);
        return ExitCode::SUCCESS;
    }

    match store.execute_query(&sql).await {
        Ok(rows) => print_json(&rows),
        Err(e) => {
            eprintln!("Query error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_preview(path: &Path, dialect: Dialect) -> ExitCode {
    let Some(request) = read_json::<QueryRequest>(path) else {
        return ExitCode::FAILURE;
    };

    println!("{}", QueryCompiler::new(dialect).generate_preview_query(&request));
    ExitCode::SUCCESS
}

async fn cmd_load(store: &SqliteStore, path: &Path) -> ExitCode {
    let Some(dataset) = read_json::<Dataset>(path) else {
        return ExitCode::FAILURE;
    };

    match store.reset_and_load(&dataset).await {
        Ok(()) => {
            for (table, rows) in dataset.tables() {
                println!("{}: {} rows", table, rows.len());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Load error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn cmd_tables(store: &SqliteStore) -> ExitCode {
    match store.discover_tables().await {
        Ok(tables) => {
            for table in tables {
                println!("{} ({})", table.name, table.fields.join(", "));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error discovering tables: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn cmd_samples(store: &SqliteStore, table: &str, field: &str) -> ExitCode {
    match store.fetch_sample_values(table, field).await {
        Ok(values) => {
            for value in values {
                println!("{}", value);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error fetching samples for {}.{}: {}", table, field, e);
            ExitCode::FAILURE
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str(&source) {
        Ok(value) => Some(value),
        Err(e) => {
            eprintln!("Error parsing '{}': {}", path.display(), e);
            None
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            ExitCode::FAILURE
        }
    }
}
