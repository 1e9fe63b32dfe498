//! sqlite3dump
//!
//! Dumps a SQLite database file as SQL statements on standard output.

mod config;

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sqlite_dump_core::DumpSummary;

const USAGE: &str = "usage: sqlite3dump database.db > database.sql";

/// Dump a SQLite database as SQL text.
#[derive(Parser)]
#[command(name = "sqlite3dump")]
#[command(version, about, long_about = None)]
#[command(override_usage = "sqlite3dump [OPTIONS] database.db > database.sql")]
struct Cli {
    /// Path to the SQLite database file
    database: PathBuf,

    /// Skip CREATE TABLE statements; row inserts name their columns
    #[arg(long)]
    migration: bool,

    /// Emit DROP ... IF EXISTS for indexes and tables first
    #[arg(long)]
    drop_if_exists: bool,

    /// Do not wrap the output in BEGIN TRANSACTION / COMMIT
    #[arg(long)]
    no_transaction: bool,

    /// Include table rows as INSERT statements
    #[arg(long)]
    data: bool,

    /// Print a JSON summary of the dump to stderr
    #[arg(long)]
    summary: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only SQL
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(summary) => {
            eprintln!("dumped {}", display_name(&cli.database));
            if cli.summary {
                match serde_json::to_string(&summary) {
                    Ok(json) => eprintln!("{}", json),
                    Err(e) => eprintln!("failed to render summary: {}", e),
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{:#}", e);
            eprintln!("{}", USAGE);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<DumpSummary> {
    let defaults = config::EnvDefaults::from_env()?;
    let dump_config = defaults.dump_config(
        cli.migration,
        cli.drop_if_exists,
        cli.no_transaction,
        cli.data,
    );

    info!("Dumping {}", cli.database.display());

    let mut out = BufWriter::new(tokio::io::stdout());
    let result = sqlite_dump_core::dump(&cli.database, &mut out, dump_config).await;
    // Flush whatever was written, even when the dump stopped early
    let flushed = out.flush().await;

    let summary = result?;
    flushed.context("Failed to flush output")?;
    Ok(summary)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
