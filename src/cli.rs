use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "vatkit",
    version,
    about = "Sync EU VAT dataset from TEDB and write JSON + Markdown."
)]
pub struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch from TEDB, map, and write the JSON dataset and Markdown report.
    Sync(SyncArgs),
}

#[derive(clap::Args, Debug)]
pub struct SyncArgs {
    /// Requested window start (YYYY-MM-DD, default: today). The fetch always
    /// covers the trailing 90 days.
    #[arg(long = "from", value_name = "DATE", value_parser = parse_date)]
    pub date_from: Option<NaiveDate>,
    /// Requested window end (YYYY-MM-DD, default: today).
    #[arg(long = "to", value_name = "DATE", value_parser = parse_date)]
    pub date_to: Option<NaiveDate>,
    /// Comma-separated ISO2 codes to restrict the fetch (default: all EU).
    #[arg(long, value_name = "CSV")]
    pub states: Option<String>,
    /// JSON dataset path.
    #[arg(long, value_name = "PATH")]
    pub json_out: Option<PathBuf>,
    /// Markdown report path.
    #[arg(long, value_name = "PATH")]
    pub markdown_out: Option<PathBuf>,
    /// TEDB SOAP endpoint.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,
    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{value}': {e}"))
}
