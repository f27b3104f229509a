use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use vatkit::core::{SyncConfig, SyncError};
use vatkit::sync::{SyncPlan, SyncRequest, run_sync};
use vatkit::tedb::TedbClient;

mod cli;

use cli::{Cli, Commands, SyncArgs};

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

fn config_from_args(args: &SyncArgs) -> SyncConfig {
    let mut config = SyncConfig::default();
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(secs) = args.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(path) = &args.json_out {
        config.outputs.json = path.clone();
    }
    if let Some(path) = &args.markdown_out {
        config.outputs.markdown = path.clone();
    }
    config
}

async fn sync(args: SyncArgs) -> Result<(), SyncError> {
    let config = config_from_args(&args);
    let request = SyncRequest {
        date_from: args.date_from,
        date_to: args.date_to,
        states: args.states,
    };
    let today = chrono::Local::now().date_naive();
    let plan = SyncPlan::new(today, &request, config.window_days);

    let client = TedbClient::from_config(&config)?;
    run_sync(&client, &plan, &config.outputs).await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Sync(args) => sync(args).await,
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
