use clap::Parser;
use jobright_scraper::cli::{self, Cli};
use jobright_scraper::ScrapeError;
use std::fs::{File, OpenOptions};
use std::process::ExitCode;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Truncate and open the JSON log file; failures are reported, not fatal
fn open_log_file(path: &str) -> Option<File> {
    match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
    {
        Ok(file) => Some(file),
        Err(e) => {
            // subscriber is not installed yet
            eprintln!("[WARN] Could not open log file {path}: {e}");
            None
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Optional JSON log file next to the human-readable stderr output
    let file_layer = std::env::var("JOBRIGHT_LOG_FILE")
        .ok()
        .and_then(|path| open_log_file(&path))
        .map(|file| {
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false)
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ScrapeError>() {
                Some(scrape_err) => {
                    if scrape_err.needs_login() {
                        tracing::debug!("Session unusable, a fresh --login is required");
                    }
                    println!("[ERROR] {scrape_err}");
                }
                None => println!("[ERROR] {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
