//! # Sheet Sync
//!
//! Pulls the published CSV export of an editorial spreadsheet, turns each
//! row into an article record, keeps the ones marked "published", and
//! writes two artifacts:
//!
//! - `articles.json`: the publishable articles, pretty-printed
//! - `index.html`: a human-readable summary page linking to the JSON
//!
//! ## Usage
//!
//! ```sh
//! GOOGLE_SHEETS_URL=https://... sheet_sync -o ./site
//! ```
//!
//! ## Architecture
//!
//! One sequential run per invocation:
//! 1. **Fetching**: download the CSV export (the only async step)
//! 2. **Mapping**: split lines and build article records
//! 3. **Filtering**: keep publishable records
//! 4. **Output**: write `articles.json`, then `index.html`
//!
//! Any fetch or write failure exits non-zero. An external scheduler is
//! responsible for running the sync periodically.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod csv;
mod error;
mod fetch;
mod models;
mod outputs;
mod sync;
mod transform;
mod utils;

use cli::Cli;
use fetch::HttpFetcher;
use outputs::DirWriter;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("sheet_sync starting up");

    let args = Cli::parse();
    debug!(output_dir = %args.output_dir.display(), strategy = ?args.strategy, "Parsed CLI arguments");

    let config = match args.sync_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    info!(
        host = config.source_url.host_str().unwrap_or_default(),
        "Syncing articles from spreadsheet"
    );

    // Early check: ensure the output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let fetcher = HttpFetcher::new(config.timeout)?;
    let writer = DirWriter::new(&args.output_dir);

    let report = match sync::run_sync(&config, &fetcher, &writer).await {
        Ok(report) => report,
        Err(e) => {
            let kind = if e.is_fetch_failure() {
                "fetch"
            } else if e.is_write_failure() {
                "write"
            } else {
                "other"
            };
            error!(error = %e, kind, dir = %writer.dir().display(), "Sync failed");
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        total = report.total,
        skipped = report.skipped,
        published = report.published,
        json = %report.json_path.display(),
        html = %report.html_path.display(),
        ?elapsed,
        millis = elapsed.as_millis() as u64,
        "Sync completed successfully"
    );

    Ok(())
}
