//! Command-line interface definitions for the sheet sync.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The source URL is normally supplied through the environment by the
//! scheduler that triggers the sync.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;
use crate::sync::{SyncConfig, parse_source_url};
use crate::transform::MappingStrategy;
use crate::utils::SystemClock;

/// Command-line arguments for one sync run.
///
/// # Examples
///
/// ```sh
/// # URL from the environment, artifacts into the current directory
/// GOOGLE_SHEETS_URL=https://docs.google.com/.../pub?output=csv sheet_sync
///
/// # Explicit output directory and positional column mapping
/// sheet_sync --source-url https://... -o ./site --strategy position
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Published CSV export URL of the spreadsheet
    #[arg(long, env = "GOOGLE_SHEETS_URL")]
    pub source_url: String,

    /// Directory that receives articles.json and index.html
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Author written into every article
    #[arg(long, default_value = "Prime Cuts Team")]
    pub author: String,

    /// Heading of the generated index page
    #[arg(long, default_value = "Prime Cuts Articles CDN")]
    pub site_title: String,

    /// How spreadsheet rows are mapped to article fields
    #[arg(long, value_enum, default_value_t = MappingStrategy::Header)]
    pub strategy: MappingStrategy,

    /// Seconds before the fetch is abandoned
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,
}

impl Cli {
    /// Turn the parsed arguments into a pipeline configuration.
    pub fn sync_config(&self) -> Result<SyncConfig> {
        Ok(SyncConfig {
            source_url: parse_source_url(&self.source_url)?,
            author: self.author.clone(),
            site_title: self.site_title.clone(),
            strategy: self.strategy,
            timeout: Duration::from_secs(self.timeout_secs),
            clock: Box::new(SystemClock),
        })
    }
}
