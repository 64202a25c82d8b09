//! Output generation for the published artifacts.
//!
//! # Submodules
//!
//! - [`json`]: serializes publishable articles to `articles.json`
//! - [`html`]: renders the human-readable `index.html`
//!
//! Rendering is pure and returns a `String`. Putting bytes on disk goes
//! through an [`ArtifactWriter`] so the pipeline can be tested without a
//! file system.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── articles.json   # machine-readable collection
//! └── index.html      # summary page linking to articles.json
//! ```

pub mod html;
pub mod json;

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

use crate::error::{Result, SyncError};

/// File name of the JSON collection, also linked from the index page.
pub const ARTICLES_JSON: &str = "articles.json";
/// File name of the index page.
pub const INDEX_HTML: &str = "index.html";

/// Destination for rendered artifacts.
pub trait ArtifactWriter {
    /// Write `bytes` under `name`, fully replacing any previous content.
    async fn write_artifact(&self, name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes artifacts into a directory on the local file system.
#[derive(Debug, Clone)]
pub struct DirWriter {
    dir: PathBuf,
}

impl DirWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactWriter for DirWriter {
    /// Writes to a sibling temp file first and renames it into place, so a
    /// failed write never leaves a truncated artifact behind.
    #[instrument(level = "info", skip(self, bytes), fields(dir = %self.dir.display(), bytes = bytes.len()))]
    async fn write_artifact(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.dir.join(name);
        let tmp_path = self.dir.join(format!(".{name}.tmp"));
        if let Err(source) = fs::write(&tmp_path, bytes).await {
            return Err(SyncError::Write {
                path: tmp_path,
                source,
            });
        }
        if let Err(source) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(SyncError::Write { path, source });
        }

        info!(path = %path.display(), "Wrote artifact");
        Ok(path)
    }
}
