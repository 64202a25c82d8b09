//! The sync pipeline: fetch → parse → filter → write JSON → write HTML.
//!
//! Everything the pipeline needs is passed in through [`SyncConfig`] and the
//! [`FetchText`] / [`ArtifactWriter`] collaborators, so a run is fully
//! determined by its inputs and the clock.

use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

use crate::error::{Result, SyncError};
use crate::fetch::FetchText;
use crate::outputs::{ARTICLES_JSON, ArtifactWriter, INDEX_HTML, html, json};
use crate::transform::{MappingStrategy, RecordContext, parse_articles, publishable};
use crate::utils::Clock;

/// Explicit configuration for one sync run.
#[derive(Debug)]
pub struct SyncConfig {
    /// Published CSV export of the spreadsheet.
    pub source_url: Url,
    /// Written into every record's `author`.
    pub author: String,
    /// Heading and `<title>` of the index page.
    pub site_title: String,
    pub strategy: MappingStrategy,
    /// Upper bound for the fetch.
    pub timeout: Duration,
    pub clock: Box<dyn Clock>,
}

/// Validate a source URL: it must parse and use `http` or `https`.
pub fn parse_source_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| SyncError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(SyncError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}

/// Counts and paths from a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Records built from the CSV.
    pub total: usize,
    /// Data rows rejected by the mapper.
    pub skipped: usize,
    /// Records that passed the publish filter.
    pub published: usize,
    pub json_path: PathBuf,
    pub html_path: PathBuf,
}

/// Run one complete sync.
///
/// The JSON collection is written before the index page. If writing it
/// fails, the run stops and the index page is left untouched.
#[instrument(level = "info", skip_all, fields(strategy = ?config.strategy))]
pub async fn run_sync<F, W>(config: &SyncConfig, fetcher: &F, writer: &W) -> Result<SyncReport>
where
    F: FetchText,
    W: ArtifactWriter,
{
    let csv = fetcher.fetch_text(&config.source_url).await?;
    info!(chars = csv.chars().count(), "Received raw CSV data");

    let ctx = RecordContext {
        author: &config.author,
        clock: config.clock.as_ref(),
    };
    let outcome = parse_articles(&csv, config.strategy, &ctx);
    let published = publishable(&outcome.articles);
    info!(
        total = outcome.articles.len(),
        skipped = outcome.skipped,
        published = published.len(),
        "Filtered to published articles"
    );

    let json = json::render_articles(&published)?;
    let json_path = writer.write_artifact(ARTICLES_JSON, json.as_bytes()).await?;

    let page = html::render_index(&published, config.clock.now(), &config.site_title);
    let html_path = writer.write_artifact(INDEX_HTML, page.as_bytes()).await?;

    Ok(SyncReport {
        total: outcome.articles.len(),
        skipped: outcome.skipped,
        published: published.len(),
        json_path,
        html_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Article;
    use crate::outputs::DirWriter;
    use crate::utils::FixedClock;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    const CSV: &str = "Title,Status,First Paragraph,Second Paragraph,Keywords,Date,Notes,URL\n\
Steak Tips,Published,Great cut.,Cook hot.,beef,2024-01-01,,http://x\n\
Draft Piece,Draft,Not yet.,,,,,\n\
\"Salt, Pepper\",PUBLISHED,Season early.,,seasoning,,,\n";

    #[derive(Debug)]
    struct StubFetcher(std::result::Result<&'static str, ()>);

    impl FetchText for StubFetcher {
        async fn fetch_text(&self, url: &Url) -> Result<String> {
            match self.0 {
                Ok(body) => Ok(body.to_string()),
                Err(()) => Err(SyncError::EmptyBody {
                    url: url.to_string(),
                }),
            }
        }
    }

    /// Records artifacts in memory; optionally fails on one name.
    #[derive(Debug, Default)]
    struct MemoryWriter {
        files: Mutex<BTreeMap<String, Vec<u8>>>,
        fail_on: Option<&'static str>,
    }

    impl ArtifactWriter for MemoryWriter {
        async fn write_artifact(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
            if self.fail_on == Some(name) {
                return Err(SyncError::Write {
                    path: PathBuf::from(name),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                });
            }
            self.files
                .lock()
                .unwrap()
                .insert(name.to_string(), bytes.to_vec());
            Ok(PathBuf::from(name))
        }
    }

    fn config() -> SyncConfig {
        SyncConfig {
            source_url: parse_source_url("https://docs.example.com/sheet/pub?output=csv").unwrap(),
            author: "Prime Cuts Team".to_string(),
            site_title: "Prime Cuts Articles CDN".to_string(),
            strategy: MappingStrategy::Header,
            timeout: Duration::from_secs(10),
            clock: Box::new(FixedClock(Utc.with_ymd_and_hms(2025, 5, 5, 5, 5, 5).unwrap())),
        }
    }

    #[tokio::test]
    async fn test_run_sync_writes_both_artifacts() {
        let writer = MemoryWriter::default();
        let report = run_sync(&config(), &StubFetcher(Ok(CSV)), &writer).await.unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(report.published, 2);
        assert_eq!(report.skipped, 0);

        let files = writer.files.lock().unwrap();
        let articles: Vec<Article> = serde_json::from_slice(&files[ARTICLES_JSON]).unwrap();
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Steak Tips", "Salt, Pepper"]);
        assert_eq!(articles[0].id, "1");
        assert_eq!(articles[1].id, "3");
        assert_eq!(articles[1].date, "2025-05-05");
        assert_eq!(articles[1].last_updated, "2025-05-05T05:05:05.000Z");

        let page = String::from_utf8(files[INDEX_HTML].clone()).unwrap();
        assert!(page.contains("<strong>Published Articles:</strong> 2</p>"));
        assert!(page.contains("📰 Salt, Pepper"));
    }

    #[tokio::test]
    async fn test_run_sync_is_reproducible_with_fixed_clock() {
        let first = MemoryWriter::default();
        let second = MemoryWriter::default();
        run_sync(&config(), &StubFetcher(Ok(CSV)), &first).await.unwrap();
        run_sync(&config(), &StubFetcher(Ok(CSV)), &second).await.unwrap();
        assert_eq!(*first.files.lock().unwrap(), *second.files.lock().unwrap());
    }

    #[tokio::test]
    async fn test_fetch_failure_writes_nothing() {
        let writer = MemoryWriter::default();
        let err = run_sync(&config(), &StubFetcher(Err(())), &writer).await.unwrap_err();
        assert!(err.is_fetch_failure());
        assert!(writer.files.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_write_failure_skips_index() {
        let writer = MemoryWriter {
            fail_on: Some(ARTICLES_JSON),
            ..Default::default()
        };
        let err = run_sync(&config(), &StubFetcher(Ok(CSV)), &writer).await.unwrap_err();
        assert!(err.is_write_failure());
        assert!(!writer.files.lock().unwrap().contains_key(INDEX_HTML));
    }

    #[tokio::test]
    async fn test_run_sync_into_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = DirWriter::new(tmp.path());
        let report = run_sync(&config(), &StubFetcher(Ok(CSV)), &writer).await.unwrap();

        assert_eq!(report.json_path, tmp.path().join(ARTICLES_JSON));
        let json = std::fs::read_to_string(&report.json_path).unwrap();
        assert!(json.starts_with("[\n  {"));
        let html = std::fs::read_to_string(&report.html_path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_parse_source_url() {
        assert!(parse_source_url("https://docs.example.com/pub?output=csv").is_ok());
        assert!(parse_source_url(" http://localhost:8080/sheet.csv ").is_ok());
        assert!(matches!(
            parse_source_url("ftp://example.com/sheet.csv"),
            Err(SyncError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_source_url("not a url"),
            Err(SyncError::InvalidUrl { .. })
        ));
    }
}
