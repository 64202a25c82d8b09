//! Retrieval of the published CSV export.
//!
//! - [`FetchText`]: async "give me the whole body as text" abstraction
//! - [`HttpFetcher`]: `reqwest` implementation with a request timeout
//!
//! There is no retry loop. The scheduler runs the sync again on its next
//! tick, so one failed fetch simply fails the run.

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::{Result, SyncError};
use crate::utils::truncate_for_log;

/// Bytes of the response shown in debug logs.
const PREVIEW_BYTES: usize = 500;

/// Fetch a document and return its complete body as text.
pub trait FetchText {
    async fn fetch_text(&self, url: &Url) -> Result<String>;
}

/// HTTP(S) fetcher backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Build a fetcher whose requests fail after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| SyncError::Fetch {
                url: String::new(),
                source,
            })?;
        Ok(Self { client, timeout })
    }

    fn classify(&self, url: &Url, source: reqwest::Error) -> SyncError {
        if source.is_timeout() {
            SyncError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            }
        } else {
            SyncError::Fetch {
                url: url.to_string(),
                source,
            }
        }
    }
}

impl FetchText for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(host = url.host_str().unwrap_or_default()))]
    async fn fetch_text(&self, url: &Url) -> Result<String> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Source returned non-success status");
            return Err(SyncError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = response.bytes().await.map_err(|e| self.classify(url, e))?;
        let text = String::from_utf8(bytes.to_vec()).map_err(|source| SyncError::NotText {
            url: url.to_string(),
            source,
        })?;

        if text.trim().is_empty() {
            return Err(SyncError::EmptyBody {
                url: url.to_string(),
            });
        }

        if is_html(&content_type, &text) {
            warn!(
                %content_type,
                preview = %truncate_for_log(&text, PREVIEW_BYTES),
                "Source returned an HTML page instead of CSV"
            );
            return Err(SyncError::NotCsv {
                url: url.to_string(),
                content_type,
            });
        }

        info!(
            bytes = text.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched source CSV"
        );
        debug!(preview = %truncate_for_log(&text, PREVIEW_BYTES), "Response preview");
        Ok(text)
    }
}

/// HTML by declared media type, or by a leading doctype / `<html` tag.
fn is_html(content_type: &str, body: &str) -> bool {
    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    if media_type.eq_ignore_ascii_case("text/html") {
        return true;
    }
    let head = body.trim_start().chars().take(9).collect::<String>().to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}
