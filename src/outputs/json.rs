//! JSON output for `articles.json`.
//!
//! The collection is a top-level array of [`Article`] objects, pretty-printed
//! with two-space indentation and no trailing newline.

use tracing::instrument;

use crate::error::Result;
use crate::models::Article;

/// Serialize the publishable articles.
#[instrument(level = "debug", skip_all, fields(count = articles.len()))]
pub fn render_articles(articles: &[Article]) -> Result<String> {
    Ok(serde_json::to_string_pretty(articles)?)
}
