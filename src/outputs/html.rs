//! HTML index page generation.
//!
//! The page is a single self-contained document with an inline stylesheet:
//! a heading, the generation time, the article count, a link to
//! `articles.json`, and one summary block per article.
//!
//! Every article-derived string is HTML-escaped before it is inserted.

use chrono::{DateTime, Utc};
use itertools::Itertools;
use tracing::instrument;

use crate::models::Article;
use crate::outputs::ARTICLES_JSON;

/// Characters of content shown in each summary block.
pub const PREVIEW_CHARS: usize = 200;
/// Appended to a preview that was cut short.
pub const TRUNCATION_MARKER: &str = "...";

const STYLE: &str = "body{font-family:Arial,sans-serif;max-width:800px;margin:40px auto;padding:20px;}\
.article{border:1px solid #ddd;padding:15px;margin:15px 0;border-radius:5px;}\
.title{font-size:18px;font-weight:bold;color:#333;margin-bottom:10px;}\
.meta{color:#666;font-size:14px;margin-bottom:10px;}\
.content{color:#444;line-height:1.5;}\
.json-link{background:#007bff;color:white;padding:10px 20px;text-decoration:none;border-radius:5px;display:inline-block;margin:20px 0;}";

/// Render the index page for the publishable articles.
#[instrument(level = "debug", skip_all, fields(count = articles.len()))]
pub fn render_index(articles: &[Article], now: DateTime<Utc>, site_title: &str) -> String {
    let title = escape_html(site_title);
    let generated = now.format("%Y-%m-%d %H:%M:%S UTC");
    let blocks = articles.iter().map(render_article).join("");

    format!(
        "<!DOCTYPE html>\
<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{title}</title><style>{STYLE}</style></head>\
<body><h1>🥩 {title}</h1>\
<p><strong>Last Updated:</strong> {generated}</p>\
<p><strong>Published Articles:</strong> {count}</p>\
<a href=\"{ARTICLES_JSON}\" class=\"json-link\">📄 Download {ARTICLES_JSON}</a>\
<h2>Available Articles:</h2>{blocks}\
<hr><p><em>This page is regenerated automatically from the source spreadsheet.</em></p>\
</body></html>",
        count = articles.len(),
    )
}

fn render_article(article: &Article) -> String {
    format!(
        "<div class=\"article\">\
<div class=\"title\">📰 {title}</div>\
<div class=\"meta\">👤 {author} | 📅 {date} | 🏷️ {keywords}</div>\
<div class=\"content\">{preview}</div>\
</div>",
        title = escape_html(&article.title),
        author = escape_html(&article.author),
        date = escape_html(&article.date),
        keywords = escape_html(&article.keywords),
        preview = escape_html(&preview(&article.content)),
    )
}

/// First [`PREVIEW_CHARS`] characters of `content`, plus the marker if cut.
pub fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &content[..cut]),
        None => content.to_string(),
    }
}

/// Escape the five markup-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
