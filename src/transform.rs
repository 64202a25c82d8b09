//! CSV text to [`Article`] records, and the publish filter.
//!
//! Two mapping strategies are supported. They differ in how rows are
//! accepted and how `id` is numbered, and `id` is visible in the JSON, so a
//! deployment should stick to one.
//!
//! | Strategy | Columns | Rows kept | `id` |
//! |----------|---------|-----------|------|
//! | [`MappingStrategy::Header`] | looked up by header name | every non-blank data line | 1-based index among data lines |
//! | [`MappingStrategy::Position`] | fixed positions 0..8 | at least 2 fields and a non-empty title | 1-based source line number |
//!
//! In both strategies the header is the first non-blank line, and a leading
//! UTF-8 byte order mark is ignored.

use clap::ValueEnum;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

use crate::csv::{is_blank, numbered_lines, split_line};
use crate::models::{Article, ArticleColumns};
use crate::utils::Clock;

/// How data rows are turned into article columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MappingStrategy {
    /// First non-blank line names the columns; rows are read by name.
    #[default]
    Header,
    /// First non-blank line is ignored; rows are read by fixed position.
    Position,
}

/// Result of mapping a CSV document.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    /// Records in source order.
    pub articles: Vec<Article>,
    /// Non-blank data lines that did not produce a record.
    pub skipped: usize,
}

/// Fixed inputs for record construction.
#[derive(Debug, Clone, Copy)]
pub struct RecordContext<'a> {
    pub author: &'a str,
    pub clock: &'a dyn Clock,
}

impl RecordContext<'_> {
    fn build(&self, id: usize, columns: ArticleColumns) -> Article {
        Article::from_columns(id, columns, self.author, self.clock.now())
    }
}

/// Map the full CSV text to article records.
///
/// Malformed rows are skipped and counted, never fatal.
#[instrument(level = "info", skip_all, fields(?strategy, bytes = csv.len()))]
pub fn parse_articles(csv: &str, strategy: MappingStrategy, ctx: &RecordContext<'_>) -> ParseOutcome {
    let csv = csv.strip_prefix('\u{feff}').unwrap_or(csv);
    let outcome = match strategy {
        MappingStrategy::Header => parse_by_header(csv, ctx),
        MappingStrategy::Position => parse_by_position(csv, ctx),
    };
    info!(
        parsed = outcome.articles.len(),
        skipped = outcome.skipped,
        "Mapped CSV rows to articles"
    );
    outcome
}

fn parse_by_header(csv: &str, ctx: &RecordContext<'_>) -> ParseOutcome {
    let mut lines = numbered_lines(csv).filter(|(_, line)| !is_blank(line));
    let Some((_, header_line)) = lines.next() else {
        debug!("CSV has no header line");
        return ParseOutcome::default();
    };

    // First occurrence wins when a header name repeats.
    let mut header: HashMap<String, usize> = HashMap::new();
    for (i, name) in split_line(header_line).into_iter().enumerate() {
        header.entry(name).or_insert(i);
    }

    let articles = lines
        .enumerate()
        .map(|(index, (_, line))| {
            let fields = split_line(line);
            let columns = ArticleColumns::from_lookup(|name| {
                header
                    .get(name)
                    .and_then(|&i| fields.get(i))
                    .map(String::as_str)
            });
            ctx.build(index + 1, columns)
        })
        .collect();

    ParseOutcome {
        articles,
        skipped: 0,
    }
}

fn parse_by_position(csv: &str, ctx: &RecordContext<'_>) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    let mut lines = numbered_lines(csv).filter(|(_, line)| !is_blank(line));
    if lines.next().is_none() {
        return outcome;
    }

    for (line_no, line) in lines {
        let fields = split_line(line);
        if fields.len() < 2 || fields[0].is_empty() {
            debug!(line_no, fields = fields.len(), "Skipping malformed row");
            outcome.skipped += 1;
            continue;
        }
        let columns = ArticleColumns::from_positions(&fields);
        outcome.articles.push(ctx.build(line_no, columns));
    }

    outcome
}

/// Keep only publishable records, preserving order.
pub fn publishable(articles: &[Article]) -> Vec<Article> {
    articles
        .iter()
        .filter(|a| a.is_publishable())
        .cloned()
        .collect()
}
