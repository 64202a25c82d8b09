//! Data models for spreadsheet rows and the published article records.
//!
//! - [`ArticleColumns`]: the eight source columns of one spreadsheet row
//! - [`Article`]: the record written to `articles.json`
//!
//! Field order in [`Article`] is the JSON field order, so do not reorder it.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Column names read by the header-driven mapper, in positional order.
pub const COLUMN_NAMES: [&str; 8] = [
    "Title",
    "Status",
    "First Paragraph",
    "Second Paragraph",
    "Keywords",
    "Date",
    "Notes",
    "URL",
];

/// Raw text of one spreadsheet row, before it becomes an [`Article`].
///
/// Every column is plain text; absent columns are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleColumns {
    /// `Title` column.
    pub title: String,
    /// `Status` column, e.g. "Published" or "Draft".
    pub status: String,
    /// `First Paragraph` column.
    pub first_paragraph: String,
    /// `Second Paragraph` column.
    pub second_paragraph: String,
    /// `Keywords` column, free text.
    pub keywords: String,
    /// `Date` column; blank means "use the run date".
    pub date: String,
    /// `Notes` column, editorial notes.
    pub notes: String,
    /// `URL` column.
    pub url: String,
}

impl ArticleColumns {
    /// Build columns from positional fields, defaulting missing trailing ones.
    pub fn from_positions(fields: &[String]) -> Self {
        let at = |i: usize| fields.get(i).cloned().unwrap_or_default();
        Self {
            title: at(0),
            status: at(1),
            first_paragraph: at(2),
            second_paragraph: at(3),
            keywords: at(4),
            date: at(5),
            notes: at(6),
            url: at(7),
        }
    }

    /// Build columns through a name lookup, defaulting absent names to empty text.
    pub fn from_lookup<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let get = |name: &str| lookup(name).unwrap_or_default().to_string();
        let [title, status, first, second, keywords, date, notes, url] = COLUMN_NAMES;
        Self {
            title: get(title),
            status: get(status),
            first_paragraph: get(first),
            second_paragraph: get(second),
            keywords: get(keywords),
            date: get(date),
            notes: get(notes),
            url: get(url),
        }
    }
}

/// An article as published in `articles.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// Stable ordinal assigned by the mapper, as text.
    pub id: String,
    /// Article headline.
    pub title: String,
    /// Workflow status from the sheet; only "published" rows are emitted.
    pub status: String,
    /// Opening paragraph as written in the sheet.
    pub first_paragraph: String,
    /// Follow-up paragraph as written in the sheet.
    pub second_paragraph: String,
    /// Both paragraphs joined by a blank line, trimmed.
    pub content: String,
    /// Keywords as entered, typically comma-separated.
    pub keywords: String,
    /// Date from the sheet, or the run date when the cell was blank.
    pub date: String,
    /// Editorial notes from the sheet.
    pub notes: String,
    /// Canonical link for the article, if any.
    pub url: String,
    /// Fixed byline configured for the run.
    pub author: String,
    /// Always empty; the sheet has no image column.
    pub featured_image: String,
    /// RFC 3339 timestamp of when this record was built.
    pub last_updated: String,
}

impl Article {
    /// Build a record from a row's columns.
    ///
    /// `now` stamps `last_updated` and stands in for a blank `date`.
    pub fn from_columns(id: usize, columns: ArticleColumns, author: &str, now: DateTime<Utc>) -> Self {
        let content = join_paragraphs(&columns.first_paragraph, &columns.second_paragraph);
        let date = if columns.date.is_empty() {
            format_date(now)
        } else {
            columns.date
        };

        Self {
            id: id.to_string(),
            title: columns.title,
            status: columns.status,
            first_paragraph: columns.first_paragraph,
            second_paragraph: columns.second_paragraph,
            content,
            keywords: columns.keywords,
            date,
            notes: columns.notes,
            url: columns.url,
            author: author.to_string(),
            featured_image: String::new(),
            last_updated: format_timestamp(now),
        }
    }

    /// Published status (any case) and a non-blank title.
    pub fn is_publishable(&self) -> bool {
        self.status.to_lowercase() == "published" && !self.title.trim().is_empty()
    }
}

/// `first + "\n\n" + second`, trimmed.
pub fn join_paragraphs(first: &str, second: &str) -> String {
    format!("{first}\n\n{second}").trim().to_string()
}

/// Calendar date used when the sheet leaves `Date` blank.
pub fn format_date(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// `2024-01-01T12:00:00.000Z`
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    fn columns(title: &str, status: &str) -> ArticleColumns {
        ArticleColumns {
            title: title.to_string(),
            status: status.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_positions_defaults_missing_columns() {
        let fields = vec!["Steak Tips".to_string(), "Published".to_string()];
        let cols = ArticleColumns::from_positions(&fields);
        assert_eq!(cols.title, "Steak Tips");
        assert_eq!(cols.status, "Published");
        assert_eq!(cols.url, "");
    }

    #[test]
    fn test_from_lookup_reads_named_columns() {
        let cols = ArticleColumns::from_lookup(|name| match name {
            "Title" => Some("Brisket"),
            "URL" => Some("http://x"),
            _ => None,
        });
        assert_eq!(cols.title, "Brisket");
        assert_eq!(cols.url, "http://x");
        assert_eq!(cols.keywords, "");
    }

    #[test]
    fn test_content_joins_paragraphs() {
        let mut cols = columns("Steak Tips", "Published");
        cols.first_paragraph = "Great cut.".to_string();
        cols.second_paragraph = "Cook hot.".to_string();
        let article = Article::from_columns(1, cols, "Prime Cuts Team", fixed_now());
        assert_eq!(article.content, "Great cut.\n\nCook hot.");
    }

    #[test]
    fn test_content_is_trimmed_when_a_paragraph_is_empty() {
        assert_eq!(join_paragraphs("Only first.", ""), "Only first.");
        assert_eq!(join_paragraphs("", "Only second."), "Only second.");
        assert_eq!(join_paragraphs("", ""), "");
    }

    #[test]
    fn test_blank_date_defaults_to_clock() {
        let article = Article::from_columns(7, columns("A", "Draft"), "Team", fixed_now());
        assert_eq!(article.id, "7");
        assert_eq!(article.date, "2025-03-14");
        assert_eq!(article.last_updated, "2025-03-14T09:26:53.000Z");
        assert_eq!(article.author, "Team");
        assert_eq!(article.featured_image, "");
    }

    #[test]
    fn test_explicit_date_is_kept() {
        let mut cols = columns("A", "Published");
        cols.date = "2024-01-01".to_string();
        let article = Article::from_columns(1, cols, "Team", fixed_now());
        assert_eq!(article.date, "2024-01-01");
    }

    #[test]
    fn test_is_publishable() {
        let now = fixed_now();
        let build = |title: &str, status: &str| Article::from_columns(1, columns(title, status), "T", now);

        assert!(build("Steak", "Published").is_publishable());
        assert!(build("Steak", "PUBLISHED").is_publishable());
        assert!(build("Steak", "published").is_publishable());
        assert!(!build("Steak", "Draft").is_publishable());
        assert!(!build("Steak", "DRAFT").is_publishable());
        assert!(!build("   ", "Published").is_publishable());
        assert!(!build("", "Published").is_publishable());
    }

    #[test]
    fn test_article_serializes_fields_in_order() {
        let article = Article::from_columns(1, columns("A", "Published"), "T", fixed_now());
        let json = serde_json::to_string(&article).unwrap();
        let keys = [
            "\"id\"",
            "\"title\"",
            "\"status\"",
            "\"first_paragraph\"",
            "\"second_paragraph\"",
            "\"content\"",
            "\"keywords\"",
            "\"date\"",
            "\"notes\"",
            "\"url\"",
            "\"author\"",
            "\"featured_image\"",
            "\"last_updated\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
