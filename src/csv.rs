//! Line-oriented CSV splitting.
//!
//! The published spreadsheet export is simple enough that a single pass over
//! each line is sufficient. Known limitations:
//!
//! - a quoted field cannot span multiple lines
//! - `""` inside a quoted field is not an escaped quote; each `"` just
//!   toggles quoting
//! - an unbalanced quote keeps the rest of the line quoted, without error

use std::mem::take;

/// Split one CSV line into trimmed fields.
///
/// Always yields at least one field, so an empty line produces `[""]`.
/// Callers are expected to skip blank lines themselves.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(take(&mut field).trim().to_string()),
            _ => field.push(ch),
        }
    }

    fields.push(field.trim().to_string());
    fields
}

/// Iterate over the lines of `text` with their 1-based line numbers.
///
/// Handles both `\n` and `\r\n` endings. Blank lines are kept so that line
/// numbers stay faithful to the source.
pub fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().enumerate().map(|(i, line)| (i + 1, line))
}

/// `true` when a line carries nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
