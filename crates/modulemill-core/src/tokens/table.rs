//! Markdown table row recognition and inline-code spans.

use std::sync::LazyLock;

use regex::Regex;

static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("inline code pattern is valid"));

/// Classification of a single line for table scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace-only.
    Blank,
    /// `|---|:--:|` style divider.
    Separator,
    /// Pipe-delimited row with its trimmed cells.
    Row(Vec<String>),
    /// Anything else.
    Text,
}

impl LineKind {
    pub fn classify(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        let Some(cells) = split_row(trimmed) else {
            return LineKind::Text;
        };
        let is_separator = cells.iter().all(|c| {
            !c.is_empty() && c.chars().all(|ch| matches!(ch, '-' | ':' | ' '))
        });
        if is_separator {
            LineKind::Separator
        } else {
            LineKind::Row(cells)
        }
    }
}

/// Split a `| a | b |` row into trimmed cells, or `None` if it isn't a row.
pub fn split_row(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|')?;
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    Some(inner.split('|').map(|c| c.trim().to_string()).collect())
}

/// All inline-code spans in `text`, in order.
pub fn inline_code_spans(text: &str) -> impl Iterator<Item = &str> {
    INLINE_CODE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// First inline-code span in `text`.
pub fn first_inline_code(text: &str) -> Option<&str> {
    inline_code_spans(text).next()
}

/// Data rows (at least `min_cells` cells, separators skipped) of every table in `text`.
pub fn data_rows(text: &str, min_cells: usize) -> Vec<Vec<String>> {
    text.lines()
        .filter_map(|line| match LineKind::classify(line) {
            LineKind::Row(cells) if cells.len() >= min_cells => Some(cells),
            _ => None,
        })
        .collect()
}
