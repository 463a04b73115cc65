//! Heading index and section ranges over markdown text.
//!
//! Only ATX headings (`#` through `######` followed by whitespace) are
//! recognized. A section runs from its heading line up to, but excluding,
//! the next heading of the same or a shallower level.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{MillError, Result};

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("heading pattern is valid"));

/// A single ATX heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Number of `#` markers (1-6).
    pub level: usize,
    /// Trimmed heading text.
    pub title: String,
    /// Zero-based line position.
    pub line: usize,
}

/// A heading together with the line range its section covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub heading: &'a Heading,
    pub lines: Range<usize>,
}

/// Ordered headings of one document.
#[derive(Debug, Clone, Default)]
pub struct HeadingIndex {
    headings: Vec<Heading>,
    line_count: usize,
}

impl HeadingIndex {
    /// Index every heading in `text`.
    pub fn build(text: &str) -> Self {
        let mut headings = Vec::new();
        let mut line_count = 0;
        for (line, raw) in text.lines().enumerate() {
            line_count = line + 1;
            if let Some(caps) = HEADING_RE.captures(raw) {
                headings.push(Heading {
                    level: caps[1].len(),
                    title: caps[2].trim().to_string(),
                    line,
                });
            }
        }
        Self {
            headings,
            line_count,
        }
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    /// Line range covered by the heading at position `idx` of the index.
    fn section_at(&self, idx: usize) -> Section<'_> {
        let heading = &self.headings[idx];
        let end = self.headings[idx + 1..]
            .iter()
            .find(|h| h.level <= heading.level)
            .map_or(self.line_count, |h| h.line);
        Section {
            heading,
            lines: heading.line..end,
        }
    }

    /// First section whose title contains `needle` (case-insensitive).
    pub fn find_section(&self, needle: &str) -> Option<Section<'_>> {
        let needle = needle.to_lowercase();
        self.headings
            .iter()
            .position(|h| h.title.to_lowercase().contains(&needle))
            .map(|idx| self.section_at(idx))
    }

    /// Every section whose title contains `needle` (case-insensitive).
    pub fn sections_matching(&self, needle: &str) -> Vec<Section<'_>> {
        let needle = needle.to_lowercase();
        self.headings
            .iter()
            .enumerate()
            .filter(|(_, h)| h.title.to_lowercase().contains(&needle))
            .map(|(idx, _)| self.section_at(idx))
            .collect()
    }

    /// First section whose title starts with `prefix` (case-insensitive).
    pub fn find_section_by_prefix(&self, prefix: &str) -> Result<Section<'_>> {
        let wanted = prefix.to_lowercase();
        self.headings
            .iter()
            .position(|h| h.title.to_lowercase().starts_with(&wanted))
            .map(|idx| self.section_at(idx))
            .ok_or_else(|| MillError::SectionNotFound {
                prefix: prefix.to_string(),
            })
    }
}

/// Return the text of the first section whose heading starts with `prefix`.
///
/// The excerpt runs from the heading line through the line before the next
/// heading of equal or shallower level, with trailing whitespace collapsed to
/// a single newline.
pub fn extract_section(text: &str, prefix: &str) -> Result<String> {
    let index = HeadingIndex::build(text);
    let section = index.find_section_by_prefix(prefix)?;
    let lines: Vec<&str> = text.lines().collect();
    let mut out = lines[section.lines].join("\n").trim_end().to_string();
    out.push('\n');
    Ok(out)
}

/// Slice `text` down to the given line ranges, joined with newlines.
pub(crate) fn lines_in(text: &str, ranges: &[Range<usize>]) -> String {
    text.lines()
        .enumerate()
        .filter(|(i, _)| ranges.iter().any(|r| r.contains(i)))
        .map(|(_, l)| l)
        .collect::<Vec<_>>()
        .join("\n")
}
