//! Canon command tables.
//!
//! A command table is any markdown table whose header starts with the
//! cells `Command | Canon`. Each data row names a command label, its canon
//! invocation (first inline-code span of the second cell) and optional
//! emoji aliases in the third cell.

use std::sync::LazyLock;

use regex::Regex;

use super::emoji::emoji_runs;
use super::table::{first_inline_code, LineKind};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>|\[[^\]]*\]").expect("placeholder pattern is valid"));

/// Commands whose canon form ends in one of these verbs must be mirrored
/// into the machine manual.
pub const LIFECYCLE_VERBS: &[&str] = &["load", "activate", "sleep", "unload", "status"];

/// Scanner position relative to a command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    Outside,
    /// Header matched, no data row yet.
    AwaitingRows,
    InCommandTable,
}

/// What the scanner does with the current line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing to emit.
    Skip,
    /// A data row of a command table.
    Emit(Vec<String>),
}

/// Whether `cells` is a command-table header row.
pub fn is_command_header(cells: &[String]) -> bool {
    cells.len() >= 2
        && cells[0].eq_ignore_ascii_case("command")
        && cells[1].eq_ignore_ascii_case("canon")
}

/// Advance the scanner by one classified line.
///
/// Outside, only a matching header enters a table. Separators are always
/// skipped inside. Blank lines before the first data row are tolerated; once
/// rows began, a blank line ends the table. Plain text always ends it.
pub fn step(state: TableState, line: LineKind) -> (TableState, Step) {
    use TableState::*;
    match (state, line) {
        (Outside, LineKind::Row(cells)) if is_command_header(&cells) => (AwaitingRows, Step::Skip),
        (Outside, _) => (Outside, Step::Skip),
        (AwaitingRows, LineKind::Separator | LineKind::Blank) => (AwaitingRows, Step::Skip),
        (InCommandTable, LineKind::Separator) => (InCommandTable, Step::Skip),
        (AwaitingRows | InCommandTable, LineKind::Row(cells)) => {
            (InCommandTable, Step::Emit(cells))
        }
        (InCommandTable, LineKind::Blank) | (AwaitingRows | InCommandTable, LineKind::Text) => {
            (Outside, Step::Skip)
        }
    }
}

/// One data row of a command table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRow {
    /// First cell, e.g. `/load`.
    pub label: String,
    /// Normalized canon invocation, if the second cell carries inline code.
    pub canon: Option<String>,
    /// Normalized, de-duplicated emoji runs from the alias column.
    pub aliases: Vec<String>,
}

impl CommandRow {
    fn from_cells(cells: &[String]) -> Self {
        let label = cells.first().cloned().unwrap_or_default();
        let canon = cells
            .get(1)
            .and_then(|c| first_inline_code(c))
            .map(normalize_canon)
            .filter(|c| !c.is_empty());
        let aliases = cells.get(2).map(|c| emoji_runs(c)).unwrap_or_default();
        Self {
            label,
            canon,
            aliases,
        }
    }

    /// Whether the canon form ends in a lifecycle verb, e.g. `mod load`,
    /// `mod.load` or `mod:load`.
    pub fn is_lifecycle(&self) -> bool {
        self.canon
            .as_deref()
            .and_then(|c| {
                c.split(|ch: char| !ch.is_ascii_alphanumeric())
                    .rfind(|word| !word.is_empty())
            })
            .is_some_and(|verb| {
                LIFECYCLE_VERBS
                    .iter()
                    .any(|v| v.eq_ignore_ascii_case(verb))
            })
    }
}

/// Drop `<name>` / `[opt]` placeholders and collapse whitespace.
pub fn normalize_canon(raw: &str) -> String {
    let stripped = PLACEHOLDER_RE.replace_all(raw, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Every data row of every command table in `text`.
pub fn command_rows(text: &str) -> Vec<CommandRow> {
    let mut state = TableState::Outside;
    let mut rows = Vec::new();
    for line in text.lines() {
        let (next, action) = step(state, LineKind::classify(line));
        state = next;
        if let Step::Emit(cells) = action {
            rows.push(CommandRow::from_cells(&cells));
        }
    }
    rows
}

/// Normalized canon commands, de-duplicated in first-seen order.
pub fn canon_commands(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for canon in command_rows(text).into_iter().filter_map(|r| r.canon) {
        if !out.contains(&canon) {
            out.push(canon);
        }
    }
    out
}

/// Command label → alias emoji for rows that declare any.
pub fn alias_emoji_map(text: &str) -> Vec<(String, Vec<String>)> {
    command_rows(text)
        .into_iter()
        .filter(|r| !r.aliases.is_empty())
        .map(|r| (r.label, r.aliases))
        .collect()
}
