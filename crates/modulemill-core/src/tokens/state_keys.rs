//! Namespaced state keys such as `planner.active_goal`.

use std::sync::LazyLock;

use regex::Regex;

use crate::headings::{lines_in, HeadingIndex};

use super::table::inline_code_spans;

static STATE_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z_][a-z0-9_]*\.[a-z_][a-z0-9_]*$").expect("state key pattern is valid")
});

/// Inline-code state keys prefixed with `<module>.` (case-insensitive).
///
/// Only sections whose title mentions "state" are scanned; a document with
/// no such section is scanned whole. Keys are de-duplicated in first-seen
/// order.
pub fn state_keys(text: &str, index: &HeadingIndex, module: &str) -> Vec<String> {
    let sections = index.sections_matching("state");
    let scope = if sections.is_empty() {
        text.to_string()
    } else {
        let ranges: Vec<_> = sections.into_iter().map(|s| s.lines).collect();
        lines_in(text, &ranges)
    };

    let prefix = format!("{}.", module.to_lowercase());
    let mut keys: Vec<String> = Vec::new();
    for span in inline_code_spans(&scope) {
        let span = span.trim();
        if STATE_KEY_RE.is_match(span)
            && span.starts_with(&prefix)
            && !keys.iter().any(|k| k == span)
        {
            keys.push(span.to_string());
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_only_state_sections() {
        let text = "\
# Intro
`planner.ignored_here`
## State model
`planner.active_goal` and `planner.mode`
### Nested
`planner.nested_key`
## Commands
`planner.not_state`
## Persisted State
`planner.mode` `planner.history`
";
        let index = HeadingIndex::build(text);
        assert_eq!(
            state_keys(text, &index, "Planner"),
            vec![
                "planner.active_goal",
                "planner.mode",
                "planner.nested_key",
                "planner.history",
            ]
        );
    }

    #[test]
    fn falls_back_to_whole_document() {
        let text = "# Intro\nuses `planner.active_goal`";
        let index = HeadingIndex::build(text);
        assert_eq!(state_keys(text, &index, "planner"), vec!["planner.active_goal"]);
    }

    #[test]
    fn rejects_other_shapes() {
        let text = "# State\n`planner.a.b` `Planner.Mode` `other.key` `planner.` `planner.ok_1`";
        let index = HeadingIndex::build(text);
        assert_eq!(state_keys(text, &index, "planner"), vec!["planner.ok_1"]);
    }
}
