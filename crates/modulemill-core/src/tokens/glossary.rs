//! Emoji glossary rows.

use crate::headings::{lines_in, HeadingIndex};

use super::emoji::{contains_emoji, emoji_sequence, normalize};
use super::table::data_rows;

/// Title fragment of the glossary section.
pub const GLOSSARY_SECTION: &str = "EmojiGlossary";

/// One `| emoji | term | meaning |` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryEntry {
    /// Normalized emoji sequence from the first cell.
    pub emoji: String,
    /// Term with surrounding backticks removed.
    pub term: String,
    pub meaning: String,
}

impl GlossaryEntry {
    /// Whether this entry defines `(emoji, term)`.
    pub fn matches(&self, emoji: &str, term: &str) -> bool {
        self.emoji == emoji && self.term == term
    }
}

/// Rows of the `EmojiGlossary` section whose first cell carries an emoji.
///
/// Returns an empty list when the document has no such section.
pub fn glossary_entries(text: &str, index: &HeadingIndex) -> Vec<GlossaryEntry> {
    let Some(section) = index.find_section(GLOSSARY_SECTION) else {
        return Vec::new();
    };
    let body = lines_in(text, &[section.lines]);
    data_rows(&body, 3)
        .into_iter()
        .filter(|cells| contains_emoji(&normalize(&cells[0])))
        .map(|cells| GlossaryEntry {
            emoji: emoji_sequence(&cells[0]),
            term: cells[1].trim_matches('`').trim().to_string(),
            meaning: cells[2].clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUIDE: &str = "\
# Guide
| 🚫 | NotGlossary | outside section |

## EmojiGlossary
| Emoji | Term | Meaning |
|---|---|---|
| 🖨️ | `PrintQueue` | queued output |
| 🧭 | Compass | orientation |
| n/a | Plain | no emoji |
| 📄 | short |

## Next
| 🔥 | Fire | after section |
";

    #[test]
    fn reads_rows_inside_section_only() {
        let index = HeadingIndex::build(GUIDE);
        let entries = glossary_entries(GUIDE, &index);
        assert_eq!(
            entries,
            vec![
                GlossaryEntry {
                    emoji: "🖨".into(),
                    term: "PrintQueue".into(),
                    meaning: "queued output".into(),
                },
                GlossaryEntry {
                    emoji: "🧭".into(),
                    term: "Compass".into(),
                    meaning: "orientation".into(),
                },
            ]
        );
    }

    #[test]
    fn missing_section_yields_nothing() {
        let text = "# Guide\n| 🖨️ | PrintQueue | x |";
        assert!(glossary_entries(text, &HeadingIndex::build(text)).is_empty());
    }

    #[test]
    fn entry_matching_uses_normalized_emoji() {
        let index = HeadingIndex::build(GUIDE);
        let entries = glossary_entries(GUIDE, &index);
        assert!(entries[0].matches("🖨", "PrintQueue"));
        assert!(!entries[0].matches("🖨", "Printqueue"));
    }
}
