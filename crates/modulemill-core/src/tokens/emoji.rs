//! Emoji normalization and emoji+PascalCase pairing.

/// Text presentation selector.
pub const VS15: char = '\u{FE0E}';
/// Emoji presentation selector.
pub const VS16: char = '\u{FE0F}';
const ZWJ: char = '\u{200D}';
const KEYCAP: char = '\u{20E3}';

/// Whether `c` is a variation selector that only affects rendering.
pub fn is_variation_selector(c: char) -> bool {
    c == VS15 || c == VS16
}

/// Whether `c` is an emoji code point.
///
/// The two pictographic blocks count whole; from the arrow, technical and
/// enclosed blocks only the code points with emoji presentation count, so
/// prose arrows such as `→` and `⇒` stay plain text.
pub fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x2600..=0x27BF
            | 0x1F300..=0x1FAFF
            | 0x2194..=0x2199
            | 0x21A9..=0x21AA
            | 0x231A..=0x231B
            | 0x2328
            | 0x23CF
            | 0x23E9..=0x23F3
            | 0x23F8..=0x23FA
            | 0x2B05..=0x2B07
            | 0x2B1B..=0x2B1C
            | 0x2B50
            | 0x2B55
            | 0x1F004
            | 0x1F0CF
            | 0x1F170..=0x1F251
    )
}

fn joins_run(c: char) -> bool {
    c == ZWJ || c == KEYCAP
}

/// Strip variation selectors so visually-equivalent renderings compare equal.
pub fn normalize(s: &str) -> String {
    s.chars().filter(|c| !is_variation_selector(*c)).collect()
}

/// Whether the normalized text contains at least one emoji code point.
pub fn contains_emoji(s: &str) -> bool {
    s.chars().any(is_emoji)
}

/// Contiguous emoji runs in `s`, normalized and de-duplicated in first-seen order.
///
/// Zero-width joiners and keycap marks continue a run; anything else ends it.
pub fn emoji_runs(s: &str) -> Vec<String> {
    let mut runs: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in normalize(s).chars() {
        if is_emoji(c) || (!current.is_empty() && joins_run(c)) {
            current.push(c);
        } else if !current.is_empty() {
            push_unique(&mut runs, std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        push_unique(&mut runs, current);
    }
    runs
}

/// Every emoji code point (and joiner) in `s`, concatenated in order.
pub fn emoji_sequence(s: &str) -> String {
    normalize(s)
        .chars()
        .filter(|c| is_emoji(*c) || joins_run(*c))
        .collect()
}

fn push_unique(out: &mut Vec<String>, item: String) {
    if !out.contains(&item) {
        out.push(item);
    }
}

/// Uppercase ASCII first, ASCII alphanumerics only, at least one lowercase.
///
/// All-caps acronyms such as `HALT` are rejected.
pub fn is_pascal_case(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_uppercase()
        && s.chars().all(|c| c.is_ascii_alphanumeric())
        && s.chars().any(|c| c.is_ascii_lowercase())
}

/// Split a raw token like `` `🖨️PrintQueue` `` into `("🖨", "PrintQueue")`.
///
/// Returns `None` unless both a non-empty emoji sequence and a PascalCase
/// remainder are present.
pub fn pascal_pair(raw: &str) -> Option<(String, String)> {
    let token = raw.trim().trim_matches('`');
    let emoji = emoji_sequence(token);
    if emoji.is_empty() {
        return None;
    }
    let remainder: String = token
        .chars()
        .filter(|c| !is_emoji(*c) && !joins_run(*c) && !is_variation_selector(*c))
        .collect();
    let remainder = remainder.trim();
    is_pascal_case(remainder).then(|| (emoji, remainder.to_string()))
}

/// Whether an inline-code span looks like an emoji whose base glyph was lost.
///
/// The span must begin with a variation selector and contain no emoji once
/// selectors are stripped.
pub fn is_corrupted_span(span: &str) -> bool {
    span.starts_with(is_variation_selector) && !contains_emoji(&normalize(span))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_both_selectors() {
        assert_eq!(normalize("🖨\u{FE0F}"), "🖨");
        assert_eq!(normalize("☀\u{FE0E} sun"), "☀ sun");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in ["🖨️", "a\u{FE0F}\u{FE0F}b", "", "plain", "👩‍💻\u{FE0F}"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn emoji_ranges() {
        assert!(is_emoji('🖨'));
        assert!(is_emoji('☀'));
        assert!(is_emoji('⭐'));
        assert!(is_emoji('⏰'));
        assert!(!is_emoji('A'));
        assert!(!is_emoji('é'));
        assert!(!is_emoji(VS16));
    }

    #[test]
    fn prose_arrows_are_not_emoji() {
        for c in ['→', '⇒', '⏎', '←'] {
            assert!(!is_emoji(c), "{c}");
        }
        assert!(is_emoji('↔'));
        assert!(is_emoji('⬅'));
        assert!(is_emoji('🇺'));
        assert!(emoji_runs("| → |").is_empty());
        assert_eq!(pascal_pair("→Next"), None);
    }

    #[test]
    fn runs_split_on_text_and_dedupe() {
        assert_eq!(emoji_runs("🖨️, 📄 and 🖨"), vec!["🖨", "📄"]);
        assert_eq!(emoji_runs("no emoji"), Vec::<String>::new());
    }

    #[test]
    fn runs_keep_zwj_sequences_together() {
        assert_eq!(emoji_runs("👩‍💻 dev"), vec!["👩\u{200D}💻"]);
    }

    #[test]
    fn leading_joiner_does_not_start_run() {
        assert_eq!(emoji_runs("\u{200D}x🔥"), vec!["🔥"]);
    }

    #[test]
    fn pascal_case_rules() {
        assert!(is_pascal_case("PrintQueue"));
        assert!(is_pascal_case("Mode2"));
        assert!(!is_pascal_case("HALT"));
        assert!(!is_pascal_case("printQueue"));
        assert!(!is_pascal_case("Print Queue"));
        assert!(!is_pascal_case("Print-Queue"));
        assert!(!is_pascal_case(""));
    }

    #[test]
    fn pascal_pair_splits_emoji_and_term() {
        assert_eq!(
            pascal_pair("🖨️PrintQueue"),
            Some(("🖨".to_string(), "PrintQueue".to_string()))
        );
        assert_eq!(
            pascal_pair("`🧭 Compass`"),
            Some(("🧭".to_string(), "Compass".to_string()))
        );
    }

    #[test]
    fn pascal_pair_requires_both_parts() {
        assert_eq!(pascal_pair("PrintQueue"), None);
        assert_eq!(pascal_pair("🖨️"), None);
        assert_eq!(pascal_pair("🖨️ HALT"), None);
        assert_eq!(pascal_pair("🖨️ print queue"), None);
    }

    #[test]
    fn corrupted_span_detection() {
        assert!(is_corrupted_span("\u{FE0F}Print"));
        assert!(!is_corrupted_span("\u{FE0F}🖨"));
        assert!(!is_corrupted_span("Print\u{FE0F}"));
    }
}
