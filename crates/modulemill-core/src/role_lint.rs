//! Per-document metadata and role hygiene.

use std::path::Path;

use tracing::debug;

use crate::budget::{check_size_budget, is_global_instruction_file};
use crate::document::{DocRole, Document, REQUIRED_META_KEYS};
use crate::manifest::MANIFEST_FILE_NAME;
use crate::options::LintOptions;
use crate::report::LintReport;
use crate::tokens::emoji::{contains_emoji, is_corrupted_span, normalize};
use crate::tokens::glossary::GLOSSARY_SECTION;
use crate::tokens::table::inline_code_spans;

/// Module ids owned by the framework itself; their user guides are exempt
/// from the module-level completeness rules.
pub const RESERVED_MODULE_IDS: &[&str] = &["ModuleMill", "KitRegistry"];

pub const QUICKREF_MAX_LINES: usize = 220;
const QUICKREF_RATIONALE_WINDOW: usize = 2000;

pub const USERGUIDE_MIN_LINES: usize = 120;
pub const USERGUIDE_MIN_HEADINGS: usize = 8;

/// Column markers the UserGuide command table must carry.
pub const COMMAND_TABLE_COLUMNS: &[&str] = &[
    "| Command |",
    "| Canon |",
    "| Alias |",
    "| Inputs |",
    "| Effect |",
    "| State |",
];

/// Section groups a UserGuide must cover, each satisfied by any heading
/// containing one of its keywords.
pub const USERGUIDE_SECTION_GROUPS: &[(&str, &[&str])] = &[
    ("Purpose", &["purpose", "overview", "mission"]),
    ("Commands", &["command", "canon"]),
    ("State", &["state"]),
    ("Examples", &["example", "walkthrough"]),
    ("Failure modes", &["failure", "troubleshoot", "recovery"]),
    ("Glossary", &["glossary"]),
];

/// Whether `name` is an aggregate bundle that maps to no single role.
pub fn is_bundle_file(name: &str) -> bool {
    name.to_uppercase().ends_with("_BUNDLE.MD")
}

/// Lint one markdown document on its own.
pub fn lint_document(doc: &Document, opts: &LintOptions) -> LintReport {
    let mut report = LintReport::new();
    let name = doc.name();

    if is_bundle_file(&name) {
        debug!(%name, "skipping bundle file");
        return report;
    }
    if is_global_instruction_file(&name) {
        check_size_budget(&name, &doc.text, opts, &mut report);
        return report;
    }
    if !opts.strict && doc.meta.doc_role.is_none() {
        return report;
    }

    for key in REQUIRED_META_KEYS {
        if doc.meta.get(key).is_none() {
            report.error(&name, format!("missing {key} in first ~40 lines"));
        }
    }

    if let Some(raw) = doc.meta.doc_role.as_deref() {
        if doc.meta.role().is_none() {
            report.error(
                &name,
                format!("DocRole '{raw}' not in {}", DocRole::known_list()),
            );
        }
    }

    if opts.flag_corrupted_spans {
        for span in inline_code_spans(&doc.text).filter(|s| is_corrupted_span(s)) {
            report.route(
                &name,
                format!(
                    "inline code `{}` starts with a variation selector but has no emoji (likely corrupted)",
                    span.trim_start_matches(['\u{FE0E}', '\u{FE0F}'])
                ),
                opts.strict,
            );
        }
    }

    match doc.meta.role() {
        Some(DocRole::QuickRefCard) => lint_quickref(doc, &name, opts, &mut report),
        Some(DocRole::UserGuide) => {
            let module_id = doc.meta.module_id.as_deref().unwrap_or_default();
            if !RESERVED_MODULE_IDS.contains(&module_id) {
                lint_userguide(doc, &name, opts, &mut report);
            }
        }
        _ => {}
    }

    report
}

fn lint_quickref(doc: &Document, name: &str, opts: &LintOptions, report: &mut LintReport) {
    let head: String = doc
        .text
        .chars()
        .take(QUICKREF_RATIONALE_WINDOW)
        .collect::<String>()
        .to_lowercase();
    if head.contains("rationale") {
        report.route(
            name,
            "QuickRefCard contains 'rationale' near top (role bleed risk)",
            opts.strict,
        );
    }
    let lines = doc.text.lines().count();
    if lines > QUICKREF_MAX_LINES {
        report.route(
            name,
            format!(
                "QuickRefCard is very long ({lines} > {QUICKREF_MAX_LINES} lines). Consider slimming."
            ),
            opts.strict,
        );
    }
}

fn lint_userguide(doc: &Document, name: &str, opts: &LintOptions, report: &mut LintReport) {
    let non_empty = doc.text.lines().filter(|l| !l.trim().is_empty()).count();
    if non_empty < USERGUIDE_MIN_LINES {
        report.route(
            name,
            format!(
                "UserGuide looks over-compressed: {non_empty} non-empty lines (minimum {USERGUIDE_MIN_LINES})"
            ),
            opts.strict,
        );
    }
    let headings = doc.index.len();
    if headings < USERGUIDE_MIN_HEADINGS {
        report.route(
            name,
            format!(
                "UserGuide looks over-compressed: {headings} headings (minimum {USERGUIDE_MIN_HEADINGS})"
            ),
            opts.strict,
        );
    }

    let titles: Vec<String> = doc
        .index
        .headings()
        .iter()
        .map(|h| h.title.to_lowercase())
        .collect();
    for (group, keywords) in USERGUIDE_SECTION_GROUPS {
        let covered = titles
            .iter()
            .any(|t| keywords.iter().any(|k| t.contains(k)));
        if !covered {
            report.route(
                name,
                format!(
                    "UserGuide has no '{group}' section (expected a heading containing one of: {})",
                    keywords.join(", ")
                ),
                opts.strict,
            );
        }
    }

    if contains_emoji(&normalize(&doc.text)) && !doc.text.contains(GLOSSARY_SECTION) {
        report.error(
            name,
            format!("UserGuide contains emoji but no '{GLOSSARY_SECTION}' section."),
        );
    }

    for marker in COMMAND_TABLE_COLUMNS {
        if !doc.text.contains(marker) {
            report.route(
                name,
                format!("UserGuide command table is missing column marker '{marker}'"),
                opts.strict,
            );
        }
    }

    if !has_sibling_manifest(&doc.path) {
        let message = format!("UserGuide has no sibling {MANIFEST_FILE_NAME}");
        if opts.strict || opts.require_manifest {
            report.error(name, message);
        } else {
            report.warning(name, message);
        }
    }
}

fn has_sibling_manifest(doc_path: &Path) -> bool {
    doc_path
        .parent()
        .map(|dir| dir.join(MANIFEST_FILE_NAME))
        .is_some_and(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;

    fn header(role: &str, module: &str) -> String {
        format!("# {module}\nModuleID: {module}\nVersion: 1.0.0\nDocRole: {role}\nAudience: humans\n")
    }

    fn messages(report: &LintReport) -> Vec<String> {
        report.findings().iter().map(|f| f.message.clone()).collect()
    }

    #[test]
    fn bundle_files_are_skipped() {
        let doc = Document::new("Planner_bundle.md", "DocRole: Nonsense");
        assert!(lint_document(&doc, &LintOptions::strict()).findings().is_empty());
    }

    #[test]
    fn untagged_docs_skipped_unless_strict() {
        let doc = Document::new("README.md", "# Readme\n");
        assert!(lint_document(&doc, &LintOptions::default()).findings().is_empty());
        let strict = lint_document(&doc, &LintOptions::strict());
        assert_eq!(strict.error_count(), 4);
        assert!(strict.error_lines()[0].contains("README.md: missing ModuleID"));
    }

    #[test]
    fn missing_keys_and_bad_role() {
        let doc = Document::new("Install.md", "ModuleID: X\nDocRole: Cookbook\n");
        let report = lint_document(&doc, &LintOptions::default());
        let msgs = messages(&report);
        assert!(msgs.contains(&"missing Version in first ~40 lines".to_string()));
        assert!(msgs.contains(&"missing Audience in first ~40 lines".to_string()));
        assert!(msgs
            .iter()
            .any(|m| m.starts_with("DocRole 'Cookbook' not in [Install")));
        assert_eq!(report.error_count(), 3);
    }

    #[test]
    fn quickref_hygiene_is_routed() {
        let mut text = header("QuickRefCard", "Planner");
        text.push_str("Rationale: because\n");
        text.push_str(&"- row\n".repeat(230));
        let doc = Document::new("QuickRefCard.md", text);

        let lenient = lint_document(&doc, &LintOptions::default());
        assert_eq!(lenient.error_count(), 0);
        assert_eq!(lenient.warning_count(), 2);

        let strict = lint_document(&doc, &LintOptions::strict());
        assert_eq!(strict.error_count(), 2);
    }

    fn compressed_guide(dir: &Path) -> Document {
        let mut text = header("UserGuide", "Planner");
        text.push_str("## Overview\n## Commands\n");
        text.push_str("| Command | Canon | Alias | Inputs | Effect | State |\n");
        while text.lines().filter(|l| !l.trim().is_empty()).count() < 50 {
            text.push_str("plain line\n");
        }
        Document::new(dir.join("UserGuide.md"), text)
    }

    #[test]
    fn over_compressed_userguide_warns_twice() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE_NAME), "module: Planner\n").unwrap();
        let doc = compressed_guide(dir.path());
        assert_eq!(doc.index.len(), 3);

        let report = lint_document(&doc, &LintOptions::default());
        let compressed: Vec<_> = report
            .findings()
            .iter()
            .filter(|f| f.message.contains("over-compressed"))
            .collect();
        assert_eq!(compressed.len(), 2);
        assert!(compressed.iter().all(|f| f.severity == Severity::Warning));
        assert!(compressed[0].message.contains("50 non-empty lines"));
        assert!(compressed[0].message.contains("minimum 120"));
        assert!(compressed[1].message.contains("3 headings"));
        assert!(compressed[1].message.contains("minimum 8"));

        let strict = lint_document(&doc, &LintOptions::strict());
        let strict_compressed = strict
            .errors()
            .filter(|f| f.message.contains("over-compressed"))
            .count();
        assert_eq!(strict_compressed, 2);
    }

    #[test]
    fn missing_section_groups_are_named() {
        let dir = tempfile::tempdir().unwrap();
        let doc = compressed_guide(dir.path());
        let msgs = messages(&lint_document(&doc, &LintOptions::default()));
        assert!(msgs.iter().any(|m| m.contains("no 'Examples' section")));
        assert!(!msgs.iter().any(|m| m.contains("no 'Commands' section")));
    }

    #[test]
    fn sibling_manifest_escalation() {
        let dir = tempfile::tempdir().unwrap();
        let doc = compressed_guide(dir.path());
        let find = |report: &LintReport| {
            report
                .findings()
                .iter()
                .find(|f| f.message.contains("no sibling ModuleManifest.yaml"))
                .map(|f| f.severity)
        };

        assert_eq!(find(&lint_document(&doc, &LintOptions::default())), Some(Severity::Warning));
        let require = LintOptions {
            require_manifest: true,
            ..LintOptions::default()
        };
        assert_eq!(find(&lint_document(&doc, &require)), Some(Severity::Error));
        assert_eq!(find(&lint_document(&doc, &LintOptions::strict())), Some(Severity::Error));
    }

    #[test]
    fn emoji_without_glossary_is_error() {
        let mut text = header("UserGuide", "Planner");
        text.push_str("Use 🧭 to plan.\n");
        let doc = Document::new("UserGuide.md", text);
        let report = lint_document(&doc, &LintOptions::default());
        assert!(report
            .error_lines()
            .iter()
            .any(|e| e.contains("no 'EmojiGlossary' section")));
    }

    #[test]
    fn prose_arrows_do_not_need_a_glossary() {
        let mut text = header("UserGuide", "Planner");
        text.push_str("Flow: load → activate ⇒ sleep\n");
        let doc = Document::new("UserGuide.md", text);
        let report = lint_document(&doc, &LintOptions::default());
        assert!(!messages(&report)
            .iter()
            .any(|m| m.contains("EmojiGlossary")));
    }

    #[test]
    fn missing_column_markers_are_reported() {
        let doc = Document::new("UserGuide.md", header("UserGuide", "Planner"));
        let report = lint_document(&doc, &LintOptions::default());
        let markers = report
            .findings()
            .iter()
            .filter(|f| f.message.contains("column marker"))
            .count();
        assert_eq!(markers, COMMAND_TABLE_COLUMNS.len());
    }

    #[test]
    fn reserved_modules_skip_userguide_rules() {
        let doc = Document::new("UserGuide.md", header("UserGuide", "ModuleMill"));
        assert!(lint_document(&doc, &LintOptions::default()).findings().is_empty());
    }

    #[test]
    fn corrupted_spans_follow_option() {
        let mut text = header("Install", "Planner");
        text.push_str("Press `\u{FE0F}Print` to print.\n");
        let doc = Document::new("Install.md", text);
        assert_eq!(lint_document(&doc, &LintOptions::default()).warning_count(), 1);
        let off = LintOptions {
            flag_corrupted_spans: false,
            ..LintOptions::default()
        };
        assert!(lint_document(&doc, &off).findings().is_empty());
    }

    #[test]
    fn global_instructions_only_get_size_check() {
        let text = format!("DocRole: Bogus\n```text\n{}\n```\n", "x".repeat(1450));
        let doc = Document::new("ChatGPT_GlobalInstructions.md", text);
        let report = lint_document(&doc, &LintOptions::default());
        assert_eq!(report.findings().len(), 1);
        assert!(report.error_lines()[0].contains("exceeds ModuleMill budget 1400"));
    }
}
