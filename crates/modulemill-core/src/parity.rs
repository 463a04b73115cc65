//! Cross-document contract parity.
//!
//! A manifest names four sibling documents. The user guide is the source of
//! truth for commands, state keys and glossary terms; the machine manual and
//! quick-reference card must stay in sync with it, and the manifest's
//! `must_preserve` lists pin phrases that edits must not drop.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::document::{file_name, DocRole, Document};
use crate::error::{read_text, Result};
use crate::manifest::Manifest;
use crate::options::LintOptions;
use crate::report::LintReport;
use crate::tokens::commands::command_rows;
use crate::tokens::emoji::{is_pascal_case, normalize, pascal_pair};
use crate::tokens::glossary::{glossary_entries, GlossaryEntry};
use crate::tokens::state_keys::state_keys;

/// Phrases signalling that the guide explains natural-language intent handling.
pub const INTENT_SIGNALS: &[&str] = &[
    "natural language",
    "natural-language",
    "plain language",
    "infer intent",
    "inferred intent",
    "intent inference",
    "intent detection",
];

/// Phrases signalling that inferred intent is gated on confidence.
pub const CONFIDENCE_SIGNALS: &[&str] = &[
    "high confidence",
    "high-confidence",
    "confidence threshold",
    "confidence gate",
    "confidence gating",
    "confirm before",
    "ask to confirm",
];

/// The four documents a manifest points at, loaded once per check.
#[derive(Debug, Default)]
pub struct DocumentSet {
    pub install: Option<Document>,
    pub quickref: Option<Document>,
    pub machine_manual: Option<Document>,
    pub user_guide: Option<Document>,
}

impl DocumentSet {
    /// Read whichever `docs` entries resolve to readable files.
    ///
    /// Missing or unreadable files are left as `None`; validation reports
    /// missing files separately.
    pub fn resolve(manifest: &Manifest, manifest_path: &Path) -> Self {
        let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));
        let load = |key: &str| -> Option<Document> {
            let rel = manifest.doc_path(key)?;
            let path: PathBuf = base.join(rel);
            if !path.is_file() {
                return None;
            }
            match Document::load(&path) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable document");
                    None
                }
            }
        };
        Self {
            install: load("install"),
            quickref: load("quickref"),
            machine_manual: load("machinemanual"),
            user_guide: load("userguide"),
        }
    }

    pub fn get(&self, role: DocRole) -> Option<&Document> {
        match role {
            DocRole::Install => self.install.as_ref(),
            DocRole::QuickRefCard => self.quickref.as_ref(),
            DocRole::MachineManual => self.machine_manual.as_ref(),
            DocRole::UserGuide => self.user_guide.as_ref(),
        }
    }

    fn present(&self) -> impl Iterator<Item = &Document> {
        [
            &self.install,
            &self.quickref,
            &self.machine_manual,
            &self.user_guide,
        ]
        .into_iter()
        .flatten()
    }
}

/// Parse, validate and parity-check the manifest at `path`.
pub fn lint_manifest(path: &Path, opts: &LintOptions) -> Result<LintReport> {
    let text = read_text(path)?;
    let manifest = Manifest::parse(&text);
    let source = manifest_source(path);
    let mut report = LintReport::new();

    manifest.validate(path, &source, &mut report);
    if manifest.is_template(path) {
        debug!(%source, "template manifest; skipping parity");
        return Ok(report);
    }

    let docs = DocumentSet::resolve(&manifest, path);
    check_contract(&manifest, &source, &docs, opts, &mut report);
    Ok(report)
}

/// Cross-check a manifest against its resolved documents.
pub fn check_contract(
    manifest: &Manifest,
    source: &str,
    docs: &DocumentSet,
    opts: &LintOptions,
    report: &mut LintReport,
) {
    let glossary = docs
        .user_guide
        .as_ref()
        .map(|ug| glossary_entries(&ug.text, &ug.index))
        .unwrap_or_default();

    check_must_preserve(manifest, source, docs, &glossary, report);
    check_must_preserve_runtime(manifest, source, docs, report);
    check_intent_policy(manifest, source, docs, report);
    check_metadata(manifest, docs, opts, report);

    let module = manifest.module();
    if opts.strict && !module.is_empty() {
        check_anti_drift(manifest, source, &glossary, report);
        check_alias_parity(docs, report);
        check_state_keys(module, docs, report);
        check_lifecycle(docs, report);
    }
}

fn contains_ci(haystack_lower: &str, needle: &str) -> bool {
    haystack_lower.contains(&needle.to_lowercase())
}

fn check_must_preserve(
    manifest: &Manifest,
    source: &str,
    docs: &DocumentSet,
    glossary: &[GlossaryEntry],
    report: &mut LintReport,
) {
    let phrases = manifest.list("must_preserve");
    if phrases.is_empty() {
        return;
    }
    let Some(ug) = &docs.user_guide else {
        report.error(source, "must_preserve cannot be checked: UserGuide is missing");
        return;
    };
    let ug_lower = ug.lower();
    for phrase in phrases {
        if contains_ci(&ug_lower, phrase) {
            continue;
        }
        let glossary_alias = pascal_pair(phrase)
            .is_some_and(|(emoji, term)| glossary.iter().any(|g| g.matches(&emoji, &term)));
        if !glossary_alias {
            report.error(
                source,
                format!("must_preserve phrase '{phrase}' not found in {}", ug.name()),
            );
        }
    }
}

fn check_must_preserve_runtime(
    manifest: &Manifest,
    source: &str,
    docs: &DocumentSet,
    report: &mut LintReport,
) {
    let phrases = manifest.list("must_preserve_runtime");
    if phrases.is_empty() {
        return;
    }
    for role in [DocRole::UserGuide, DocRole::MachineManual, DocRole::QuickRefCard] {
        let Some(doc) = docs.get(role) else {
            report.error(
                source,
                format!("must_preserve_runtime cannot be checked: {role} text is missing"),
            );
            continue;
        };
        let lower = doc.lower();
        for phrase in phrases {
            if !contains_ci(&lower, phrase) {
                report.error(
                    source,
                    format!(
                        "must_preserve_runtime phrase '{phrase}' not found in {}",
                        doc.name()
                    ),
                );
            }
        }
    }
}

fn check_intent_policy(
    manifest: &Manifest,
    source: &str,
    docs: &DocumentSet,
    report: &mut LintReport,
) {
    if manifest.scalar("intent_policy") != Some("infer_high_confidence") {
        return;
    }
    let Some(ug) = &docs.user_guide else {
        return;
    };
    let lower = ug.lower();
    if !INTENT_SIGNALS.iter().any(|s| lower.contains(s)) {
        report.warning(
            source,
            format!(
                "intent_policy is infer_high_confidence but {} never describes natural-language intent handling",
                ug.name()
            ),
        );
    }
    if !CONFIDENCE_SIGNALS.iter().any(|s| lower.contains(s)) {
        report.warning(
            source,
            format!(
                "intent_policy is infer_high_confidence but {} never describes confidence gating",
                ug.name()
            ),
        );
    }
}

/// Referenced documents must carry the manifest's ModuleID; Version drift is soft.
fn check_metadata(
    manifest: &Manifest,
    docs: &DocumentSet,
    opts: &LintOptions,
    report: &mut LintReport,
) {
    let module = manifest.module();
    let version = manifest.scalar("version").unwrap_or_default();
    for doc in docs.present() {
        let name = doc.name();
        if let Some(id) = doc.meta.module_id.as_deref() {
            if !module.is_empty() && id != module {
                report.error(
                    &name,
                    format!("ModuleID '{id}' does not match manifest module '{module}'"),
                );
            }
        }
        if let Some(v) = doc.meta.version.as_deref() {
            if !version.is_empty() && v != version {
                report.route(
                    &name,
                    format!("Version {v} does not match manifest version {version}"),
                    opts.strict,
                );
            }
        }
    }
}

/// Every PascalCase glossary term must be pinned by a matching must_preserve pair.
fn check_anti_drift(
    manifest: &Manifest,
    source: &str,
    glossary: &[GlossaryEntry],
    report: &mut LintReport,
) {
    let pinned: Vec<(String, String)> = manifest
        .list("must_preserve")
        .iter()
        .filter_map(|p| pascal_pair(p))
        .collect();
    for entry in glossary.iter().filter(|g| is_pascal_case(&g.term)) {
        let covered = pinned
            .iter()
            .any(|(emoji, term)| entry.matches(emoji, term));
        if !covered {
            report.error(
                source,
                format!(
                    "glossary term '{}{}' has no matching must_preserve entry (anti-drift)",
                    entry.emoji, entry.term
                ),
            );
        }
    }
}

/// Alias emoji from the UserGuide command table must appear in the MachineManual
/// and, when present, the QuickRefCard.
fn check_alias_parity(docs: &DocumentSet, report: &mut LintReport) {
    let Some(ug) = &docs.user_guide else {
        return;
    };
    let rows = command_rows(&ug.text);
    for target in [&docs.machine_manual, &docs.quickref].into_iter().flatten() {
        let haystack = normalize(&target.text);
        let name = target.name();
        for row in rows.iter().filter(|r| !r.aliases.is_empty()) {
            for alias in &row.aliases {
                if !haystack.contains(alias.as_str()) {
                    report.error(
                        &name,
                        format!(
                            "command '{}' alias emoji '{alias}' missing from {}",
                            row.label,
                            target
                                .meta
                                .role()
                                .map_or_else(|| name.clone(), |r| r.to_string())
                        ),
                    );
                }
            }
        }
    }
}

fn check_state_keys(module: &str, docs: &DocumentSet, report: &mut LintReport) {
    let (Some(ug), Some(mm)) = (&docs.user_guide, &docs.machine_manual) else {
        return;
    };
    let mm_lower = mm.lower();
    let name = mm.name();
    for key in state_keys(&ug.text, &ug.index, module) {
        if !mm_lower.contains(&key) {
            report.error(
                &name,
                format!("state key '{key}' from {} missing from MachineManual", ug.name()),
            );
        }
    }
}

fn check_lifecycle(docs: &DocumentSet, report: &mut LintReport) {
    let Some(ug) = &docs.user_guide else {
        return;
    };
    let lifecycle: Vec<String> = command_rows(&ug.text)
        .into_iter()
        .filter(|r| r.is_lifecycle())
        .filter_map(|r| r.canon)
        .collect();
    if lifecycle.is_empty() {
        return;
    }

    if let Some(mm) = &docs.machine_manual {
        let lower = mm.lower();
        for canon in &lifecycle {
            if !contains_ci(&lower, canon) {
                report.error(
                    &mm.name(),
                    format!("lifecycle command '{canon}' missing from MachineManual"),
                );
            }
        }
    }
    if let Some(qr) = &docs.quickref {
        let lower = qr.lower();
        for canon in &lifecycle {
            if !contains_ci(&lower, canon) {
                report.warning(
                    &qr.name(),
                    format!("lifecycle command '{canon}' missing from QuickRefCard"),
                );
            }
        }
    }
}

/// Display name for a manifest's source path.
pub fn manifest_source(path: &Path) -> String {
    let parent = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned());
    match parent {
        Some(dir) => format!("{dir}/{}", file_name(path)),
        None => file_name(path),
    }
}
