//! `ModuleManifest.yaml` parsing and structural validation.
//!
//! The manifest dialect is a narrow YAML subset: `key: value` scalars,
//! inline `[a, b]` lists, block lists of `  - item` lines, and one nested
//! mapping (`docs`) of `  key: value` lines. Parsing never fails; anything
//! unrecognized is dropped and surfaces later as a validation finding.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::report::LintReport;
use crate::tokens::emoji::{contains_emoji, normalize};

/// Exact file name a manifest must have.
pub const MANIFEST_FILE_NAME: &str = "ModuleManifest.yaml";

/// Keys whose values are lists.
pub const LIST_KEYS: &[&str] = &[
    "aliases",
    "must_preserve",
    "must_preserve_runtime",
    "use_when",
    "do_not_use_when",
    "required_inputs",
];

/// Keys every manifest must define (besides `docs`).
pub const REQUIRED_KEYS: &[&str] = &[
    "module",
    "emoji",
    "aliases",
    "version",
    "mission",
    "must_preserve",
    "engage_policy",
    "intent_policy",
    "single_emoji_activate",
    "use_when",
    "do_not_use_when",
    "required_inputs",
    "response_envelope",
    "failure_mode",
];

/// Keys the `docs` mapping must define.
pub const REQUIRED_DOC_KEYS: &[&str] = &["install", "quickref", "machinemanual", "userguide"];

pub const ENGAGE_POLICIES: &[&str] = &["AUTO", "OFFER", "MANUAL"];
pub const INTENT_POLICIES: &[&str] = &["explicit_only", "infer_high_confidence"];
const FLAG_VALUES: &[&str] = &["yes", "no", "true", "false"];

/// A top-level manifest value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestValue {
    Scalar(String),
    List(Vec<String>),
}

/// Parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<String, ManifestValue>,
    /// `None` when the manifest has no `docs:` key at all.
    docs: Option<BTreeMap<String, String>>,
}

/// What indented lines currently attach to.
enum Context {
    None,
    List(String),
    Docs,
}

impl Manifest {
    /// Parse manifest text. Malformed lines are skipped, never reported.
    pub fn parse(input: &str) -> Self {
        let mut manifest = Manifest::default();
        let mut context = Context::None;

        for raw in input.lines() {
            let line = strip_comment(raw);
            let line = line.trim_end();
            if line.trim().is_empty() {
                continue;
            }

            if let Some(item) = line.strip_prefix("  - ") {
                if let Context::List(key) = &context {
                    if let Some(ManifestValue::List(items)) = manifest.entries.get_mut(key) {
                        items.push(unquote(item.trim()).to_string());
                    }
                }
                continue;
            }

            if let Some(rest) = line.strip_prefix("  ") {
                if matches!(context, Context::Docs) && !rest.starts_with(char::is_whitespace) {
                    if let Some((key, value)) = rest.split_once(':') {
                        let docs = manifest.docs.get_or_insert_with(BTreeMap::new);
                        docs.insert(key.trim().to_string(), unquote(value.trim()).to_string());
                    }
                    continue;
                }
            }

            // Anything else closes the open list or mapping.
            context = Context::None;
            if line.starts_with(char::is_whitespace) {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() || key.contains(char::is_whitespace) {
                continue;
            }
            let value = value.trim();

            if key == "docs" {
                manifest.docs.get_or_insert_with(BTreeMap::new);
                context = Context::Docs;
            } else if LIST_KEYS.contains(&key) {
                if value.is_empty() {
                    manifest
                        .entries
                        .insert(key.to_string(), ManifestValue::List(Vec::new()));
                    context = Context::List(key.to_string());
                } else if let Some(items) = parse_inline_list(value) {
                    manifest
                        .entries
                        .insert(key.to_string(), ManifestValue::List(items));
                } else {
                    manifest
                        .entries
                        .insert(key.to_string(), ManifestValue::Scalar(unquote(value).to_string()));
                }
            } else {
                manifest
                    .entries
                    .insert(key.to_string(), ManifestValue::Scalar(unquote(value).to_string()));
            }
        }

        manifest
    }

    pub fn get(&self, key: &str) -> Option<&ManifestValue> {
        self.entries.get(key)
    }

    /// Scalar value for `key`, or `None` if absent or a list.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(ManifestValue::Scalar(s)) => Some(s),
            _ => None,
        }
    }

    /// List value for `key`; empty if absent or not a list.
    pub fn list(&self, key: &str) -> &[String] {
        match self.entries.get(key) {
            Some(ManifestValue::List(items)) => items,
            _ => &[],
        }
    }

    pub fn docs(&self) -> Option<&BTreeMap<String, String>> {
        self.docs.as_ref()
    }

    /// Relative path declared for one of [`REQUIRED_DOC_KEYS`].
    pub fn doc_path(&self, key: &str) -> Option<&str> {
        self.docs
            .as_ref()
            .and_then(|d| d.get(key))
            .map(String::as_str)
            .filter(|p| !p.is_empty())
    }

    /// Module name, empty when missing.
    pub fn module(&self) -> &str {
        self.scalar("module").unwrap_or_default()
    }

    /// Whether this manifest is a template, exempt from existence and parity checks.
    pub fn is_template(&self, manifest_path: &Path) -> bool {
        let in_templates_dir = manifest_path
            .components()
            .any(|c| c.as_os_str().eq_ignore_ascii_case("templates"));
        let module = self.module();
        let placeholder = module
            .find('<')
            .is_some_and(|open| module[open..].contains('>'));
        in_templates_dir || placeholder
    }

    /// Report structural problems: missing keys, bad enums, wrong types,
    /// unresolvable `docs` paths. Every finding is an error.
    pub fn validate(&self, manifest_path: &Path, source: &str, report: &mut LintReport) {
        for key in REQUIRED_KEYS {
            match self.entries.get(*key) {
                None => report.error(source, format!("missing required key '{key}'")),
                Some(ManifestValue::Scalar(v)) if LIST_KEYS.contains(key) => report.error(
                    source,
                    format!("'{key}' must be a list, found scalar '{v}'"),
                ),
                Some(ManifestValue::Scalar(v)) if v.is_empty() => {
                    report.error(source, format!("required key '{key}' is empty"));
                }
                _ => {}
            }
        }

        if let Some(v) = self.scalar("must_preserve_runtime") {
            report.error(
                source,
                format!("'must_preserve_runtime' must be a list, found scalar '{v}'"),
            );
        }

        if let Some(version) = self.scalar("version").filter(|v| !v.is_empty()) {
            if !is_semver_like(version) {
                report.error(
                    source,
                    format!("version '{version}' is not SemVer-like (MAJOR.MINOR[.PATCH])"),
                );
            }
        }

        check_enum(self, source, "engage_policy", ENGAGE_POLICIES, report);
        check_enum(self, source, "intent_policy", INTENT_POLICIES, report);
        if let Some(flag) = self.scalar("single_emoji_activate").filter(|v| !v.is_empty()) {
            if !FLAG_VALUES.contains(&flag.to_ascii_lowercase().as_str()) {
                report.error(
                    source,
                    format!(
                        "single_emoji_activate '{flag}' not in [{}]",
                        FLAG_VALUES.join(", ")
                    ),
                );
            }
        }

        if let Some(emoji) = self.scalar("emoji").filter(|v| !v.is_empty()) {
            if !contains_emoji(&normalize(emoji)) {
                report.error(source, format!("emoji '{emoji}' contains no emoji code point"));
            }
        }

        let template = self.is_template(manifest_path);
        match &self.docs {
            None => report.error(source, "missing required key 'docs'"),
            Some(docs) => {
                let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));
                for key in REQUIRED_DOC_KEYS {
                    match docs.get(*key).filter(|p| !p.is_empty()) {
                        None => report.error(source, format!("docs is missing '{key}'")),
                        Some(rel) if !template => {
                            let resolved = base.join(rel);
                            if !resolved.is_file() {
                                debug!(path = %resolved.display(), "declared doc does not exist");
                                report.error(
                                    source,
                                    format!("docs.{key} points to missing file '{rel}'"),
                                );
                            }
                        }
                        Some(_) => {}
                    }
                }
            }
        }
    }
}

fn check_enum(
    manifest: &Manifest,
    source: &str,
    key: &str,
    allowed: &[&str],
    report: &mut LintReport,
) {
    if let Some(value) = manifest.scalar(key).filter(|v| !v.is_empty()) {
        if !allowed.contains(&value) {
            report.error(
                source,
                format!("{key} '{value}' not in [{}]", allowed.join(", ")),
            );
        }
    }
}

/// `MAJOR.MINOR` or `MAJOR.MINOR.PATCH`, optionally with SemVer suffixes.
pub fn is_semver_like(version: &str) -> bool {
    let core_len = version
        .find(['-', '+'])
        .unwrap_or(version.len());
    let padded = if version[..core_len].matches('.').count() == 1 {
        format!("{}.0{}", &version[..core_len], &version[core_len..])
    } else {
        version.to_string()
    };
    semver::Version::parse(&padded).is_ok()
}

/// Drop a trailing `#` comment, honoring single and double quotes.
pub fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (None, '#') => return &line[..i],
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            _ => {}
        }
    }
    line
}

/// Remove one layer of matching surrounding quotes.
pub fn unquote(s: &str) -> &str {
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Parse `[a, "b", c]`; `None` if `value` isn't bracketed.
fn parse_inline_list(value: &str) -> Option<Vec<String>> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    Some(
        inner
            .split(',')
            .map(|item| unquote(item.trim()).to_string())
            .filter(|item| !item.is_empty())
            .collect(),
    )
}
