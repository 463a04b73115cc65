//! `modulemill lint`: role lint every document, validate and parity-check
//! every manifest.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use modulemill_core::{lint_document, lint_manifest, Document, Finding, LintOptions, LintReport};
use serde::Serialize;

use crate::discover::{discover, Targets};

/// How findings are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Lint `paths` and print the report. Returns whether the run passed.
pub fn run(
    paths: &[PathBuf],
    opts: &LintOptions,
    current_only: bool,
    format: OutputFormat,
) -> Result<bool> {
    let targets = discover(paths, current_only)?;
    if targets.is_empty() {
        eprintln!("warning: no documents or manifests found");
    }
    let report = lint_targets(&targets, opts)?;

    match format {
        OutputFormat::Human => print!("{}", render_human(&report)),
        OutputFormat::Json => println!("{}", render_json(&report)?),
    }
    Ok(report.is_ok())
}

/// Run both passes over the discovered targets.
pub fn lint_targets(targets: &Targets, opts: &LintOptions) -> Result<LintReport> {
    let mut report = LintReport::new();
    for path in &targets.documents {
        let doc = Document::load(path).with_context(|| format!("linting {}", path.display()))?;
        report.extend(lint_document(&doc, opts));
    }
    for path in &targets.manifests {
        let found =
            lint_manifest(path, opts).with_context(|| format!("linting {}", path.display()))?;
        report.extend(found);
    }
    Ok(report)
}

/// Warnings first (`WARN: ` prefixed), then errors, then the OK line when clean.
pub fn render_human(report: &LintReport) -> String {
    let mut out = String::new();
    for line in report.warning_lines() {
        let _ = writeln!(out, "WARN: {line}");
    }
    for line in report.error_lines() {
        let _ = writeln!(out, "{line}");
    }
    if report.is_ok() {
        out.push_str("OK: no lint errors.\n");
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    ok: bool,
    errors: usize,
    warnings: usize,
    findings: &'a [Finding],
}

pub fn render_json(report: &LintReport) -> Result<String> {
    let json = JsonReport {
        ok: report.is_ok(),
        errors: report.error_count(),
        warnings: report.warning_count(),
        findings: report.findings(),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}
