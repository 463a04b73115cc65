//! Findings, severities and the strictness router.

use std::fmt;

use serde::Serialize;

/// Whether a finding fails the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARN"),
        }
    }
}

/// A single lint result attributed to one document or manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// File name (or other identifier) of the offending document.
    pub source: String,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}

/// Flat, order-insensitive collection of findings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    findings: Vec<Finding>,
}

impl LintReport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, source: &str, message: String, severity: Severity) {
        self.findings.push(Finding {
            source: source.to_string(),
            message,
            severity,
        });
    }

    /// Record a finding that fails the run regardless of strictness.
    pub fn error(&mut self, source: &str, message: impl Into<String>) {
        self.push(source, message.into(), Severity::Error);
    }

    /// Record an advisory finding regardless of strictness.
    pub fn warning(&mut self, source: &str, message: impl Into<String>) {
        self.push(source, message.into(), Severity::Warning);
    }

    /// Record a soft finding: an error under `strict`, a warning otherwise.
    pub fn route(&mut self, source: &str, message: impl Into<String>, strict: bool) {
        let severity = if strict {
            Severity::Error
        } else {
            Severity::Warning
        };
        self.push(source, message.into(), severity);
    }

    pub fn extend(&mut self, other: LintReport) {
        self.findings.extend(other.findings);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// The run passes iff there are no errors; warnings never fail it.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Error messages as `source: message` lines.
    pub fn error_lines(&self) -> Vec<String> {
        self.errors().map(ToString::to_string).collect()
    }

    /// Warning messages as `source: message` lines.
    pub fn warning_lines(&self) -> Vec<String> {
        self.warnings().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_follows_strictness() {
        let mut report = LintReport::new();
        report.route("a.md", "soft", false);
        report.route("a.md", "soft", true);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn warnings_do_not_fail() {
        let mut report = LintReport::new();
        report.warning("a.md", "heads up");
        assert!(report.is_ok());
        report.error("a.md", "broken");
        assert!(!report.is_ok());
    }

    #[test]
    fn lines_are_prefixed_with_source() {
        let mut report = LintReport::new();
        report.error("UserGuide.md", "missing Version in first ~40 lines");
        assert_eq!(
            report.error_lines(),
            vec!["UserGuide.md: missing Version in first ~40 lines"]
        );
        assert!(report.warning_lines().is_empty());
    }

    #[test]
    fn extend_merges_findings() {
        let mut a = LintReport::new();
        a.error("a", "x");
        let mut b = LintReport::new();
        b.warning("b", "y");
        a.extend(b);
        assert_eq!(a.findings().len(), 2);
    }
}
