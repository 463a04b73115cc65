//! Contract-parity engine for ModuleKit documentation sets.
//!
//! A module ships four documents (install guide, quick-reference card,
//! machine manual, user guide) plus a `ModuleManifest.yaml` describing it.
//! This crate checks that those documents stay mutually consistent as they
//! are edited independently.
//!
//! # Architecture
//!
//! - **Heading index** ([`headings`]): ATX headings and section ranges
//! - **Manifest parser** ([`manifest`]): the constrained YAML-like dialect
//! - **Token extractors** ([`tokens`]): commands, glossary rows, state keys, emoji
//! - **Role linter** ([`role_lint`]): per-document metadata and hygiene
//! - **Parity engine** ([`parity`]): cross-document contract checks
//! - **Report** ([`report`]): findings and the strictness router
//!
//! Filesystem access is confined to [`Document::load`],
//! [`parity::DocumentSet::resolve`], [`lint_manifest`] and the sibling
//! manifest check in [`role_lint`]; everything else works on in-memory text.

pub mod budget;
pub mod document;
pub mod error;
pub mod headings;
pub mod manifest;
pub mod options;
pub mod parity;
pub mod report;
pub mod role_lint;
pub mod tokens;

// Re-exports for convenience.
pub use document::{DocMeta, DocRole, Document};
pub use error::{MillError, Result};
pub use headings::{extract_section, Heading, HeadingIndex, Section};
pub use manifest::{Manifest, ManifestValue, MANIFEST_FILE_NAME};
pub use options::{LintOptions, SizeBudget};
pub use parity::{check_contract, lint_manifest, DocumentSet};
pub use report::{Finding, LintReport, Severity};
pub use role_lint::lint_document;
