//! Documents and their header metadata.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{read_text, Result};
use crate::headings::HeadingIndex;

/// Metadata is only looked for in this many leading lines.
pub const META_SCAN_LINES: usize = 40;

/// The four metadata keys every opted-in document must carry.
pub const REQUIRED_META_KEYS: &[&str] = &["ModuleID", "Version", "DocRole", "Audience"];

static MODULE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bModuleID\s*[:=]\s*(\S+)").expect("valid pattern"));
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bVersion\s*[:=]\s*([0-9]+\.[0-9]+(?:\.[0-9]+)?)").expect("valid pattern")
});
static DOC_ROLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDocRole\s*[:=]\s*(\w+)").expect("valid pattern"));
static AUDIENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAudience\s*[:=]\s*(.+)").expect("valid pattern"));

/// Functional category of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocRole {
    Install,
    QuickRefCard,
    MachineManual,
    UserGuide,
}

impl DocRole {
    pub const ALL: [DocRole; 4] = [
        DocRole::Install,
        DocRole::MachineManual,
        DocRole::QuickRefCard,
        DocRole::UserGuide,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocRole::Install => "Install",
            DocRole::QuickRefCard => "QuickRefCard",
            DocRole::MachineManual => "MachineManual",
            DocRole::UserGuide => "UserGuide",
        }
    }

    /// Role names formatted as `[Install, MachineManual, ...]` for messages.
    pub fn known_list() -> String {
        let names: Vec<_> = Self::ALL.iter().map(|r| r.as_str()).collect();
        format!("[{}]", names.join(", "))
    }
}

impl fmt::Display for DocRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Header metadata found in the first [`META_SCAN_LINES`] lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocMeta {
    pub module_id: Option<String>,
    pub version: Option<String>,
    /// Raw DocRole value; may name an unknown role.
    pub doc_role: Option<String>,
    pub audience: Option<String>,
}

impl DocMeta {
    pub fn parse(text: &str) -> Self {
        let head: Vec<&str> = text.lines().take(META_SCAN_LINES).collect();
        let blob = head.join("\n");
        Self {
            module_id: capture(&MODULE_ID_RE, &blob),
            version: capture(&VERSION_RE, &blob),
            doc_role: capture(&DOC_ROLE_RE, &blob),
            audience: capture(&AUDIENCE_RE, &blob),
        }
    }

    /// Value for one of [`REQUIRED_META_KEYS`].
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "ModuleID" => self.module_id.as_deref(),
            "Version" => self.version.as_deref(),
            "DocRole" => self.doc_role.as_deref(),
            "Audience" => self.audience.as_deref(),
            _ => None,
        }
    }

    /// The DocRole, if present and one of the known roles.
    pub fn role(&self) -> Option<DocRole> {
        self.doc_role.as_deref().and_then(|r| r.parse().ok())
    }
}

fn capture(re: &Regex, blob: &str) -> Option<String> {
    re.captures(blob)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// A document's text with metadata and heading index computed once.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
    pub meta: DocMeta,
    pub index: HeadingIndex,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            path: path.into(),
            meta: DocMeta::parse(&text),
            index: HeadingIndex::build(&text),
            text,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(path, read_text(path)?))
    }

    /// File name used as the finding source.
    pub fn name(&self) -> String {
        file_name(&self.path)
    }

    /// Lowercased text for case-insensitive phrase checks.
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Final path component as a string, or the whole path if there is none.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
