//! Input discovery: which files a lint run looks at.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use modulemill_core::MANIFEST_FILE_NAME;
use walkdir::WalkDir;

/// Marker a path component must contain under `--current-only`.
pub const CURRENT_MARKER: &str = "_CURRENT";

/// Canonical document file names kept under `--current-only`.
pub const CANONICAL_DOC_NAMES: &[&str] =
    &["Install.md", "QuickRefCard.md", "MachineManual.md", "UserGuide.md"];

/// Documents and manifests to lint, each sorted by path.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Targets {
    pub documents: Vec<PathBuf>,
    pub manifests: Vec<PathBuf>,
}

impl Targets {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.manifests.is_empty()
    }
}

enum Kind {
    Document,
    Manifest,
}

fn kind_of(path: &Path) -> Option<Kind> {
    let name = path.file_name()?.to_str()?;
    if name == MANIFEST_FILE_NAME {
        Some(Kind::Manifest)
    } else if path.extension().is_some_and(|e| e == "md") {
        Some(Kind::Document)
    } else {
        None
    }
}

fn under_current(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str().to_string_lossy().contains(CURRENT_MARKER))
}

fn keep(path: &Path, kind: &Kind, current_only: bool) -> bool {
    if !current_only {
        return true;
    }
    if !under_current(path) {
        return false;
    }
    match kind {
        Kind::Manifest => true,
        Kind::Document => path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| CANONICAL_DOC_NAMES.contains(&n)),
    }
}

/// Expand `inputs` (files or directories) into lint targets.
///
/// Directories are walked recursively. Explicit files that are neither
/// markdown nor a manifest are ignored like any other.
pub fn discover(inputs: &[PathBuf], current_only: bool) -> Result<Targets> {
    let mut targets = Targets::default();
    for input in inputs {
        if !input.exists() {
            anyhow::bail!("path does not exist: {}", input.display());
        }
        for entry in WalkDir::new(input).follow_links(true) {
            let entry = entry.with_context(|| format!("walking {}", input.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(kind) = kind_of(path) else {
                continue;
            };
            if !keep(path, &kind, current_only) {
                continue;
            }
            match kind {
                Kind::Document => targets.documents.push(path.to_path_buf()),
                Kind::Manifest => targets.manifests.push(path.to_path_buf()),
            }
        }
    }
    targets.documents.sort();
    targets.documents.dedup();
    targets.manifests.sort();
    targets.manifests.dedup();
    tracing::debug!(
        documents = targets.documents.len(),
        manifests = targets.manifests.len(),
        "discovered lint targets"
    );
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "x").unwrap();
        path
    }

    fn names(paths: &[PathBuf], root: &Path) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "ModKits/Planner/_CURRENT/UserGuide.md");
        touch(root, "ModKits/Planner/_CURRENT/Notes.md");
        touch(root, "ModKits/Planner/_CURRENT/ModuleManifest.yaml");
        touch(root, "ModKits/Planner/_ARCHIVE/UserGuide.md");
        touch(root, "ModKits/Planner/_ARCHIVE/ModuleManifest.yaml");
        touch(root, "README.md");
        touch(root, "other.yaml");
        dir
    }

    #[test]
    fn walks_everything_by_default() {
        let dir = tree();
        let targets = discover(&[dir.path().to_path_buf()], false).unwrap();
        assert_eq!(
            names(&targets.documents, dir.path()),
            vec![
                "ModKits/Planner/_ARCHIVE/UserGuide.md",
                "ModKits/Planner/_CURRENT/Notes.md",
                "ModKits/Planner/_CURRENT/UserGuide.md",
                "README.md",
            ]
        );
        assert_eq!(targets.manifests.len(), 2);
    }

    #[test]
    fn current_only_keeps_canonical_current_files() {
        let dir = tree();
        let targets = discover(&[dir.path().to_path_buf()], true).unwrap();
        assert_eq!(
            names(&targets.documents, dir.path()),
            vec!["ModKits/Planner/_CURRENT/UserGuide.md"]
        );
        assert_eq!(
            names(&targets.manifests, dir.path()),
            vec!["ModKits/Planner/_CURRENT/ModuleManifest.yaml"]
        );
    }

    #[test]
    fn explicit_files_and_overlaps_are_deduplicated() {
        let dir = tree();
        let guide = dir.path().join("ModKits/Planner/_CURRENT/UserGuide.md");
        let targets = discover(&[guide.clone(), dir.path().join("ModKits")], false).unwrap();
        assert_eq!(targets.documents.iter().filter(|p| **p == guide).count(), 1);
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover(&[dir.path().join("nope")], false).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
