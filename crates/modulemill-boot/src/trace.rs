//! Cross-file boot checks and the printable decision flow.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use modulemill_core::error::read_text;
use tracing::debug;

use crate::error::{BootError, Result};
use crate::registry::{
    boot_warning_from_global, boot_warning_from_registry, parse_registry_modules,
    supported_modules, ModuleEntry,
};

pub const REGISTRY_FILE: &str = "KitRegistry.md";
pub const GLOBAL_FILE: &str = "ChatGPT_GlobalInstructions.md";
pub const ENTERPRISE_FILE: &str = "ChatGPT_GlobalInstructions_Enterprise.md";

/// Locations of the three boot inputs.
#[derive(Debug, Clone)]
pub struct BootInputs {
    pub registry: PathBuf,
    pub global: PathBuf,
    pub enterprise: PathBuf,
}

impl BootInputs {
    /// Standard layout: `<root>/ModKits/KitRegistry/_CURRENT/`.
    pub fn under_repo_root(root: &Path) -> Self {
        let dir = root.join("ModKits").join("KitRegistry").join("_CURRENT");
        Self {
            registry: dir.join(REGISTRY_FILE),
            global: dir.join(GLOBAL_FILE),
            enterprise: dir.join(ENTERPRISE_FILE),
        }
    }

    fn all(&self) -> [&PathBuf; 3] {
        [&self.registry, &self.global, &self.enterprise]
    }
}

/// Everything the boot checks need, parsed from the three inputs.
#[derive(Debug, Clone, Default)]
pub struct BootTrace {
    pub registry_boot: Option<String>,
    pub standard_boot: Option<String>,
    pub enterprise_boot: Option<String>,
    pub modules: Vec<ModuleEntry>,
    pub standard_supported: Vec<String>,
    pub enterprise_supported: Vec<String>,
}

impl BootTrace {
    /// Read and parse the inputs. Fails if any of them is missing.
    pub fn load(inputs: &BootInputs) -> Result<Self> {
        let missing: Vec<PathBuf> = inputs
            .all()
            .into_iter()
            .filter(|p| !p.is_file())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(BootError::MissingInputs(missing));
        }

        let registry = read_text(&inputs.registry)?;
        let global = read_text(&inputs.global)?;
        let enterprise = read_text(&inputs.enterprise)?;
        Ok(Self::from_texts(&registry, &global, &enterprise))
    }

    pub fn from_texts(registry: &str, global: &str, enterprise: &str) -> Self {
        let modules = parse_registry_modules(registry);
        debug!(modules = modules.len(), "parsed registry");
        Self {
            registry_boot: boot_warning_from_registry(registry),
            standard_boot: boot_warning_from_global(global),
            enterprise_boot: boot_warning_from_global(enterprise),
            modules,
            standard_supported: supported_modules(global),
            enterprise_supported: supported_modules(enterprise),
        }
    }

    pub fn default_modules(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.modules.iter().filter(|m| m.loads_by_default())
    }

    /// Emoji to module name; a later module claiming the same emoji wins.
    pub fn emoji_map(&self) -> Vec<(&str, &str)> {
        let mut map: Vec<(&str, &str)> = Vec::new();
        for m in self.modules.iter().filter(|m| !m.emoji.is_empty()) {
            match map.iter_mut().find(|(e, _)| *e == m.emoji) {
                Some(slot) => slot.1 = m.name.as_str(),
                None => map.push((m.emoji.as_str(), m.name.as_str())),
            }
        }
        map
    }

    /// Every disagreement between the inputs. Empty means PASS.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let sources = [
            (REGISTRY_FILE, &self.registry_boot),
            (GLOBAL_FILE, &self.standard_boot),
            (ENTERPRISE_FILE, &self.enterprise_boot),
        ];
        for (file, warning) in sources {
            if warning.is_none() {
                issues.push(format!("Could not parse boot warning from {file}"));
            }
        }
        if let Some(registry) = &self.registry_boot {
            for (file, warning) in &sources[1..] {
                if warning.as_ref().is_some_and(|w| w != registry) {
                    let stem = file.trim_end_matches(".md");
                    issues.push(format!("Boot warning mismatch: KitRegistry vs {stem}"));
                }
            }
        }

        let mut any_default = false;
        for entry in self.default_modules() {
            any_default = true;
            for key in ["Manifest", "QuickRef"] {
                if entry.doc(key).is_none() {
                    issues.push(format!(
                        "DefaultLoad module '{}' is missing Docs.{key}",
                        entry.name
                    ));
                }
            }
        }
        if !any_default {
            issues.push("No DefaultLoad=yes modules found in KitRegistry".to_string());
        }

        let registry_set: BTreeSet<&str> = self.modules.iter().map(|m| m.name.as_str()).collect();
        for (file, label, listed) in [
            (GLOBAL_FILE, "global", &self.standard_supported),
            (ENTERPRISE_FILE, "enterprise", &self.enterprise_supported),
        ] {
            if listed.is_empty() {
                continue;
            }
            let listed_set: BTreeSet<&str> = listed.iter().map(String::as_str).collect();
            if listed_set != registry_set {
                issues.push(format!(
                    "Supported module list mismatch in {file} ({label}={} registry={})",
                    bracketed(&listed_set),
                    bracketed(&registry_set)
                ));
            }
        }

        issues
    }

    /// The decision flow, ready to print.
    pub fn flow(&self) -> DecisionFlow<'_> {
        DecisionFlow(self)
    }
}

/// Sorted names as `[a, b]`.
fn bracketed(names: &BTreeSet<&str>) -> String {
    let names: Vec<&str> = names.iter().copied().collect();
    format!("[{}]", names.join(", "))
}

/// Display adapter rendering the numbered boot decision flow.
pub struct DecisionFlow<'a>(&'a BootTrace);

impl fmt::Display for DecisionFlow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trace = self.0;
        writeln!(f, "BootTrace decision flow")?;
        writeln!(f, "-----------------------")?;
        writeln!(f, "1) Reply #1 boot warning:")?;
        writeln!(
            f,
            "   \"{}\"",
            trace.standard_boot.as_deref().unwrap_or("<missing>")
        )?;
        writeln!(f, "2) Pre-reply #2 gate:")?;
        writeln!(
            f,
            "   If user sends HALT/cancel/skip modules, suppress auto-boot for this chat."
        )?;
        writeln!(f, "3) Reply #2 auto-boot path:")?;
        let defaults: Vec<_> = trace.default_modules().collect();
        if defaults.is_empty() {
            writeln!(f, "   <none>")?;
        } else {
            writeln!(f, "   Load DefaultLoad=yes modules in this order:")?;
            for (idx, entry) in defaults.iter().enumerate() {
                writeln!(f, "   {}. {}", idx + 1, entry.name)?;
                for key in ["Manifest", "QuickRef"] {
                    writeln!(f, "      - {key}: {}", entry.doc(key).unwrap_or("<missing>"))?;
                }
            }
        }
        writeln!(f, "4) Single-emoji activation map:")?;
        let map = trace.emoji_map();
        if map.is_empty() {
            writeln!(f, "   <none>")?;
        }
        for (emoji, module) in map {
            writeln!(f, "   - {emoji} -> {module}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WARNING: &str = "Modules loading. Say HALT to skip.";

    fn registry() -> String {
        format!(
            "\
The first assistant message must include a one-line boot warning:
- `{WARNING}`

### Module: Planner
- ModuleEmoji: `🧭`
- DefaultLoad: `yes`
- Docs:
  - Manifest: `Planner/ModuleManifest.yaml`
  - QuickRef: `Planner/QuickRefCard.md`

### Module: Scribe
- ModuleEmoji: `✍️`
- DefaultLoad: `no`
"
        )
    }

    fn global() -> String {
        format!("Reply 1: \"{WARNING}\"\n- Supported modules: `Planner | Scribe`\n")
    }

    fn clean() -> BootTrace {
        BootTrace::from_texts(&registry(), &global(), &global())
    }

    #[test]
    fn consistent_inputs_pass() {
        assert!(clean().issues().is_empty(), "{:?}", clean().issues());
    }

    #[test]
    fn boot_warning_mismatch_names_the_file() {
        let enterprise = global().replace("skip.", "stop.");
        let trace = BootTrace::from_texts(&registry(), &global(), &enterprise);
        assert_eq!(
            trace.issues(),
            vec!["Boot warning mismatch: KitRegistry vs ChatGPT_GlobalInstructions_Enterprise"]
        );
    }

    #[test]
    fn unparsable_warning_is_reported_once() {
        let trace = BootTrace::from_texts(&registry(), "no reply here", &global());
        assert_eq!(
            trace.issues(),
            vec!["Could not parse boot warning from ChatGPT_GlobalInstructions.md"]
        );
    }

    #[test]
    fn default_module_needs_manifest_and_quickref() {
        let reg = registry().replace("  - QuickRef: `Planner/QuickRefCard.md`\n", "");
        let trace = BootTrace::from_texts(&reg, &global(), &global());
        assert_eq!(
            trace.issues(),
            vec!["DefaultLoad module 'Planner' is missing Docs.QuickRef"]
        );
    }

    #[test]
    fn no_default_modules() {
        let reg = registry().replace("- DefaultLoad: `yes`", "- DefaultLoad: `no`");
        let trace = BootTrace::from_texts(&reg, &global(), &global());
        assert_eq!(
            trace.issues(),
            vec!["No DefaultLoad=yes modules found in KitRegistry"]
        );
    }

    #[test]
    fn supported_set_mismatch() {
        let g = global().replace(" | Scribe", "");
        let trace = BootTrace::from_texts(&registry(), &g, &global());
        let issues = trace.issues();
        assert_eq!(
            issues,
            vec![
                "Supported module list mismatch in ChatGPT_GlobalInstructions.md \
                 (global=[Planner] registry=[Planner, Scribe])"
            ]
        );
    }

    #[test]
    fn flow_lists_default_modules_and_emoji() {
        let flow = clean().flow().to_string();
        assert!(flow.contains(&format!("   \"{WARNING}\"")));
        assert!(flow.contains("   1. Planner\n      - Manifest: Planner/ModuleManifest.yaml"));
        assert!(flow.contains("   - 🧭 -> Planner"));
        assert!(flow.contains("   - ✍️ -> Scribe"));
    }

    #[test]
    fn emoji_map_later_module_wins() {
        let reg = registry().replace("`✍️`", "`🧭`");
        let trace = BootTrace::from_texts(&reg, &global(), &global());
        assert_eq!(trace.emoji_map(), vec![("🧭", "Scribe")]);
    }

    #[test]
    fn load_reports_all_missing_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = BootInputs::under_repo_root(dir.path());
        let err = BootTrace::load(&inputs).unwrap_err();
        match err {
            BootError::MissingInputs(paths) => assert_eq!(paths.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_reads_standard_layout() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = BootInputs::under_repo_root(dir.path());
        std::fs::create_dir_all(inputs.registry.parent().unwrap()).unwrap();
        std::fs::write(&inputs.registry, registry()).unwrap();
        std::fs::write(&inputs.global, global()).unwrap();
        std::fs::write(&inputs.enterprise, global()).unwrap();
        let trace = BootTrace::load(&inputs).unwrap();
        assert_eq!(trace.modules.len(), 2);
        assert!(trace.issues().is_empty());
    }
}
