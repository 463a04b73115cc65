//! `modulemill.toml` project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use modulemill_core::{LintOptions, SizeBudget};
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "modulemill.toml";

/// The top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MillConfig {
    #[serde(default)]
    pub lint: LintConfig,
    #[serde(default)]
    pub budget: BudgetConfig,
}

/// `[lint]` section: defaults that CLI flags can only switch on.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub require_manifest: bool,
    #[serde(default)]
    pub current_only: bool,
    #[serde(default = "default_true")]
    pub flag_corrupted_spans: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            strict: false,
            require_manifest: false,
            current_only: false,
            flag_corrupted_spans: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// `[budget]` section for the global instruction block.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetConfig {
    #[serde(default = "default_hard_limit")]
    pub hard_limit: usize,
    #[serde(default = "default_soft_target")]
    pub soft_target: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            hard_limit: default_hard_limit(),
            soft_target: default_soft_target(),
        }
    }
}

fn default_hard_limit() -> usize {
    SizeBudget::default().hard_limit
}

fn default_soft_target() -> usize {
    SizeBudget::default().soft_target
}

/// Command-line switches that OR into the file's booleans.
#[derive(Debug, Clone, Copy, Default)]
pub struct LintFlags {
    pub strict: bool,
    pub require_manifest: bool,
    pub current_only: bool,
}

impl MillConfig {
    /// Search upward from `start_dir` for `modulemill.toml`, returning the
    /// parsed file and the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config = Self::parse(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    pub fn parse(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        if config.budget.soft_target > config.budget.hard_limit {
            anyhow::bail!(
                "budget.soft_target ({}) exceeds budget.hard_limit ({})",
                config.budget.soft_target,
                config.budget.hard_limit
            );
        }
        Ok(config)
    }

    /// Lint options after applying command-line flags.
    pub fn lint_options(&self, flags: LintFlags) -> LintOptions {
        LintOptions {
            strict: self.lint.strict || flags.strict,
            require_manifest: self.lint.require_manifest || flags.require_manifest,
            flag_corrupted_spans: self.lint.flag_corrupted_spans,
            budget: SizeBudget {
                hard_limit: self.budget.hard_limit,
                soft_target: self.budget.soft_target,
            },
        }
    }

    pub fn current_only(&self, flags: LintFlags) -> bool {
        self.lint.current_only || flags.current_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = MillConfig::parse("").unwrap();
        let opts = config.lint_options(LintFlags::default());
        assert_eq!(opts, LintOptions::default());
        assert!(!config.current_only(LintFlags::default()));
    }

    #[test]
    fn full_file_round_trips_into_options() {
        let config = MillConfig::parse(
            r#"
[lint]
strict = true
current_only = true
flag_corrupted_spans = false

[budget]
hard_limit = 1200
soft_target = 1100
"#,
        )
        .unwrap();
        let opts = config.lint_options(LintFlags::default());
        assert!(opts.strict);
        assert!(!opts.require_manifest);
        assert!(!opts.flag_corrupted_spans);
        assert_eq!(opts.budget.hard_limit, 1200);
        assert_eq!(opts.budget.soft_target, 1100);
        assert!(config.current_only(LintFlags::default()));
    }

    #[test]
    fn flags_only_switch_on() {
        let config = MillConfig::parse("[lint]\nrequire_manifest = true\n").unwrap();
        let opts = config.lint_options(LintFlags {
            strict: true,
            ..LintFlags::default()
        });
        assert!(opts.strict);
        assert!(opts.require_manifest);
    }

    #[test]
    fn rejects_unknown_keys_and_inverted_budget() {
        assert!(MillConfig::parse("[lint]\nstrictness = true\n").is_err());
        let err = MillConfig::parse("[budget]\nhard_limit = 100\nsoft_target = 200\n").unwrap_err();
        assert!(err.to_string().contains("soft_target"));
    }

    #[test]
    fn find_and_load_searches_upward() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[lint]\nstrict = true\n").unwrap();
        let nested = dir.path().join("ModKits").join("Planner").join("_CURRENT");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, found_in) = MillConfig::find_and_load(&nested).unwrap().unwrap();
        assert!(config.lint.strict);
        assert_eq!(found_in, dir.path());
    }

    #[test]
    fn find_and_load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[lint\n").unwrap();
        let err = MillConfig::find_and_load(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains(CONFIG_FILE_NAME));
    }
}
