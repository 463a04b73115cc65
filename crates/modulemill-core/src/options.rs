//! Lint policy switches and tunable limits.

/// Platform instruction limit the global instruction block is pasted into.
pub const PLATFORM_CHAR_LIMIT: usize = 1500;
/// Characters reserved for per-user personalization.
pub const PERSONALIZATION_RESERVE: usize = 100;

/// Size limits for the pasted global instruction block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBudget {
    /// Exceeding this is always an error.
    pub hard_limit: usize,
    /// Exceeding this is routed through the strictness policy.
    pub soft_target: usize,
}

impl Default for SizeBudget {
    fn default() -> Self {
        Self {
            hard_limit: PLATFORM_CHAR_LIMIT - PERSONALIZATION_RESERVE,
            soft_target: 1350,
        }
    }
}

/// Options for one lint invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LintOptions {
    /// Escalate soft findings to errors and enable strict-only parity checks.
    pub strict: bool,
    /// Escalate a UserGuide without a sibling manifest to an error.
    pub require_manifest: bool,
    /// Report inline-code spans that start with a bare variation selector.
    pub flag_corrupted_spans: bool,
    pub budget: SizeBudget,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            strict: false,
            require_manifest: false,
            flag_corrupted_spans: true,
            budget: SizeBudget::default(),
        }
    }
}

impl LintOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_reserves_personalization() {
        let budget = SizeBudget::default();
        assert_eq!(budget.hard_limit, 1400);
        assert_eq!(budget.soft_target, 1350);
    }

    #[test]
    fn strict_keeps_other_defaults() {
        let opts = LintOptions::strict();
        assert!(opts.strict);
        assert!(!opts.require_manifest);
        assert!(opts.flag_corrupted_spans);
    }
}
