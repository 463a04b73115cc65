//! Size check for global instruction files.
//!
//! The instruction block is pasted into a platform field with a fixed
//! character limit, so the first ` ```text ` fence is measured as it would be
//! pasted, including a trailing newline.

use crate::options::{LintOptions, SizeBudget};
use crate::report::LintReport;

/// File names that hold the pasted global instructions.
pub const GLOBAL_INSTRUCTION_FILES: &[&str] = &[
    "ChatGPT_GlobalInstructions.md",
    "ChatGPT_GlobalInstructions_Enterprise.md",
];

pub fn is_global_instruction_file(name: &str) -> bool {
    GLOBAL_INSTRUCTION_FILES.contains(&name)
}

/// Content of the first fenced block tagged `text`, if any.
///
/// An unterminated fence runs to the end of the document.
pub fn first_text_block(text: &str) -> Option<String> {
    let mut lines = text.lines();
    lines.find(|l| {
        l.trim()
            .strip_prefix("```")
            .is_some_and(|tag| tag.trim().eq_ignore_ascii_case("text"))
    })?;
    let body: Vec<&str> = lines.take_while(|l| !l.trim_start().starts_with("```")).collect();
    Some(body.join("\n"))
}

/// Characters the block occupies once pasted (content plus trailing newline).
pub fn effective_chars(block: &str) -> usize {
    block.chars().count() + 1
}

/// Check the instruction block of a global instruction file against `budget`.
pub fn check_size_budget(source: &str, text: &str, opts: &LintOptions, report: &mut LintReport) {
    let SizeBudget {
        hard_limit,
        soft_target,
    } = opts.budget;

    let Some(block) = first_text_block(text) else {
        report.route(
            source,
            "no ```text block found; cannot measure instruction size",
            opts.strict,
        );
        return;
    };

    let count = effective_chars(&block);
    if count > hard_limit {
        report.error(
            source,
            format!("```text block is {count} chars and exceeds ModuleMill budget {hard_limit}"),
        );
    } else if count > soft_target {
        report.route(
            source,
            format!("```text block is {count} chars and exceeds soft target {soft_target}"),
            opts.strict,
        );
    }
}
