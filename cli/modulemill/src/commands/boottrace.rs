//! `modulemill boottrace`: cross-check the registry and global instructions.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use modulemill_boot::{BootError, BootInputs, BootTrace};

/// Print the decision flow and check results. Returns whether all checks passed.
pub fn run(repo_root: &Path) -> Result<bool> {
    let (output, passed) = report(repo_root)?;
    print!("{output}");
    Ok(passed)
}

fn report(repo_root: &Path) -> Result<(String, bool)> {
    let inputs = BootInputs::under_repo_root(repo_root);
    let trace = match BootTrace::load(&inputs) {
        Ok(trace) => trace,
        Err(BootError::MissingInputs(paths)) => {
            let mut out = String::new();
            for path in paths {
                let _ = writeln!(out, "ERROR missing file: {}", path.display());
            }
            return Ok((out, false));
        }
        Err(e) => return Err(e.into()),
    };

    let mut out = trace.flow().to_string();
    out.push('\n');
    let issues = trace.issues();
    if issues.is_empty() {
        out.push_str("BootTrace checks: PASS\n");
    } else {
        out.push_str("BootTrace checks: FAIL\n");
        for issue in &issues {
            let _ = writeln!(out, "- {issue}");
        }
    }
    Ok((out, issues.is_empty()))
}
