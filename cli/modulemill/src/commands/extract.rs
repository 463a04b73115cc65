//! `modulemill extract`: print one section of a markdown file.

use std::path::Path;

use anyhow::Result;
use modulemill_core::error::read_text;
use modulemill_core::extract_section;

/// Print the section whose heading title starts with `prefix`.
pub fn run(path: &Path, prefix: &str) -> Result<()> {
    print!("{}", section(path, prefix)?);
    Ok(())
}

fn section(path: &Path, prefix: &str) -> Result<String> {
    let text = read_text(path)?;
    Ok(extract_section(&text, prefix)?)
}
