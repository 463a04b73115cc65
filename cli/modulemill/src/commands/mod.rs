//! CLI command implementations.

pub mod boottrace;
pub mod extract;
pub mod lint;
