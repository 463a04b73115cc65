//! Token extractors.
//!
//! Pure functions that pull structured tokens out of raw document text.
//! Emoji are always compared after [`emoji::normalize`].

pub mod commands;
pub mod emoji;
pub mod glossary;
pub mod state_keys;
pub mod table;

pub use commands::{alias_emoji_map, canon_commands, command_rows, CommandRow};
pub use emoji::{normalize, pascal_pair};
pub use glossary::{glossary_entries, GlossaryEntry};
pub use state_keys::state_keys;
