//! Boot-trace diagnostics for the ModuleKit registry.
//!
//! The registry (`KitRegistry.md`) and the two global instruction files each
//! restate the boot warning and the supported module set. This crate parses
//! all three, reports where they disagree, and renders the boot decision flow
//! an assistant is expected to follow.

pub mod error;
pub mod registry;
pub mod trace;

pub use error::{BootError, Result};
pub use registry::{ModuleEntry, DOC_KEYS};
pub use trace::{BootInputs, BootTrace};
