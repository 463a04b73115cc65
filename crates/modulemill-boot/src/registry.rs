//! Recognizers for the registry and global instruction files.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Doc pointer keys a registry module block may list under `- Docs:`.
pub const DOC_KEYS: &[&str] = &["Manifest", "Install", "QuickRef", "MachineManual", "UserGuide"];

static MODULE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^###\s+Module:[ \t]*").expect("valid pattern"));
static DOC_ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-\s*(\w+):\s*`([^`]+)`\s*$").expect("valid pattern"));
static BACKTICK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid pattern"));
static REGISTRY_BOOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)first assistant message must include a one-line boot warning:\s*\n\s*-\s*`([^`]+)`",
    )
    .expect("valid pattern")
});
static GLOBAL_BOOT_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r#"(?i)Reply 1:\s*"([^"]+)""#,
        r#"(?i)Reply #1 includes:\s*"([^"]+)""#,
        r"(?i)Reply 1:\s*`([^`]+)`",
    ]
    .map(|p| Regex::new(p).expect("valid pattern"))
});
static SUPPORTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)-\s*(?:Supported modules|Modules):\s*`([^`]+)`").expect("valid pattern")
});

/// One `### Module:` block from `KitRegistry.md`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    pub name: String,
    pub emoji: String,
    /// Lowercased `DefaultLoad` value; `"no"` when absent.
    pub default_load: String,
    /// Lowercased `SingleEmojiActivate` value; `"no"` when absent.
    pub single_emoji_activate: String,
    pub docs: BTreeMap<String, String>,
}

impl ModuleEntry {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            emoji: String::new(),
            default_load: "no".to_string(),
            single_emoji_activate: "no".to_string(),
            docs: BTreeMap::new(),
        }
    }

    pub fn loads_by_default(&self) -> bool {
        self.default_load == "yes"
    }

    pub fn doc(&self, key: &str) -> Option<&str> {
        self.docs.get(key).map(String::as_str)
    }
}

/// The boot warning the registry requires in the first reply.
pub fn boot_warning_from_registry(text: &str) -> Option<String> {
    capture_trimmed(&REGISTRY_BOOT_RE, text)
}

/// The boot warning a global instruction file quotes for reply 1.
pub fn boot_warning_from_global(text: &str) -> Option<String> {
    GLOBAL_BOOT_RES
        .iter()
        .find_map(|re| capture_trimmed(re, text))
}

/// Module names from a `- Supported modules: `a | b`` line.
pub fn supported_modules(text: &str) -> Vec<String> {
    let Some(raw) = capture_trimmed(&SUPPORTED_RE, text) else {
        return Vec::new();
    };
    raw.split('|')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

fn capture_trimmed(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// First backtick-quoted value on a line, trimmed.
pub fn backtick_value(line: &str) -> String {
    capture_trimmed(&BACKTICK_RE, line).unwrap_or_default()
}

/// Parse every `### Module:` block in registry order.
///
/// A block ends at the next module header or at any `## ` heading.
pub fn parse_registry_modules(text: &str) -> Vec<ModuleEntry> {
    MODULE_HEADER_RE
        .split(text)
        .skip(1)
        .filter_map(parse_block)
        .collect()
}

fn parse_block(block: &str) -> Option<ModuleEntry> {
    let mut lines = block.lines();
    let mut entry = ModuleEntry::new(lines.next()?.trim());
    let mut in_docs = false;

    for raw in lines {
        if raw.starts_with("## ") {
            break;
        }
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("- Docs:") {
            in_docs = true;
            continue;
        }

        if in_docs {
            if let Some(caps) = DOC_ENTRY_RE.captures(line) {
                let key = &caps[1];
                if DOC_KEYS.contains(&key) {
                    entry.docs.insert(key.to_string(), caps[2].trim().to_string());
                    continue;
                }
            }
            if line.starts_with("- ") {
                in_docs = false;
            }
        }

        if line.starts_with("- ModuleEmoji:") {
            entry.emoji = backtick_value(line);
        } else if line.starts_with("- DefaultLoad:") {
            entry.default_load = backtick_value(line).to_lowercase();
        } else if line.starts_with("- SingleEmojiActivate:") {
            entry.single_emoji_activate = backtick_value(line).to_lowercase();
        }
    }

    Some(entry)
}
