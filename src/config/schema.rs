use crate::rules::RuleId;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Everything the patcher needs to know about a run, loaded once at startup.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PatcherConfig {
    /// Directory the `files` entries are relative to.
    #[serde(default)]
    pub root: Option<String>,
    /// Files to patch, relative to the root.
    #[serde(default)]
    pub files: Vec<String>,
    /// Suffixes that enable the TypeScript-only passes.
    #[serde(default = "default_typescript_suffixes")]
    pub typescript_suffixes: Vec<String>,
    /// Extensions picked up by `--all` discovery (without the dot).
    #[serde(default = "default_scan_extensions")]
    pub scan_extensions: Vec<String>,
    /// Identifiers whose `let` declarations are rewritten to `const`.
    #[serde(default)]
    pub const_names: Vec<String>,
    #[serde(default)]
    pub disabled_rules: Vec<RuleId>,
    /// Path substring -> symbols whose import lines are dropped.
    #[serde(default)]
    pub unused_symbols: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub targeted: Vec<TargetedFix>,
}

/// A literal replacement on one line of one file.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TargetedFix {
    /// Path relative to the root, compared verbatim against the file list.
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    pub find: String,
    pub replace: String,
}

pub(crate) fn default_typescript_suffixes() -> Vec<String> {
    vec![".ts".to_string(), ".tsx".to_string()]
}

pub(crate) fn default_scan_extensions() -> Vec<String> {
    ["ts", "tsx", "js", "jsx", "mjs"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl PatcherConfig {
    /// An empty configuration: no files, no symbols, every rule enabled.
    pub fn empty() -> Self {
        Self {
            root: None,
            files: Vec::new(),
            typescript_suffixes: default_typescript_suffixes(),
            scan_extensions: default_scan_extensions(),
            const_names: Vec::new(),
            disabled_rules: Vec::new(),
            unused_symbols: BTreeMap::new(),
            targeted: Vec::new(),
        }
    }

    pub fn is_enabled(&self, rule: RuleId) -> bool {
        !self.disabled_rules.contains(&rule)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        for (idx, file) in self.files.iter().enumerate() {
            if file.trim().is_empty() {
                issues.push(ValidationIssue::BlankEntry {
                    field: "files",
                    index: idx,
                });
            }
        }

        for (idx, name) in self.const_names.iter().enumerate() {
            if !is_identifier(name) {
                issues.push(ValidationIssue::NotAnIdentifier {
                    field: "const_names",
                    value: name.clone(),
                    index: idx,
                });
            }
        }

        for (key, symbols) in &self.unused_symbols {
            if key.trim().is_empty() {
                issues.push(ValidationIssue::BlankKey {
                    field: "unused_symbols",
                    key: key.clone(),
                });
            }
            for (idx, symbol) in symbols.iter().enumerate() {
                if !is_identifier(symbol) {
                    issues.push(ValidationIssue::NotAnIdentifier {
                        field: "unused_symbols",
                        value: format!("{key}: {symbol}"),
                        index: idx,
                    });
                }
            }
        }

        for (idx, fix) in self.targeted.iter().enumerate() {
            if fix.file.trim().is_empty() {
                issues.push(ValidationIssue::InvalidTargetedFix {
                    index: idx,
                    message: "file is blank".to_string(),
                });
            }
            if fix.line == 0 {
                issues.push(ValidationIssue::InvalidTargetedFix {
                    index: idx,
                    message: "line numbers start at 1".to_string(),
                });
            }
            if fix.find.is_empty() {
                issues.push(ValidationIssue::InvalidTargetedFix {
                    index: idx,
                    message: "find text is empty".to_string(),
                });
            } else if fix.replace.contains(&fix.find) {
                issues.push(ValidationIssue::InvalidTargetedFix {
                    index: idx,
                    message: format!("replacement still contains '{}'", fix.find),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

impl Default for PatcherConfig {
    fn default() -> Self {
        crate::config::defaults::builtin()
    }
}

/// JavaScript identifier check, ASCII only.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    BlankEntry {
        field: &'static str,
        index: usize,
    },
    BlankKey {
        field: &'static str,
        key: String,
    },
    NotAnIdentifier {
        field: &'static str,
        value: String,
        index: usize,
    },
    InvalidTargetedFix {
        index: usize,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::BlankEntry { field, index } => {
                write!(f, "{field}[{index}] is blank")
            }
            ValidationIssue::BlankKey { field, key } => {
                write!(f, "{field} has a blank key: {key:?}")
            }
            ValidationIssue::NotAnIdentifier {
                field,
                value,
                index,
            } => write!(f, "{field}[{index}] is not an identifier: '{value}'"),
            ValidationIssue::InvalidTargetedFix { index, message } => {
                write!(f, "targeted[{index}]: {message}")
            }
        }
    }
}
