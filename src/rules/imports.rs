//! Removal of import lines that name symbols known to be unused.
//!
//! Table keys are matched as substrings of the file path, and every matching
//! key contributes its symbols: a path that matches `app/api/` and
//! `app/api/lead-magnet/route.ts` is checked against both symbol sets.

use super::{compile, RuleError, RuleId};
use regex::Regex;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct UnusedImports {
    /// One whole-word alternation per table key.
    keys: Vec<(String, Regex)>,
    underscore_param: Regex,
}

impl UnusedImports {
    pub fn new(table: &BTreeMap<String, Vec<String>>) -> Result<Self, RuleError> {
        let mut keys = Vec::with_capacity(table.len());
        for (key, symbols) in table {
            if symbols.is_empty() {
                continue;
            }
            let alternation = symbols
                .iter()
                .map(|symbol| regex::escape(symbol))
                .collect::<Vec<_>>()
                .join("|");
            let re = compile(RuleId::UnusedImports, &format!(r"\b(?:{alternation})\b"))?;
            keys.push((key.clone(), re));
        }

        Ok(Self {
            keys,
            underscore_param: compile(RuleId::UnusedImports, r"(\w+:\s*)_(\w+)")?,
        })
    }

    /// Symbol patterns for every key contained in `path`.
    fn patterns_for<'a>(&'a self, path: &str) -> Vec<&'a Regex> {
        self.keys
            .iter()
            .filter(|(key, _)| path.contains(key.as_str()))
            .map(|(_, re)| re)
            .collect()
    }

    pub fn apply(&self, text: &str, path: &str, is_typescript: bool) -> String {
        let patterns = self.patterns_for(path);
        if patterns.is_empty() && !is_typescript {
            return text.to_string();
        }

        let mut kept = Vec::new();
        for line in text.split('\n') {
            let unused = line.contains("import") && patterns.iter().any(|re| re.is_match(line));
            if unused {
                continue;
            }
            if is_typescript {
                // Rewrites `name: _name` to itself. The underscore spelling is
                // already what the unused-vars lint accepts, so nothing changes.
                kept.push(
                    self.underscore_param
                        .replace_all(line, "${1}_${2}")
                        .into_owned(),
                );
            } else {
                kept.push(line.to_string());
            }
        }
        kept.join("\n")
    }
}
