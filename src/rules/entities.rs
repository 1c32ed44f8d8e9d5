//! JSX text escaping for `react/no-unescaped-entities`.
//!
//! A "tag body" is any run of text between a literal `>` and the next literal
//! `<`. The run may span lines, so code between an arrow `=>` and the next tag
//! is treated as text too.

use super::{compile, RuleError, RuleId};
use regex::Regex;

#[derive(Debug, Clone)]
pub struct EntityEscape {
    apostrophe: Regex,
    quoted: Regex,
}

impl EntityEscape {
    pub fn new() -> Result<Self, RuleError> {
        Ok(Self {
            apostrophe: compile(RuleId::EntityEscape, r#"(>[^<]*?)'([^<]*?<)"#)?,
            quoted: compile(RuleId::EntityEscape, r#"(>[^<]*?)"([^<]*?)"([^<]*?<)"#)?,
        })
    }

    pub fn apply(&self, text: &str) -> String {
        // Each match consumes its whole tag body, so one replace_all escapes a
        // single occurrence per body. Repeat until nothing is left.
        let escaped = replace_until_stable(&self.apostrophe, text, "${1}&apos;${2}");
        replace_until_stable(&self.quoted, &escaped, "${1}&ldquo;${2}&rdquo;${3}")
    }
}

fn replace_until_stable(re: &Regex, text: &str, replacement: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = re.replace_all(&current, replacement);
        if next == current {
            return current;
        }
        current = next.into_owned();
    }
}
