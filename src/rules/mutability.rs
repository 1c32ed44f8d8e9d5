//! `prefer-const` fixes for a fixed list of names.

use super::{compile, RuleError, RuleId};
use regex::Regex;

#[derive(Debug, Clone)]
pub struct PreferConst {
    declaration: Option<Regex>,
}

impl PreferConst {
    pub fn new(names: &[String]) -> Result<Self, RuleError> {
        if names.is_empty() {
            return Ok(Self { declaration: None });
        }
        let alternation = names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let declaration = compile(RuleId::PreferConst, &format!(r"\blet\s+({alternation})\b"))?;
        Ok(Self {
            declaration: Some(declaration),
        })
    }

    pub fn apply(&self, text: &str) -> String {
        match &self.declaration {
            Some(re) => re.replace_all(text, "const ${1}").into_owned(),
            None => text.to_string(),
        }
    }
}
