//! CommonJS `require` assignments to ES module imports
//! (`@typescript-eslint/no-require-imports`).

use super::{compile, RuleError, RuleId};
use regex::Regex;

#[derive(Debug, Clone)]
pub struct RequireImports {
    default_binding: Regex,
    destructured: Regex,
}

impl RequireImports {
    pub fn new() -> Result<Self, RuleError> {
        Ok(Self {
            default_binding: compile(
                RuleId::RequireImports,
                r#"const\s+(\w+)\s*=\s*require\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
            )?,
            destructured: compile(
                RuleId::RequireImports,
                r#"const\s+\{([^}]+)\}\s*=\s*require\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
            )?,
        })
    }

    pub fn apply(&self, text: &str) -> String {
        let text = self
            .default_binding
            .replace_all(text, "import ${1} from '${2}'");
        // The captured binding list keeps its own padding.
        self.destructured
            .replace_all(&text, "import { ${1} } from '${2}'")
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(text: &str) -> String {
        RequireImports::new().unwrap().apply(text)
    }

    #[test]
    fn default_binding() {
        assert_eq!(
            rewrite("const fs = require('fs');"),
            "import fs from 'fs';"
        );
        assert_eq!(
            rewrite(r#"const path = require ( "path" )"#),
            "import path from 'path'"
        );
    }

    #[test]
    fn destructured_bindings() {
        assert_eq!(
            rewrite("const {chromium} = require('playwright');"),
            "import { chromium } from 'playwright';"
        );
        assert_eq!(
            rewrite("const { readFile, writeFile } = require('fs/promises')"),
            "import {  readFile, writeFile  } from 'fs/promises'"
        );
    }

    #[test]
    fn other_require_shapes_are_left_alone() {
        for text in [
            "let fs = require('fs')",
            "const cfg = require(configPath)",
            "require('dotenv').config()",
        ] {
            assert_eq!(rewrite(text), text);
        }
    }

    #[test]
    fn member_access_after_require_is_kept_verbatim() {
        assert_eq!(
            rewrite("const x = require('a').b"),
            "import x from 'a'.b"
        );
    }

    #[test]
    fn import_output_is_stable() {
        let once = rewrite("const { a } = require('m')\nconst b = require('n')\n");
        assert_eq!(rewrite(&once), once);
    }
}
