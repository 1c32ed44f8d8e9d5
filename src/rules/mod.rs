//! Rewrite rules and the fixed-order pipeline that runs them.
//!
//! Every rule is a pure text-to-text transformation over a whole buffer. The
//! [`RuleSet`] compiles the rules once from a [`PatcherConfig`] and applies them
//! in [`RuleId::ALL`] order, re-running the sequence on its own output until the
//! buffer stops changing.

pub mod entities;
pub mod hooks;
pub mod imports;
pub mod modules;
pub mod mutability;
pub mod targeted;
pub mod types;

use crate::config::PatcherConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use entities::EntityEscape;
pub use hooks::HookDependencies;
pub use imports::UnusedImports;
pub use modules::RequireImports;
pub use mutability::PreferConst;
pub use targeted::TargetedFixes;
pub use types::LooseTypes;

/// Upper bound on pipeline passes per file.
pub const MAX_PASSES: usize = 16;

/// Stable identifier of a rewrite rule, as used in config files and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    TargetedFixes,
    EntityEscape,
    UnusedImports,
    LooseTypes,
    HookDeps,
    RequireImports,
    PreferConst,
}

impl RuleId {
    /// Application order.
    pub const ALL: [RuleId; 7] = [
        RuleId::TargetedFixes,
        RuleId::EntityEscape,
        RuleId::UnusedImports,
        RuleId::LooseTypes,
        RuleId::HookDeps,
        RuleId::RequireImports,
        RuleId::PreferConst,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::TargetedFixes => "targeted-fixes",
            RuleId::EntityEscape => "entity-escape",
            RuleId::UnusedImports => "unused-imports",
            RuleId::LooseTypes => "loose-types",
            RuleId::HookDeps => "hook-deps",
            RuleId::RequireImports => "require-imports",
            RuleId::PreferConst => "prefer-const",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RuleId::TargetedFixes => "line-addressed literal replacements from the config",
            RuleId::EntityEscape => "escape apostrophes and double quotes between '>' and '<'",
            RuleId::UnusedImports => "drop import lines naming a configured unused symbol",
            RuleId::LooseTypes => "replace 'any' annotations with 'unknown'",
            RuleId::HookDeps => "suppress exhaustive-deps on useEffect hooks with empty deps",
            RuleId::RequireImports => "rewrite require() assignments as static imports",
            RuleId::PreferConst => "rewrite 'let' to 'const' for configured names",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("failed to compile pattern for {rule}: {source}")]
    Pattern {
        rule: RuleId,
        #[source]
        source: regex::Error,
    },
}

pub(crate) fn compile(rule: RuleId, pattern: &str) -> Result<regex::Regex, RuleError> {
    regex::Regex::new(pattern).map_err(|source| RuleError::Pattern { rule, source })
}

/// The file a buffer belongs to, as seen by path-sensitive rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Full path with `/` separators; used for substring and suffix matching.
    pub path: String,
    /// Path relative to the root, exactly as listed in the config.
    pub relative: String,
}

impl Target {
    pub fn new(path: impl AsRef<std::path::Path>, relative: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().replace('\\', "/"),
            relative: relative.into(),
        }
    }

    /// A target whose full path is its relative path. Handy for buffers that
    /// never touch the file system.
    pub fn relative(relative: impl Into<String>) -> Self {
        let relative = relative.into();
        Self {
            path: relative.replace('\\', "/"),
            relative,
        }
    }
}

/// Outcome of running the pipeline over one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    /// Rules that changed the buffer, in first-fired order.
    pub fired: Vec<RuleId>,
    pub passes: usize,
    pub converged: bool,
}

/// Compiled rules plus the settings that decide which of them run.
#[derive(Debug, Clone)]
pub struct RuleSet {
    enabled: Vec<RuleId>,
    typescript_suffixes: Vec<String>,
    targeted: TargetedFixes,
    entities: EntityEscape,
    imports: UnusedImports,
    types: LooseTypes,
    hooks: HookDependencies,
    requires: RequireImports,
    prefer_const: PreferConst,
}

impl RuleSet {
    pub fn from_config(config: &PatcherConfig) -> Result<Self, RuleError> {
        let enabled = RuleId::ALL
            .into_iter()
            .filter(|rule| config.is_enabled(*rule))
            .collect();

        Ok(Self {
            enabled,
            typescript_suffixes: config.typescript_suffixes.clone(),
            targeted: TargetedFixes::new(config.targeted.clone()),
            entities: EntityEscape::new()?,
            imports: UnusedImports::new(&config.unused_symbols)?,
            types: LooseTypes::new()?,
            hooks: HookDependencies::new(),
            requires: RequireImports::new()?,
            prefer_const: PreferConst::new(&config.const_names)?,
        })
    }

    pub fn enabled(&self) -> &[RuleId] {
        &self.enabled
    }

    pub fn is_typescript(&self, target: &Target) -> bool {
        self.typescript_suffixes
            .iter()
            .any(|suffix| target.path.ends_with(suffix.as_str()))
    }

    /// Apply a single rule to `text`.
    pub fn apply_rule(&self, rule: RuleId, text: &str, target: &Target) -> String {
        match rule {
            RuleId::TargetedFixes => self.targeted.apply(text, &target.relative),
            RuleId::EntityEscape => self.entities.apply(text),
            RuleId::UnusedImports => {
                self.imports
                    .apply(text, &target.path, self.is_typescript(target))
            }
            RuleId::LooseTypes => self.types.apply(text),
            RuleId::HookDeps => {
                if self.is_typescript(target) {
                    self.hooks.apply(text)
                } else {
                    text.to_string()
                }
            }
            RuleId::RequireImports => self.requires.apply(text),
            RuleId::PreferConst => self.prefer_const.apply(text),
        }
    }

    /// Apply `rule` and record it in `fired` if it changed the buffer.
    fn apply_tracked(
        &self,
        rule: RuleId,
        text: String,
        target: &Target,
        fired: &mut Vec<RuleId>,
    ) -> String {
        let next = self.apply_rule(rule, &text, target);
        if next == text {
            return text;
        }
        tracing::debug!(rule = %rule, file = %target.relative, "rule rewrote buffer");
        if !fired.contains(&rule) {
            fired.push(rule);
        }
        next
    }

    /// One pass over every enabled rule except the line-addressed fixes.
    fn apply_pass(&self, text: &str, target: &Target, fired: &mut Vec<RuleId>) -> String {
        self.enabled
            .iter()
            .filter(|rule| **rule != RuleId::TargetedFixes)
            .fold(text.to_string(), |current, &rule| {
                self.apply_tracked(rule, current, target, fired)
            })
    }

    /// Run the pipeline until the buffer reaches a fixed point.
    ///
    /// Targeted fixes address lines of the file as read, so they run exactly
    /// once, before any rule can add or remove lines.
    pub fn rewrite(&self, text: &str, target: &Target) -> Rewrite {
        let mut fired = Vec::new();
        let mut current = text.to_string();
        if self.enabled.contains(&RuleId::TargetedFixes) {
            current = self.apply_tracked(RuleId::TargetedFixes, current, target, &mut fired);
        }

        for pass in 1..=MAX_PASSES {
            let next = self.apply_pass(&current, target, &mut fired);
            if next == current {
                return Rewrite {
                    text: current,
                    fired,
                    passes: pass,
                    converged: true,
                };
            }
            current = next;
        }

        tracing::warn!(
            file = %target.relative,
            passes = MAX_PASSES,
            "rewrite did not reach a fixed point"
        );
        Rewrite {
            text: current,
            fired,
            passes: MAX_PASSES,
            converged: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetedFix;

    fn rules() -> RuleSet {
        RuleSet::from_config(&PatcherConfig::default()).unwrap()
    }

    #[test]
    fn rule_ids_round_trip_through_strings() {
        for rule in RuleId::ALL {
            let json = serde_json::to_string(&rule).unwrap();
            assert_eq!(json, format!("\"{}\"", rule.as_str()));
        }
    }

    #[test]
    fn untouched_text_is_returned_verbatim() {
        let text = "export function add(a: number, b: number) {\n  return a + b;\n}\n";
        let rewrite = rules().rewrite(text, &Target::relative("lib/math.ts"));
        assert_eq!(rewrite.text, text);
        assert!(rewrite.fired.is_empty());
        assert_eq!(rewrite.passes, 1);
        assert!(rewrite.converged);
    }

    #[test]
    fn pipeline_reaches_fixed_point_across_rules() {
        // prefer-const enables require-imports, which only a second pass sees.
        let text = "let fid = require('./fid')\n";
        let rewrite = rules().rewrite(text, &Target::relative("lib/ids.ts"));
        assert_eq!(rewrite.text, "import fid from './fid'\n");
        assert_eq!(
            rewrite.fired,
            vec![RuleId::PreferConst, RuleId::RequireImports]
        );
        assert!(rewrite.passes >= 2);

        let again = rules().rewrite(&rewrite.text, &Target::relative("lib/ids.ts"));
        assert_eq!(again.text, rewrite.text);
        assert!(again.fired.is_empty());
    }

    #[test]
    fn disabled_rules_do_not_run() {
        let mut config = PatcherConfig::default();
        config.disabled_rules.push(RuleId::LooseTypes);
        let rules = RuleSet::from_config(&config).unwrap();
        assert!(!rules.enabled().contains(&RuleId::LooseTypes));

        let text = "let value: any = 1;\n";
        let rewrite = rules.rewrite(text, &Target::relative("lib/a.ts"));
        assert_eq!(rewrite.text, text);
    }

    #[test]
    fn hook_rule_is_typescript_only() {
        let text = "useEffect(() => {\n  a()\n}, [])\n\n\n\n";
        let js = rules().rewrite(text, &Target::relative("scripts/a.js"));
        assert_eq!(js.text, text);

        let ts = rules().rewrite(text, &Target::relative("hooks/a.ts"));
        assert!(ts.text.starts_with(hooks::SUPPRESSION_LINE));
    }

    fn footer_rules(fix: TargetedFix) -> RuleSet {
        let mut config = PatcherConfig::empty();
        config
            .unused_symbols
            .insert("components/Footer.tsx".to_string(), vec!["Send".to_string()]);
        config.targeted.push(fix);
        RuleSet::from_config(&config).unwrap()
    }

    fn fix(line: usize, find: &str, replace: &str) -> TargetedFix {
        TargetedFix {
            file: "components/Footer.tsx".to_string(),
            line,
            find: find.to_string(),
            replace: replace.to_string(),
        }
    }

    #[test]
    fn targeted_fix_addresses_lines_as_read() {
        let rules = footer_rules(fix(2, "Let's", "Let&apos;s"));
        let text = "import { Send } from 'x'\nconst a = \"Let's a\"\nconst b = \"Let's b\"\n";

        let rewrite = rules.rewrite(text, &Target::relative("components/Footer.tsx"));
        assert_eq!(
            rewrite.text,
            "const a = \"Let&apos;s a\"\nconst b = \"Let's b\"\n"
        );
        assert_eq!(
            rewrite.fired,
            vec![RuleId::TargetedFixes, RuleId::UnusedImports]
        );
    }

    #[test]
    fn targeted_fix_replaces_only_first_occurrence() {
        let rules = footer_rules(fix(1, "isn't", "isn&apos;t"));
        let rewrite = rules.rewrite(
            "const s = \"isn't, isn't, isn't\"",
            &Target::relative("components/Footer.tsx"),
        );
        assert_eq!(rewrite.text, "const s = \"isn&apos;t, isn't, isn't\"");
        assert!(rewrite.converged);
    }

    #[test]
    fn targeted_fix_containing_its_find_text_applies_once() {
        let rules = footer_rules(fix(1, "a", "aa"));
        let rewrite = rules.rewrite("\"a\"", &Target::relative("components/Footer.tsx"));
        assert_eq!(rewrite.text, "\"aa\"");
        assert_eq!(rewrite.passes, 1);
        assert!(rewrite.converged);
    }

    #[test]
    fn target_normalizes_separators() {
        let target = Target::new("C:\\site\\components\\Footer.tsx", "components/Footer.tsx");
        assert_eq!(target.path, "C:/site/components/Footer.tsx");
    }
}
