//! `@typescript-eslint/no-explicit-any` substitutions.

use super::{compile, RuleError, RuleId};
use regex::Regex;

/// Applied top to bottom, each as a global replace. The bare `: any` form runs
/// first and therefore also catches the named and array shapes below it; the
/// later entries only fire where `any` runs straight into another word
/// character (`error: anyValue`).
const SUBSTITUTIONS: &[(&str, &str)] = &[
    (r": any\b", ": unknown"),
    (r"<any>", "<unknown>"),
    (r"\((\w+): any\)", "(${1}: unknown)"),
    (r"data: any", "data: unknown"),
    (r"error: any", "error: Error | unknown"),
    (r"programme: any", "programme: unknown"),
    (r": any\[\]", ": unknown[]"),
];

#[derive(Debug, Clone)]
pub struct LooseTypes {
    substitutions: Vec<(Regex, &'static str)>,
}

impl LooseTypes {
    pub fn new() -> Result<Self, RuleError> {
        let substitutions = SUBSTITUTIONS
            .iter()
            .map(|(pattern, replacement)| Ok((compile(RuleId::LooseTypes, pattern)?, *replacement)))
            .collect::<Result<Vec<_>, RuleError>>()?;
        Ok(Self { substitutions })
    }

    pub fn apply(&self, text: &str) -> String {
        self.substitutions
            .iter()
            .fold(text.to_string(), |acc, (re, replacement)| {
                re.replace_all(&acc, *replacement).into_owned()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        LooseTypes::new().unwrap().apply(text)
    }

    #[test]
    fn bare_annotation() {
        assert_eq!(normalize("  value: any;"), "  value: unknown;");
        assert_eq!(
            normalize("function f(x: any) {}"),
            "function f(x: unknown) {}"
        );
    }

    #[test]
    fn generic_argument() {
        assert_eq!(
            normalize("const m = new Map<string, any>() as Array<any>;"),
            "const m = new Map<string, any>() as Array<unknown>;"
        );
    }

    #[test]
    fn arrays() {
        assert_eq!(normalize("items: any[] = []"), "items: unknown[] = []");
    }

    #[test]
    fn named_shapes_are_shadowed_by_the_bare_rule() {
        assert_eq!(normalize("catch (error: any) {"), "catch (error: unknown) {");
        assert_eq!(normalize("(data: any) => data"), "(data: unknown) => data");
    }

    #[test]
    fn named_shapes_fire_on_glued_words() {
        assert_eq!(normalize("error: anyhow"), "error: Error | unknownhow");
    }

    #[test]
    fn unrelated_words_are_kept() {
        let text = "const company: Company = anyOf(list);";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn stable_after_one_application() {
        let once = normalize("a: any; b: Array<any>; c: any[]");
        assert_eq!(normalize(&once), once);
    }
}
