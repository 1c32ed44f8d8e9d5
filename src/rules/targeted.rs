//! Line-addressed literal replacements for one file at a time.

use crate::config::TargetedFix;

#[derive(Debug, Clone, Default)]
pub struct TargetedFixes {
    fixes: Vec<TargetedFix>,
}

impl TargetedFixes {
    pub fn new(fixes: Vec<TargetedFix>) -> Self {
        Self { fixes }
    }

    /// Replace the first occurrence of each fix's `find` on its line. Fixes for
    /// other files, lines past the end, and lines without the text are skipped.
    pub fn apply(&self, text: &str, relative: &str) -> String {
        let mut relevant = self.fixes.iter().filter(|fix| fix.file == relative).peekable();
        if relevant.peek().is_none() {
            return text.to_string();
        }

        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        for fix in relevant {
            let Some(line) = fix.line.checked_sub(1).and_then(|idx| lines.get_mut(idx)) else {
                continue;
            };
            if line.contains(&fix.find) {
                *line = line.replacen(&fix.find, &fix.replace, 1);
            }
        }
        lines.join("\n")
    }
}
