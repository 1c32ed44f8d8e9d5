//! `react-hooks/exhaustive-deps` suppression for effects with an empty
//! dependency list.
//!
//! No dependency analysis is attempted: a hook that really has no dependencies
//! still gets the comment.

/// Suppression comment text, without indentation.
pub const SUPPRESSION: &str = "// eslint-disable-next-line react-hooks/exhaustive-deps";

/// Inserted line. Indentation is fixed at four spaces.
pub const SUPPRESSION_LINE: &str = "    // eslint-disable-next-line react-hooks/exhaustive-deps";

const HOOK_CALL: &str = "useEffect";
const EMPTY_DEPS_CLOSER: &str = "}, [])";
/// Lines searched for the closer, starting at the hook line itself.
const WINDOW: usize = 10;
/// A hook line needs more than this many lines after it to be considered.
const MIN_FOLLOWING: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct HookDependencies;

impl HookDependencies {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, text: &str) -> String {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut out: Vec<&str> = Vec::with_capacity(lines.len());

        for (i, line) in lines.iter().enumerate() {
            if line.contains(HOOK_CALL) && i + MIN_FOLLOWING < lines.len() {
                let end = (i + WINDOW).min(lines.len());
                let closes_empty = lines[i..end]
                    .iter()
                    .any(|l| !l.contains(SUPPRESSION) && l.contains(EMPTY_DEPS_CLOSER));
                let suppressed = out.last().is_some_and(|prev| prev.contains(SUPPRESSION));
                if closes_empty && !suppressed {
                    out.push(SUPPRESSION_LINE);
                }
            }
            out.push(line);
        }

        out.join("\n")
    }
}
