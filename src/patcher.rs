//! Per-file orchestration: resolve, guard, read, rewrite, write-if-changed.
//!
//! Failures never cross file boundaries. A missing file, a guard refusal, or
//! an I/O error is recorded in that file's [`FileReport`] and the run moves on.

use crate::config::PatcherConfig;
use crate::document::{PersistOutcome, SourceDocument};
use crate::rules::{RuleError, RuleId, RuleSet, Target};
use crate::safety::{SafetyError, WorkspaceGuard};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Directories skipped by discovery on top of the guard's forbidden set.
const SKIPPED_BUILD_DIRS: &[&str] = &["dist", "build", "coverage"];

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum FileOutcome {
    /// Rewritten and written back
    Fixed { rules: Vec<RuleId>, bytes: usize },
    /// Would be rewritten; dry run, so nothing was written
    WouldFix { rules: Vec<RuleId> },
    Unchanged,
    NotFound,
    /// Read, write or guard failure; the file was left as it was
    Failed { reason: String },
}

impl FileOutcome {
    pub fn is_change(&self) -> bool {
        matches!(self, FileOutcome::Fixed { .. } | FileOutcome::WouldFix { .. })
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Fixed { rules, .. } => write!(f, "fixed ({})", join_rules(rules)),
            FileOutcome::WouldFix { rules } => write!(f, "would fix ({})", join_rules(rules)),
            FileOutcome::Unchanged => write!(f, "unchanged"),
            FileOutcome::NotFound => write!(f, "not found"),
            FileOutcome::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

pub fn join_rules(rules: &[RuleId]) -> String {
    rules
        .iter()
        .map(|rule| rule.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Path relative to the root, as configured
    pub file: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
    /// Text before and after, kept only for changed files
    #[serde(skip)]
    pub change: Option<(String, String)>,
}

impl FileReport {
    fn new(file: &str, path: PathBuf, outcome: FileOutcome) -> Self {
        Self {
            file: file.to_string(),
            path,
            outcome,
            change: None,
        }
    }
}

/// Reports for a whole run, in target order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub reports: Vec<FileReport>,
}

impl RunSummary {
    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// Files written, or that would be written in a dry run.
    pub fn changed(&self) -> usize {
        self.count(FileOutcome::is_change)
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Unchanged))
    }

    pub fn not_found(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::NotFound))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }
}

#[derive(Error, Debug)]
pub enum PatcherError {
    #[error(transparent)]
    Rules(#[from] RuleError),

    #[error("invalid project root: {0}")]
    Root(#[from] SafetyError),

    #[error("failed to scan project root: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A file that was read and rewritten in memory but not yet written back.
#[derive(Debug, Clone)]
pub struct PendingPatch {
    file: String,
    path: PathBuf,
    document: SourceDocument,
    fired: Vec<RuleId>,
    passes: usize,
}

impl PendingPatch {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Result of [`Patcher::prepare`].
#[derive(Debug, Clone)]
pub enum Prepared {
    /// The file changes; [`Patcher::commit`] decides whether it is written
    Pending(PendingPatch),
    /// Nothing left to write: unchanged, missing, or failed
    Settled(FileReport),
}

/// Applies a compiled [`RuleSet`] to files under one project root.
#[derive(Debug, Clone)]
pub struct Patcher {
    rules: RuleSet,
    guard: WorkspaceGuard,
    scan_extensions: Vec<String>,
    dry_run: bool,
}

impl Patcher {
    pub fn new(config: &PatcherConfig, root: impl AsRef<Path>) -> Result<Self, PatcherError> {
        Ok(Self {
            rules: RuleSet::from_config(config)?,
            guard: WorkspaceGuard::new(root)?,
            scan_extensions: config.scan_extensions.clone(),
            dry_run: false,
        })
    }

    /// Compute outcomes without writing anything.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn root(&self) -> &Path {
        self.guard.root()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Patch one file given relative to the root.
    pub fn patch_file(&self, relative: &str) -> FileReport {
        match self.prepare(relative) {
            Prepared::Pending(pending) => self.commit(pending),
            Prepared::Settled(report) => report,
        }
    }

    /// Resolve, guard, read and rewrite one file without writing it.
    pub fn prepare(&self, relative: &str) -> Prepared {
        let path = self.root().join(relative);
        if !path.exists() {
            return Prepared::Settled(FileReport::new(relative, path, FileOutcome::NotFound));
        }

        let canonical = match self.guard.validate_path(&path) {
            Ok(canonical) => canonical,
            Err(e) => return Prepared::Settled(self.failed(relative, path, e.to_string())),
        };

        let mut document = match SourceDocument::open(&canonical) {
            Ok(document) => document,
            Err(e) => return Prepared::Settled(self.failed(relative, path, e.to_string())),
        };

        let rewrite = self.rules.rewrite(document.text(), &Target::new(&path, relative));
        document.set_text(rewrite.text);

        if !document.is_changed() {
            return Prepared::Settled(FileReport::new(relative, path, FileOutcome::Unchanged));
        }

        Prepared::Pending(PendingPatch {
            file: relative.to_string(),
            path,
            document,
            fired: rewrite.fired,
            passes: rewrite.passes,
        })
    }

    /// Write a prepared change back, or just report it in a dry run.
    pub fn commit(&self, pending: PendingPatch) -> FileReport {
        let PendingPatch {
            file,
            path,
            document,
            fired,
            passes,
        } = pending;

        let outcome = if self.dry_run {
            FileOutcome::WouldFix { rules: fired }
        } else {
            match document.persist() {
                Ok(PersistOutcome::Written { bytes }) => FileOutcome::Fixed { rules: fired, bytes },
                Ok(PersistOutcome::Unchanged) => FileOutcome::Unchanged,
                Err(e) => return self.failed(&file, path, e.to_string()),
            }
        };

        tracing::debug!(file = %file, passes, %outcome, "patched");
        FileReport {
            file,
            path,
            outcome,
            change: Some((document.original().to_string(), document.text().to_string())),
        }
    }

    fn failed(&self, relative: &str, path: PathBuf, reason: String) -> FileReport {
        tracing::warn!(file = relative, %reason, "file left unmodified");
        FileReport::new(relative, path, FileOutcome::Failed { reason })
    }

    /// Patch every file in order. Always completes.
    pub fn run<S: AsRef<str>>(&self, files: &[S]) -> RunSummary {
        RunSummary {
            reports: files.iter().map(|f| self.patch_file(f.as_ref())).collect(),
        }
    }

    /// Every file under the root with a scanned extension, relative to the
    /// root with `/` separators, in sorted order.
    pub fn discover_files(&self) -> Result<Vec<String>, PatcherError> {
        let root = self.root();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !is_skipped_dir(entry.file_name(), &self.guard)
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let matches_extension = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| self.scan_extensions.iter().any(|e| e == ext));
            if !matches_extension {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(root) {
                let relative = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                files.push(relative);
            }
        }
        Ok(files)
    }
}

fn is_skipped_dir(name: &std::ffi::OsStr, guard: &WorkspaceGuard) -> bool {
    guard.is_forbidden_dir(name)
        || SKIPPED_BUILD_DIRS
            .iter()
            .any(|d| std::ffi::OsStr::new(d) == name)
}
