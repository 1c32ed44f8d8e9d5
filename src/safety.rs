use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Directory names under the root that are never patched.
pub const FORBIDDEN_DIRS: &[&str] = &["node_modules", ".git", ".next"];

/// Keeps patching inside the project root and out of vendored or generated
/// directories.
#[derive(Debug, Clone)]
pub struct WorkspaceGuard {
    /// Canonical project root
    root: PathBuf,
    forbidden_dirs: Vec<String>,
}

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("Path is outside project root: {path} (root: {root})")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Path is in forbidden directory '{dir}': {path}")]
    ForbiddenPath { path: PathBuf, dir: String },

    #[error("Failed to canonicalize path: {0}")]
    Canonicalize(#[from] std::io::Error),
}

impl WorkspaceGuard {
    /// Create a guard for `root`, canonicalized to resolve symlinks.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SafetyError> {
        Self::with_forbidden(root, FORBIDDEN_DIRS.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_forbidden(
        root: impl AsRef<Path>,
        forbidden_dirs: Vec<String>,
    ) -> Result<Self, SafetyError> {
        let root = root.as_ref().canonicalize()?;
        Ok(Self {
            root,
            forbidden_dirs,
        })
    }

    /// Check that an existing path is safe to patch.
    ///
    /// Relative paths are resolved against the root. Returns the canonical
    /// path.
    pub fn validate_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, SafetyError> {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        let canonical = absolute.canonicalize()?;

        let Ok(inside) = canonical.strip_prefix(&self.root) else {
            return Err(SafetyError::OutsideRoot {
                path: canonical.clone(),
                root: self.root.clone(),
            });
        };

        let forbidden = inside.components().find_map(|component| match component {
            Component::Normal(name) => self.forbidden_name(name),
            _ => None,
        });
        if let Some(dir) = forbidden {
            return Err(SafetyError::ForbiddenPath {
                path: canonical.clone(),
                dir,
            });
        }

        Ok(canonical)
    }

    fn forbidden_name(&self, name: &OsStr) -> Option<String> {
        self.forbidden_dirs
            .iter()
            .find(|dir| OsStr::new(dir.as_str()) == name)
            .cloned()
    }

    pub fn is_forbidden_dir(&self, name: &OsStr) -> bool {
        self.forbidden_name(name).is_some()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
