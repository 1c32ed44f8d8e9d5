use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// One file's text, held in memory while the rewrite rules run over it.
///
/// The document keeps the text it was opened with, so the `changed` flag is
/// always derived rather than tracked, and nothing touches the disk until
/// [`SourceDocument::persist`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    path: PathBuf,
    original: String,
    /// xxh3 of the bytes read at open time
    fingerprint: u64,
    text: String,
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8: {source}")]
    Utf8 {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },

    #[error("{0} was modified by another process since it was read")]
    ConcurrentModification(PathBuf),
}

/// What [`SourceDocument::persist`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "PersistOutcome tells whether the file was written"]
pub enum PersistOutcome {
    Written { bytes: usize },
    Unchanged,
}

impl SourceDocument {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DocumentError> {
        let path = path.into();
        let bytes = fs::read(&path).map_err(|source| DocumentError::Read {
            path: path.clone(),
            source,
        })?;
        let fingerprint = xxh3_64(&bytes);
        let original = String::from_utf8(bytes).map_err(|source| DocumentError::Utf8 {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            text: original.clone(),
            original,
            fingerprint,
        })
    }

    /// Build a document from text that was not read from disk.
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let original = text.into();
        Self {
            path: path.into(),
            fingerprint: xxh3_64(original.as_bytes()),
            text: original.clone(),
            original,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text as it was when the document was opened.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn is_changed(&self) -> bool {
        self.text != self.original
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Write the buffer back to its path if, and only if, it changed.
    ///
    /// The file on disk must still hash to what was read at open time. The
    /// write goes through a tempfile in the same directory followed by fsync
    /// and rename, so readers never observe a half-written file.
    pub fn persist(&self) -> Result<PersistOutcome, DocumentError> {
        if !self.is_changed() {
            return Ok(PersistOutcome::Unchanged);
        }

        let current = fs::read(&self.path).map_err(|source| DocumentError::Read {
            path: self.path.clone(),
            source,
        })?;
        if xxh3_64(&current) != self.fingerprint {
            return Err(DocumentError::ConcurrentModification(self.path.clone()));
        }

        atomic_write(&self.path, self.text.as_bytes()).map_err(|source| DocumentError::Write {
            path: self.path.clone(),
            source,
        })?;

        // Bump mtime so file watchers and incremental builds pick the change up.
        filetime::set_file_mtime(&self.path, filetime::FileTime::now()).map_err(|source| {
            DocumentError::Write {
                path: self.path.clone(),
                source,
            }
        })?;

        Ok(PersistOutcome::Written {
            bytes: self.text.len(),
        })
    }
}

/// Atomic file write: tempfile + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), std::io::Error> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Path has no parent directory",
        )
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;

    // Keep the permissions of the file being replaced.
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_reads_text() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("Footer.tsx");
        fs::write(&file_path, "export default Footer\n").unwrap();

        let doc = SourceDocument::open(&file_path).unwrap();
        assert_eq!(doc.text(), "export default Footer\n");
        assert_eq!(doc.path(), file_path.as_path());
        assert!(!doc.is_changed());
    }

    #[test]
    fn changed_flag_follows_content() {
        let mut doc = SourceDocument::from_text("a.ts", "let fid = 1;");
        doc.set_text("const fid = 1;");
        assert!(doc.is_changed());
        doc.set_text("let fid = 1;");
        assert!(!doc.is_changed());
    }

    #[test]
    fn missing_file_is_read_error() {
        let result = SourceDocument::open("/nonexistent/file.tsx");
        assert!(matches!(result, Err(DocumentError::Read { .. })));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("bin.ts");
        fs::write(&file_path, [0xff, 0xfe, 0x00]).unwrap();

        let result = SourceDocument::open(&file_path);
        assert!(matches!(result, Err(DocumentError::Utf8 { .. })));
    }

    #[test]
    fn persist_writes_changed_text() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("a.ts");
        fs::write(&file_path, "let fid = 1;\n").unwrap();

        let mut doc = SourceDocument::open(&file_path).unwrap();
        doc.set_text("const fid = 1;\n");
        let outcome = doc.persist().unwrap();

        assert_eq!(outcome, PersistOutcome::Written { bytes: 15 });
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "const fid = 1;\n");
    }

    #[test]
    fn persist_skips_unchanged_text() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("a.ts");
        fs::write(&file_path, "const x = 1;\n").unwrap();
        let old = filetime::FileTime::from_unix_time(1_000_000, 0);
        filetime::set_file_mtime(&file_path, old).unwrap();

        let doc = SourceDocument::open(&file_path).unwrap();
        assert_eq!(doc.persist().unwrap(), PersistOutcome::Unchanged);

        let meta = fs::metadata(&file_path).unwrap();
        assert_eq!(filetime::FileTime::from_last_modification_time(&meta), old);
    }

    #[test]
    fn persist_refuses_concurrent_modification() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("a.ts");
        fs::write(&file_path, "let fid = 1;\n").unwrap();

        let mut doc = SourceDocument::open(&file_path).unwrap();
        fs::write(&file_path, "let fid = 2;\n").unwrap();
        doc.set_text("const fid = 1;\n");

        let result = doc.persist();
        assert!(matches!(
            result,
            Err(DocumentError::ConcurrentModification(_))
        ));
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "let fid = 2;\n");
    }
}
