//! Source Patcher: regex-driven lint fixes for front-end source files
//!
//! Reads each target file in full, runs an ordered pipeline of stateless
//! rewrite rules over the buffer, and writes the result back only when the
//! text changed.
//!
//! # Architecture
//!
//! - [`config`]: the run data (target files, unused-symbol table, name
//!   lists, line-targeted fixes) loaded from TOML or built-in defaults
//! - [`rules`]: the rewrite rules and the [`RuleSet`] pipeline
//! - [`document`]: the in-memory [`SourceDocument`] and its atomic,
//!   write-if-changed persistence
//! - [`safety`]: the [`WorkspaceGuard`] that keeps writes inside the root
//! - [`patcher`]: per-file orchestration with contained failures
//!
//! # Example
//!
//! ```no_run
//! use source_patcher::{PatcherConfig, Patcher};
//!
//! let config = PatcherConfig::default();
//! let patcher = Patcher::new(&config, "/srv/site").unwrap();
//! let summary = patcher.run(&config.files);
//! println!("{} files fixed", summary.changed());
//! ```

pub mod config;
pub mod document;
pub mod patcher;
pub mod rules;
pub mod safety;

// Re-exports
pub use config::{
    load_from_path, load_from_str, load_or_default, render_toml, ConfigError, PatcherConfig,
    TargetedFix,
};
pub use document::{DocumentError, PersistOutcome, SourceDocument};
pub use patcher::{
    FileOutcome, FileReport, Patcher, PatcherError, PendingPatch, Prepared, RunSummary,
};
pub use rules::{Rewrite, RuleError, RuleId, RuleSet, Target};
pub use safety::{SafetyError, WorkspaceGuard};
