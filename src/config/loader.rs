use crate::config::schema::{PatcherConfig, ValidationError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml_edit::{Array, ArrayOfTables, DocumentMut, Item, Table};

/// File name picked up from the current directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "source-patcher.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not valid patcher TOML: {source}", origin(.path))]
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },

    #[error("{} has invalid settings:\n{source}", origin(.path))]
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

/// Where a config came from, for messages.
fn origin(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "inline config".to_string(),
    }
}

impl ConfigError {
    /// Attach the file a parse or validation error came from.
    fn in_file(self, file: &Path) -> Self {
        match self {
            ConfigError::Toml { source, .. } => ConfigError::Toml {
                path: Some(file.to_path_buf()),
                source,
            },
            ConfigError::Validation { source, .. } => ConfigError::Validation {
                path: Some(file.to_path_buf()),
                source,
            },
            io => io,
        }
    }
}

pub fn load_from_str(input: &str) -> Result<PatcherConfig, ConfigError> {
    let config: PatcherConfig = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(config)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<PatcherConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.in_file(path))
}

/// Resolve the configuration for a run.
///
/// An explicit path wins; otherwise `source-patcher.toml` in `search_dir` is
/// used when present, and the built-in defaults when not.
pub fn load_or_default(
    explicit: Option<&Path>,
    search_dir: &Path,
) -> Result<(PatcherConfig, Option<PathBuf>), ConfigError> {
    if let Some(path) = explicit {
        return Ok((load_from_path(path)?, Some(path.to_path_buf())));
    }

    let candidate = search_dir.join(DEFAULT_CONFIG_FILE);
    if candidate.is_file() {
        let config = load_from_path(&candidate)?;
        return Ok((config, Some(candidate)));
    }

    Ok((PatcherConfig::default(), None))
}

/// Render a configuration as a TOML document that `load_from_str` accepts.
pub fn render_toml(config: &PatcherConfig) -> String {
    fn strings<'a>(items: impl IntoIterator<Item = &'a String>) -> Array {
        items.into_iter().map(|s| s.as_str()).collect()
    }

    let mut doc = DocumentMut::new();

    if let Some(root) = &config.root {
        doc["root"] = toml_edit::value(root.as_str());
    }
    doc["files"] = toml_edit::value(strings(&config.files));
    doc["typescript_suffixes"] = toml_edit::value(strings(&config.typescript_suffixes));
    doc["scan_extensions"] = toml_edit::value(strings(&config.scan_extensions));
    doc["const_names"] = toml_edit::value(strings(&config.const_names));
    doc["disabled_rules"] = toml_edit::value(
        config
            .disabled_rules
            .iter()
            .map(|rule| rule.as_str())
            .collect::<Array>(),
    );

    let mut unused = Table::new();
    for (key, symbols) in &config.unused_symbols {
        unused.insert(key, toml_edit::value(strings(symbols)));
    }
    doc["unused_symbols"] = Item::Table(unused);

    if !config.targeted.is_empty() {
        let mut fixes = ArrayOfTables::new();
        for fix in &config.targeted {
            let mut table = Table::new();
            table.insert("file", toml_edit::value(fix.file.as_str()));
            table.insert("line", toml_edit::value(fix.line as i64));
            table.insert("find", toml_edit::value(fix.find.as_str()));
            table.insert("replace", toml_edit::value(fix.replace.as_str()));
            fixes.push(table);
        }
        doc["targeted"] = Item::ArrayOfTables(fixes);
    }

    doc.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleId;

    #[test]
    fn minimal_config_uses_field_defaults() {
        let config = load_from_str("files = [\"components/Footer.tsx\"]\n").unwrap();
        assert_eq!(config.files, vec!["components/Footer.tsx"]);
        assert_eq!(config.typescript_suffixes, vec![".ts", ".tsx"]);
        assert!(config.unused_symbols.is_empty());
        assert!(config.root.is_none());
    }

    #[test]
    fn full_config() {
        let toml = r#"
root = "/srv/site"
files = ["components/Footer.tsx", "lib/api-client.ts"]
const_names = ["fid"]
disabled_rules = ["hook-deps"]

[unused_symbols]
"components/Footer.tsx" = ["Send", "Sparkles"]
"components/" = ["Globe"]

[[targeted]]
file = "components/Footer.tsx"
line = 3
find = "Let's"
replace = "Let&apos;s"
"#;
        let config = load_from_str(toml).unwrap();
        assert_eq!(config.root.as_deref(), Some("/srv/site"));
        assert_eq!(config.disabled_rules, vec![RuleId::HookDeps]);
        assert_eq!(config.unused_symbols.len(), 2);
        assert_eq!(config.targeted[0].line, 3);
    }

    #[test]
    fn unknown_rule_is_a_parse_error() {
        let err = load_from_str("disabled_rules = [\"no-such-rule\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let err = load_from_str("filez = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn validation_error_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "const_names = [\"two words\"]\n").unwrap();

        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { path: Some(_), .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn inline_errors_name_their_origin() {
        let err = load_from_str("files = 3\n").unwrap_err();
        assert!(err.to_string().starts_with("inline config is not valid patcher TOML"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_from_path("/nonexistent/source-patcher.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn falls_back_to_builtin_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) = load_or_default(None, dir.path()).unwrap();
        assert!(source.is_none());
        assert_eq!(config, PatcherConfig::default());
    }

    #[test]
    fn picks_up_config_in_search_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "files = [\"a.ts\"]\n").unwrap();

        let (config, source) = load_or_default(None, dir.path()).unwrap();
        assert_eq!(config.files, vec!["a.ts"]);
        assert_eq!(source, Some(dir.path().join(DEFAULT_CONFIG_FILE)));
    }

    #[test]
    fn rendered_defaults_load_back() {
        let mut config = PatcherConfig::default();
        config.disabled_rules.push(RuleId::EntityEscape);
        let rendered = render_toml(&config);
        let reloaded = load_from_str(&rendered).unwrap();
        assert_eq!(reloaded, config);
    }
}
