pub mod defaults;
pub mod loader;
pub mod schema;

pub use loader::{
    load_from_path, load_from_str, load_or_default, render_toml, ConfigError, DEFAULT_CONFIG_FILE,
};
pub use schema::{PatcherConfig, TargetedFix, ValidationError, ValidationIssue};
