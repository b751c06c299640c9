//! Build configuration: settings file, validation and command-line overrides.
mod loader;
mod manager;
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::{
    ConfigManager,
    SettingsOverrides,
};
pub use types::{
    BuildSettings,
    ConfigError,
    DiagnosticsConfig,
    LANG_PATTERN,
    MinifyConfig,
    Severity,
    ValidationError,
    normalize_path,
};
