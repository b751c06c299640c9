//! Settings file loading

use std::path::Path;

use super::{
    BuildSettings,
    ConfigError,
};

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".template-build.json";

/// Loads settings from the working directory
///
/// Looks for `.template-build.json` and reads it
///
/// # Returns
/// - `Ok(Some(settings))`: the file exists and was read
/// - `Ok(None)`: there is no settings file
///
/// # Errors
/// - File read error
/// - JSON parse error
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<BuildSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    load_from_file(&config_path).map(Some)
}

/// Loads settings from an explicit path
///
/// # Errors
/// - The file is missing or unreadable
/// - JSON parse error
pub(super) fn load_from_file(config_path: &Path) -> Result<BuildSettings, ConfigError> {
    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(config_path)?;
    let settings: BuildSettings = serde_json::from_str(&content)?;

    Ok(settings)
}
