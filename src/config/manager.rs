//! Settings management

use std::path::Path;

use super::{
    BuildSettings,
    ConfigError,
    loader,
};

/// Values given on the command line. `None` / `false` keeps the file value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub languages: Vec<String>,
    pub output_file: Option<String>,
    pub size_limit: Option<usize>,
    pub fail_on_overflow: bool,
}

impl SettingsOverrides {
    fn apply_to(&self, settings: &mut BuildSettings) {
        if !self.languages.is_empty() {
            settings.languages.clone_from(&self.languages);
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file.clone_from(output_file);
        }
        if let Some(size_limit) = self.size_limit {
            settings.size_limit = size_limit;
        }
        if self.fail_on_overflow {
            settings.fail_on_overflow = true;
        }
    }
}

/// Holds the validated settings for a build
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// Settings in effect.
    current_settings: BuildSettings,
}

impl ConfigManager {
    /// Creates a manager holding the default settings
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: BuildSettings::default() }
    }

    /// Loads settings
    ///
    /// Reads `config_path` when given, otherwise
    /// `.template-build.json` in the working directory.
    ///
    /// # Errors
    /// - File read error
    /// - JSON parse error
    /// - Validation error
    pub fn load_settings(
        &mut self,
        workspace_root: &Path,
        config_path: Option<&Path>,
    ) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        let settings = match config_path {
            Some(path) => loader::load_from_file(path)?,
            None => loader::load_from_workspace(workspace_root)?.map_or_else(
                BuildSettings::default,
                |ws| {
                    tracing::debug!("Loaded workspace settings: {:?}", ws);
                    ws
                },
            ),
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// Applies command-line overrides
    ///
    /// # Errors
    /// The merged settings fail validation. The current settings are left unchanged.
    pub fn apply_overrides(&mut self, overrides: &SettingsOverrides) -> Result<(), ConfigError> {
        let mut settings = self.current_settings.clone();
        overrides.apply_to(&mut settings);
        self.update_settings(settings)
    }

    /// Replaces the settings
    ///
    /// # Errors
    /// Validation error
    pub fn update_settings(&mut self, new_settings: BuildSettings) -> Result<(), ConfigError> {
        tracing::debug!("Updating settings...");

        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    /// Current settings
    #[must_use]
    pub const fn get_settings(&self) -> &BuildSettings {
        &self.current_settings
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::loader::CONFIG_FILE_NAME;

    /// new: starts from the defaults
    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings().languages, vec!["cs"]);
    }

    /// load_settings: settings file present
    #[rstest]
    fn test_load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"sizeLimit": 1234}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(temp_dir.path(), None);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().size_limit, 1234);
    }

    /// load_settings: defaults without a settings file
    #[rstest]
    fn test_load_settings_without_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(temp_dir.path(), None);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings(), &BuildSettings::default());
    }

    /// load_settings: an explicit file wins
    #[rstest]
    fn test_load_settings_with_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"languages": ["de"]}"#).unwrap();
        let explicit = temp_dir.path().join("hu.json");
        fs::write(&explicit, r#"{"languages": ["hu"]}"#).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(temp_dir.path(), Some(&explicit));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().languages, vec!["hu"]);
    }

    /// load_settings: invalid settings file is an error
    #[rstest]
    fn test_load_settings_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"languages": []}"#).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(temp_dir.path(), None);

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert_eq!(manager.get_settings(), &BuildSettings::default());
    }

    /// apply_overrides: only given values change
    #[rstest]
    fn test_apply_overrides() {
        let mut manager = ConfigManager::new();
        let overrides = SettingsOverrides {
            languages: vec!["sk".to_string()],
            size_limit: Some(100),
            ..SettingsOverrides::default()
        };

        let result = manager.apply_overrides(&overrides);

        assert!(result.is_ok());
        let settings = manager.get_settings();
        assert_eq!(settings.languages, vec!["sk"]);
        assert_eq!(settings.size_limit, 100);
        assert_eq!(settings.output_file, "order-confirmation-baselinker.html");
        assert!(!settings.fail_on_overflow);
    }

    /// apply_overrides: invalid overrides are rejected and nothing changes
    #[rstest]
    fn test_apply_overrides_invalid() {
        let mut manager = ConfigManager::new();
        let overrides = SettingsOverrides {
            languages: vec!["cs".to_string(), "sk".to_string()],
            ..SettingsOverrides::default()
        };

        let result = manager.apply_overrides(&overrides);

        assert!(result.is_err());
        assert_eq!(manager.get_settings().languages, vec!["cs"]);
    }

    /// update_settings: invalid settings are an error
    #[rstest]
    fn test_update_settings_invalid() {
        let mut manager = ConfigManager::new();
        let new_settings = BuildSettings { key_separator: String::new(), ..BuildSettings::default() };

        let result = manager.update_settings(new_settings);

        assert!(result.is_err());
    }
}
