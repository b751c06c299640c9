//! Template source input definitions.

use std::path::{
    Path,
    PathBuf,
};

use super::error::InputError;

/// HTML template as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    pub path: PathBuf,
    pub text: String,
}

impl TemplateSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self { path: path.into(), text: text.into() }
    }

    /// File name without directories, for messages.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |name| name.to_string_lossy().into_owned())
    }
}

/// Load the HTML template.
///
/// # Errors
/// Returns error if the file is missing, unreadable or not UTF-8.
pub fn load_template_file(file_path: &Path) -> Result<TemplateSource, InputError> {
    let text = std::fs::read_to_string(file_path)
        .map_err(|source| InputError::Read { path: file_path.to_path_buf(), source })?;

    tracing::debug!(path = %file_path.display(), bytes = text.len(), "Loaded template");

    Ok(TemplateSource::new(file_path, text))
}
