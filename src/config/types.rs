//! Settings types and validation

use std::collections::HashSet;
use std::path::{
    Component,
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Placeholder inside `outputFile` expanded to the language code.
pub const LANG_PATTERN: &str = "{lang}";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "languages[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered list of validation errors
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildSettings {
    /// HTML source, relative to the working directory.
    pub template_file: String,
    pub translations_file: String,
    /// Output file name. May contain `{lang}`; required when building more
    /// than one language.
    pub output_file: String,

    /// Languages to build, one output per language.
    pub languages: Vec<String>,

    /// Joins nested translation keys (`links` + `shop_url` -> `links.shop_url`).
    pub key_separator: String,

    /// Character limit of the template editor the output is pasted into.
    pub size_limit: usize,
    /// Exit non-zero when an output exceeds `size_limit`.
    /// Outputs are written and reported either way.
    pub fail_on_overflow: bool,

    pub minify: MinifyConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MinifyConfig {
    /// Conditional comments (`<!--[if mso]>` ...) are always kept.
    pub strip_comments: bool,
    pub collapse_whitespace: bool,
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self { strip_comments: true, collapse_whitespace: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticsConfig {
    pub unresolved_placeholders: bool,
    /// Keys with a value for the language that the template never references.
    /// Off by default: one translation file usually serves several templates.
    pub unused_keys: bool,
    /// Keys with no value for the language being built.
    pub missing_translations: bool,
    /// Required document elements and Outlook (MSO) markup.
    pub html_structure: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            unresolved_placeholders: true,
            unused_keys: false,
            missing_translations: true,
            html_structure: true,
        }
    }
}

/// Severity of a reported finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl BuildSettings {
    /// Output file name for `language`.
    #[must_use]
    pub fn output_file_for(&self, language: &str) -> String {
        self.output_file.replace(LANG_PATTERN, language)
    }

    /// # Errors
    /// - Required field is empty
    /// - Duplicate or empty language
    /// - Output file would collide between languages or overwrite the template
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("templateFile", &self.template_file),
            ("translationsFile", &self.translations_file),
            ("outputFile", &self.output_file),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(field, "The file name cannot be empty"));
            }
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.languages.is_empty() {
            errors.push(ValidationError::new(
                "languages",
                "At least one language is required. Example: [\"cs\"]",
            ));
        }

        let mut seen = HashSet::new();
        for (index, language) in self.languages.iter().enumerate() {
            if language.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("languages[{index}]"),
                    "The language code cannot be empty",
                ));
            } else if !seen.insert(language.as_str()) {
                errors.push(ValidationError::new(
                    format!("languages[{index}]"),
                    format!("Duplicate language '{language}'"),
                ));
            }
        }

        if self.size_limit == 0 {
            errors.push(ValidationError::new("sizeLimit", "The limit must be greater than zero"));
        }

        if self.languages.len() > 1 && !self.output_file.contains(LANG_PATTERN) {
            errors.push(ValidationError::new(
                "outputFile",
                format!(
                    "Building several languages requires '{LANG_PATTERN}' in the file name. \
                     Example: \"order-confirmation-baselinker-{LANG_PATTERN}.html\""
                ),
            ));
        }

        for (input, role) in [
            (&self.template_file, "template"),
            (&self.translations_file, "translations file"),
        ] {
            if !input.trim().is_empty() && self.writes_to(input) {
                errors.push(ValidationError::new(
                    "outputFile",
                    format!("The output would overwrite the {role} '{input}'"),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Whether the output of any language names `file` once both are normalized.
    fn writes_to(&self, file: &str) -> bool {
        let file = normalize_path(Path::new(file));
        self.languages
            .iter()
            .any(|lang| normalize_path(Path::new(&self.output_file_for(lang))) == file)
    }
}

/// Lexically normalizes `path`: `.` segments are dropped and `..` removes the
/// preceding segment. The file system is not consulted.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                } else {
                    normalized.push(component.as_os_str());
                }
            }
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                normalized.push(component.as_os_str());
            }
        }
    }
    normalized
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            template_file: "order-confirmation.html".to_string(),
            translations_file: "translations.json".to_string(),
            output_file: "order-confirmation-baselinker.html".to_string(),
            languages: vec!["cs".to_string()],
            key_separator: ".".to_string(),
            size_limit: 25_000,
            fail_on_overflow: false,
            minify: MinifyConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}
