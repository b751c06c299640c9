//! Build orchestration: load inputs, render every language, write outputs.
//!
//! All languages are rendered in memory before the first file is written, so
//! an input error never leaves partial output behind.

mod error;

use std::path::{
    Path,
    PathBuf,
};

pub use error::BuildError;

use crate::config::{
    BuildSettings,
    ConfigError,
    ValidationError,
    normalize_path,
};
use crate::diagnostics::{
    Diagnostic,
    DiagnosticInput,
    generate_diagnostics,
};
use crate::input::template::{
    TemplateSource,
    load_template_file,
};
use crate::input::translation::{
    TranslationTable,
    load_translation_file,
};
use crate::minify::{
    comment_spans,
    minify,
};
use crate::report::to_i64;
use crate::syntax::{
    Dictionary,
    NestedPlaceholder,
    Placeholder,
    substitute,
};

/// One rendered output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub language: String,
    pub output_path: PathBuf,
    pub html: String,
    /// Length in characters, as the template editor counts it.
    pub size: usize,
    pub size_limit: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl Artifact {
    #[must_use]
    pub fn new(
        language: impl Into<String>,
        output_path: impl Into<PathBuf>,
        html: impl Into<String>,
        size_limit: usize,
    ) -> Self {
        let html = html.into();
        Self {
            language: language.into(),
            output_path: output_path.into(),
            size: html.chars().count(),
            html,
            size_limit,
            diagnostics: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Output file name without directories.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.output_path.file_name().map_or_else(
            || self.output_path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }

    /// Characters left under the limit; negative once it is exceeded.
    #[must_use]
    pub fn remaining(&self) -> i64 {
        to_i64(self.size_limit) - to_i64(self.size)
    }

    #[must_use]
    pub const fn exceeds_limit(&self) -> bool {
        self.size > self.size_limit
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub artifacts: Vec<Artifact>,
}

impl BuildOutcome {
    /// Fails when any artifact is over its limit.
    ///
    /// # Errors
    /// [`BuildError::SizeLimitExceeded`] naming every oversized output.
    pub fn check_limits(&self) -> Result<(), BuildError> {
        let oversized: Vec<&Artifact> =
            self.artifacts.iter().filter(|artifact| artifact.exceeds_limit()).collect();

        let Some(first) = oversized.first() else {
            return Ok(());
        };

        Err(BuildError::SizeLimitExceeded {
            files: oversized.iter().map(|artifact| artifact.file_name()).collect(),
            limit: first.size_limit,
        })
    }
}

/// Renders the configured template for every configured language.
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    /// Directory the file names in `settings` are relative to.
    workspace_root: PathBuf,
    /// Validated before every build.
    settings: BuildSettings,
}

impl TemplateBuilder {
    #[must_use]
    pub fn new(workspace_root: impl Into<PathBuf>, settings: BuildSettings) -> Self {
        Self { workspace_root: workspace_root.into(), settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// Renders every language and writes the outputs.
    ///
    /// # Errors
    /// - Settings are invalid
    /// - An input file is missing, unreadable or malformed (nothing is written)
    /// - An output file cannot be written
    pub fn build(&self) -> Result<BuildOutcome, BuildError> {
        let artifacts = self.render_all()?;

        for artifact in &artifacts {
            write_artifact(artifact)?;
        }

        Ok(BuildOutcome { artifacts })
    }

    /// Loads the inputs and renders every language without writing anything.
    ///
    /// # Errors
    /// - Settings are invalid
    /// - An input file is missing, unreadable or malformed
    pub fn render_all(&self) -> Result<Vec<Artifact>, BuildError> {
        self.settings.validate().map_err(ConfigError::ValidationErrors)?;
        self.check_outputs_spare_inputs()?;

        let table = load_translation_file(
            &self.workspace_root.join(&self.settings.translations_file),
            &self.settings.key_separator,
        )?;
        let template = load_template_file(&self.workspace_root.join(&self.settings.template_file))?;

        let artifacts: Vec<Artifact> = self
            .settings
            .languages
            .iter()
            .map(|language| self.render(&template, &table, language))
            .collect();

        for artifact in &artifacts {
            for diagnostic in &artifact.diagnostics {
                diagnostic.log(&artifact.language);
            }
        }

        Ok(artifacts)
    }

    /// Renders `template` for one language.
    #[must_use]
    pub fn render(
        &self,
        template: &TemplateSource,
        table: &TranslationTable,
        language: &str,
    ) -> Artifact {
        tracing::debug!(language, template = %template.file_name(), "Rendering template");

        let dictionary = Dictionary::for_language(table, language);
        let substitution = substitute(&template.text, &dictionary);
        let html = minify(&substitution.text, self.settings.minify);

        // Tokens inside comments that minification removes never reach the output.
        let stripped =
            if self.settings.minify.strip_comments { comment_spans(&template.text) } else { Vec::new() };
        let visible = |token: &Placeholder| !stripped.iter().any(|span| span.contains(&token.offset));
        let unresolved: Vec<Placeholder> =
            substitution.unresolved.iter().filter(|&token| visible(token)).cloned().collect();
        let unresolved_in_values: Vec<NestedPlaceholder> = substitution
            .unresolved_in_values
            .iter()
            .filter(|nested| visible(&nested.host))
            .cloned()
            .collect();

        let diagnostics = generate_diagnostics(
            &DiagnosticInput {
                language,
                table,
                output: &html,
                size_limit: self.settings.size_limit,
                unresolved: &unresolved,
                unresolved_in_values: &unresolved_in_values,
                used_keys: &substitution.used_keys,
            },
            self.settings.diagnostics,
        );

        Artifact::new(language, self.output_path(language), html, self.settings.size_limit)
            .with_diagnostics(diagnostics)
    }

    /// Where the output for `language` is written.
    #[must_use]
    pub fn output_path(&self, language: &str) -> PathBuf {
        self.workspace_root.join(self.settings.output_file_for(language))
    }

    /// Rejects outputs that resolve to the template or the translations file.
    ///
    /// Settings validation compares file names only; this also catches
    /// symlinks and other spellings of an existing file.
    fn check_outputs_spare_inputs(&self) -> Result<(), BuildError> {
        let inputs = [
            (&self.settings.template_file, "template"),
            (&self.settings.translations_file, "translations file"),
        ];

        for language in &self.settings.languages {
            let output = self.output_path(language);
            for (input, role) in inputs {
                if same_file(&output, &self.workspace_root.join(input)) {
                    return Err(ConfigError::ValidationErrors(vec![ValidationError::new(
                        "outputFile",
                        format!("The output '{}' would overwrite the {role} '{input}'", output.display()),
                    )])
                    .into());
                }
            }
        }

        Ok(())
    }
}

/// Compares canonical paths when both files exist, normalized paths otherwise.
fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => normalize_path(a) == normalize_path(b),
    }
}

/// Writes one artifact, replacing any previous file.
fn write_artifact(artifact: &Artifact) -> Result<(), BuildError> {
    std::fs::write(&artifact.output_path, &artifact.html)
        .map_err(|source| BuildError::Write { path: artifact.output_path.clone(), source })?;

    tracing::info!(
        path = %artifact.output_path.display(),
        language = %artifact.language,
        size = artifact.size,
        "Wrote template"
    );

    Ok(())
}
