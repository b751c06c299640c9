//! Diagnostics for rendered templates.
//!
//! Checks a rendered template before it is pasted into the template editor.
//! Findings never change the output.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{
    DiagnosticsConfig,
    Severity,
};
use crate::input::translation::TranslationTable;
use crate::report::{
    group_thousands,
    to_i64,
};
use crate::syntax::{
    NestedPlaceholder,
    Placeholder,
};
use crate::types::SourcePosition;

/// Elements every email client expects, by display name.
#[allow(clippy::expect_used)]
static REQUIRED_ELEMENTS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("DOCTYPE", r"(?i)<!DOCTYPE\s+html"),
        ("html tag with lang", r"(?i)<html[^>]+lang="),
        ("charset meta", r"(?i)<meta[^>]+charset"),
        ("viewport meta", r"(?i)<meta[^>]+viewport"),
        ("title tag", r"(?i)<title>[^<]+</title>"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).expect("element pattern is valid")))
    .collect()
});

/// Markup Outlook needs to render the template, by display name.
#[allow(clippy::expect_used)]
static MSO_ELEMENTS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("MSO conditional comment", r"(?i)<!--\[if\s+mso"),
        ("Office namespace (xmlns:o)", r"(?i)xmlns:o="),
        ("VML namespace (xmlns:v)", r"(?i)xmlns:v="),
        ("OfficeDocumentSettings", r"(?i)o:OfficeDocumentSettings"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).expect("element pattern is valid")))
    .collect()
});

/// `src` attributes loading over plain HTTP.
#[allow(clippy::expect_used)]
static INSECURE_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)src=["'](http://[^"']+)["']"#).expect("image pattern is valid")
});

/// Opener of a conditional comment.
#[allow(clippy::expect_used)]
static CONDITIONAL_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!--\[if\b").expect("conditional pattern is valid"));

/// Closer of a conditional comment.
#[allow(clippy::expect_used)]
static CONDITIONAL_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!\[endif\]").expect("conditional pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Position in the source template, when the finding maps to one.
    pub position: Option<SourcePosition>,
}

impl Diagnostic {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { severity: Severity::Error, message: message.into(), position: None }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, message: message.into(), position: None }
    }

    #[must_use]
    pub const fn at(mut self, position: SourcePosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Emits the diagnostic through `tracing`.
    pub fn log(&self, language: &str) {
        match self.severity {
            Severity::Error => tracing::error!(language, "{self}"),
            Severity::Warning => tracing::warn!(language, "{self}"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(f, "{position}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Everything the checks look at for one language.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticInput<'a> {
    pub language: &'a str,
    pub table: &'a TranslationTable,
    /// Minified output.
    pub output: &'a str,
    pub size_limit: usize,
    /// Template tokens without a value, outside stripped comments.
    pub unresolved: &'a [Placeholder],
    /// Tokens left inside inserted values, outside stripped comments.
    pub unresolved_in_values: &'a [NestedPlaceholder],
    pub used_keys: &'a BTreeSet<String>,
}

/// Runs every check enabled in `config`.
#[must_use]
pub fn generate_diagnostics(input: &DiagnosticInput<'_>, config: DiagnosticsConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    diagnostics.extend(check_size(input.output, input.size_limit));
    diagnostics.extend(check_language_known(input.table, input.language));
    diagnostics.extend(check_empty_values(input.table, input.language));

    if config.missing_translations {
        diagnostics.extend(check_missing_translations(input.table, input.language));
    }
    if config.unresolved_placeholders {
        diagnostics.extend(check_unresolved(input.unresolved, input.language));
        diagnostics.extend(check_unresolved_in_values(input.unresolved_in_values, input.language));
    }
    if config.unused_keys {
        diagnostics.extend(check_unused_keys(input.table, input.language, input.used_keys));
    }

    diagnostics.extend(check_conditional_comments(input.output));
    if config.html_structure {
        diagnostics.extend(check_required_elements(input.output));
        diagnostics.extend(check_mso_elements(input.output));
    }
    diagnostics.extend(check_image_sources(input.output));

    diagnostics
}

/// Character count of `output` against `limit`.
#[must_use]
pub fn check_size(output: &str, limit: usize) -> Option<Diagnostic> {
    let size = output.chars().count();
    (size > limit).then(|| {
        Diagnostic::error(format!(
            "Output is {} characters, {} over the {} character limit",
            group_thousands(to_i64(size)),
            group_thousands(to_i64(size - limit)),
            group_thousands(to_i64(limit)),
        ))
    })
}

#[must_use]
pub fn check_language_known(table: &TranslationTable, language: &str) -> Option<Diagnostic> {
    (!table.is_empty() && !table.languages().contains(language)).then(|| {
        Diagnostic::warning(format!("No translation has a value for language '{language}'"))
    })
}

#[must_use]
pub fn check_unresolved(unresolved: &[Placeholder], language: &str) -> Vec<Diagnostic> {
    unresolved
        .iter()
        .map(|placeholder| {
            Diagnostic::warning(format!(
                "Placeholder '{{{{{}}}}}' has no '{language}' translation and was left as is",
                placeholder.key
            ))
            .at(placeholder.position)
        })
        .collect()
}

/// Tokens an inserted value still contains, positioned at the template token
/// that inserted the value.
#[must_use]
pub fn check_unresolved_in_values(nested: &[NestedPlaceholder], language: &str) -> Vec<Diagnostic> {
    nested
        .iter()
        .map(|placeholder| {
            Diagnostic::warning(format!(
                "Placeholder '{{{{{}}}}}' inside the '{}' translation has no '{language}' value and was left as is",
                placeholder.key, placeholder.host.key
            ))
            .at(placeholder.host.position)
        })
        .collect()
}

#[must_use]
pub fn check_empty_values(table: &TranslationTable, language: &str) -> Vec<Diagnostic> {
    table
        .keys_with_empty_value(language)
        .into_iter()
        .map(|key| Diagnostic::warning(format!("Translation key '{key}' has an empty '{language}' value")))
        .collect()
}

/// Skipped when no key has the language at all; [`check_language_known`]
/// reports that case once.
#[must_use]
pub fn check_missing_translations(table: &TranslationTable, language: &str) -> Vec<Diagnostic> {
    if !table.languages().contains(language) {
        return Vec::new();
    }
    table
        .keys_missing_language(language)
        .into_iter()
        .map(|key| Diagnostic::warning(format!("Translation key '{key}' has no '{language}' value")))
        .collect()
}

#[must_use]
pub fn check_unused_keys(
    table: &TranslationTable,
    language: &str,
    used_keys: &BTreeSet<String>,
) -> Vec<Diagnostic> {
    table
        .unused_keys(language, used_keys)
        .into_iter()
        .map(|key| Diagnostic::warning(format!("Translation key '{key}' is not used by the template")))
        .collect()
}

/// `<!--[if ...]>` openers against `<![endif]` closers.
#[must_use]
pub fn check_conditional_comments(html: &str) -> Option<Diagnostic> {
    let opened = CONDITIONAL_OPEN.find_iter(html).count();
    let closed = CONDITIONAL_CLOSE.find_iter(html).count();

    (opened != closed).then(|| {
        Diagnostic::warning(format!(
            "Unbalanced conditional comments: {opened} '<!--[if' opener(s), {closed} '<![endif]' closer(s)"
        ))
    })
}

#[must_use]
pub fn check_required_elements(html: &str) -> Vec<Diagnostic> {
    REQUIRED_ELEMENTS
        .iter()
        .filter(|(_, pattern)| !pattern.is_match(html))
        .map(|(name, _)| Diagnostic::warning(format!("Missing required element: {name}")))
        .collect()
}

#[must_use]
pub fn check_mso_elements(html: &str) -> Vec<Diagnostic> {
    MSO_ELEMENTS
        .iter()
        .filter(|(_, pattern)| !pattern.is_match(html))
        .map(|(name, _)| Diagnostic::warning(format!("Missing Outlook element: {name}")))
        .collect()
}

#[must_use]
pub fn check_image_sources(html: &str) -> Vec<Diagnostic> {
    INSECURE_IMAGE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|src| Diagnostic::warning(format!("Image uses HTTP instead of HTTPS: {}", src.as_str())))
        .collect()
}
