//! `{{key}}` placeholder scanning and substitution.
//!
//! Tokens are matched as whole `{{` + key + `}}` units in a single scan, so a
//! key that is a substring of another key never touches the longer token and
//! the result does not depend on the order of the translation table.

use std::collections::{
    BTreeSet,
    HashMap,
};
use std::sync::LazyLock;

use regex::{
    Captures,
    Regex,
};

use crate::input::translation::TranslationTable;
use crate::types::SourcePosition;

/// Reserved key replaced with the language code being built.
pub const LANG_KEY: &str = "lang";

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("placeholder pattern is valid"));

/// A `{{key}}` token found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub key: String,
    /// Byte offset of the opening `{{`.
    pub offset: usize,
    pub position: SourcePosition,
}

/// Lists every placeholder token in `text`, in order of appearance.
#[must_use]
pub fn find_placeholders(text: &str) -> Vec<Placeholder> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| placeholder_from(text, &caps))
        .collect()
}

/// Builds a [`Placeholder`] from a match of the placeholder pattern.
fn placeholder_from(text: &str, caps: &Captures<'_>) -> Option<Placeholder> {
    let token = caps.get(0)?;
    let key = caps.get(1)?;
    Some(Placeholder {
        key: key.as_str().to_string(),
        offset: token.start(),
        position: SourcePosition::from_offset(text, token.start()),
    })
}

/// Key -> replacement text for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    /// Key -> replacement text.
    values: HashMap<String, String>,
}

impl Dictionary {
    #[must_use]
    pub const fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Builds the dictionary used to render `language`.
    ///
    /// `{{lang}}` always maps to `language`, even if the table has a `lang`
    /// key. Placeholders inside translation values are expanded once against
    /// the same dictionary; the expansion is not repeated, so values that
    /// reference each other cannot loop.
    #[must_use]
    pub fn for_language(table: &TranslationTable, language: &str) -> Self {
        let mut values = table.resolve(language);
        values.insert(LANG_KEY.to_string(), language.to_string());

        let raw = Self::new(values);
        let expanded = raw
            .values
            .iter()
            .map(|(key, value)| (key.clone(), substitute(value, &raw).text))
            .collect();

        Self::new(expanded)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

}

/// A token left inside an inserted translation value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedPlaceholder {
    pub key: String,
    /// Template placeholder whose value contained the token.
    pub host: Placeholder,
}

/// Result of substituting a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    /// Keys that were replaced at least once.
    pub used_keys: BTreeSet<String>,
    /// Tokens left untouched because the dictionary has no value for them.
    pub unresolved: Vec<Placeholder>,
    /// Tokens that inserted values still contain. Values are not scanned
    /// again, so these reach the output verbatim.
    pub unresolved_in_values: Vec<NestedPlaceholder>,
}

/// Replaces every `{{key}}` token that has a dictionary value.
///
/// Tokens without a value stay in the text verbatim and are listed in
/// [`Substitution::unresolved`]. Replacement values are inserted as-is and are
/// not scanned again.
#[must_use]
pub fn substitute(text: &str, dictionary: &Dictionary) -> Substitution {
    let mut used_keys = BTreeSet::new();
    let mut unresolved = Vec::new();
    let mut unresolved_in_values = Vec::new();

    let replaced = PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
        let token = caps.get(0).map_or("", |m| m.as_str());
        let Some(key) = caps.get(1).map(|m| m.as_str()) else {
            return token.to_string();
        };

        if let Some(value) = dictionary.get(key) {
            used_keys.insert(key.to_string());
            let inner = find_placeholders(value);
            if !inner.is_empty()
                && let Some(host) = placeholder_from(text, caps)
            {
                unresolved_in_values.extend(
                    inner
                        .into_iter()
                        .map(|left| NestedPlaceholder { key: left.key, host: host.clone() }),
                );
            }
            value.to_string()
        } else {
            if let Some(placeholder) = placeholder_from(text, caps) {
                unresolved.push(placeholder);
            }
            token.to_string()
        }
    });

    Substitution { text: replaced.into_owned(), used_keys, unresolved, unresolved_in_values }
}
