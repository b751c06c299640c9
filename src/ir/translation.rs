//! Intermediate representation of translations

use std::collections::HashMap;

/// One flattened translation key with its value per language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    /// Full key, nested segments joined by the key separator.
    pub key: String,

    /// Language code -> translated text.
    pub values: HashMap<String, String>,
}

impl TranslationEntry {
    #[must_use]
    pub fn value(&self, language: &str) -> Option<&str> {
        self.values.get(language).map(String::as_str)
    }
}
