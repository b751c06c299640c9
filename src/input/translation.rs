//! Translation file input definitions

use std::collections::{
    BTreeSet,
    HashMap,
};
use std::path::Path;

use serde_json::{
    Map,
    Value,
};

use super::error::InputError;
use crate::ir::translation::TranslationEntry;

/// Key holding the translation tree in the translation file.
pub const TRANSLATIONS_ROOT: &str = "translations";

/// Flattened translation table.
///
/// Every entry is addressed by its full key (`links.shop_url`). Nested
/// entries are also addressed by their leaf name (`shop_url`) as long as no
/// full key has that name and no other nested entry shares it.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    entries: Vec<TranslationEntry>,
    /// Full key -> position in `entries`.
    index: HashMap<String, usize>,
    /// Leaf name -> position in `entries`.
    aliases: HashMap<String, usize>,
}

/// An entry found while walking the tree, with its leaf name when nested.
struct Flattened {
    /// The entry under its full key.
    entry: TranslationEntry,
    /// Last key segment, `None` at the top level.
    leaf: Option<String>,
}

/// Flatten the translation tree into entries keyed by dot-separated paths.
///
/// Members of an object holding a string (or a number/boolean, stringified)
/// are the translations of that object's key, keyed by language code.
/// Members holding an object are nested entries.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use email_template_builder::input::translation::flatten_translations;
///
/// let tree = json!({
///     "greeting": { "cs": "Ahoj", "de": "Hallo" },
///     "links": {
///         "shop_url": { "cs": "https://example.cz" }
///     }
/// });
///
/// let entries = flatten_translations(tree.as_object().unwrap(), ".");
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].key, "greeting");
/// assert_eq!(entries[1].key, "links.shop_url");
/// assert_eq!(entries[1].value("cs"), Some("https://example.cz"));
/// ```
#[must_use]
pub fn flatten_translations(tree: &Map<String, Value>, separator: &str) -> Vec<TranslationEntry> {
    let mut result = Vec::new();
    flatten_object(tree, separator, None, &mut result);
    result.into_iter().map(|flattened| flattened.entry).collect()
}

/// Walks `map`, pushing an entry for every object with language values.
fn flatten_object(
    map: &Map<String, Value>,
    separator: &str,
    prefix: Option<&str>,
    result: &mut Vec<Flattened>,
) {
    for (key, value) in map {
        let full_key = prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));

        let Value::Object(children) = value else {
            if prefix.is_none() {
                tracing::debug!("Skipping '{full_key}': not a language map");
            }
            continue;
        };

        let values: HashMap<String, String> = children
            .iter()
            .filter_map(|(language, text)| {
                leaf_text(text).map(|text| (language.clone(), text))
            })
            .collect();

        if !values.is_empty() {
            result.push(Flattened {
                entry: TranslationEntry { key: full_key.clone(), values },
                leaf: prefix.map(|_| key.clone()),
            });
        }

        flatten_object(children, separator, Some(&full_key), result);
    }
}

/// Text of a language value; `None` for values that are not one.
fn leaf_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl TranslationTable {
    /// Builds the table from a whole translation document.
    ///
    /// Returns `None` when the document has no `translations` object.
    #[must_use]
    pub fn from_document(document: &Value, separator: &str) -> Option<Self> {
        let tree = document.get(TRANSLATIONS_ROOT)?.as_object()?;
        Some(Self::from_tree(tree, separator))
    }

    /// Builds the table from the object under `translations`.
    #[must_use]
    pub fn from_tree(tree: &Map<String, Value>, separator: &str) -> Self {
        let mut flattened = Vec::new();
        flatten_object(tree, separator, None, &mut flattened);

        let mut table = Self::default();
        let mut leaves: HashMap<String, Option<usize>> = HashMap::new();

        for Flattened { entry, leaf } in flattened {
            if table.index.contains_key(&entry.key) {
                tracing::warn!("Duplicate translation key '{}', keeping the first one", entry.key);
                continue;
            }
            let position = table.entries.len();
            if let Some(leaf) = leaf {
                leaves.entry(leaf).and_modify(|slot| *slot = None).or_insert(Some(position));
            }
            table.index.insert(entry.key.clone(), position);
            table.entries.push(entry);
        }

        for (leaf, slot) in leaves {
            if table.index.contains_key(&leaf) {
                continue;
            }
            match slot {
                Some(position) => {
                    table.aliases.insert(leaf, position);
                }
                None => {
                    tracing::warn!(
                        "Nested key name '{leaf}' is used by several groups; \
                         use the full key to reference it"
                    );
                }
            }
        }

        table
    }

    /// Looks up an entry by full key, then by leaf name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TranslationEntry> {
        self.index
            .get(key)
            .or_else(|| self.aliases.get(key))
            .and_then(|&position| self.entries.get(position))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every language code that has at least one value.
    #[must_use]
    pub fn languages(&self) -> BTreeSet<&str> {
        self.entries.iter().flat_map(|entry| entry.values.keys().map(String::as_str)).collect()
    }

    /// Key -> value for `language`, under both full keys and leaf aliases.
    #[must_use]
    pub fn resolve(&self, language: &str) -> HashMap<String, String> {
        let full = self.index.iter();
        let aliased = self.aliases.iter();

        full.chain(aliased)
            .filter_map(|(key, &position)| {
                let value = self.entries.get(position)?.value(language)?;
                Some((key.clone(), value.to_string()))
            })
            .collect()
    }

    /// Full keys with a value for `language` that `used_keys` never names,
    /// neither by full key nor by leaf alias. Sorted.
    #[must_use]
    pub fn unused_keys(&self, language: &str, used_keys: &BTreeSet<String>) -> Vec<&str> {
        let mut referenced = vec![false; self.entries.len()];
        for (key, &position) in self.index.iter().chain(&self.aliases) {
            if used_keys.contains(key)
                && let Some(flag) = referenced.get_mut(position)
            {
                *flag = true;
            }
        }

        let mut keys: Vec<&str> = self
            .entries
            .iter()
            .zip(referenced)
            .filter(|(entry, referenced)| !referenced && entry.value(language).is_some())
            .map(|(entry, _)| entry.key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Full keys whose `language` value is empty or only whitespace, sorted.
    #[must_use]
    pub fn keys_with_empty_value(&self, language: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .iter()
            .filter(|entry| entry.value(language).is_some_and(|value| value.trim().is_empty()))
            .map(|entry| entry.key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Full keys with no value for `language`, sorted.
    #[must_use]
    pub fn keys_missing_language(&self, language: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .iter()
            .filter(|entry| entry.value(language).is_none())
            .map(|entry| entry.key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }
}

/// Load the translation file into a flattened table.
///
/// # Errors
/// Returns error if file read or JSON parse fails, or if the document has no
/// `translations` object.
pub fn load_translation_file(file_path: &Path, separator: &str) -> Result<TranslationTable, InputError> {
    let content = std::fs::read_to_string(file_path)
        .map_err(|source| InputError::Read { path: file_path.to_path_buf(), source })?;

    let json: Value = serde_json::from_str(&content)
        .map_err(|source| InputError::Parse { path: file_path.to_path_buf(), source })?;

    let table = TranslationTable::from_document(&json, separator).ok_or_else(|| {
        InputError::MissingRoot { path: file_path.to_path_buf(), root: TRANSLATIONS_ROOT }
    })?;

    tracing::debug!(
        path = %file_path.display(),
        entries = table.len(),
        "Loaded translation file"
    );

    Ok(table)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn table(document: &Value) -> TranslationTable {
        TranslationTable::from_document(document, ".").unwrap()
    }

    #[googletest::test]
    fn test_flatten_translations_simple() {
        let tree = json!({
            "greeting": { "cs": "Ahoj", "sk": "Ahoj", "de": "Hallo" },
            "payment": { "cs": "Platba" }
        });

        let entries = flatten_translations(tree.as_object().unwrap(), ".");

        expect_that!(entries.len(), eq(2));
        let greeting = entries.iter().find(|e| e.key == "greeting").unwrap();
        expect_that!(greeting.value("de"), some(eq("Hallo")));
        expect_that!(greeting.values.len(), eq(3));
    }

    #[googletest::test]
    fn test_flatten_translations_nested_group() {
        let tree = json!({
            "links": {
                "shop_url": { "cs": "https://shop.cz", "sk": "https://shop.sk" },
                "help": { "footer": { "cs": "Pomoc" } }
            }
        });

        let entries = flatten_translations(tree.as_object().unwrap(), ".");

        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        expect_that!(keys, unordered_elements_are![eq(&"links.shop_url"), eq(&"links.help.footer")]);
    }

    #[googletest::test]
    fn test_flatten_translations_custom_separator() {
        let tree = json!({ "links": { "shop_url": { "cs": "x" } } });

        let entries = flatten_translations(tree.as_object().unwrap(), "__");

        expect_that!(entries.len(), eq(1));
        expect_that!(entries.first().unwrap().key, eq("links__shop_url"));
    }

    #[googletest::test]
    fn test_flatten_translations_non_string_values() {
        let tree = json!({
            "count": { "cs": 42, "sk": true, "de": null, "pl": ["a"] }
        });

        let entries = flatten_translations(tree.as_object().unwrap(), ".");
        let count = entries.first().unwrap();

        expect_that!(count.value("cs"), some(eq("42")));
        expect_that!(count.value("sk"), some(eq("true")));
        expect_that!(count.value("de"), none());
        expect_that!(count.value("pl"), none());
    }

    #[googletest::test]
    fn test_flatten_translations_skips_top_level_scalars() {
        let tree = json!({ "version": 3, "title": "plain", "greeting": { "cs": "Ahoj" } });

        let entries = flatten_translations(tree.as_object().unwrap(), ".");

        expect_that!(entries.len(), eq(1));
    }

    #[googletest::test]
    fn test_from_document_requires_root() {
        expect_that!(TranslationTable::from_document(&json!({"greeting": {}}), ".").is_none(), eq(true));
        expect_that!(TranslationTable::from_document(&json!({"translations": []}), ".").is_none(), eq(true));
        expect_that!(TranslationTable::from_document(&json!({"translations": {}}), ".").is_some(), eq(true));
    }

    #[googletest::test]
    fn test_get_by_full_key_and_leaf_alias() {
        let table = table(&json!({
            "translations": {
                "links": { "shop_url": { "cs": "https://shop.cz" } }
            }
        }));

        expect_that!(table.get("links.shop_url").map(|e| e.key.as_str()), some(eq("links.shop_url")));
        expect_that!(table.get("shop_url").map(|e| e.key.as_str()), some(eq("links.shop_url")));
        expect_that!(table.get("links").is_none(), eq(true));
    }

    #[googletest::test]
    fn test_full_key_shadows_leaf_alias() {
        let table = table(&json!({
            "translations": {
                "shop_url": { "cs": "top" },
                "links": { "shop_url": { "cs": "nested" } }
            }
        }));

        let resolved = table.resolve("cs");

        expect_that!(resolved.get("shop_url"), some(eq(&"top".to_string())));
        expect_that!(resolved.get("links.shop_url"), some(eq(&"nested".to_string())));
    }

    #[googletest::test]
    fn test_ambiguous_leaf_alias_is_dropped() {
        let table = table(&json!({
            "translations": {
                "links": { "url": { "cs": "a" } },
                "images": { "url": { "cs": "b" } }
            }
        }));

        expect_that!(table.get("url").is_none(), eq(true));
        expect_that!(table.get("links.url").is_some(), eq(true));
        expect_that!(table.get("images.url").is_some(), eq(true));
    }

    #[googletest::test]
    fn test_resolve_only_includes_language() {
        let table = table(&json!({
            "translations": {
                "greeting": { "cs": "Ahoj", "de": "Hallo" },
                "payment": { "de": "Zahlung" }
            }
        }));

        let resolved = table.resolve("cs");

        expect_that!(resolved.len(), eq(1));
        expect_that!(resolved.get("greeting"), some(eq(&"Ahoj".to_string())));
        expect_that!(table.keys_missing_language("cs"), elements_are![eq(&"payment")]);
    }

    #[googletest::test]
    fn test_keys_with_empty_value() {
        let table = table(&json!({
            "translations": {
                "greeting": { "cs": "Ahoj", "sk": "" },
                "payment": { "cs": "  ", "sk": "Platba" },
                "links": { "shop_url": { "sk": "\n" } }
            }
        }));

        expect_that!(table.keys_with_empty_value("cs"), elements_are![eq(&"payment")]);
        expect_that!(
            table.keys_with_empty_value("sk"),
            elements_are![eq(&"greeting"), eq(&"links.shop_url")]
        );
        expect_that!(table.keys_with_empty_value("de"), is_empty());
    }

    #[googletest::test]
    fn test_unused_keys() {
        let table = table(&json!({
            "translations": {
                "greeting": { "cs": "Ahoj" },
                "payment": { "cs": "Platba" },
                "shipping": { "de": "Versand" },
                "links": { "shop_url": { "cs": "https://shop.cz" } }
            }
        }));
        let used: BTreeSet<String> = ["greeting".to_string(), "shop_url".to_string()].into();

        let unused = table.unused_keys("cs", &used);

        expect_that!(unused, elements_are![eq(&"payment")]);
    }

    #[googletest::test]
    fn test_languages() {
        let table = table(&json!({
            "translations": {
                "greeting": { "cs": "Ahoj", "de": "Hallo" },
                "links": { "shop_url": { "sk": "https://shop.sk" } }
            }
        }));

        let languages: Vec<&str> = table.languages().into_iter().collect();

        expect_that!(languages, elements_are![eq(&"cs"), eq(&"de"), eq(&"sk")]);
    }

    #[googletest::test]
    fn test_load_translation_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("translations.json");
        fs::write(&path, r#"{"translations": {"greeting": {"cs": "Ahoj"}}}"#).unwrap();

        let table = load_translation_file(&path, ".").unwrap();

        expect_that!(table.len(), eq(1));
        expect_that!(table.get("greeting").and_then(|e| e.value("cs")), some(eq("Ahoj")));
    }

    #[googletest::test]
    fn test_load_translation_file_missing() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_translation_file(&temp_dir.path().join("translations.json"), ".");

        expect_that!(matches!(result, Err(InputError::Read { .. })), eq(true));
    }

    #[googletest::test]
    fn test_load_translation_file_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("translations.json");
        fs::write(&path, r#"{"translations": {"#).unwrap();

        let result = load_translation_file(&path, ".");

        expect_that!(matches!(result, Err(InputError::Parse { .. })), eq(true));
    }

    #[googletest::test]
    fn test_load_translation_file_without_root() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("translations.json");
        fs::write(&path, r#"{"greeting": {"cs": "Ahoj"}}"#).unwrap();

        let error = load_translation_file(&path, ".").unwrap_err();

        expect_that!(error.to_string(), contains_substring("no top-level \"translations\" object"));
    }
}
