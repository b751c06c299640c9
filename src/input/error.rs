//! Input error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the build inputs.
#[derive(Error, Debug)]
pub enum InputError {
    /// Error when an input file is missing or unreadable
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Error when the translation file is not valid JSON
    #[error("Failed to parse JSON in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Error when the translation file has no `translations` object at its root
    #[error("'{}' has no top-level \"{root}\" object", path.display())]
    MissingRoot { path: PathBuf, root: &'static str },
}
