//! Build error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::input::InputError;
use crate::report::{
    group_thousands,
    to_i64,
};

/// Defines errors that abort a build
#[derive(Error, Debug)]
pub enum BuildError {
    /// Error when the settings are invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Error when an input file cannot be read or parsed
    #[error(transparent)]
    Input(#[from] InputError),
    /// Error when an output file cannot be written
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Error when outputs exceed the limit and overflow is configured as fatal
    #[error(
        "Output exceeds the {} character limit: {}",
        format_limit(.limit),
        .files.join(", ")
    )]
    SizeLimitExceeded { files: Vec<String>, limit: usize },
}

/// Limit with thousands separators.
fn format_limit(limit: &usize) -> String {
    group_thousands(to_i64(*limit))
}
