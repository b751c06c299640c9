//! Test helpers
//!
//! Shared by the unit tests of several modules.
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::fs;

use tempfile::TempDir;

/// Creates a working directory holding a template and a translation file under the default names.
///
/// # Arguments
/// * `template` - contents of `order-confirmation.html`
/// * `translations` - contents of `translations.json`
pub(crate) fn write_workspace(template: &str, translations: &str) -> TempDir {
    let workspace = TempDir::new().unwrap();
    fs::write(workspace.path().join("order-confirmation.html"), template).unwrap();
    fs::write(workspace.path().join("translations.json"), translations).unwrap();
    workspace
}
