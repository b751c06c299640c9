//! email-template-builder
//!
//! Builds per-language HTML email templates from a translation JSON file and an HTML template.

pub mod build;
pub mod config;
pub mod diagnostics;
pub mod input;
pub mod ir;
pub mod minify;
pub mod report;
pub mod syntax;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use build::{
    Artifact,
    BuildError,
    BuildOutcome,
    TemplateBuilder,
};
