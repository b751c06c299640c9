//! Build inputs: the translation file and the HTML template.
mod error;
pub mod template;
pub mod translation;

pub use error::InputError;
