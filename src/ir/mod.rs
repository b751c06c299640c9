//! Intermediate representations shared between input loading and rendering.
pub mod translation;
