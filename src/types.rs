//! Core types used throughout the project.

use std::fmt;

/// A position in source text (0-indexed).
///
/// `character` counts Unicode scalar values from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourcePosition {
    pub line: u32,
    pub character: u32,
}

impl SourcePosition {
    /// Computes the position of a byte offset inside `text`.
    ///
    /// Offsets past the end of `text` are clamped to its end. Offsets that
    /// fall inside a multi-byte character are rounded down to its start.
    #[must_use]
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = text.get(..offset).unwrap_or_default();

        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let line = before.matches('\n').count();
        let character = before.get(line_start..).map_or(0, |s| s.chars().count());

        Self { line: saturate(line), character: saturate(character) }
    }
}

/// Displayed 1-based, as editors and compilers do.
impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", u64::from(self.line) + 1, u64::from(self.character) + 1)
    }
}

/// Converts to `u32`, clamping at `u32::MAX`.
fn saturate(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
