//! Template syntax: placeholder tokens and their substitution.
pub mod placeholder;

pub use placeholder::{
    Dictionary,
    LANG_KEY,
    NestedPlaceholder,
    Placeholder,
    Substitution,
    find_placeholders,
    substitute,
};
