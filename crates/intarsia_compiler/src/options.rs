//! Compiler options.

use serde::{Deserialize, Serialize};

/// Options for a single compile call.
///
/// The six name lists are comma- or whitespace-separated; each entry matches
/// a full dotted path (`foo.bar`) or a bare last segment (`bar`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Strip the surrounding horizontal whitespace and trailing line break
    /// of section/comment/partial tags that sit alone on their line.
    pub trim: bool,

    /// Grow the classification sets structurally from the tags seen so far
    /// (`.length` guards, method-like suffixes, dotted prefixes).
    pub guess: bool,

    /// Names compiled as boolean guard sections.
    pub boolean: String,

    /// Names compiled as array map sections.
    pub array: String,

    /// Names compiled as object guard-and-wrap sections.
    pub object: String,

    /// Names resolved as zero-argument calls.
    pub func: String,

    /// Names resolved against the alternate data root.
    pub alt: String,

    /// Names resolved against the outermost context regardless of nesting.
    pub root: String,

    /// Collapse trivial fragment wrappers in the emitted expression. Purely
    /// cosmetic; rendering behavior is identical either way.
    pub simplify: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            trim: false,
            guess: false,
            boolean: String::new(),
            array: String::new(),
            object: String::new(),
            func: String::new(),
            alt: String::new(),
            root: String::new(),
            simplify: true,
        }
    }
}
