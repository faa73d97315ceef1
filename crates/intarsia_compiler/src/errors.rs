//! Compiler errors.

use compact_str::CompactString;
use thiserror::Error;

/// Structural template errors. Each one is fatal to the compile call that
/// raised it; there is no partial output or recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A `{{/name}}` appeared with no section open.
    #[error("closing tag without opener: {0}")]
    UnmatchedClosingTag(CompactString),

    /// A `{{/name}}` did not match the innermost open section.
    #[error("nesting error: {expected} vs. {found}")]
    MismatchedClosingTag {
        expected: CompactString,
        found: CompactString,
    },

    /// Input ended while sections were still open.
    #[error("missing closing tag: {0}")]
    MissingClosingTag(CompactString),
}
