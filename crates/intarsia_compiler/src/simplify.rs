//! Cosmetic compaction of the emitted expression.
//!
//! Section emission wraps every body in a `$$$` fragment template. For the
//! trivial bodies that pattern produces a wrapper with nothing to protect;
//! these rewrites drop it. Each one is escaping-neutral: a single-reference
//! guard body interpolates identically with or without the wrapper (the
//! outer template escapes the leaf either way), and the literal-body forms
//! only fire when the body contains none of the characters escaping or
//! template parsing would touch.

use once_cell::sync::Lazy;
use regex::Regex;

// !bool && $$$`${v.name}`  ->  !bool && v.name
static GUARD_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" && \$\$\$`\$\{([^\s`]+)\}`").unwrap());

// !bool && $$$`text`  ->  !bool && `text`
static GUARD_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#" && \$\$\$(`[^`${}<>&"']*`)"#).unwrap());

// .map(w => $$$`text`)  ->  .map(() => `text`)
static MAP_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\(\w => \$\$\$(`[^`${}<>&"']*`)\)"#).unwrap());

/// Apply the rewrites to a compiled expression. Literal template text never
/// matches: its backticks are emitted backslash-escaped, which none of the
/// patterns accept.
pub fn simplify(expr: &str) -> String {
    let expr = GUARD_REF.replace_all(expr, " && $1");
    let expr = GUARD_TEXT.replace_all(&expr, " && $1");
    let expr = MAP_TEXT.replace_all(&expr, "(() => $1)");
    expr.into_owned()
}
