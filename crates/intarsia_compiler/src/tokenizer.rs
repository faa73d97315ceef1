//! Mustache tag tokenization.
//!
//! The source is split on the tag pattern into a vector of alternating
//! slots: literal text at even indices, raw tag content at odd indices. The
//! vector always starts and ends with a (possibly empty) literal slot. That
//! shape is load-bearing: the standalone-tag pass rewrites the literal
//! neighbors of each tag slot in place.

use once_cell::sync::Lazy;
use regex::Regex;

/// `{{ ... }}` with a `{ ... }` alternative for the triple-mustache form;
/// the capture is the tag content (inner braces kept for the triple form).
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]*|\{[^{}]*\})\}\}").unwrap());

/// Tags eligible for standalone-line trimming: section opens and closes,
/// inverted sections, comments and partials — never plain variable output.
fn is_standalone_family(tag: &str) -> bool {
    matches!(tag.as_bytes().first(), Some(b'/' | b'!' | b'^' | b'>' | b'#'))
}

/// Split `source` into alternating literal/tag slots.
pub fn tokenize(source: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut last = 0;
    for caps in TAG_RE.captures_iter(source) {
        let whole = caps.get(0).unwrap();
        parts.push(source[last..whole.start()].to_string());
        parts.push(caps[1].to_string());
        last = whole.end();
    }
    parts.push(source[last..].to_string());
    parts
}

/// Standalone-tag whitespace collapse (the `trim` option).
///
/// A tag is standalone when only horizontal whitespace separates it from the
/// previous line break (or start of input, for the first tag) and from the
/// next one (or end of input, for the last tag). The pass strips that
/// whitespace and the trailing line break from the neighboring literal
/// slots. It walks tag slots back to front so stripping the shared literal
/// between two adjacent standalone tags cannot disturb the earlier check.
pub fn trim_standalone(parts: &mut [String]) {
    let len = parts.len();
    if len < 3 {
        return;
    }
    for i in (1..len - 1).rev().step_by(2) {
        let standalone = is_standalone_family(&parts[i])
            && left_is_clear(&parts[i - 1], i == 1)
            && right_is_clear(&parts[i + 1], i == len - 2);
        if standalone {
            strip_left(&mut parts[i - 1]);
            strip_right(&mut parts[i + 1]);
        }
    }
}

fn left_is_clear(left: &str, at_start: bool) -> bool {
    let rest = left.trim_end_matches([' ', '\t']);
    rest.ends_with('\n') || (at_start && rest.is_empty())
}

fn right_is_clear(right: &str, at_end: bool) -> bool {
    let rest = right.trim_start_matches([' ', '\t']);
    rest.starts_with('\n') || rest.starts_with("\r\n") || (at_end && rest.is_empty())
}

fn strip_left(left: &mut String) {
    left.truncate(left.trim_end_matches([' ', '\t']).len());
}

fn strip_right(right: &mut String) {
    let mut rest = right.trim_start_matches([' ', '\t']);
    rest = rest.strip_prefix('\r').unwrap_or(rest);
    rest = rest.strip_prefix('\n').unwrap_or(rest);
    *right = rest.to_string();
}

/// The closed set of tag forms, decided by the first character of the raw
/// tag content. Names are whitespace-trimmed after the sigil is stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind<'a> {
    /// `{{name}}` — escaped interpolation.
    Variable(&'a str),
    /// `{{&name}}` or `{{{name}}}` — unescaped interpolation.
    Unescaped(&'a str),
    /// `{{! ... }}` — emits nothing.
    Comment,
    /// `{{^name}}` — inverted section open.
    Inverted(&'a str),
    /// `{{>name}}` — alternate-context reference.
    Partial(&'a str),
    /// `{{#name}}` — section open.
    SectionOpen(&'a str),
    /// `{{/name}}` — section close.
    SectionClose(&'a str),
}

impl<'a> TagKind<'a> {
    pub fn from_content(content: &'a str) -> Self {
        match content.as_bytes().first() {
            Some(b'&') => TagKind::Unescaped(content[1..].trim()),
            Some(b'{') => {
                // Triple mustache arrives as `{name}`; drop the wrapping pair.
                let inner = &content[1..];
                TagKind::Unescaped(inner.strip_suffix('}').unwrap_or(inner).trim())
            }
            Some(b'!') => TagKind::Comment,
            Some(b'^') => TagKind::Inverted(content[1..].trim()),
            Some(b'>') => TagKind::Partial(content[1..].trim()),
            Some(b'#') => TagKind::SectionOpen(content[1..].trim()),
            Some(b'/') => TagKind::SectionClose(content[1..].trim()),
            _ => TagKind::Variable(content.trim()),
        }
    }
}
