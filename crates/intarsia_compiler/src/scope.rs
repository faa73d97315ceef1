//! Section scope stack.
//!
//! Entering a section pushes a scope; the closing tag pops it. The stack
//! length therefore equals the section nesting depth at every point of the
//! token stream, with the root represented by the empty stack. State lives
//! inside one compile call and is discarded with it.

use compact_str::CompactString;
use smallvec::SmallVec;

/// Binding of the outermost context.
pub const ROOT_KEY: char = 'v';

/// One open section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Name the section was opened with; the closing tag must repeat it.
    pub opener: CompactString,
    /// Text emitted when the section closes.
    pub closing: &'static str,
    /// Binding the section body resolves names against.
    pub key: char,
    /// Number of element-binding sections enclosing this point.
    pub letter_depth: u32,
}

/// Stack of open sections.
///
/// Sections that bind a loop element advance the binding letter; boolean
/// and inverted sections push a scope that keeps the parent's binding so
/// nested lookups still resolve, without consuming a letter.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: SmallVec<[Scope; 8]>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binding of the current scope.
    pub fn key(&self) -> char {
        self.scopes.last().map_or(ROOT_KEY, |s| s.key)
    }

    fn letter_depth(&self) -> u32 {
        self.scopes.last().map_or(0, |s| s.letter_depth)
    }

    /// Open a section; returns the binding its body resolves against.
    /// `rebind` advances the binding letter (array, object and on-demand
    /// sections); guard sections keep the parent binding.
    pub fn push(&mut self, opener: &str, closing: &'static str, rebind: bool) -> char {
        let letter_depth = self.letter_depth() + u32::from(rebind);
        let key = if rebind {
            binding_key(letter_depth)
        } else {
            self.key()
        };
        self.scopes.push(Scope {
            opener: opener.into(),
            closing,
            key,
            letter_depth,
        });
        key
    }

    pub fn pop(&mut self) -> Option<Scope> {
        self.scopes.pop()
    }

    pub fn is_root(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Opener of the innermost still-open section.
    pub fn innermost_opener(&self) -> Option<&str> {
        self.scopes.last().map(|s| s.opener.as_str())
    }
}

/// Binding letter for an element depth: `v` at the root, then `w x y z`,
/// wrapping to `a b c …` and cycling modulo 26.
pub fn binding_key(letter_depth: u32) -> char {
    char::from_digit((letter_depth + 21) % 26 + 10, 36).unwrap()
}
