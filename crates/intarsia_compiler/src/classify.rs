//! Section classification and name sets.

use crate::options::CompileOptions;
use crate::path::{is_index, normalize};
use compact_str::CompactString;
use rustc_hash::FxHashSet;

/// How a section tag compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Truthiness guard; body rendered once, no rebinding.
    Boolean,
    /// Map over the resolved value, one body render per element.
    Array,
    /// Truthiness guard, then render once with the value itself bound.
    Object,
    /// Runtime array/object/scalar trichotomy — vanilla Mustache semantics.
    OnDemand,
}

/// Method-like name suffixes `guess` promotes to zero-argument calls.
static METHOD_SUFFIXES: phf::Set<&'static str> =
    phf::phf_set! { "toString", "toLocaleString", "toJSON", "valueOf" };

/// Classification sets, seeded from the option lists and optionally grown
/// by inference during the compile pass. Membership matches the full dotted
/// path or its bare last segment. Explicit entries are never removed or
/// overridden; classification priority is fixed regardless of how an entry
/// got in.
#[derive(Debug, Default)]
pub struct NameSets {
    boolean: FxHashSet<CompactString>,
    array: FxHashSet<CompactString>,
    object: FxHashSet<CompactString>,
    func: FxHashSet<CompactString>,
    alt: FxHashSet<CompactString>,
    root: FxHashSet<CompactString>,
    guess: bool,
}

impl NameSets {
    pub fn from_options(options: &CompileOptions) -> Self {
        Self {
            boolean: parse_list(&options.boolean),
            array: parse_list(&options.array),
            object: parse_list(&options.object),
            func: parse_list(&options.func),
            alt: parse_list(&options.alt),
            root: parse_list(&options.root),
            guess: options.guess,
        }
    }

    /// Classify a section name: boolean wins over array wins over object;
    /// unclassified names take the on-demand form.
    pub fn classify(&self, name: &str) -> SectionKind {
        let name = normalize(name);
        if contains(&self.boolean, name) {
            SectionKind::Boolean
        } else if contains(&self.array, name) {
            SectionKind::Array
        } else if contains(&self.object, name) {
            SectionKind::Object
        } else {
            SectionKind::OnDemand
        }
    }

    pub fn is_func(&self, name: &str) -> bool {
        contains(&self.func, normalize(name))
    }

    pub fn is_alt(&self, name: &str) -> bool {
        contains(&self.alt, normalize(name))
    }

    pub fn is_root(&self, name: &str) -> bool {
        contains(&self.root, normalize(name))
    }

    /// Structural inference (the `guess` option): grow the sets from a path
    /// about to be resolved against the scope chain. Runs before the tag
    /// that referenced the path is classified, and only ever adds entries.
    pub fn infer(&mut self, name: &str) {
        if !self.guess {
            return;
        }
        let name = normalize(name);
        if name == "." {
            return;
        }
        let segs: Vec<&str> = name.split('.').collect();
        let last = segs[segs.len() - 1];
        // `x.length` guards an array: the guard path is boolean, its parent
        // is the array.
        if segs.len() > 1 && last == "length" {
            self.boolean.insert(name.into());
            self.array.insert(segs[..segs.len() - 1].join(".").into());
        }
        if METHOD_SUFFIXES.contains(last) {
            self.func.insert(name.into());
        }
        // Every dotted prefix names an object, except around numeric
        // segments — those are array indexing, not object nesting.
        for k in 1..segs.len() {
            if is_index(segs[k]) || is_index(segs[k - 1]) {
                continue;
            }
            self.object.insert(segs[..k].join(".").into());
        }
    }
}

fn parse_list(list: &str) -> FxHashSet<CompactString> {
    list.split([',', ' ', '\t', '\r', '\n'])
        .filter(|s| !s.is_empty())
        .map(CompactString::from)
        .collect()
}

fn contains(set: &FxHashSet<CompactString>, name: &str) -> bool {
    if set.is_empty() {
        return false;
    }
    if set.contains(name) {
        return true;
    }
    match name.rsplit_once('.') {
        Some((_, last)) => set.contains(last),
        None => false,
    }
}
