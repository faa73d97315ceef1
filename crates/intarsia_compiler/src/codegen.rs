//! Expression emission.
//!
//! Drives the token stream, dispatches each tag to its handler, and builds
//! the compiled expression in a single output buffer. All state (scope
//! stack, name sets, buffer) is local to the compile call.

use crate::classify::{NameSets, SectionKind};
use crate::errors::CompileError;
use crate::options::CompileOptions;
use crate::path::resolve;
use crate::scope::{ScopeStack, ROOT_KEY};
use crate::simplify::simplify;
use crate::tokenizer::{tokenize, trim_standalone, TagKind};

/// Root identifier of the alternate data context in the emitted code.
const ALT_KEY: &str = "alt";

pub(crate) struct Codegen<'a> {
    options: &'a CompileOptions,
    sets: NameSets,
    scopes: ScopeStack,
    body: String,
    uses_alt: bool,
}

impl<'a> Codegen<'a> {
    pub fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            sets: NameSets::from_options(options),
            scopes: ScopeStack::new(),
            body: String::new(),
            uses_alt: false,
        }
    }

    pub fn compile(mut self, source: &str) -> Result<String, CompileError> {
        let mut parts = tokenize(source);
        if self.options.trim {
            trim_standalone(&mut parts);
        }

        for (idx, part) in parts.iter().enumerate() {
            if idx & 1 == 1 {
                self.tag(part)?;
            } else if !part.is_empty() {
                self.literal(part);
            }
        }

        if let Some(opener) = self.scopes.innermost_opener() {
            return Err(CompileError::MissingClosingTag(opener.into()));
        }

        let params = if self.uses_alt { "(v, alt)" } else { "(v)" };
        let expr = format!("{params} => $$`{}`", self.body);
        Ok(if self.options.simplify {
            simplify(&expr)
        } else {
            expr
        })
    }

    /// Append literal template text, escaping the two sequences that would
    /// change meaning when the expression is parsed as a template literal.
    fn literal(&mut self, text: &str) {
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '`' => self.body.push_str("\\`"),
                '$' if chars.peek() == Some(&'{') => {
                    chars.next();
                    self.body.push_str("\\${");
                }
                _ => self.body.push(c),
            }
        }
    }

    fn tag(&mut self, content: &str) -> Result<(), CompileError> {
        match TagKind::from_content(content) {
            TagKind::Comment => {}
            TagKind::Variable(name) => self.variable(name),
            TagKind::Unescaped(name) => self.unescaped(name),
            TagKind::Partial(name) => self.partial(name),
            TagKind::Inverted(name) => self.inverted(name),
            TagKind::SectionOpen(name) => self.section_open(name),
            TagKind::SectionClose(name) => return self.section_close(name),
        }
        Ok(())
    }

    /// Inference feeds on names resolved against the scope chain; names
    /// routed to the alternate context say nothing about the primary data.
    fn infer_scoped(&mut self, name: &str) {
        if !self.sets.is_alt(name) {
            self.sets.infer(name);
        }
    }

    /// Resolve a name against its root: the alternate context for
    /// alt-listed names, the outermost binding for root-listed ones, the
    /// current scope otherwise. Func-listed names become calls.
    fn resolve_value(&mut self, name: &str, forced: bool) -> String {
        let base = if self.sets.is_alt(name) {
            self.uses_alt = true;
            ALT_KEY.to_string()
        } else if self.sets.is_root(name) {
            ROOT_KEY.to_string()
        } else {
            self.scopes.key().to_string()
        };
        let mut expr = resolve(&base, name, forced);
        if self.sets.is_func(name) {
            expr.push_str("()");
        }
        expr
    }

    /// `{{name}}` — escaped interpolation.
    fn variable(&mut self, name: &str) {
        self.infer_scoped(name);
        let expr = self.resolve_value(name, false);
        self.body.push_str("${");
        self.body.push_str(&expr);
        self.body.push('}');
    }

    /// `{{&name}}` / `{{{name}}}` — unescaped interpolation.
    fn unescaped(&mut self, name: &str) {
        self.infer_scoped(name);
        let expr = self.resolve_value(name, false);
        self.body.push_str("${$$$(");
        self.body.push_str(&expr);
        self.body.push_str(")}");
    }

    /// `{{>name}}` — escaped interpolation against the alternate context.
    fn partial(&mut self, name: &str) {
        self.uses_alt = true;
        let mut expr = resolve(ALT_KEY, name, false);
        if self.sets.is_func(name) {
            expr.push_str("()");
        }
        self.body.push_str("${");
        self.body.push_str(&expr);
        self.body.push('}');
    }

    /// `{{^name}}` — body renders only when the value is falsy. The pushed
    /// scope keeps the parent binding: nothing new is bound.
    fn inverted(&mut self, name: &str) {
        self.infer_scoped(name);
        let guard = self.resolve_value(name, false);
        self.body.push_str("${ !");
        self.body.push_str(&guard);
        self.body.push_str(" && $$$`");
        self.scopes.push(name, "` }", false);
    }

    /// `{{#name}}` — classify, emit the matching open form, push a scope.
    fn section_open(&mut self, name: &str) {
        self.infer_scoped(name);
        match self.sets.classify(name) {
            SectionKind::Boolean => {
                let guard = self.resolve_value(name, false);
                self.body.push_str("${ !!");
                self.body.push_str(&guard);
                self.body.push_str(" && $$$`");
                self.scopes.push(name, "` }", false);
            }
            SectionKind::Array => {
                let value = self.resolve_value(name, false);
                let key = self.scopes.push(name, "`) }", true);
                self.body.push_str("${ ");
                self.body.push_str(&value);
                self.body.push_str("?.map(");
                self.body.push(key);
                self.body.push_str(" => $$$`");
            }
            SectionKind::Object => {
                let guard = self.resolve_value(name, false);
                let value = self.resolve_value(name, true);
                let key = self.scopes.push(name, "`) }", true);
                self.body.push_str(&format!(
                    "${{ !!{guard} && [{value}].map({key} => $$$`"
                ));
            }
            SectionKind::OnDemand => {
                let guard = self.resolve_value(name, false);
                let value = self.resolve_value(name, true);
                let parent = self.scopes.key();
                let key = self.scopes.push(name, "`) }", true);
                self.body.push_str(&format!(
                    "${{ !!{guard} && (Array.isArray({value}) ? {value} : \
                     typeof {value} === \"object\" ? [{value}] : [{parent}])\
                     .map({key} => $$$`"
                ));
            }
        }
    }

    /// `{{/name}}` — pop the scope, verify the name, emit the close.
    fn section_close(&mut self, name: &str) -> Result<(), CompileError> {
        match self.scopes.pop() {
            None => Err(CompileError::UnmatchedClosingTag(name.into())),
            Some(scope) => {
                if scope.opener.as_str() != name {
                    return Err(CompileError::MismatchedClosingTag {
                        expected: scope.opener,
                        found: name.into(),
                    });
                }
                self.body.push_str(scope.closing);
                Ok(())
            }
        }
    }
}
