//! Conformance harness for compiled Intarsia expressions.
//!
//! The compiler's output contract is "a JavaScript expression that renders
//! correctly once the runtime pair is in scope". This crate makes that
//! contract testable from Rust: it parses the exact expression subset the
//! compiler emits (template literals, tagged `$$`/`$$$` forms, optional
//! chaining, `.map`, `!`/`&&`/ternary/`typeof`/`===`, array literals and
//! `Array.isArray`) and evaluates it with JavaScript truthiness and
//! string-conversion semantics, binding `$$`/`$$$` to `intarsia_runtime`
//! and taking data contexts as [`serde_json::Value`].
//!
//! This is test tooling, not a general JavaScript engine: anything outside
//! the emitted subset is a parse error by design.

mod expr;

use intarsia_compiler::CompileOptions;
use serde_json::Value as Json;

pub use eval::JsValue;

/// Harness failures: the expression did not parse, or evaluation stepped
/// outside the modeled semantics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HarnessError {
    #[error("parse error at byte {at}: {msg}")]
    Parse { at: usize, msg: String },
    #[error("evaluation error: {0}")]
    Eval(String),
}

/// Evaluate a compiled expression against a primary context.
pub fn render(expr: &str, ctx: &Json) -> Result<String, HarnessError> {
    render_with_alt(expr, ctx, &Json::Null)
}

/// Evaluate a compiled expression against primary and alternate contexts.
pub fn render_with_alt(expr: &str, ctx: &Json, alt: &Json) -> Result<String, HarnessError> {
    let ast = expr::parse(expr)?;
    eval::render_function(&ast, ctx, alt)
}

/// Compile a template with default options and render it.
///
/// Panics on compile or render failure, quoting the compiled expression —
/// this is a test helper, and the expression is what you debug.
pub fn run(template: &str, ctx: &Json) -> String {
    run_with(template, &CompileOptions::default(), ctx)
}

/// Compile a template with options and render it.
pub fn run_with(template: &str, options: &CompileOptions, ctx: &Json) -> String {
    run_with_alt(template, options, ctx, &Json::Null)
}

/// Compile a template with options and render it with an alternate context.
pub fn run_with_alt(template: &str, options: &CompileOptions, ctx: &Json, alt: &Json) -> String {
    let expr = intarsia_compiler::compile_with_options(template, options)
        .unwrap_or_else(|err| panic!("compile failed: {err}\ntemplate: {template}"));
    render_with_alt(&expr, ctx, alt)
        .unwrap_or_else(|err| panic!("render failed: {err}\nexpression: {expr}"))
}
