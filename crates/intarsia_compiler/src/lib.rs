//! Mustache to template-literal compiler.
//!
//! Compiles a Mustache template into a single JavaScript arrow-function
//! expression whose body is a template literal, interpolating through the
//! two runtime entry points: `$$` (escaping) and `$$$` (trusted fragments).
//! Those two names are the only free variables the generated code
//! references — they are the wire format between this compiler and the
//! runtime, wherever the expression is eventually evaluated.
//!
//! ```
//! use intarsia_compiler::compile;
//!
//! let expr = compile("<b>{{ name }}</b>").unwrap();
//! assert_eq!(expr, "(v) => $$`<b>${v.name}</b>`");
//! ```
//!
//! Sections compile to guarded or mapped fragment templates depending on
//! their classification (explicit option lists, or structural inference
//! under the `guess` option); see [`CompileOptions`].

pub mod classify;
pub mod errors;
pub mod options;
pub mod path;
pub mod scope;
pub mod simplify;
pub mod tokenizer;

mod codegen;

pub use classify::{NameSets, SectionKind};
pub use errors::CompileError;
pub use options::CompileOptions;

/// Compile a Mustache template with default options.
pub fn compile(source: &str) -> Result<String, CompileError> {
    compile_with_options(source, &CompileOptions::default())
}

/// Compile a Mustache template with explicit options.
pub fn compile_with_options(
    source: &str,
    options: &CompileOptions,
) -> Result<String, CompileError> {
    codegen::Codegen::new(options).compile(source)
}
