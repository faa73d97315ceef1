//! Intarsia CLI.
//!
//! Batch-compiles Mustache templates into one JavaScript module that imports
//! the runtime pair and exports a render expression per input file:
//!
//! ```text
//! intarsiac --trim --guess templates/*.html -o templates.js
//! intarsiac --trim --array="items,itemList" --boolean="isHidden,selected" templates/*.html
//! ```

use clap::Parser;
use glob::glob;
use intarsia_compiler::{compile_with_options, CompileOptions};
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use std::error::Error;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "intarsiac")]
#[command(about = "Mustache to template-literal compiler", long_about = None)]
struct Cli {
    /// Glob pattern(s) matching template files
    #[arg(required = true)]
    patterns: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Strip whitespace around standalone tag lines
    #[arg(long)]
    trim: bool,

    /// Infer section classifications from the template structure
    #[arg(long)]
    guess: bool,

    /// Names compiled as boolean guard sections
    #[arg(long, visible_alias = "bool", default_value = "")]
    boolean: String,

    /// Names compiled as array map sections
    #[arg(long, default_value = "")]
    array: String,

    /// Names compiled as object guard sections
    #[arg(long, default_value = "")]
    object: String,

    /// Names resolved as zero-argument calls
    #[arg(long, default_value = "")]
    func: String,

    /// Names resolved against the alternate data root
    #[arg(long, default_value = "")]
    alt: String,

    /// Names resolved against the outermost context
    #[arg(long, default_value = "")]
    root: String,

    /// Emit CommonJS (require/exports) instead of an ES module
    #[arg(long)]
    cjs: bool,

    /// Module specifier the runtime pair is imported from
    #[arg(long, default_value = "intarsia")]
    module: String,

    /// Keep going when a template fails to compile
    #[arg(long)]
    continue_on_error: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let files = collect_files(&cli.patterns);
    if files.is_empty() {
        return Err("no templates matched".into());
    }

    let options = CompileOptions {
        trim: cli.trim,
        guess: cli.guess,
        boolean: cli.boolean.clone(),
        array: cli.array.clone(),
        object: cli.object.clone(),
        func: cli.func.clone(),
        alt: cli.alt.clone(),
        root: cli.root.clone(),
        ..Default::default()
    };

    let mut names = ExportNames::new();
    let mut out = String::new();
    let mut count = 0usize;
    let mut failed = 0usize;

    for path in &files {
        let raw = fs::read_to_string(path)?;
        let source = prestrip(&raw);

        let code = match compile_with_options(&source, &options) {
            Ok(code) => code,
            Err(err) => {
                eprintln!("{}: {err}", path.display());
                failed += 1;
                if cli.continue_on_error {
                    continue;
                }
                return Err(format!("{} template(s) failed", failed).into());
            }
        };

        if count == 0 {
            if cli.cjs {
                writeln!(out, "const {{$$, $$$}} = require(\"{}\");", cli.module)?;
            } else {
                writeln!(out, "import {{$$, $$$}} from \"{}\";", cli.module)?;
            }
        }
        count += 1;

        let name = names.claim(&export_stem(path));
        writeln!(out)?;
        // editor language-injection hint for HTML-derived templates
        if path.extension().is_some_and(|ext| ext == "html") {
            writeln!(out, "// language=HTML")?;
        }
        if cli.cjs {
            writeln!(out, "exports.{name} = {code};")?;
        } else {
            writeln!(out, "export const {name} = {code};")?;
        }
    }

    match &cli.output {
        Some(path) => fs::write(path, out)?,
        None => print!("{out}"),
    }

    if failed > 0 {
        return Err(format!("{failed} template(s) failed").into());
    }
    Ok(())
}

fn collect_files(patterns: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for pattern in patterns {
        match glob(pattern) {
            Ok(paths) => files.extend(paths.flatten().filter(|p| p.is_file())),
            Err(err) => eprintln!("bad pattern {pattern}: {err}"),
        }
    }
    files
}

static LEADING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s+").unwrap());
static TRAILING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\n").unwrap());

/// Drop indentation and trailing per-line whitespace before compiling;
/// markup templates keep their rendering, the generated expression shrinks.
fn prestrip(source: &str) -> String {
    let source = LEADING_WS.replace_all(source, "");
    TRAILING_WS.replace_all(&source, "\n").into_owned()
}

/// Export name base: the file name with every non-word character mapped to
/// an underscore (`list.html` exports as `list_html`).
fn export_stem(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Export-name allocator. Seeded with the JavaScript reserved words so no
/// export can shadow one; repeated stems get `_2`, `_3`, … suffixes.
struct ExportNames {
    used: FxHashMap<String, u32>,
}

// https://tc39.es/ecma262/#sec-keywords-and-reserved-words
const RESERVED_WORDS: &str = "await break case catch class const continue debugger default \
    delete do else enum export extends false finally for function if import in instanceof \
    new null return super switch this throw true try typeof var void while with yield \
    implements interface package private protected public arguments eval";

impl ExportNames {
    fn new() -> Self {
        let mut used = FxHashMap::default();
        for word in RESERVED_WORDS.split_ascii_whitespace() {
            used.insert(word.to_string(), 0);
        }
        Self { used }
    }

    fn claim(&mut self, base: &str) -> String {
        if !self.used.contains_key(base) {
            self.used.insert(base.to_string(), 1);
            return base.to_string();
        }
        loop {
            let next = self.used.get(base).copied().unwrap_or(0) + 1;
            self.used.insert(base.to_string(), next);
            let candidate = format!("{base}_{next}");
            // an absent or zero entry means the candidate is free
            if self.used.get(&candidate).copied().unwrap_or(0) == 0 {
                self.used.insert(candidate.clone(), 0);
                return candidate;
            }
        }
    }
}
