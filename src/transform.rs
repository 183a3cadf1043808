//! Entry point of a translation run: a parsed program in, shell text out.

use crate::ast::Program;
use crate::context::{TranslateOptions, TranslationContext};
use crate::error::TranspileError;
use crate::format::join_lines;
use crate::modules::ModuleTextProvider;
use crate::parser;
use crate::stmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Translates whole programs. Holds configuration only; every [`run`]
/// builds its own [`TranslationContext`], so one transformer may serve any
/// number of runs, from any number of threads.
///
/// [`run`]: Transformer::run
pub struct Transformer<'a> {
    options: TranslateOptions,
    modules: &'a dyn ModuleTextProvider,
    importer: Option<PathBuf>,
}

impl<'a> Transformer<'a> {
    pub fn new(options: TranslateOptions, modules: &'a dyn ModuleTextProvider) -> Self {
        Self {
            options,
            modules,
            importer: None,
        }
    }

    /// Path of the file being translated; imports resolve against it.
    pub fn with_importer(mut self, path: impl Into<PathBuf>) -> Self {
        self.importer = Some(path.into());
        self
    }

    /// Translates the top-level statements in source order, one chunk of
    /// text per statement. The first failure aborts the run.
    pub fn run(&self, program: &Program) -> Result<Vec<String>, TranspileError> {
        let mut ctx = TranslationContext::new(&self.options, self.modules, self.importer.as_deref());
        let mut chunks = Vec::with_capacity(program.body.len());
        for stmt in &program.body {
            let lines = stmt::translate(stmt, &mut ctx)?;
            chunks.push(lines.join("\n"));
        }
        debug!(statements = program.body.len(), "translation run finished");
        Ok(chunks)
    }

    pub fn transpile(&self, source: &str) -> Result<String, TranspileError> {
        let program = parser::parse(source)?;
        let chunks = self.run(&program)?;
        Ok(render(&chunks, &self.options))
    }
}

/// The final script: shebang (when enabled), the joined chunks, and a
/// trailing newline.
pub fn render<S: AsRef<str>>(chunks: &[S], options: &TranslateOptions) -> String {
    let body = join_lines(chunks);
    let mut out = String::new();
    if options.shebang {
        out.push_str(options.target.shebang());
        out.push('\n');
        if !body.is_empty() {
            out.push('\n');
        }
    }
    if !body.is_empty() {
        out.push_str(&body);
        out.push('\n');
    }
    out
}

/// Parses and translates `source` in one step.
pub fn transpile_source(
    source: &str,
    options: TranslateOptions,
    modules: &dyn ModuleTextProvider,
    importer: Option<&Path>,
) -> Result<String, TranspileError> {
    let mut transformer = Transformer::new(options, modules);
    if let Some(path) = importer {
        transformer = transformer.with_importer(path);
    }
    transformer.transpile(source)
}
