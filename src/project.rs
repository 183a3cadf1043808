//! Whole-tree builds: every script under a source directory, translated into
//! a mirrored output directory.
//!
//! A module's generated text is spliced into every file that imports it, so
//! imported modules are translated first. The order is a depth-first walk of
//! the import graph; a module reached again while still on the walk stack is
//! an import cycle.

use crate::ast::{Program, StmtKind};
use crate::context::TranslateOptions;
use crate::driver::{CompileOptions, DriverError, Mode, write_output};
use crate::error::TranspileError;
use crate::modules::{FsModuleProvider, ModuleTextProvider};
use crate::parser;
use crate::span::SourceMap;
use crate::transform::{Transformer, render};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const SCRIPT_EXTENSIONS: &[&str] = &["js", "mjs"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltModule {
    pub source: PathBuf,
    pub output: PathBuf,
}

struct SourceFile {
    sm: SourceMap,
    program: Program,
    imports: Vec<PathBuf>,
}

/// Translates every `.js`/`.mjs` file under `src_root` into `out_root`,
/// keeping relative paths and swapping the extension for `.sh`. Nothing is
/// written unless `options.mode` is [`Mode::Emit`].
pub fn build_project(
    src_root: &Path,
    out_root: &Path,
    options: &CompileOptions,
) -> Result<Vec<BuiltModule>, DriverError> {
    let src_root = fs::canonicalize(src_root)
        .map_err(|e| DriverError::io(format!("Unable to read directory: {} ({})", src_root.display(), e)))?;

    let mut files = HashMap::new();
    for path in discover(&src_root)? {
        let src = fs::read_to_string(&path)
            .map_err(|e| DriverError::io(format!("Unable to read file: {} ({})", path.display(), e)))?;
        let sm = SourceMap::new(path.display().to_string(), src);
        let program = parser::parse(sm.src()).map_err(|e| DriverError::from_transpile(&e, &sm))?;
        let imports = program
            .body
            .iter()
            .filter_map(|stmt| match &stmt.node {
                StmtKind::Import { source } => resolve_source(&path, source),
                _ => None,
            })
            .collect();
        files.insert(
            path,
            SourceFile {
                sm,
                program,
                imports,
            },
        );
    }

    let order = import_order(&files).map_err(|e| DriverError {
        code: e.exit_code(),
        msg: e.to_string(),
    })?;

    let mut modules = ProjectModules {
        generated: HashMap::new(),
        fallback: FsModuleProvider::new(&src_root),
    };
    let mut built = Vec::with_capacity(order.len());
    for path in order {
        let Some(file) = files.get(&path) else {
            continue;
        };
        let transformer = Transformer::new(options.translate, &modules).with_importer(&path);
        let chunks = transformer
            .run(&file.program)
            .map_err(|e| DriverError::from_transpile(&e, &file.sm))?;
        let text = render(&chunks, &options.translate);

        let rel = path.strip_prefix(&src_root).unwrap_or(&path);
        let output = out_root.join(rel).with_extension("sh");
        if options.mode == Mode::Emit {
            write_output(&output, &text, options.chmod_x)?;
        }
        info!(source = %rel.display(), output = %output.display(), "compiled");

        // Spliced text carries no shebang of its own.
        let spliced = TranslateOptions {
            shebang: false,
            ..options.translate
        };
        let body = render(&chunks, &spliced);
        modules.generated.insert(path.clone(), body);
        built.push(BuiltModule {
            source: path,
            output,
        });
    }
    Ok(built)
}

fn discover(root: &Path) -> Result<Vec<PathBuf>, DriverError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| DriverError::io(format!("Unable to walk {}: {}", root.display(), e)))?;
        let is_script = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext));
        if entry.file_type().is_file() && is_script {
            found.push(entry.into_path());
        }
    }
    debug!(root = %root.display(), files = found.len(), "discovered scripts");
    Ok(found)
}

/// Canonical path of the source module `specifier` names, when it exists.
fn resolve_source(importer: &Path, specifier: &str) -> Option<PathBuf> {
    let base = importer.parent()?;
    let mut candidate = base.join(specifier);
    if candidate.extension().is_none() {
        candidate.set_extension("js");
    }
    fs::canonicalize(candidate).ok()
}

struct Planner<'a> {
    files: &'a HashMap<PathBuf, SourceFile>,
    // On the current walk, for cycle detection
    visiting: HashSet<PathBuf>,
    stack: Vec<PathBuf>,
    done: HashSet<PathBuf>,
    order: Vec<PathBuf>,
}

/// Files ordered so every module comes after the modules it imports.
fn import_order(files: &HashMap<PathBuf, SourceFile>) -> Result<Vec<PathBuf>, TranspileError> {
    let mut planner = Planner {
        files,
        visiting: HashSet::new(),
        stack: Vec::new(),
        done: HashSet::new(),
        order: Vec::with_capacity(files.len()),
    };
    let mut roots: Vec<&PathBuf> = files.keys().collect();
    roots.sort();
    for path in roots {
        planner.visit(path)?;
    }
    Ok(planner.order)
}

impl Planner<'_> {
    fn visit(&mut self, path: &Path) -> Result<(), TranspileError> {
        if self.done.contains(path) {
            return Ok(());
        }
        if self.visiting.contains(path) {
            let start = self.stack.iter().position(|p| p == path).unwrap_or(0);
            let mut chain = self.stack[start..].to_vec();
            chain.push(path.to_path_buf());
            return Err(TranspileError::ImportCycle { chain });
        }
        let files = self.files;
        let Some(file) = files.get(path) else {
            // Outside the tree; read from disk at translation time.
            return Ok(());
        };

        self.visiting.insert(path.to_path_buf());
        self.stack.push(path.to_path_buf());
        for import in &file.imports {
            self.visit(import)?;
        }
        self.stack.pop();
        self.visiting.remove(path);

        self.done.insert(path.to_path_buf());
        self.order.push(path.to_path_buf());
        Ok(())
    }
}

/// Serves modules of the tree from this build's results, anything else from
/// disk.
struct ProjectModules {
    generated: HashMap<PathBuf, String>,
    fallback: FsModuleProvider,
}

impl ModuleTextProvider for ProjectModules {
    fn module_text(
        &self,
        specifier: &str,
        importer: Option<&Path>,
    ) -> Result<String, TranspileError> {
        let built = importer
            .and_then(|imp| resolve_source(imp, specifier))
            .and_then(|path| self.generated.get(&path));
        match built {
            Some(text) => Ok(text.clone()),
            None => self.fallback.module_text(specifier, importer),
        }
    }
}
