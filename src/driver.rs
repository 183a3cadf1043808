use crate::context::TranslateOptions;
use crate::error::TranspileError;
use crate::modules::{FsModuleProvider, ModuleTextProvider};
use crate::parser;
use crate::span::SourceMap;
use crate::transform::{Transformer, render};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Translate and return the script.
    Emit,
    /// Translate, discard the script, return `OK`.
    Check,
    /// Return the parsed tree.
    EmitAst,
}

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub translate: TranslateOptions,
    pub mode: Mode,
    pub out_path: Option<PathBuf>,
    pub chmod_x: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            translate: TranslateOptions::default(),
            mode: Mode::Emit,
            out_path: None,
            chmod_x: false,
        }
    }
}

#[derive(Debug)]
pub struct DriverError {
    pub code: i32,
    pub msg: String,
}

impl DriverError {
    pub fn io(msg: String) -> Self {
        Self { code: 1, msg }
    }

    /// An error from translating the file shown by `sm`.
    pub fn from_transpile(err: &TranspileError, sm: &SourceMap) -> Self {
        Self {
            code: err.exit_code(),
            msg: err.render(sm),
        }
    }
}

/// Translates one file. Imports are read from previously generated modules
/// next to `path`.
pub fn compile_file(path: &Path, options: &CompileOptions) -> Result<String, DriverError> {
    let base = path.parent().unwrap_or(Path::new("."));
    let modules = FsModuleProvider::new(base);
    compile_file_with(path, options, &modules)
}

pub fn compile_file_with(
    path: &Path,
    options: &CompileOptions,
    modules: &dyn ModuleTextProvider,
) -> Result<String, DriverError> {
    // Missing or unreadable input is an I/O failure (1), not a translation error (2).
    if !path.exists() {
        return Err(DriverError::io(format!("File not found: {}", path.display())));
    }
    let src = std::fs::read_to_string(path)
        .map_err(|e| DriverError::io(format!("Unable to read file: {} ({})", path.display(), e)))?;
    let sm = SourceMap::new(path.display().to_string(), src);
    debug!(path = %path.display(), bytes = sm.src().len(), "compiling");

    let mut program =
        parser::parse(sm.src()).map_err(|e| DriverError::from_transpile(&e, &sm))?;

    if let Mode::EmitAst = options.mode {
        program.strip_spans();
        return Ok(format!("{:#?}", program));
    }

    let transformer = Transformer::new(options.translate, modules).with_importer(path);
    let chunks = transformer
        .run(&program)
        .map_err(|e| DriverError::from_transpile(&e, &sm))?;

    if let Mode::Check = options.mode {
        return Ok("OK".to_string());
    }

    let out = render(&chunks, &options.translate);
    if let Some(out_path) = &options.out_path {
        write_output(out_path, &out, options.chmod_x)?;
    }
    Ok(out)
}

/// Writes a generated script, creating parent directories as needed.
pub fn write_output(out_path: &Path, text: &str, chmod_x: bool) -> Result<(), DriverError> {
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            DriverError::io(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }
    std::fs::write(out_path, text)
        .map_err(|e| DriverError::io(format!("Failed to write to {}: {}", out_path.display(), e)))?;

    #[cfg(unix)]
    {
        if chmod_x {
            match std::fs::metadata(out_path) {
                Ok(metadata) => {
                    let mut perms = metadata.permissions();
                    perms.set_mode(perms.mode() | 0o111);
                    if let Err(e) = std::fs::set_permissions(out_path, perms) {
                        warn!(path = %out_path.display(), error = %e, "could not mark script executable");
                    }
                }
                Err(e) => {
                    warn!(path = %out_path.display(), error = %e, "could not stat generated script");
                }
            }
        }
    }
    #[cfg(not(unix))]
    let _ = chmod_x;

    Ok(())
}
