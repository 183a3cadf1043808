//! Module text providers: where the generated shell text of an imported
//! module comes from.
//!
//! An `import` is translated by splicing the already generated text of the
//! imported module in place. The translator only asks for that text; how a
//! specifier maps to a file, and reading it, is decided here.

use crate::error::TranspileError;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

pub trait ModuleTextProvider: Sync {
    /// Generated shell text for `specifier`, imported from `importer`.
    fn module_text(&self, specifier: &str, importer: Option<&Path>)
    -> Result<String, TranspileError>;
}

/// How a source tree maps onto its generated tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLayout {
    pub source_dir: String,
    pub output_dir: String,
    pub extension: String,
}

impl Default for ModuleLayout {
    fn default() -> Self {
        Self {
            source_dir: "javascript".to_string(),
            output_dir: "shellscript".to_string(),
            extension: "sh".to_string(),
        }
    }
}

impl ModuleLayout {
    /// Rewrites a module path from the source tree to the generated tree:
    /// `source_dir` components become `output_dir`, a script extension
    /// becomes `extension`.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        let mut out = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(name) if name == OsStr::new(&self.source_dir) => {
                    out.push(&self.output_dir)
                }
                other => out.push(other.as_os_str()),
            }
        }
        let is_script = matches!(
            out.extension().and_then(OsStr::to_str),
            None | Some("js" | "mjs" | "cjs")
        );
        if is_script {
            out.set_extension(&self.extension);
        }
        out
    }
}

/// Reads previously generated modules from disk, next to the importing file.
#[derive(Debug, Clone)]
pub struct FsModuleProvider {
    layout: ModuleLayout,
    base_dir: PathBuf,
}

impl FsModuleProvider {
    /// `base_dir` is used for imports made by input that has no file.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            layout: ModuleLayout::default(),
            base_dir: base_dir.into(),
        }
    }

    pub fn with_layout(mut self, layout: ModuleLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn resolve(&self, specifier: &str, importer: Option<&Path>) -> PathBuf {
        let base = importer
            .and_then(Path::parent)
            .unwrap_or(self.base_dir.as_path());
        base.join(self.layout.output_path(Path::new(specifier)))
    }
}

impl ModuleTextProvider for FsModuleProvider {
    fn module_text(
        &self,
        specifier: &str,
        importer: Option<&Path>,
    ) -> Result<String, TranspileError> {
        let path = self.resolve(specifier, importer);
        debug!(specifier, path = %path.display(), "reading generated module");
        if !path.is_file() {
            return Err(TranspileError::ModuleNotFound {
                specifier: specifier.to_string(),
                path,
            });
        }
        fs::read_to_string(&path).map_err(|source| TranspileError::ModuleIo {
            specifier: specifier.to_string(),
            path,
            source,
        })
    }
}

/// Generated module texts held in memory, keyed by specifier.
#[derive(Debug, Clone, Default)]
pub struct MemoryModuleProvider {
    modules: HashMap<String, String>,
}

impl MemoryModuleProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, specifier: impl Into<String>, text: impl Into<String>) {
        self.modules.insert(specifier.into(), text.into());
    }

    pub fn with_module(mut self, specifier: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(specifier, text);
        self
    }
}

impl ModuleTextProvider for MemoryModuleProvider {
    fn module_text(
        &self,
        specifier: &str,
        _importer: Option<&Path>,
    ) -> Result<String, TranspileError> {
        self.modules
            .get(specifier)
            .cloned()
            .ok_or_else(|| TranspileError::ModuleNotFound {
                specifier: specifier.to_string(),
                path: PathBuf::from(specifier),
            })
    }
}
