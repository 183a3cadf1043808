//! Translates a small, statement-oriented subset of JavaScript into shell
//! script source.

pub mod ast;
pub mod context;
pub mod driver;
pub mod error;
pub mod expr;
pub mod format;
pub mod modules;
pub mod parser;
pub mod project;
pub mod quoting;
pub mod span;
pub mod stmt;
pub mod transform;

pub use context::{Indent, TargetShell, TranslateOptions, TranslationContext};
pub use error::TranspileError;
pub use modules::{FsModuleProvider, MemoryModuleProvider, ModuleTextProvider};
pub use transform::{Transformer, render, transpile_source};
