use crate::ast::{BinaryOp, NodeKind};
use crate::span::{SourceMap, Span};
use std::path::PathBuf;
use thiserror::Error;

/// Every way a translation run can fail. All of them abort the run.
#[derive(Debug, Error)]
pub enum TranspileError {
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
        span: Span,
    },

    #[error("unsupported construct `{kind}`{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    UnsupportedConstruct {
        kind: NodeKind,
        detail: Option<String>,
        span: Option<Span>,
    },

    #[error("operator `{operator}` has no {target} equivalent")]
    InvalidOperator {
        operator: BinaryOp,
        target: &'static str,
        span: Span,
    },

    #[error("module `{specifier}` not found (looked for {})", .path.display())]
    ModuleNotFound { specifier: String, path: PathBuf },

    #[error("failed to read module `{specifier}` at {}: {source}", .path.display())]
    ModuleIo {
        specifier: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("import cycle detected: {}", .chain.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" -> "))]
    ImportCycle { chain: Vec<PathBuf> },
}

impl TranspileError {
    pub fn unsupported(kind: NodeKind, span: Span) -> Self {
        TranspileError::UnsupportedConstruct {
            kind,
            detail: None,
            span: Some(span),
        }
    }

    pub fn unsupported_with(kind: NodeKind, detail: impl Into<String>, span: Span) -> Self {
        TranspileError::UnsupportedConstruct {
            kind,
            detail: Some(detail.into()),
            span: Some(span),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            TranspileError::Syntax { span, .. } | TranspileError::InvalidOperator { span, .. } => {
                Some(*span)
            }
            TranspileError::UnsupportedConstruct { span, .. } => *span,
            _ => None,
        }
    }

    /// 2 for problems with the input program, 1 for I/O.
    pub fn exit_code(&self) -> i32 {
        match self {
            TranspileError::ModuleIo { .. } => 1,
            _ => 2,
        }
    }

    /// Renders the error against the source it came from, with a caret
    /// under the offending node when a span is known.
    pub fn render(&self, sm: &SourceMap) -> String {
        match self {
            TranspileError::Syntax { message, span, .. } => {
                sm.format_diagnostic(&format!("syntax error: {message}"), *span)
            }
            _ => match self.span() {
                Some(span) => sm.format_diagnostic(&self.to_string(), span),
                None => format!("{}: error: {}", sm.name(), self),
            },
        }
    }
}
