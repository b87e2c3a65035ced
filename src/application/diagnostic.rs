use std::fmt;
use std::path::PathBuf;

use crate::domain::document::Document;

/// A recoverable problem met during extraction. The run still produces output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No source file at the path derived from the component's name.
    MissingSource { component: String, path: PathBuf },
    /// An intent construction whose arguments match neither known shape.
    UnrecognizedIntent {
        component: String,
        path: PathBuf,
        line: usize,
        snippet: String,
    },
    /// An explicit intent naming a class that is not a declared component.
    UnresolvedLink {
        sender: String,
        receiver: String,
        path: PathBuf,
        line: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingSource { component, path } => {
                write!(f, "no source for {} at {}", component, path.display())
            }
            Diagnostic::UnrecognizedIntent {
                component,
                path,
                line,
                snippet,
            } => write!(
                f,
                "{}:{}: unrecognized intent construction in {}: {}",
                path.display(),
                line,
                component,
                snippet
            ),
            Diagnostic::UnresolvedLink {
                sender,
                receiver,
                path,
                line,
            } => write!(
                f,
                "{}:{}: {} targets {}, which is not a declared component",
                path.display(),
                line,
                sender,
                receiver
            ),
        }
    }
}

/// Result of a successful extraction.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
}
