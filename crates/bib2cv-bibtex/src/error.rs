//! Loader error types

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::parser::BibTeXParseError;

/// A problem in one bibliography file, located by path, line and column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn from_parse_error(path: impl Into<PathBuf>, error: BibTeXParseError) -> Self {
        Self {
            path: path.into(),
            line: error.line,
            column: error.column,
            message: error.message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.path.display(),
            self.line,
            self.column,
            self.message
        )
    }
}

/// Error type for loading bibliography files
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Every diagnostic of every file, reported together
    #[error("Input error!")]
    Input { diagnostics: Vec<Diagnostic> },
}
