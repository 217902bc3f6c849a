//! Error types for loading and saving EAD documents
//!
//! Provides error handling for:
//! - Parse operations (bytes → [`Document`](crate::Document))
//! - File reads and writes around the document tree

use std::path::PathBuf;

/// Errors raised while reading, parsing or writing an XML document
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// The tokenizer rejected the input
    #[error("line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// Well-formed tokens that do not make a single-rooted document
    #[error("{message}")]
    Structure { message: String },

    /// Input is not valid UTF-8
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// IO error reading or writing a document file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl XmlError {
    /// Create syntax error at a source position
    pub fn syntax_error(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create structural error
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure {
            message: message.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the document itself is at fault (not the filesystem)
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }
}

/// Result alias for document operations
pub type XmlResult<T> = Result<T, XmlError>;
