//! Error types for document store operations

use fa_ead::XmlError;
use std::path::PathBuf;

/// Errors raised by a [`DocumentStore`](crate::DocumentStore)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Load without overwrite hit an existing document
    #[error("document already exists: {0}")]
    AlreadyExists(String),

    /// No document at the requested path
    #[error("document not found: {0}")]
    NotFound(String),

    /// Collection or document name that cannot be mapped to a location
    #[error("invalid document name: '{0}'")]
    InvalidName(String),

    /// Content rejected because it is not well-formed XML
    #[error("{path} is not well-formed XML: {source}")]
    Malformed {
        path: String,
        #[source]
        source: XmlError,
    },

    /// IO error in the backing directory
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tombstone record could not be encoded or decoded
    #[error("tombstone serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create malformed-content error for a store path
    pub fn malformed(path: impl Into<String>, source: XmlError) -> Self {
        Self::Malformed {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        assert_eq!(
            StoreError::NotFound("findingaids/abbey244.xml".into()).to_string(),
            "document not found: findingaids/abbey244.xml"
        );
        let err = StoreError::malformed("fa/bad.xml", XmlError::structure("no root"));
        assert_eq!(err.to_string(), "fa/bad.xml is not well-formed XML: no root");
    }
}
