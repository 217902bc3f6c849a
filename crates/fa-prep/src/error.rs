//! Error types for publication preparation
//!
//! - [`ArkError`]: identifier reconciliation, split into configuration
//!   problems (stop the batch) and generation failures (skip one document)
//! - [`PrepError`]: everything that can stop one document from being prepared

use fa_ead::XmlError;
use fa_pid::PidError;

/// Errors while reconciling a document's ARK
#[derive(Debug, thiserror::Error)]
pub enum ArkError {
    /// PID manager client or domain settings are unusable
    #[error("{0}")]
    Config(String),

    /// The PID manager failed to search or mint
    #[error("Error generating ARK: {0}")]
    Generation(String),
}

impl ArkError {
    /// Client could not be initialized
    pub fn client(source: &PidError) -> Self {
        Self::Config(format!("Error initializing PID manager client: {source}"))
    }

    /// No domain to mint ARKs in
    #[must_use]
    pub fn missing_domain() -> Self {
        Self::Config("PID manager domain is not configured".to_string())
    }

    /// Service failure while searching or minting
    pub fn generation(source: &PidError) -> Self {
        Self::Generation(source.to_string())
    }

    /// Document has nowhere to record an ARK
    #[must_use]
    pub fn missing_eadid() -> Self {
        Self::Generation("document has no eadheader/eadid element".to_string())
    }

    /// PID manager answered with a URI that is not an ARK
    #[must_use]
    pub fn not_an_ark(uri: &str) -> Self {
        Self::Generation(format!("PID manager returned '{uri}', which is not an ARK"))
    }

    /// True for errors that apply to every document in a batch
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<PidError> for ArkError {
    fn from(err: PidError) -> Self {
        if err.is_config() {
            Self::client(&err)
        } else {
            Self::generation(&err)
        }
    }
}

/// Errors preparing a single document
#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    /// Source could not be read or is not well-formed
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// Root element is not `ead`
    #[error("{0} is not an EAD document")]
    NotEad(String),

    /// ARK reconciliation failed
    #[error(transparent)]
    Ark(#[from] ArkError),
}

impl PrepError {
    /// True when the source is not well-formed XML
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Xml(err) if err.is_malformed())
    }
}

/// Result alias for preparation
pub type PrepResult<T> = Result<T, PrepError>;
