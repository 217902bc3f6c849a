//! Identifier-minting contract

use crate::error::PidResult;
use serde::{Deserialize, Serialize};

/// One identifier returned by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArkHit {
    /// Object name, e.g. `16x3n`
    pub pid: String,
    /// Resolvable URI, e.g. `http://pid.example.edu/ark:/78912/16x3n`
    pub access_uri: String,
}

/// Result of searching for identifiers by target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PidSearch {
    /// Total matches reported by the service
    pub count: usize,
    /// Hits included in this response (may be fewer than `count`)
    pub hits: Vec<ArkHit>,
}

impl PidSearch {
    /// Search result from hits, counting them
    #[must_use]
    pub fn from_hits(hits: Vec<ArkHit>) -> Self {
        Self {
            count: hits.len(),
            hits,
        }
    }
}

/// Client for an ARK minting service
///
/// Implement this trait to substitute the service in tests or dry runs.
#[async_trait::async_trait]
pub trait PidClient: Send + Sync {
    /// Find ARKs in `domain` whose target is `target`
    async fn search_arks(&self, domain: &str, target: &str) -> PidResult<PidSearch>;

    /// Mint an ARK in `domain` for `target`, labelled `name`; returns its access URI
    async fn create_ark(&self, domain: &str, target: &str, name: &str) -> PidResult<String>;
}
