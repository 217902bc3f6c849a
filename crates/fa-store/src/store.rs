//! Document store contract
//!
//! Every operation names its target collection explicitly; a store has no
//! notion of a current or preview collection of its own.

use crate::checksum::Checksum;
use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A document location: collection plus document name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoredDocument {
    /// Collection name, e.g. `findingaids`
    pub collection: String,
    /// Document name within the collection, e.g. `abbey244.xml`
    pub name: String,
}

impl StoredDocument {
    /// Location from collection and name
    #[must_use]
    pub fn new(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            name: name.into(),
        }
    }

    /// `collection/name`
    #[must_use]
    pub fn path(&self) -> String {
        document_path(&self.collection, &self.name)
    }
}

impl Display for StoredDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Metadata returned by `describe`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// `collection/name`
    pub path: String,
    /// Content length in bytes
    pub size: u64,
    /// Last load time
    pub modified: DateTime<Utc>,
    /// Digest of the stored bytes
    pub checksum: Checksum,
}

/// A stored document and the eadid it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEadid {
    /// Where the document lives
    pub document: StoredDocument,
    /// Text of its `eadid`
    pub eadid: String,
}

/// Tombstone kept after a published finding aid is removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    /// eadid of the removed document
    pub eadid: String,
    /// Collection title at the time of removal
    pub title: String,
    /// When the document was removed
    pub date: DateTime<Utc>,
    /// Optional explanation shown to visitors
    #[serde(default)]
    pub note: String,
}

impl Deleted {
    /// Tombstone dated now
    #[must_use]
    pub fn new(eadid: impl Into<String>, title: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            eadid: eadid.into(),
            title: title.into(),
            date: Utc::now(),
            note: note.into(),
        }
    }
}

/// Storage for published EAD documents
///
/// Implement this trait to back the pipeline with a different store.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store `content` as `collection/name`.
    ///
    /// Content must be well-formed XML. Without `overwrite`, an existing
    /// document is an error.
    async fn load(
        &self,
        collection: &str,
        name: &str,
        content: &[u8],
        overwrite: bool,
    ) -> StoreResult<()>;

    /// Remove `collection/name`
    async fn remove(&self, collection: &str, name: &str) -> StoreResult<()>;

    /// Metadata for `collection/name`, `None` when absent
    async fn describe(&self, collection: &str, name: &str) -> StoreResult<Option<DocumentInfo>>;

    /// Stored bytes of `collection/name`
    async fn fetch(&self, collection: &str, name: &str) -> StoreResult<Vec<u8>>;

    /// Documents in `collection` whose eadid text equals `eadid`, ordered by name
    async fn find_by_eadid(&self, collection: &str, eadid: &str)
        -> StoreResult<Vec<StoredDocument>>;

    /// Every document in `collection` with its eadid, ordered by name
    async fn eadids(&self, collection: &str) -> StoreResult<Vec<StoredEadid>>;

    /// Create or replace the tombstone for `record.eadid`
    async fn record_deleted(&self, record: Deleted) -> StoreResult<()>;

    /// Tombstone for an eadid
    async fn deleted(&self, eadid: &str) -> StoreResult<Option<Deleted>>;
}

/// `collection/name` with redundant slashes removed
#[must_use]
pub fn document_path(collection: &str, name: &str) -> String {
    format!("{}/{}", collection.trim_matches('/'), name.trim_start_matches('/'))
}

/// Reject names that cannot be stored as a single file
///
/// # Errors
///
/// Returns [`StoreError::InvalidName`] for empty names and names containing
/// path separators or parent references.
pub fn check_name(name: &str) -> StoreResult<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Reject collection names that would escape the store root
///
/// # Errors
///
/// Returns [`StoreError::InvalidName`] for empty collections and any `..`
/// segment.
pub fn check_collection(collection: &str) -> StoreResult<()> {
    let trimmed = collection.trim_matches('/');
    if trimmed.is_empty() || trimmed.split('/').any(|s| s.is_empty() || s == "." || s == "..") {
        return Err(StoreError::InvalidName(collection.to_string()));
    }
    Ok(())
}
