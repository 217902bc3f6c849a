//! In-memory document store
//!
//! Backed by [`DashMap`] so one store can be shared across tasks. Used for
//! tests and for dry runs of the admin commands.

use crate::checksum::Checksum;
use crate::error::{StoreError, StoreResult};
use crate::store::{
    check_collection, check_name, document_path, Deleted, DocumentInfo, DocumentStore,
    StoredDocument, StoredEadid,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use fa_ead::FindingAid;

#[derive(Debug, Clone)]
struct Entry {
    location: StoredDocument,
    content: Vec<u8>,
    eadid: String,
    modified: DateTime<Utc>,
}

/// Document store held in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DashMap<String, Entry>,
    deleted: DashMap<String, Deleted>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents across all collections
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn entries_in(&self, collection: &str) -> Vec<Entry> {
        let wanted = collection.trim_matches('/');
        let mut entries: Vec<Entry> = self
            .documents
            .iter()
            .filter(|e| e.value().location.collection.trim_matches('/') == wanted)
            .map(|e| e.value().clone())
            .collect();
        entries.sort_by(|a, b| a.location.name.cmp(&b.location.name));
        entries
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn load(
        &self,
        collection: &str,
        name: &str,
        content: &[u8],
        overwrite: bool,
    ) -> StoreResult<()> {
        check_collection(collection)?;
        check_name(name)?;
        let path = document_path(collection, name);
        let ead =
            FindingAid::from_bytes(content).map_err(|e| StoreError::malformed(&path, e))?;
        if !overwrite && self.documents.contains_key(&path) {
            return Err(StoreError::AlreadyExists(path));
        }
        tracing::debug!("Storing {} ({} bytes)", path, content.len());
        self.documents.insert(
            path,
            Entry {
                location: StoredDocument::new(collection.trim_matches('/'), name),
                content: content.to_vec(),
                eadid: ead.eadid_value(),
                modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn remove(&self, collection: &str, name: &str) -> StoreResult<()> {
        let path = document_path(collection, name);
        self.documents
            .remove(&path)
            .map(|_| ())
            .ok_or(StoreError::NotFound(path))
    }

    async fn describe(&self, collection: &str, name: &str) -> StoreResult<Option<DocumentInfo>> {
        let path = document_path(collection, name);
        Ok(self.documents.get(&path).map(|entry| DocumentInfo {
            path: path.clone(),
            size: entry.content.len() as u64,
            modified: entry.modified,
            checksum: Checksum::compute(&entry.content),
        }))
    }

    async fn fetch(&self, collection: &str, name: &str) -> StoreResult<Vec<u8>> {
        let path = document_path(collection, name);
        self.documents
            .get(&path)
            .map(|entry| entry.content.clone())
            .ok_or(StoreError::NotFound(path))
    }

    async fn find_by_eadid(
        &self,
        collection: &str,
        eadid: &str,
    ) -> StoreResult<Vec<StoredDocument>> {
        Ok(self
            .entries_in(collection)
            .into_iter()
            .filter(|entry| entry.eadid == eadid)
            .map(|entry| entry.location)
            .collect())
    }

    async fn eadids(&self, collection: &str) -> StoreResult<Vec<StoredEadid>> {
        Ok(self
            .entries_in(collection)
            .into_iter()
            .map(|entry| StoredEadid {
                document: entry.location,
                eadid: entry.eadid,
            })
            .collect())
    }

    async fn record_deleted(&self, record: Deleted) -> StoreResult<()> {
        self.deleted.insert(record.eadid.clone(), record);
        Ok(())
    }

    async fn deleted(&self, eadid: &str) -> StoreResult<Option<Deleted>> {
        Ok(self.deleted.get(eadid).map(|record| record.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ead(eadid: &str) -> Vec<u8> {
        format!("<ead><eadheader><eadid>{eadid}</eadid></eadheader></ead>").into_bytes()
    }

    #[tokio::test]
    async fn load_describe_fetch_remove() {
        let store = MemoryStore::new();
        store.load("fa", "a.xml", &ead("a"), false).await.unwrap();
        assert_eq!(store.len(), 1);

        let info = store.describe("fa", "a.xml").await.unwrap().unwrap();
        assert_eq!(info.path, "fa/a.xml");
        assert_eq!(info.size, ead("a").len() as u64);
        assert_eq!(info.checksum, Checksum::compute(&ead("a")));

        assert_eq!(store.fetch("fa", "a.xml").await.unwrap(), ead("a"));
        store.remove("fa", "a.xml").await.unwrap();
        assert!(store.describe("fa", "a.xml").await.unwrap().is_none());
        assert!(matches!(
            store.remove("fa", "a.xml").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn load_without_overwrite_refuses_existing() {
        let store = MemoryStore::new();
        store.load("fa", "a.xml", &ead("a"), false).await.unwrap();
        let err = store.load("fa", "a.xml", &ead("a"), false).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
        store.load("fa", "a.xml", &ead("a"), true).await.unwrap();
    }

    #[tokio::test]
    async fn malformed_content_is_rejected() {
        let store = MemoryStore::new();
        let err = store.load("fa", "bad.xml", b"<ead>", false).await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn find_by_eadid_is_scoped_to_collection() {
        let store = MemoryStore::new();
        store.load("fa", "a.xml", &ead("dup"), false).await.unwrap();
        store.load("fa", "b.xml", &ead("dup"), false).await.unwrap();
        store.load("preview", "a.xml", &ead("dup"), false).await.unwrap();

        let found = store.find_by_eadid("fa", "dup").await.unwrap();
        assert_eq!(
            found,
            vec![StoredDocument::new("fa", "a.xml"), StoredDocument::new("fa", "b.xml")]
        );
        assert_eq!(store.find_by_eadid("preview", "dup").await.unwrap().len(), 1);
        assert!(store.find_by_eadid("fa", "other").await.unwrap().is_empty());
        assert_eq!(store.eadids("fa").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn tombstones() {
        let store = MemoryStore::new();
        assert!(store.deleted("a").await.unwrap().is_none());
        store
            .record_deleted(Deleted::new("a", "A papers", ""))
            .await
            .unwrap();
        store
            .record_deleted(Deleted::new("a", "A papers", "moved"))
            .await
            .unwrap();
        assert_eq!(store.deleted("a").await.unwrap().unwrap().note, "moved");
    }
}
