//! Filesystem document store
//!
//! Layout under the store root:
//! - `<collection>/<name>`: stored document bytes
//! - `.deleted/<eadid>.json`: [`Deleted`] tombstones

use crate::checksum::Checksum;
use crate::error::{StoreError, StoreResult};
use crate::store::{
    check_collection, check_name, document_path, Deleted, DocumentInfo, DocumentStore,
    StoredDocument, StoredEadid,
};
use chrono::{DateTime, Utc};
use fa_ead::FindingAid;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DELETED_DIR: &str = ".deleted";

/// Document store rooted at a directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Store rooted at `root`; directories are created on first load
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> StoreResult<PathBuf> {
        check_collection(collection)?;
        Ok(collection
            .trim_matches('/')
            .split('/')
            .fold(self.root.clone(), |dir, segment| dir.join(segment)))
    }

    fn document_file(&self, collection: &str, name: &str) -> StoreResult<PathBuf> {
        check_name(name)?;
        Ok(self.collection_dir(collection)?.join(name))
    }

    fn tombstone_file(&self, eadid: &str) -> StoreResult<PathBuf> {
        check_name(eadid)?;
        Ok(self.root.join(DELETED_DIR).join(format!("{eadid}.json")))
    }

    /// Parse every `.xml` document in a collection, skipping unreadable ones
    async fn scan(&self, collection: &str) -> StoreResult<Vec<StoredEadid>> {
        let dir = self.collection_dir(collection)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io_error(&dir, e)),
        };
        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io_error(&dir, e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".xml") {
                names.push(name);
            }
        }
        names.sort();

        let mut found = Vec::with_capacity(names.len());
        for name in names {
            let file = dir.join(&name);
            let bytes = tokio::fs::read(&file)
                .await
                .map_err(|e| StoreError::io_error(&file, e))?;
            match FindingAid::from_bytes(&bytes) {
                Ok(ead) => found.push(StoredEadid {
                    document: StoredDocument::new(collection.trim_matches('/'), name),
                    eadid: ead.eadid_value(),
                }),
                Err(e) => tracing::warn!("Skipping {}: {}", file.display(), e),
            }
        }
        Ok(found)
    }
}

#[async_trait::async_trait]
impl DocumentStore for FsStore {
    async fn load(
        &self,
        collection: &str,
        name: &str,
        content: &[u8],
        overwrite: bool,
    ) -> StoreResult<()> {
        let file = self.document_file(collection, name)?;
        FindingAid::from_bytes(content)
            .map_err(|e| StoreError::malformed(document_path(collection, name), e))?;
        if !overwrite && tokio::fs::metadata(&file).await.is_ok() {
            return Err(StoreError::AlreadyExists(document_path(collection, name)));
        }
        if let Some(dir) = file.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::io_error(dir, e))?;
        }
        tokio::fs::write(&file, content)
            .await
            .map_err(|e| StoreError::io_error(&file, e))?;
        tracing::debug!("Wrote {} ({} bytes)", file.display(), content.len());
        Ok(())
    }

    async fn remove(&self, collection: &str, name: &str) -> StoreResult<()> {
        let file = self.document_file(collection, name)?;
        match tokio::fs::remove_file(&file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(document_path(collection, name)))
            }
            Err(e) => Err(StoreError::io_error(&file, e)),
        }
    }

    async fn describe(&self, collection: &str, name: &str) -> StoreResult<Option<DocumentInfo>> {
        let file = self.document_file(collection, name)?;
        let meta = match tokio::fs::metadata(&file).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io_error(&file, e)),
        };
        let content = tokio::fs::read(&file)
            .await
            .map_err(|e| StoreError::io_error(&file, e))?;
        let modified = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .map_err(|e| StoreError::io_error(&file, e))?;
        Ok(Some(DocumentInfo {
            path: document_path(collection, name),
            size: meta.len(),
            modified,
            checksum: Checksum::compute(&content),
        }))
    }

    async fn fetch(&self, collection: &str, name: &str) -> StoreResult<Vec<u8>> {
        let file = self.document_file(collection, name)?;
        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(document_path(collection, name)))
            }
            Err(e) => Err(StoreError::io_error(&file, e)),
        }
    }

    async fn find_by_eadid(
        &self,
        collection: &str,
        eadid: &str,
    ) -> StoreResult<Vec<StoredDocument>> {
        Ok(self
            .scan(collection)
            .await?
            .into_iter()
            .filter(|entry| entry.eadid == eadid)
            .map(|entry| entry.document)
            .collect())
    }

    async fn eadids(&self, collection: &str) -> StoreResult<Vec<StoredEadid>> {
        self.scan(collection).await
    }

    async fn record_deleted(&self, record: Deleted) -> StoreResult<()> {
        let file = self.tombstone_file(&record.eadid)?;
        if let Some(dir) = file.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::io_error(dir, e))?;
        }
        let json = serde_json::to_vec_pretty(&record)?;
        tokio::fs::write(&file, json)
            .await
            .map_err(|e| StoreError::io_error(&file, e))
    }

    async fn deleted(&self, eadid: &str) -> StoreResult<Option<Deleted>> {
        let file = self.tombstone_file(eadid)?;
        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io_error(&file, e)),
        }
    }
}
