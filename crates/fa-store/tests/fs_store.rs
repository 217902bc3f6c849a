//! Filesystem store behaviour against a temporary directory

use fa_store::{Deleted, DocumentStore, FsStore, StoreError, StoredDocument};
use pretty_assertions::assert_eq;

fn ead(eadid: &str) -> Vec<u8> {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ead><eadheader><eadid>{eadid}</eadid></eadheader></ead>\n"
    )
    .into_bytes()
}

#[tokio::test]
async fn load_and_describe() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());

    store.load("findingaids", "abbey244.xml", &ead("abbey244"), false).await.unwrap();
    assert!(dir.path().join("findingaids/abbey244.xml").exists());

    let info = store.describe("findingaids", "abbey244.xml").await.unwrap().unwrap();
    assert_eq!(info.path, "findingaids/abbey244.xml");
    assert_eq!(info.size, ead("abbey244").len() as u64);
    assert_eq!(
        store.fetch("findingaids", "abbey244.xml").await.unwrap(),
        ead("abbey244")
    );
    assert!(store.describe("findingaids", "none.xml").await.unwrap().is_none());
}

#[tokio::test]
async fn overwrite_and_remove() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());

    store.load("fa", "a.xml", &ead("a"), false).await.unwrap();
    assert!(matches!(
        store.load("fa", "a.xml", &ead("a"), false).await,
        Err(StoreError::AlreadyExists(_))
    ));
    store.load("fa", "a.xml", &ead("a2"), true).await.unwrap();
    assert_eq!(store.eadids("fa").await.unwrap()[0].eadid, "a2");

    store.remove("fa", "a.xml").await.unwrap();
    assert!(matches!(
        store.remove("fa", "a.xml").await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn find_by_eadid_across_documents() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());

    store.load("fa", "one.xml", &ead("dup"), false).await.unwrap();
    store.load("fa", "two.xml", &ead("dup"), false).await.unwrap();
    store.load("fa", "other.xml", &ead("other"), false).await.unwrap();
    // not well-formed files already on disk are skipped
    std::fs::write(dir.path().join("fa/broken.xml"), "<ead>").unwrap();

    let found = store.find_by_eadid("fa", "dup").await.unwrap();
    assert_eq!(
        found,
        vec![StoredDocument::new("fa", "one.xml"), StoredDocument::new("fa", "two.xml")]
    );
    assert!(store.find_by_eadid("missing", "dup").await.unwrap().is_empty());
}

#[tokio::test]
async fn rejects_escaping_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());
    assert!(matches!(
        store.load("../outside", "a.xml", &ead("a"), false).await,
        Err(StoreError::InvalidName(_))
    ));
    assert!(matches!(
        store.load("fa", "../a.xml", &ead("a"), false).await,
        Err(StoreError::InvalidName(_))
    ));
}

#[tokio::test]
async fn tombstones_persist_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new(dir.path());
    let record = Deleted::new("abbey244", "Abbey Theatre collection", "Removed at donor request");
    store.record_deleted(record.clone()).await.unwrap();

    let reopened = FsStore::new(dir.path());
    assert_eq!(reopened.deleted("abbey244").await.unwrap(), Some(record));
    assert!(reopened.deleted("other").await.unwrap().is_none());
}
