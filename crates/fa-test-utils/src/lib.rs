//! Testing utilities for the Finding Aids workspace
//!
//! Shared EAD fixtures, a scripted PID manager client and store helpers.

#![allow(missing_docs)]

use fa_ead::FindingAid;
use fa_pid::{ArkHit, PidClient, PidError, PidResult, PidSearch};
use fa_store::{DocumentStore, MemoryStore};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Collection used by store tests
pub const TEST_COLLECTION: &str = "findingaids-test";

/// Site base URL used by ARK tests
pub const TEST_SITE_URL: &str = "http://findingaids.test.emory.edu/";

/// PID manager domain used by ARK tests
pub const TEST_PID_DOMAIN: &str = "http://pid.emory.edu/domains/42/";

/// Access URI returned by [`ScriptedPidClient`] for new ARKs
pub const TEST_ARK: &str = "http://pid.emory.edu/ark:/25593/testark";

pub mod fixtures {
    //! EAD documents used across test suites

    /// Publishable finding aid with six series, two subseries and an index
    pub const HARTSFIELD558: &str = include_str!("../fixtures/hartsfield558.xml");

    /// Same collection with a schema error, wrong eadid, missing ids,
    /// whitespace problems, two originations and odd container counts
    pub const HARTSFIELD558_INVALID: &str = include_str!("../fixtures/hartsfield558_invalid.xml");

    /// Series without unitids
    pub const RAOUL548: &str = include_str!("../fixtures/raoul548.xml");

    /// No series; unit title starts with a `<title>`
    pub const PITTSFREEMAN1036: &str = include_str!("../fixtures/pittsfreeman1036.xml");

    /// Unclosed element
    pub const BADLYFORMED: &str = include_str!("../fixtures/badlyformed.xml");

    /// Fixture files by name
    pub const ALL: [(&str, &str); 5] = [
        ("hartsfield558.xml", HARTSFIELD558),
        ("hartsfield558_invalid.xml", HARTSFIELD558_INVALID),
        ("raoul548.xml", RAOUL548),
        ("pittsfreeman1036.xml", PITTSFREEMAN1036),
        ("badlyformed.xml", BADLYFORMED),
    ];
}

/// Path of a fixture file in this crate
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}

/// Parse a fixture, panicking on malformed input
pub fn finding_aid(source: &str) -> FindingAid {
    FindingAid::parse(source).expect("fixture parses")
}

/// Temporary directory holding copies of the named fixtures
pub fn fixture_dir(names: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for name in names {
        let (_, content) = fixtures::ALL
            .iter()
            .find(|(fixture, _)| fixture == name)
            .unwrap_or_else(|| panic!("unknown fixture {name}"));
        std::fs::write(dir.path().join(name), content).expect("write fixture");
    }
    dir
}

/// In-memory store with `(name, content)` documents loaded into `collection`
pub async fn store_with(collection: &str, documents: &[(&str, &str)]) -> MemoryStore {
    let store = MemoryStore::new();
    for (name, content) in documents {
        store
            .load(collection, name, content.as_bytes(), true)
            .await
            .expect("load fixture");
    }
    store
}

/// Call received by [`ScriptedPidClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PidCall {
    Search { domain: String, target: String },
    Create { domain: String, target: String, name: String },
}

/// PID client answering from a script and recording every call
#[derive(Debug)]
pub struct ScriptedPidClient {
    search: PidSearch,
    create_failure: Option<(u16, String)>,
    created: String,
    calls: Mutex<Vec<PidCall>>,
}

impl ScriptedPidClient {
    /// No existing ARKs; creation returns [`TEST_ARK`]
    pub fn new() -> Self {
        Self {
            search: PidSearch::default(),
            create_failure: None,
            created: TEST_ARK.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Searches report `count` matches listing `access_uris`
    pub fn with_existing(mut self, count: usize, access_uris: &[&str]) -> Self {
        self.search = PidSearch {
            count,
            hits: access_uris
                .iter()
                .map(|uri| ArkHit {
                    pid: uri.rsplit('/').next().unwrap_or_default().to_string(),
                    access_uri: (*uri).to_string(),
                })
                .collect(),
        };
        self
    }

    /// Creation fails with a service error
    pub fn failing_create(mut self, status: u16, message: &str) -> Self {
        self.create_failure = Some((status, message.to_string()));
        self
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<PidCall> {
        self.calls.lock().clone()
    }
}

impl Default for ScriptedPidClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PidClient for ScriptedPidClient {
    async fn search_arks(&self, domain: &str, target: &str) -> PidResult<PidSearch> {
        self.calls.lock().push(PidCall::Search {
            domain: domain.to_string(),
            target: target.to_string(),
        });
        Ok(self.search.clone())
    }

    async fn create_ark(&self, domain: &str, target: &str, name: &str) -> PidResult<String> {
        self.calls.lock().push(PidCall::Create {
            domain: domain.to_string(),
            target: target.to_string(),
            name: name.to_string(),
        });
        match &self.create_failure {
            Some((status, message)) => Err(PidError::service(*status, message.clone())),
            None => Ok(self.created.clone()),
        }
    }
}
