//! Batch commands against temporary source directories and an in-memory store

use fa_admin::{render_file, BatchReport, Config, Session, Verbosity};
use fa_prep::PrepMode;
use fa_render::Markup;
use fa_store::{DocumentStore, MemoryStore};
use fa_test_utils::{
    fixture_dir, fixture_path, fixtures, store_with, ScriptedPidClient, TEST_COLLECTION,
    TEST_PID_DOMAIN, TEST_SITE_URL,
};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

const PREVIEW: &str = "findingaids-preview";

fn config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.store.collection = TEST_COLLECTION.to_string();
    config.store.preview_collection = PREVIEW.to_string();
    config.source.dirs = vec![dir.to_path_buf()];
    config.site.base_url = TEST_SITE_URL.to_string();
    config.pidman.domain = TEST_PID_DOMAIN.to_string();
    config
}

fn session(dir: &Path, store: Arc<MemoryStore>) -> Session {
    Session::new(config(dir), store).with_pid_client(Arc::new(ScriptedPidClient::new()))
}

fn text(out: Vec<u8>) -> String {
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn prep_reports_each_file_and_a_summary() {
    let dir = fixture_dir(&["badlyformed.xml", "hartsfield558.xml", "raoul548.xml"]);
    let session = session(dir.path(), Arc::new(MemoryStore::new()));

    let mut out = Vec::new();
    let report = session.prep(PrepMode::Prep, &[], &mut out).await.unwrap();

    let path = |name: &str| dir.path().join(name).display().to_string();
    assert_eq!(
        text(out),
        format!(
            "Error: failed to load {} (document not well-formed XML?)\n\
             No changes made to {}\n\
             Updated {}\n\
             1 document updated\n\
             1 document unchanged\n\
             1 document with errors\n",
            path("badlyformed.xml"),
            path("hartsfield558.xml"),
            path("raoul548.xml"),
        )
    );
    assert_eq!(
        report,
        BatchReport {
            updated: 1,
            unchanged: 1,
            errored: 1,
            ..BatchReport::default()
        }
    );

    let saved = std::fs::read_to_string(dir.path().join("raoul548.xml")).unwrap();
    assert!(saved.contains("url=\"http://pid.emory.edu/ark:/25593/testark\""));
    assert!(saved.contains("id=\"raoul548_series1\""));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("hartsfield558.xml")).unwrap(),
        fixtures::HARTSFIELD558
    );
}

#[tokio::test]
async fn second_prep_changes_nothing() {
    let dir = fixture_dir(&["raoul548.xml"]);
    let session = session(dir.path(), Arc::new(MemoryStore::new()));
    session.prep(PrepMode::Prep, &[], &mut Vec::new()).await.unwrap();

    let mut out = Vec::new();
    let report = session.prep(PrepMode::Prep, &[], &mut out).await.unwrap();
    assert_eq!(report.unchanged, 1);
    assert!(text(out).starts_with("No changes made to"));
}

#[tokio::test]
async fn clean_does_not_save_failing_documents() {
    let dir = fixture_dir(&["hartsfield558_invalid.xml"]);
    let session = session(dir.path(), Arc::new(MemoryStore::new()));
    let file = dir.path().join("hartsfield558_invalid.xml");

    let mut out = Vec::new();
    let report = session
        .prep(PrepMode::Clean, &[file.clone()], &mut out)
        .await
        .unwrap();
    let out = text(out);

    assert_eq!(report.errored, 1);
    assert!(out.starts_with(&format!(
        "Cleaned EAD for {} does not pass sanity checks, not saving.\n  Errors found:\n    \
         Line 2, column 1: Element 'ead', attribute 'invalid': The attribute 'invalid' is not allowed.\n",
        file.display()
    )));
    assert!(out.ends_with("0 documents updated\n0 documents unchanged\n1 document with errors\n"));
    assert_eq!(
        std::fs::read_to_string(&file).unwrap(),
        fixtures::HARTSFIELD558_INVALID
    );
}

#[tokio::test]
async fn quiet_output_omits_problem_lists() {
    let dir = fixture_dir(&["hartsfield558_invalid.xml", "hartsfield558.xml"]);
    let session =
        session(dir.path(), Arc::new(MemoryStore::new())).with_verbosity(Verbosity::Minimal);

    let mut out = Vec::new();
    session.prep(PrepMode::Clean, &[], &mut out).await.unwrap();
    let out = text(out);
    assert!(!out.contains("Errors found"));
    assert!(!out.contains("No changes made"));
    assert!(out.ends_with("1 document with errors\n"));
}

#[tokio::test]
async fn prep_needs_ark_settings_before_touching_files() {
    let dir = fixture_dir(&["raoul548.xml"]);
    let mut config = config(dir.path());
    config.pidman.domain = String::new();
    let session = Session::new(config, Arc::new(MemoryStore::new()))
        .with_pid_client(Arc::new(ScriptedPidClient::new()));

    let mut out = Vec::new();
    let err = session
        .prep(PrepMode::Prep, &[], &mut out)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "pidman.domain setting is missing");
    assert!(out.is_empty());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("raoul548.xml")).unwrap(),
        fixtures::RAOUL548
    );
}

#[tokio::test]
async fn prep_without_pid_host_is_a_client_error() {
    let dir = fixture_dir(&["raoul548.xml"]);
    let session = Session::new(config(dir.path()), Arc::new(MemoryStore::new()));
    let err = session
        .prep(PrepMode::Prep, &[], &mut Vec::new())
        .await
        .unwrap_err()
        .to_string();
    assert!(err.starts_with("Error initializing PID manager client"), "{err}");
    assert!(err.contains("setting is missing"), "{err}");
}

#[tokio::test]
async fn load_stores_passing_documents() {
    let dir = fixture_dir(&["hartsfield558.xml"]);
    let store = Arc::new(MemoryStore::new());
    let session = session(dir.path(), store.clone());

    let mut out = Vec::new();
    let report = session.load(&[], false, &mut out).await.unwrap();
    assert_eq!(report.loaded, 1);
    assert_eq!(
        text(out),
        format!(
            "Loaded {}\n1 document loaded\n0 documents with errors\n",
            dir.path().join("hartsfield558.xml").display()
        )
    );
    assert!(store
        .describe(TEST_COLLECTION, "hartsfield558.xml")
        .await
        .unwrap()
        .is_some());

    // reloading the same document is not a duplicate
    let report = session.load(&[], false, &mut Vec::new()).await.unwrap();
    assert_eq!(report.loaded, 1);
}

#[tokio::test]
async fn load_refuses_duplicate_eadid() {
    let dir = fixture_dir(&["hartsfield558.xml"]);
    let store = Arc::new(
        store_with(TEST_COLLECTION, &[("copy.xml", fixtures::HARTSFIELD558)]).await,
    );
    let session = session(dir.path(), store.clone());

    let mut out = Vec::new();
    let report = session.load(&[], false, &mut out).await.unwrap();
    let out = text(out);
    assert_eq!(report.errored, 1);
    assert_eq!(report.loaded, 0);
    assert!(out.starts_with(&format!(
        "Error: {} does not pass publication checks; not loading to the document store.\n",
        dir.path().join("hartsfield558.xml").display()
    )));
    assert!(out.contains(
        "    Database contains eadid 'hartsfield558' in a different document (copy.xml)\n"
    ));
    assert!(store
        .describe(TEST_COLLECTION, "hartsfield558.xml")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn preview_load_uses_preview_collection() {
    let dir = fixture_dir(&["hartsfield558.xml"]);
    let store = Arc::new(MemoryStore::new());
    let session = session(dir.path(), store.clone());

    session.load(&[], true, &mut Vec::new()).await.unwrap();
    assert!(store.describe(PREVIEW, "hartsfield558.xml").await.unwrap().is_some());
    assert!(store
        .describe(TEST_COLLECTION, "hartsfield558.xml")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn check_lists_problems_as_json() {
    let dir = fixture_dir(&["hartsfield558.xml", "hartsfield558_invalid.xml"]);
    let session = session(dir.path(), Arc::new(MemoryStore::new()));

    let mut out = Vec::new();
    let report = session.check(&[], true, &mut out).await.unwrap();
    assert_eq!(report.passed, 1);
    assert_eq!(report.errored, 1);

    let listing: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let listing = listing.as_array().unwrap();
    assert_eq!(listing.len(), 2);
    assert!(listing[0]["problems"].as_array().unwrap().is_empty());
    let problems = listing[1]["problems"].as_array().unwrap();
    assert_eq!(problems[0]["check"], "schema");
    assert!(problems
        .iter()
        .any(|problem| problem["check"] == "eadid-filename"));
}

#[tokio::test]
async fn check_reports_unreadable_file_and_continues() {
    let dir = fixture_dir(&["hartsfield558.xml"]);
    let session = session(dir.path(), Arc::new(MemoryStore::new()));
    let missing = dir.path().join("missing.xml");
    let good = dir.path().join("hartsfield558.xml");

    let mut out = Vec::new();
    let report = session
        .check(&[missing.clone(), good.clone()], false, &mut out)
        .await
        .unwrap();
    let out = text(out);

    assert_eq!(report.passed, 1);
    assert_eq!(report.errored, 1);
    assert!(
        out.starts_with(&format!("Error: failed to read {} : ", missing.display())),
        "{out}"
    );
    assert!(out.ends_with(&format!(
        "{} passes publication checks\n1 document passed\n1 document with errors\n",
        good.display()
    )));
}

#[tokio::test]
async fn check_json_carries_read_errors() {
    let dir = fixture_dir(&["hartsfield558.xml"]);
    let session = session(dir.path(), Arc::new(MemoryStore::new()));
    let missing = dir.path().join("missing.xml");

    let mut out = Vec::new();
    session
        .check(&[missing, dir.path().join("hartsfield558.xml")], true, &mut out)
        .await
        .unwrap();
    let listing: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert!(listing[0]["error"].is_string());
    assert!(listing[1].get("error").is_none());
}

#[tokio::test]
async fn prep_reports_unreadable_file_and_continues() {
    let dir = fixture_dir(&["raoul548.xml"]);
    let session = session(dir.path(), Arc::new(MemoryStore::new()));
    let missing = dir.path().join("missing.xml");
    let good = dir.path().join("raoul548.xml");

    let mut out = Vec::new();
    let report = session
        .prep(PrepMode::Prep, &[missing.clone(), good.clone()], &mut out)
        .await
        .unwrap();
    let out = text(out);

    assert_eq!(report.errored, 1);
    assert_eq!(report.updated, 1);
    assert!(
        out.starts_with(&format!("Error: failed to prep {} : ", missing.display())),
        "{out}"
    );
    assert!(out.contains(&format!("Updated {}\n", good.display())));
}

#[tokio::test]
async fn check_text_output() {
    let dir = fixture_dir(&["hartsfield558.xml"]);
    let session = session(dir.path(), Arc::new(MemoryStore::new()));

    let mut out = Vec::new();
    session.check(&[], false, &mut out).await.unwrap();
    assert_eq!(
        text(out),
        format!(
            "{} passes publication checks\n1 document passed\n0 documents with errors\n",
            dir.path().join("hartsfield558.xml").display()
        )
    );
}

#[tokio::test]
async fn delete_leaves_a_tombstone() {
    let dir = fixture_dir(&[]);
    let store = Arc::new(
        store_with(TEST_COLLECTION, &[("hartsfield558.xml", fixtures::HARTSFIELD558)]).await,
    );
    let session = session(dir.path(), store.clone());

    let mut out = Vec::new();
    session
        .delete("hartsfield558", "Withdrawn by the archive", &mut out)
        .await
        .unwrap();
    assert_eq!(
        text(out),
        format!("Deleted hartsfield558 ({TEST_COLLECTION}/hartsfield558.xml)\n")
    );
    assert!(store
        .describe(TEST_COLLECTION, "hartsfield558.xml")
        .await
        .unwrap()
        .is_none());
    let tombstone = store.deleted("hartsfield558").await.unwrap().unwrap();
    assert_eq!(tombstone.title, "William Berry Hartsfield papers, 1860-1983");
    assert_eq!(tombstone.note, "Withdrawn by the archive");

    let err = session
        .delete("hartsfield558", "", &mut Vec::new())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("No document with eadid 'hartsfield558' in {TEST_COLLECTION}")
    );
}

#[tokio::test]
async fn check_eadids_reports_unusable_ids() {
    let dir = fixture_dir(&[]);
    let odd = fixtures::HARTSFIELD558.replace(">hartsfield558</eadid>", ">foo bar</eadid>");
    let store = Arc::new(
        store_with(
            TEST_COLLECTION,
            &[("bad.xml", odd.as_str()), ("hartsfield558.xml", fixtures::HARTSFIELD558)],
        )
        .await,
    );
    let session = session(dir.path(), store);

    let mut out = Vec::new();
    let mismatched = session.check_eadids(&mut out).await.unwrap();
    assert_eq!(mismatched, 1);
    assert_eq!(
        text(out),
        "Checking the ead id against the regex '^[-_A-Za-z0-9.]+$'\n\
         'foo bar' does not match\n\
         total records: 2\n\
         error: 1\n"
    );
}

#[test]
fn render_prints_one_field() {
    let mut out = Vec::new();
    render_file(
        &fixture_path("hartsfield558.xml"),
        "archdesc/did/unittitle",
        Markup::Rdfa,
        &mut out,
    )
    .unwrap();
    assert_eq!(
        text(out),
        "William Berry Hartsfield papers, <span property=\"dc:date\" content=\"1860/1983\">1860-1983</span>\n"
    );

    let err = render_file(
        &fixture_path("hartsfield558.xml"),
        "archdesc/otherfindaid",
        Markup::Html,
        &mut Vec::new(),
    )
    .unwrap_err();
    assert!(err.to_string().ends_with("has no archdesc/otherfindaid"));
}

#[test]
fn config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fa-admin.toml");
    let config = config(dir.path());
    std::fs::write(&path, toml::to_string(&config).unwrap()).unwrap();
    assert_eq!(Config::discover(Some(&path)).unwrap(), config);
    assert!(Config::discover(Some(&dir.path().join("missing.toml"))).is_err());
}
