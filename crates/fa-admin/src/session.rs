//! Batch commands over EAD source files and the document store
//!
//! Every command writes its console report to the given writer and returns
//! the counters. Configuration problems are returned as errors before any
//! file is touched; problems with a single file are reported and the batch
//! moves on.

use crate::config::Config;
use crate::report::{documents, write_problems, BatchReport, FileProblems, Verbosity};
use anyhow::bail;
use fa_ead::FindingAid;
use fa_pid::{PidClient, PidmanClient};
use fa_prep::{ArkReconciler, PrepError, PrepMode, PrepOutcome, Preparer};
use fa_render::{render_field, Markup};
use fa_store::{Deleted, DocumentStore, FsStore, StoredDocument};
use fa_validate::{Problem, Validator, EADID_URL_PATTERN};
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Configuration plus the collaborators commands run against
pub struct Session {
    config: Config,
    store: Arc<dyn DocumentStore>,
    pid_client: Option<Arc<dyn PidClient>>,
    validator: Validator,
    verbosity: Verbosity,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("verbosity", &self.verbosity)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Session over an explicit store
    #[must_use]
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config,
            store,
            pid_client: None,
            validator: Validator::new(),
            verbosity: Verbosity::Normal,
        }
    }

    /// Session over the filesystem store at `store.root`
    ///
    /// # Errors
    ///
    /// Fails when `store.root` is not configured.
    pub fn open(config: Config) -> anyhow::Result<Self> {
        let store = FsStore::new(config.store_root()?);
        Ok(Self::new(config, Arc::new(store)))
    }

    /// Use this PID client instead of one built from `[pidman]`
    #[must_use]
    pub fn with_pid_client(mut self, client: Arc<dyn PidClient>) -> Self {
        self.pid_client = Some(client);
        self
    }

    /// Set output verbosity
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Preparer for `mode`; prep mode needs the site and PID manager settings
    ///
    /// # Errors
    ///
    /// Fails when a required setting is missing or the PID client cannot be built.
    pub fn preparer(&self, mode: PrepMode) -> anyhow::Result<Preparer> {
        if mode == PrepMode::Clean {
            return Ok(Preparer::clean());
        }
        let settings = self.config.ark_settings()?;
        let client = match &self.pid_client {
            Some(client) => client.clone(),
            None => {
                let client = PidmanClient::new(&self.config.pidman_settings())
                    .map_err(|e| fa_prep::ArkError::client(&e))?;
                Arc::new(client) as Arc<dyn PidClient>
            }
        };
        Ok(Preparer::prep(ArkReconciler::new(client, settings)?))
    }

    /// Prepare or clean `files`, saving those that change and still pass checks
    ///
    /// # Errors
    ///
    /// Configuration errors, before any file is processed, and write failures
    /// on `out`.
    pub async fn prep(
        &self,
        mode: PrepMode,
        named: &[PathBuf],
        out: &mut impl Write,
    ) -> anyhow::Result<BatchReport> {
        let collection = self.config.collection(false)?;
        let preparer = self.preparer(mode)?;
        if self.verbosity == Verbosity::All && named.is_empty() {
            writeln!(out, "Preparing documents from all configured source directories")?;
        }
        let files = self.config.source_files(named)?;

        let mut report = BatchReport::default();
        for file in &files {
            let shown = file.display();
            let prepared = match preparer.prepare_file(file).await {
                Ok(prepared) => prepared,
                Err(PrepError::Xml(e)) if e.is_malformed() => {
                    debug!("{}: {}", shown, e);
                    writeln!(out, "Error: failed to load {shown} (document not well-formed XML?)")?;
                    report.errored += 1;
                    continue;
                }
                Err(e) => {
                    writeln!(out, "Error: failed to prep {shown} : {e}")?;
                    report.errored += 1;
                    continue;
                }
            };

            let destination = StoredDocument::new(collection, file_name(file));
            let problems = self
                .validator
                .check(prepared.bytes(), &destination, self.store.as_ref())
                .await?;
            if !problems.is_empty() {
                report.errored += 1;
                writeln!(
                    out,
                    "{} EAD for {shown} does not pass sanity checks, not saving.",
                    preparer.mode()
                )?;
                if self.verbosity >= Verbosity::Normal {
                    write_problems(out, &problems)?;
                }
            } else if prepared.outcome == PrepOutcome::Unchanged {
                report.unchanged += 1;
                if self.verbosity >= Verbosity::Normal {
                    writeln!(out, "No changes made to {shown}")?;
                }
            } else if let Err(e) = std::fs::write(file, prepared.bytes()) {
                writeln!(out, "Error: failed to save {shown} : {e}")?;
                report.errored += 1;
            } else {
                report.updated += 1;
                info!("Saved {}", shown);
                if self.verbosity >= Verbosity::Normal {
                    writeln!(out, "Updated {shown}")?;
                }
            }
        }

        writeln!(out, "{} updated", documents(report.updated))?;
        writeln!(out, "{} unchanged", documents(report.unchanged))?;
        writeln!(out, "{} with errors", documents(report.errored))?;
        Ok(report)
    }

    /// Run the publication checks on `files` without changing anything
    ///
    /// # Errors
    ///
    /// Configuration, store and output failures.
    pub async fn check(
        &self,
        named: &[PathBuf],
        json: bool,
        out: &mut impl Write,
    ) -> anyhow::Result<BatchReport> {
        let collection = self.config.collection(false)?;
        let files = self.config.source_files(named)?;

        let mut report = BatchReport::default();
        let mut results = Vec::with_capacity(files.len());
        for file in &files {
            let content = match std::fs::read(file) {
                Ok(content) => content,
                Err(e) => {
                    report.errored += 1;
                    results.push(FileCheck {
                        file: file.display().to_string(),
                        read_error: Some(e.to_string()),
                        problems: Vec::new(),
                    });
                    continue;
                }
            };
            let destination = StoredDocument::new(collection, file_name(file));
            let problems = self
                .validator
                .check(&content, &destination, self.store.as_ref())
                .await?;
            if problems.is_empty() {
                report.passed += 1;
            } else {
                report.errored += 1;
            }
            results.push(FileCheck {
                file: file.display().to_string(),
                read_error: None,
                problems,
            });
        }

        if json {
            let listing: Vec<FileProblems<'_>> = results
                .iter()
                .map(|result| FileProblems {
                    file: result.file.clone(),
                    error: result.read_error.clone(),
                    problems: &result.problems,
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &listing)?;
            writeln!(out)?;
            return Ok(report);
        }

        for FileCheck {
            file,
            read_error,
            problems,
        } in &results
        {
            if let Some(e) = read_error {
                writeln!(out, "Error: failed to read {file} : {e}")?;
            } else if problems.is_empty() {
                if self.verbosity >= Verbosity::Normal {
                    writeln!(out, "{file} passes publication checks")?;
                }
            } else {
                writeln!(out, "{file} does not pass publication checks")?;
                if self.verbosity >= Verbosity::Normal {
                    write_problems(out, problems)?;
                }
            }
        }
        writeln!(out, "{} passed", documents(report.passed))?;
        writeln!(out, "{} with errors", documents(report.errored))?;
        Ok(report)
    }

    /// Check `files` and load those that pass into the published or preview
    /// collection
    ///
    /// # Errors
    ///
    /// Configuration and output failures.
    pub async fn load(
        &self,
        named: &[PathBuf],
        preview: bool,
        out: &mut impl Write,
    ) -> anyhow::Result<BatchReport> {
        let collection = self.config.collection(preview)?;
        let files = self.config.source_files(named)?;
        if self.verbosity == Verbosity::All {
            writeln!(out, "Documents will be loaded to collection: {collection}")?;
        }

        let mut report = BatchReport::default();
        for file in &files {
            let shown = file.display();
            let content = match std::fs::read(file) {
                Ok(content) => content,
                Err(e) => {
                    writeln!(out, "Error: failed to read {shown} : {e}")?;
                    report.errored += 1;
                    continue;
                }
            };
            let destination = StoredDocument::new(collection, file_name(file));
            let problems = self
                .validator
                .check(&content, &destination, self.store.as_ref())
                .await?;
            if !problems.is_empty() {
                report.errored += 1;
                writeln!(
                    out,
                    "Error: {shown} does not pass publication checks; not loading to the document store."
                )?;
                if self.verbosity >= Verbosity::Normal {
                    write_problems(out, &problems)?;
                }
                continue;
            }
            match self
                .store
                .load(&destination.collection, &destination.name, &content, true)
                .await
            {
                Ok(()) => {
                    report.loaded += 1;
                    info!("Loaded {} as {}", shown, destination);
                    if self.verbosity >= Verbosity::Normal {
                        writeln!(out, "Loaded {shown}")?;
                    }
                }
                Err(e) => {
                    report.errored += 1;
                    writeln!(out, "Error: failed to load {shown} to the document store")?;
                    writeln!(out, "{e}")?;
                }
            }
        }

        writeln!(out, "{} loaded", documents(report.loaded))?;
        writeln!(out, "{} with errors", documents(report.errored))?;
        Ok(report)
    }

    /// Remove the published document with `eadid` and leave a tombstone
    ///
    /// # Errors
    ///
    /// Fails when no document carries `eadid` or the store refuses.
    pub async fn delete(&self, eadid: &str, note: &str, out: &mut impl Write) -> anyhow::Result<()> {
        let collection = self.config.collection(false)?;
        let found = self.store.find_by_eadid(collection, eadid).await?;
        let Some(document) = found.first() else {
            bail!("No document with eadid '{eadid}' in {collection}");
        };
        if found.len() > 1 {
            bail!(
                "eadid '{eadid}' is used by {} documents; remove them by hand",
                found.len()
            );
        }

        let content = self
            .store
            .fetch(&document.collection, &document.name)
            .await?;
        let title = FindingAid::from_bytes(&content)
            .map(|ead| ead.title())
            .unwrap_or_default();
        self.store
            .remove(&document.collection, &document.name)
            .await?;
        self.store
            .record_deleted(Deleted::new(eadid, title, note))
            .await?;
        info!("Removed {} ({})", eadid, document);
        writeln!(out, "Deleted {eadid} ({document})")?;
        Ok(())
    }

    /// Report stored eadids that cannot be used in site URLs
    ///
    /// Returns the number of eadids that do not match.
    ///
    /// # Errors
    ///
    /// Configuration, store and output failures.
    pub async fn check_eadids(&self, out: &mut impl Write) -> anyhow::Result<usize> {
        let collection = self.config.collection(false)?;
        let pattern = Regex::new(EADID_URL_PATTERN)?;
        writeln!(out, "Checking the ead id against the regex '{EADID_URL_PATTERN}'")?;

        let stored = self.store.eadids(collection).await?;
        let mut mismatched = 0;
        for entry in &stored {
            if !pattern.is_match(&entry.eadid) {
                mismatched += 1;
                writeln!(out, "'{}' does not match", entry.eadid)?;
            }
        }
        writeln!(out, "total records: {}", stored.len())?;
        writeln!(out, "error: {mismatched}")?;
        Ok(mismatched)
    }
}

/// Render one field of an EAD file as HTML
///
/// `field` is a `/`-separated element path below the root, e.g.
/// `archdesc/did/unittitle`.
///
/// # Errors
///
/// Fails for unreadable or malformed files and missing fields.
pub fn render_file(
    file: &Path,
    field: &str,
    markup: Markup,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let ead = FindingAid::from_file(file)?;
    let steps: Vec<&str> = field.split('/').filter(|step| !step.is_empty()).collect();
    let Some(html) = render_field(&ead, &steps, markup) else {
        bail!("{} has no {field}", file.display());
    };
    writeln!(out, "{html}")?;
    Ok(())
}

/// Outcome of checking one file, kept until the report is written
struct FileCheck {
    file: String,
    read_error: Option<String>,
    problems: Vec<Problem>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
