//! Prep and clean orchestration
//!
//! Runs the preparation steps over one finding aid in a fixed order:
//! 1. eadid from the source file name
//! 2. series, subseries and index ids
//! 3. leading-whitespace cleanup
//! 4. ARK reconciliation (prep mode only)
//!
//! The result carries both serializations so the caller can tell whether
//! anything changed. Nothing is written here; the caller validates the
//! prepared bytes and decides whether to save them.

use crate::ark::{ArkOutcome, ArkReconciler};
use crate::error::{PrepError, PrepResult};
use crate::ids::assign_ids;
use crate::normalize::normalize_whitespace;
use fa_ead::FindingAid;
use std::fmt::{self, Display, Formatter};
use std::path::Path;
use tracing::debug;

/// Which steps run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepMode {
    /// Ids, whitespace and ARKs
    Prep,
    /// Ids and whitespace only
    Clean,
}

impl Display for PrepMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Prep => "Prepared",
            Self::Clean => "Cleaned",
        })
    }
}

/// Whether preparation changed the serialized document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepOutcome {
    /// Output differs from the source
    Updated,
    /// Output is byte-identical to the source
    Unchanged,
}

/// A prepared document
#[derive(Debug, Clone)]
pub struct Prepared {
    /// Prepared finding aid
    pub ead: FindingAid,
    /// Serialized prepared document
    pub content: String,
    /// Updated or unchanged
    pub outcome: PrepOutcome,
}

impl Prepared {
    /// Prepared bytes
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

/// eadid expected for a source path: the file name without `.xml`
#[must_use]
pub fn eadid_for_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(".xml") {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

/// Runs the preparation steps in one mode
#[derive(Debug, Clone)]
pub struct Preparer {
    mode: PrepMode,
    ark: Option<ArkReconciler>,
}

impl Preparer {
    /// Full preparation with ARK reconciliation
    #[must_use]
    pub fn prep(ark: ArkReconciler) -> Self {
        Self {
            mode: PrepMode::Prep,
            ark: Some(ark),
        }
    }

    /// Cleanup without ARKs
    #[must_use]
    pub fn clean() -> Self {
        Self {
            mode: PrepMode::Clean,
            ark: None,
        }
    }

    /// Mode in use
    #[inline]
    #[must_use]
    pub fn mode(&self) -> PrepMode {
        self.mode
    }

    /// Prepare a parsed document read from `source_path`
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::NotEad`] for non-EAD documents and
    /// [`PrepError::Ark`] when ARK reconciliation fails.
    pub async fn prepare(&self, mut ead: FindingAid, source_path: &Path) -> PrepResult<Prepared> {
        if !ead.is_ead() {
            return Err(PrepError::NotEad(source_path.display().to_string()));
        }
        let original = ead.document().to_xml_string();

        let eadid = eadid_for_path(source_path);
        if ead.eadid_value() != eadid {
            debug!("Setting eadid to {}", eadid);
            ead.set_eadid_value(&eadid);
        }
        assign_ids(&mut ead);
        normalize_whitespace(&mut ead);
        if let Some(ark) = &self.ark {
            if ark.reconcile(&mut ead).await? == ArkOutcome::Updated {
                debug!("ARK set for {}", eadid);
            }
        }

        let content = ead.document().to_xml_string();
        let outcome = if content == original {
            PrepOutcome::Unchanged
        } else {
            PrepOutcome::Updated
        };
        debug!("{} {}: {:?}", self.mode, source_path.display(), outcome);
        Ok(Prepared {
            ead,
            content,
            outcome,
        })
    }

    /// Read, parse and prepare a file
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Xml`] when the file cannot be read or is not
    /// well-formed, plus the errors of [`Preparer::prepare`].
    pub async fn prepare_file(&self, path: &Path) -> PrepResult<Prepared> {
        let ead = FindingAid::from_file(path)?;
        self.prepare(ead, path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eadid_from_path() {
        assert_eq!(eadid_for_path(Path::new("/src/ead/abbey244.xml")), "abbey244");
        assert_eq!(eadid_for_path(Path::new("notes.txt")), "notes.txt");
    }

    #[tokio::test]
    async fn clean_sets_eadid_and_ids() {
        let ead = FindingAid::parse(
            r#"<ead><eadheader><eadid>wrong</eadid></eadheader><archdesc level="collection"><did/><dsc><c01 level="series"><did/></c01></dsc></archdesc></ead>"#,
        )
        .unwrap();
        let prepared = Preparer::clean()
            .prepare(ead, Path::new("right1.xml"))
            .await
            .unwrap();
        assert_eq!(prepared.outcome, PrepOutcome::Updated);
        assert_eq!(prepared.ead.eadid_value(), "right1");
        assert_eq!(prepared.ead.series()[0].id().as_deref(), Some("right1_series1"));
    }

    #[tokio::test]
    async fn non_ead_root_is_rejected() {
        let doc = FindingAid::parse("<html/>").unwrap();
        let err = Preparer::clean()
            .prepare(doc, Path::new("page.xml"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "page.xml is not an EAD document");
    }
}
