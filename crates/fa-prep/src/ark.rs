//! ARK reconciliation
//!
//! A published finding aid carries its ARK twice: the resolvable URL in
//! `eadid/@url` and the short `ark:/naan/noid` form in `eadid/@identifier`.
//! The reconciler reuses an ARK already minted for the document's site URL
//! before minting a new one.

use crate::error::ArkError;
use fa_ead::{is_ark, Ark, FindingAid};
use fa_pid::PidClient;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Site and PID manager settings for ARK reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArkSettings {
    /// Public base URL of the site, e.g. `https://findingaids.example.edu/`
    pub site_base_url: String,
    /// PID manager domain new ARKs are minted in
    pub domain: String,
}

impl ArkSettings {
    /// Site URL an ARK for `eadid` should resolve to
    #[must_use]
    pub fn target_url(&self, eadid: &str) -> String {
        format!("{}/documents/{eadid}/", self.site_base_url.trim_end_matches('/'))
    }
}

/// What reconciliation did to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArkOutcome {
    /// Both attributes already held ARKs
    Present,
    /// `eadid/@url` and/or `eadid/@identifier` were set
    Updated,
}

/// Finds or mints ARKs and writes them to `eadid`
#[derive(Clone)]
pub struct ArkReconciler {
    client: Arc<dyn PidClient>,
    settings: ArkSettings,
}

impl std::fmt::Debug for ArkReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArkReconciler")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ArkReconciler {
    /// Create a reconciler
    ///
    /// # Errors
    ///
    /// Returns [`ArkError::Config`] when no domain is configured.
    pub fn new(client: Arc<dyn PidClient>, settings: ArkSettings) -> Result<Self, ArkError> {
        if settings.domain.trim().is_empty() {
            return Err(ArkError::missing_domain());
        }
        Ok(Self { client, settings })
    }

    /// Settings in use
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ArkSettings {
        &self.settings
    }

    /// ARK access URI for `ead`: an existing one targeting the document's
    /// site URL, else a newly minted one named after the unit title.
    ///
    /// # Errors
    ///
    /// Returns [`ArkError::Generation`] when the search or creation fails.
    pub async fn generate_ark(&self, ead: &FindingAid) -> Result<String, ArkError> {
        let eadid = ead.eadid_value();
        let target = self.settings.target_url(&eadid);
        let domain = self.settings.domain.as_str();

        let found = self
            .client
            .search_arks(domain, &target)
            .await
            .map_err(ArkError::from)?;
        if let Some(first) = found.hits.first() {
            if found.count > 1 {
                warn!(
                    "Found {} ARKs when searching for an existing ARK for {}",
                    found.count, eadid
                );
            }
            info!("Using existing ARK {} for {}", first.access_uri, eadid);
            return Ok(first.access_uri.clone());
        }

        let name = ead.title();
        debug!("Minting ARK for {} targeting {}", eadid, target);
        self.client
            .create_ark(domain, &target, &name)
            .await
            .map_err(ArkError::from)
    }

    /// Make sure `eadid/@url` holds an ARK and `eadid/@identifier` its short
    /// form.
    ///
    /// # Errors
    ///
    /// Returns [`ArkError::Generation`] when the document has no `eadid`, or
    /// when a new ARK is needed and cannot be found or minted. Nothing is
    /// changed on error.
    pub async fn reconcile(&self, ead: &mut FindingAid) -> Result<ArkOutcome, ArkError> {
        if ead.eadid().is_none() {
            return Err(ArkError::missing_eadid());
        }
        let mut outcome = ArkOutcome::Present;

        let url = match ead.eadid_url().filter(|url| is_ark(url)) {
            Some(url) => url,
            None => {
                outcome = ArkOutcome::Updated;
                self.generate_ark(ead).await?
            }
        };
        let ark = Ark::parse(&url).ok_or_else(|| ArkError::not_an_ark(&url))?;

        let Some(eadid) = ead.eadid_mut() else {
            return Err(ArkError::missing_eadid());
        };
        if outcome == ArkOutcome::Updated {
            eadid.set_attribute("url", &url);
        }
        if !eadid.attribute("identifier").is_some_and(|id| is_ark(&id)) {
            eadid.set_attribute("identifier", &ark.short_form());
            outcome = ArkOutcome::Updated;
        }

        Ok(outcome)
    }
}
