//! REST client for the PID manager
//!
//! - `GET {host}/pids/?domain_uri=..&target=..&type=ark` searches
//! - `POST {host}/ark/` with `domain`, `target_uri`, `name` mints and returns
//!   the new access URI as plain text
//!
//! Both calls use HTTP basic authentication.

use crate::client::{ArkHit, PidClient, PidSearch};
use crate::error::{PidError, PidResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Connection settings for [`PidmanClient`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PidmanSettings {
    /// Base URL, e.g. `https://pid.example.edu`
    pub host: String,
    /// Account name
    pub user: String,
    /// Account password
    pub password: String,
    /// Request timeout
    pub timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results_count: usize,
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    pid: String,
    #[serde(default)]
    targets: Vec<SearchTarget>,
}

#[derive(Debug, Deserialize)]
struct SearchTarget {
    access_uri: String,
}

/// Decode a search response body
///
/// Results without a target are skipped.
///
/// # Errors
///
/// Returns [`PidError::InvalidResponse`] for bodies that are not search JSON.
pub fn decode_search(body: &str) -> PidResult<PidSearch> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| PidError::InvalidResponse(e.to_string()))?;
    let hits = response
        .results
        .into_iter()
        .filter_map(|result| {
            let target = result.targets.into_iter().next()?;
            Some(ArkHit {
                pid: result.pid,
                access_uri: target.access_uri,
            })
        })
        .collect();
    Ok(PidSearch {
        count: response.results_count,
        hits,
    })
}

/// PID manager REST client
#[derive(Debug, Clone)]
pub struct PidmanClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
}

impl PidmanClient {
    /// Build a client
    ///
    /// # Errors
    ///
    /// Returns [`PidError::Config`] when a setting is missing or the HTTP
    /// client cannot be created.
    pub fn new(settings: &PidmanSettings) -> PidResult<Self> {
        for (name, value) in [
            ("host", &settings.host),
            ("user", &settings.user),
            ("password", &settings.password),
        ] {
            if value.trim().is_empty() {
                return Err(PidError::config(format!("pidman.{name} setting is missing")));
            }
        }
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("fa-admin/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| PidError::config(e.to_string()))?;
        Ok(Self {
            http,
            base_url: settings.host.trim_end_matches('/').to_string(),
            user: settings.user.clone(),
            password: settings.password.clone(),
        })
    }

    /// Base URL without trailing slash
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> PidResult<String> {
        let response = request
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await
            .map_err(|e| PidError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PidError::Transport(e.to_string()))?;
        if !status.is_success() {
            let message = match body.trim() {
                "" => status.canonical_reason().unwrap_or("error").to_string(),
                text => text.to_string(),
            };
            return Err(PidError::service(status.as_u16(), message));
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl PidClient for PidmanClient {
    async fn search_arks(&self, domain: &str, target: &str) -> PidResult<PidSearch> {
        let url = format!("{}/pids/", self.base_url);
        debug!("Searching {} for ARKs targeting {}", url, target);
        let body = self
            .send(
                self.http
                    .get(&url)
                    .header("Accept", "application/json")
                    .query(&[("domain_uri", domain), ("target", target), ("type", "ark")]),
            )
            .await?;
        decode_search(&body)
    }

    async fn create_ark(&self, domain: &str, target: &str, name: &str) -> PidResult<String> {
        let url = format!("{}/ark/", self.base_url);
        debug!("Minting ARK at {} for {}", url, target);
        let body = self
            .send(
                self.http
                    .post(&url)
                    .form(&[("domain", domain), ("target_uri", target), ("name", name)]),
            )
            .await?;
        let uri = body.trim();
        if uri.is_empty() {
            return Err(PidError::InvalidResponse("empty body from ARK creation".into()));
        }
        Ok(uri.to_string())
    }
}
