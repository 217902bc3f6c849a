//! ARK (Archival Resource Key) syntax
//!
//! An ARK has a resolvable long form such as
//! `http://pid.example.edu/ark:/25593/17kjg` and a short form
//! `ark:/25593/17kjg`. The long form may carry a qualifier after the object
//! name (`/PDF`, `.v2`, `?info`).

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

static ARK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<nma>https?://[^/\s]+/)?ark:/(?P<naan>\d+)/(?P<noid>[^/.?#\s]+)(?P<qualifier>[/.?#]\S*)?$",
    )
    .expect("ARK pattern is a valid regex")
});

/// Parsed ARK
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ark {
    /// Name mapping authority, e.g. `http://pid.example.edu/`
    pub nma: Option<String>,
    /// Name assigning authority number
    pub naan: String,
    /// Object name
    pub noid: String,
    /// Anything after the object name
    pub qualifier: Option<String>,
}

impl Ark {
    /// Parse an ARK in long or short form
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let caps = ARK_PATTERN.captures(value.trim())?;
        Some(Self {
            nma: caps.name("nma").map(|m| m.as_str().to_string()),
            naan: caps["naan"].to_string(),
            noid: caps["noid"].to_string(),
            qualifier: caps.name("qualifier").map(|m| m.as_str().to_string()),
        })
    }

    /// Short form `ark:/<naan>/<noid>`
    #[must_use]
    pub fn short_form(&self) -> String {
        format!("ark:/{}/{}", self.naan, self.noid)
    }
}

impl Display for Ark {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(nma) = &self.nma {
            f.write_str(nma)?;
        }
        write!(f, "ark:/{}/{}", self.naan, self.noid)?;
        if let Some(qualifier) = &self.qualifier {
            f.write_str(qualifier)?;
        }
        Ok(())
    }
}

/// Error for values that are not ARKs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not an ARK: '{0}'")]
pub struct NotAnArk(pub String);

impl FromStr for Ark {
    type Err = NotAnArk;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| NotAnArk(s.to_string()))
    }
}

/// True when `value` is an ARK in long or short form
#[must_use]
pub fn is_ark(value: &str) -> bool {
    Ark::parse(value).is_some()
}

/// Object name of an ARK, e.g. `17kjg` for `http://pid.example.edu/ark:/25593/17kjg`
#[must_use]
pub fn ark_pid(value: &str) -> Option<String> {
    Ark::parse(value).map(|ark| ark.noid)
}
