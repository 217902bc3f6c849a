//! Validation problems
//!
//! A [`Problem`] is a value, not an error: the validator collects them in a
//! fixed order and the caller refuses to publish while any remain.

use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Which check reported a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    /// Document could not be parsed
    WellFormed,
    /// Document does not follow the EAD element and attribute rules
    Schema,
    /// eadid differs from the file name
    EadidFilename,
    /// eadid already used by other stored documents
    EadidUnique,
    /// Series or subseries without an id
    SeriesId,
    /// Index without an id
    IndexId,
    /// Same id on several series or index components
    DuplicateId,
    /// eadid contains characters not allowed in site URLs
    EadidPattern,
    /// More than one collection-level origination
    Origination,
    /// dids with other than two containers
    Containers,
    /// List title empty or starting with whitespace
    ListTitle,
    /// List title starts with a character that is not a browse letter
    FirstLetter,
    /// Control-access term starting with whitespace
    Controlaccess,
    /// `eadid/@url` missing or not an ARK
    ArkUrl,
    /// `eadid/@identifier` missing or not an ARK
    ArkIdentifier,
    /// URL and identifier ARKs disagree
    ArkMismatch,
}

impl Check {
    /// Stable short code, e.g. `series-id`
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::WellFormed => "well-formed",
            Self::Schema => "schema",
            Self::EadidFilename => "eadid-filename",
            Self::EadidUnique => "eadid-unique",
            Self::SeriesId => "series-id",
            Self::IndexId => "index-id",
            Self::DuplicateId => "duplicate-id",
            Self::EadidPattern => "eadid-pattern",
            Self::Origination => "origination",
            Self::Containers => "containers",
            Self::ListTitle => "list-title",
            Self::FirstLetter => "first-letter",
            Self::Controlaccess => "controlaccess",
            Self::ArkUrl => "ark-url",
            Self::ArkIdentifier => "ark-identifier",
            Self::ArkMismatch => "ark-mismatch",
        }
    }
}

impl Display for Check {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One reason a document is not fit for publication
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    /// Reporting check
    pub check: Check,
    /// Human-readable message, shown verbatim
    pub message: String,
    /// Supporting lines, e.g. the offending nodes of an aggregate problem
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl Problem {
    /// Problem without details
    #[must_use]
    pub fn new(check: Check, message: impl Into<String>) -> Self {
        Self {
            check,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Attach detail lines
    #[must_use]
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for detail in &self.details {
            write!(f, "\n    {detail}")?;
        }
        Ok(())
    }
}

impl PartialEq<str> for Problem {
    fn eq(&self, other: &str) -> bool {
        self.message == other
    }
}

impl PartialEq<&str> for Problem {
    fn eq(&self, other: &&str) -> bool {
        self.message == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_display_indents_details() {
        let problem = Problem::new(Check::Containers, "Site expects 2 containers per did; found 1 did(s) with only 1")
            .with_details(vec!["Line 12: did with 1 container".into()]);
        assert_eq!(
            problem.to_string(),
            "Site expects 2 containers per did; found 1 did(s) with only 1\n    Line 12: did with 1 container"
        );
        assert_eq!(problem.check.code(), "containers");
    }

    #[test]
    fn problem_compares_with_message() {
        let problem = Problem::new(Check::IndexId, "index id attribute is not set for Index");
        assert!(problem == "index id attribute is not set for Index");
    }
}
