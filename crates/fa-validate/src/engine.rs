//! Validation engine and the publication validator
//!
//! [`ValidationEngine`] holds an ordered registry of content rules.
//! [`Validator`] runs the full publication check: well-formedness, schema,
//! eadid against file name, eadid uniqueness in the store, then the content
//! rules.

use crate::problem::{Check, Problem};
use crate::rules::{
    ArkRule, ContainerRule, ControlaccessRule, DuplicateIdRule, EadidPatternRule, IndexIdRule,
    ListTitleRule, OriginationRule, SeriesIdRule, ValidationRule,
};
use crate::schema::SchemaChecker;
use fa_ead::FindingAid;
use fa_store::{DocumentStore, StoreResult, StoredDocument};
use tracing::debug;

/// Ordered registry of content rules
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Engine without rules
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Engine with the site's rules in reporting order
    #[must_use]
    pub fn site_defaults() -> Self {
        Self::new()
            .add_rule(SeriesIdRule)
            .add_rule(IndexIdRule)
            .add_rule(DuplicateIdRule)
            .add_rule(EadidPatternRule)
            .add_rule(OriginationRule)
            .add_rule(ContainerRule)
            .add_rule(ListTitleRule)
            .add_rule(ControlaccessRule)
            .add_rule(ArkRule)
    }

    /// Append a rule
    #[must_use]
    pub fn add_rule<R: ValidationRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Number of registered rules
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Problems from every rule, in registration order
    #[must_use]
    pub fn run(&self, ead: &FindingAid) -> Vec<Problem> {
        let mut problems = Vec::new();
        for rule in &self.rules {
            let mut found = rule.check(ead);
            if !found.is_empty() {
                debug!("Rule {} reported {} problem(s)", rule.rule_id(), found.len());
            }
            problems.append(&mut found);
        }
        problems
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::site_defaults()
    }
}

impl std::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.rule_id()))
            .finish()
    }
}

/// Content checks with the site rules, independent of file name and store
#[must_use]
pub fn check_eadxml(ead: &FindingAid) -> Vec<Problem> {
    ValidationEngine::site_defaults().run(ead)
}

/// eadid expected for a document name: the name without its `.xml` extension
#[must_use]
pub fn expected_eadid(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.strip_suffix(".xml").unwrap_or(base)
}

/// Publication validator
#[derive(Debug, Default)]
pub struct Validator {
    schema: SchemaChecker,
    engine: ValidationEngine,
}

impl Validator {
    /// Validator with the built-in schema and site rules
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator with a custom rule engine
    #[must_use]
    pub fn with_engine(engine: ValidationEngine) -> Self {
        Self {
            schema: SchemaChecker::new(),
            engine,
        }
    }

    /// Rule engine
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    /// Full publication check of `content` destined for `destination`.
    ///
    /// Returns an empty list when the document may be published. A document
    /// that is not well-formed yields a single problem.
    ///
    /// # Errors
    ///
    /// Returns a store error only when the eadid lookup fails.
    pub async fn check(
        &self,
        content: &[u8],
        destination: &StoredDocument,
        store: &dyn DocumentStore,
    ) -> StoreResult<Vec<Problem>> {
        debug!("Checking {}", destination);
        let ead = match FindingAid::from_bytes(content) {
            Ok(ead) => ead,
            Err(e) => {
                return Ok(vec![Problem::new(
                    Check::WellFormed,
                    format!("XML is not well-formed: {e}"),
                )])
            }
        };
        self.check_ead(&ead, destination, store).await
    }

    /// Publication check of an already parsed document
    ///
    /// # Errors
    ///
    /// Returns a store error only when the eadid lookup fails.
    pub async fn check_ead(
        &self,
        ead: &FindingAid,
        destination: &StoredDocument,
        store: &dyn DocumentStore,
    ) -> StoreResult<Vec<Problem>> {
        let mut problems = self.schema.check(ead.document());
        let filename_ok = match self.check_filename(ead, &destination.name) {
            Some(problem) => {
                problems.push(problem);
                false
            }
            None => true,
        };
        if filename_ok {
            problems.extend(check_eadid_unique(ead, destination, store).await?);
        }
        problems.extend(self.engine.run(ead));
        debug!("{} problem(s) in {}", problems.len(), destination);
        Ok(problems)
    }

    /// Check that does not consult a store: schema, eadid against `filename`,
    /// content rules
    #[must_use]
    pub fn check_document(&self, ead: &FindingAid, filename: &str) -> Vec<Problem> {
        let mut problems = self.schema.check(ead.document());
        problems.extend(self.check_filename(ead, filename));
        problems.extend(self.engine.run(ead));
        problems
    }

    fn check_filename(&self, ead: &FindingAid, filename: &str) -> Option<Problem> {
        let eadid = ead.eadid_value();
        let expected = expected_eadid(filename);
        (eadid != expected).then(|| {
            Problem::new(
                Check::EadidFilename,
                format!("eadid '{eadid}' does not match expected value of '{expected}'"),
            )
        })
    }
}

/// eadid is used only by `destination` within its collection
///
/// # Errors
///
/// Returns the store error when the lookup fails.
pub async fn check_eadid_unique(
    ead: &FindingAid,
    destination: &StoredDocument,
    store: &dyn DocumentStore,
) -> StoreResult<Vec<Problem>> {
    let eadid = ead.eadid_value();
    let found = store
        .find_by_eadid(&destination.collection, &eadid)
        .await?;
    let problem = match found.as_slice() {
        [] => None,
        [only] if only == destination => None,
        [only] => Some(format!(
            "Database contains eadid '{eadid}' in a different document ({})",
            only.name
        )),
        many => Some(format!(
            "Database already contains {} instances of eadid '{eadid}'! ({})",
            many.len(),
            many.iter()
                .map(|doc| doc.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )),
    };
    Ok(problem
        .map(|message| Problem::new(Check::EadidUnique, message))
        .into_iter()
        .collect())
}
