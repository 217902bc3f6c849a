//! Finding Aid publication checks
//!
//! Decides whether a prepared EAD document may be published and explains
//! why not.
//!
//! # Core Concepts
//!
//! - [`Validator`]: full check against a destination in the document store
//! - [`ValidationEngine`]: ordered registry of [`ValidationRule`]s
//! - [`SchemaChecker`]: built-in EAD element and attribute rules
//! - [`Problem`]: one reason a document is not fit for publication
//!
//! Problems are reported in a fixed order: well-formedness, schema, eadid
//! against file name, eadid uniqueness, series ids, index ids, duplicate
//! ids, eadid characters, origination, containers, list title, control
//! access terms, ARKs.

#![warn(unreachable_pub)]

mod engine;
mod problem;
pub mod rules;
mod schema;

pub use engine::{check_eadid_unique, check_eadxml, expected_eadid, ValidationEngine, Validator};
pub use problem::{Check, Problem};
pub use rules::{ValidationRule, EADID_URL_PATTERN, TITLE_LETTERS};
pub use schema::SchemaChecker;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
