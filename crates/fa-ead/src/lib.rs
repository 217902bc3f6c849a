//! Finding Aid EAD documents
//!
//! Owned, editable EAD XML trees with the accessors the publication
//! pipeline needs.
//!
//! # Core Concepts
//!
//! - [`Document`]: mutable XML tree that serializes with its original declaration
//! - [`FindingAid`]: EAD view over a document (eadid, series, indexes, terms)
//! - [`Series`] / [`Index`]: components that receive generated ids
//! - [`Ark`]: persistent identifier syntax for `eadid/@url` and `eadid/@identifier`
//!
//! # Example
//!
//! ```rust,ignore
//! use fa_ead::FindingAid;
//!
//! let ead = FindingAid::from_file("abbey244.xml")?;
//! for series in ead.series() {
//!     println!("{} {}", series.level(), series.display_label());
//! }
//! ```

#![warn(unreachable_pub)]

mod ark;
mod error;
mod finding_aid;
pub mod xml;

pub use ark::{ark_pid, is_ark, Ark, NotAnArk};
pub use error::{XmlError, XmlResult};
pub use finding_aid::{
    components, components_mut, dsc_has_series, has_subseries, is_component, FindingAid, Index,
    ListTitle, OriginationKind, Series, CONTROLACCESS_TERMS, ID_DELIMITER, LIST_TITLE_NAMES,
    MAX_SERIES_DEPTH,
};
pub use xml::{Document, Element, ElementPath, Misc, Node, Position};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
