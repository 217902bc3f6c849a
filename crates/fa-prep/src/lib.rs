//! Finding Aid publication preparation
//!
//! Brings an archivist's EAD file into the shape the site publishes.
//!
//! # Core Concepts
//!
//! - [`assign_ids`]: stable ids for series, subseries and indexes
//! - [`normalize_whitespace`]: trims the list title and control-access terms
//! - [`ArkReconciler`]: finds or mints the document's ARK
//! - [`Preparer`]: runs the steps in prep or clean mode and reports
//!   [`PrepOutcome::Updated`] or [`PrepOutcome::Unchanged`]
//!
//! # Example
//!
//! ```rust,ignore
//! use fa_prep::Preparer;
//!
//! let prepared = Preparer::clean().prepare_file(path).await?;
//! if prepared.outcome == PrepOutcome::Updated {
//!     std::fs::write(path, prepared.bytes())?;
//! }
//! ```

#![warn(unreachable_pub)]

mod ark;
mod error;
mod ids;
mod normalize;
mod pipeline;

pub use ark::{ArkOutcome, ArkReconciler, ArkSettings};
pub use error::{ArkError, PrepError, PrepResult};
pub use ids::{assign_ids, series_suffix};
pub use normalize::normalize_whitespace;
pub use pipeline::{eadid_for_path, PrepMode, PrepOutcome, Prepared, Preparer};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
