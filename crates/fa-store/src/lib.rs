//! Finding Aid document store
//!
//! The collaborator the publication pipeline loads prepared EAD into and
//! queries for eadid uniqueness.
//!
//! # Core Concepts
//!
//! - [`DocumentStore`]: async trait; load, remove, describe, fetch, find by eadid
//! - [`MemoryStore`]: concurrent in-memory implementation
//! - [`FsStore`]: directory-per-collection implementation
//! - [`Deleted`]: tombstone kept when a published document is removed

#![warn(unreachable_pub)]

mod checksum;
mod error;
mod fs;
mod memory;
mod store;

pub use checksum::Checksum;
pub use error::{StoreError, StoreResult};
pub use fs::FsStore;
pub use memory::MemoryStore;
pub use store::{
    check_collection, check_name, document_path, Deleted, DocumentInfo, DocumentStore,
    StoredDocument, StoredEadid,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
