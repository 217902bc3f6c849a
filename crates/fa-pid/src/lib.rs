//! Finding Aid PID manager client
//!
//! Searches for and mints ARKs that point at published finding aids.
//!
//! # Core Concepts
//!
//! - [`PidClient`]: async trait for search and create
//! - [`PidmanClient`]: REST implementation with basic authentication
//! - [`PidError`]: configuration, service, transport and response failures

#![warn(unreachable_pub)]

mod client;
mod error;
mod pidman;

pub use client::{ArkHit, PidClient, PidSearch};
pub use error::{PidError, PidResult};
pub use pidman::{decode_search, PidmanClient, PidmanSettings};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
