//! Finding Aids administration
//!
//! Library half of the `fa-admin` command line tool.
//!
//! # Core Concepts
//!
//! - [`Config`]: TOML settings for the store, sources, site and PID manager
//! - [`Session`]: runs prep, clean, check, load, delete and the eadid audit
//! - [`render_file`]: one field of an EAD file as HTML or RDFa
//! - [`BatchReport`]: per-batch counters behind the summary lines
//!
//! # Example
//!
//! ```rust,ignore
//! use fa_admin::{Config, Session};
//! use fa_prep::PrepMode;
//!
//! let session = Session::open(Config::discover(None)?)?;
//! let report = session.prep(PrepMode::Clean, &[], &mut std::io::stdout()).await?;
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod logging;
mod report;
mod session;

pub use config::{Config, ConfigError, ConfigResult, LogFormat, DEFAULT_CONFIG};
pub use report::{documents, write_problems, BatchReport, FileProblems, Verbosity};
pub use session::{render_file, Session};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
