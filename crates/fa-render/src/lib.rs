//! Finding Aid content rendering
//!
//! Turns EAD-tagged fields (titles, abstracts, notes) into HTML for display,
//! optionally annotated with RDFa.
//!
//! # Core Concepts
//!
//! - [`Renderer`]: recursive walk producing escaped text and wrapper markup
//! - [`Wrapper`]: the start/end pair an element contributes
//! - [`Markup`]: plain HTML or HTML with RDFa
//! - [`Placement`]: ancestor context used to infer RDFa relations
//!
//! # Example
//!
//! ```rust,ignore
//! use fa_render::{render_field, Markup};
//!
//! let html = render_field(&ead, &["archdesc", "did", "unittitle"], Markup::Rdfa);
//! ```

#![warn(unreachable_pub)]

pub mod rdfa;
mod render;
mod wrap;

pub use rdfa::Placement;
pub use render::{render_field, Markup, Renderer};
pub use wrap::{hint_wrapper, presentation, tag_wrapper, Wrapper};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
