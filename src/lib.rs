//! imgfetch - remote image fetcher.
//!
//! Fetches images over HTTP for an image display pipeline, applying
//! per-source headers, a failed-URL denylist, a wifi-only policy and
//! source-defined decode rules, and hands back a length-aware byte stream.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the fetcher and delivery contract.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external collaborators.
pub mod infrastructure;

/// Current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "imgfetch";
