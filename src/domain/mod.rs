//! Domain layer with fetch entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{BookSource, FetchOptions, FetchRequest, ImageUrl};
pub use errors::FetchError;
