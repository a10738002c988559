//! Source metadata adapters.

pub mod registry;

pub use registry::SourceRegistry;
