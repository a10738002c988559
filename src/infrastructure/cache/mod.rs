//! Cross-fetch shared state.

pub mod failed_urls;

pub use failed_urls::FailedUrlCache;
