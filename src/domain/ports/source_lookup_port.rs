//! Port definition for source metadata lookup.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::entities::BookSource;

/// Port resolving per-site metadata from an origin key.
#[async_trait]
pub trait SourceLookupPort: Send + Sync {
    /// Looks up the source registered under `origin`.
    async fn get_source(&self, origin: &str) -> Option<BookSource>;

    /// Resolves the request headers for `source`.
    async fn header_map(&self, source: &BookSource) -> HashMap<String, String>;
}
