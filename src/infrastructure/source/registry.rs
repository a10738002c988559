//! In-memory source table.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::domain::entities::BookSource;
use crate::domain::ports::SourceLookupPort;
use crate::infrastructure::config::AppConfig;

const USER_AGENT: &str = "User-Agent";

/// Sources keyed by origin, with a fallback user agent.
pub struct SourceRegistry {
    sources: RwLock<HashMap<String, BookSource>>,
    user_agent: String,
}

impl SourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            sources: RwLock::new(HashMap::new()),
            user_agent: user_agent.into(),
        }
    }

    /// Creates a registry holding the configured sources.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let registry = Self::new(config.http.user_agent.clone());
        for source in &config.sources {
            registry.insert(source.clone());
        }
        debug!(count = registry.len(), "Loaded sources");
        registry
    }

    /// Adds or replaces a source, returning the previous one.
    pub fn insert(&self, source: BookSource) -> Option<BookSource> {
        self.sources.write().insert(source.origin.clone(), source)
    }

    /// Removes a source.
    pub fn remove(&self, origin: &str) -> Option<BookSource> {
        self.sources.write().remove(origin)
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.read().len()
    }

    /// Returns true if no sources are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parses a JSON header object; non-string values are stringified.
    fn parse_header(origin: &str, header: &str) -> HashMap<String, String> {
        match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(header) {
            Ok(map) => map
                .into_iter()
                .map(|(k, v)| {
                    let v = match v {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (k, v)
                })
                .collect(),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid source header");
                HashMap::new()
            }
        }
    }
}

#[async_trait]
impl SourceLookupPort for SourceRegistry {
    async fn get_source(&self, origin: &str) -> Option<BookSource> {
        self.sources.read().get(origin).cloned()
    }

    async fn header_map(&self, source: &BookSource) -> HashMap<String, String> {
        let mut headers = source
            .header
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .map(|h| Self::parse_header(&source.origin, h))
            .unwrap_or_default();

        if !headers.keys().any(|k| k.eq_ignore_ascii_case(USER_AGENT)) {
            headers.insert(USER_AGENT.to_string(), self.user_agent.clone());
        }
        headers
    }
}
