//! Image URL with URL-intrinsic request headers.

use std::collections::HashMap;

use serde::Deserialize;

/// Separator between the URL and its JSON option block.
const OPTION_SEPARATOR: &str = ",{";

/// An image URL together with the headers that travel with it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageUrl {
    url: String,
    headers: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct UrlOption {
    #[serde(default)]
    headers: HashMap<String, String>,
}

impl ImageUrl {
    /// Creates a URL without extra headers.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    /// Parses `url` or `url,{"headers":{...}}`.
    ///
    /// Every `,{` is tried as the start of the option block, leftmost first.
    /// Blocks that are not valid JSON are treated as part of the URL.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        for (idx, _) in raw.match_indices(OPTION_SEPARATOR) {
            let (url, option) = raw.split_at(idx);
            if let Ok(option) = serde_json::from_str::<UrlOption>(&option[1..]) {
                return Self {
                    url: url.trim().to_string(),
                    headers: option.headers,
                };
            }
        }
        Self::new(raw)
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Returns the plain URL string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Returns the URL string used for requests and denylist bookkeeping.
    #[must_use]
    pub fn to_string_url(&self) -> String {
        self.url.clone()
    }

    /// Returns the URL-intrinsic headers.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Returns a stable key derived from the URL.
    #[must_use]
    pub fn cache_key(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.url.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..16])
    }
}

impl std::fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl From<&str> for ImageUrl {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for ImageUrl {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}
