//! Per-fetch request descriptor and typed options.

use serde::{Deserialize, Serialize};

use super::ImageUrl;

/// Options recognized by the fetcher.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Treat the image as a manga page (buffered, source-aware decoding).
    #[serde(default)]
    pub manga: bool,

    /// Refuse to load unless the device is on wifi.
    #[serde(default)]
    pub load_only_wifi: bool,

    /// Origin key of the source whose headers and decode rules apply.
    #[serde(default)]
    pub source_origin: Option<String>,

    /// Always pass the response body through without decoding.
    #[serde(default)]
    pub skip_decode: bool,
}

impl FetchOptions {
    /// Options for a cover image.
    #[must_use]
    pub fn cover() -> Self {
        Self::default()
    }

    /// Options for a manga page.
    #[must_use]
    pub fn manga() -> Self {
        Self {
            manga: true,
            ..Self::default()
        }
    }

    /// Sets the source origin.
    #[must_use]
    pub fn with_source(mut self, origin: impl Into<String>) -> Self {
        self.source_origin = Some(origin.into());
        self
    }

    /// Sets the wifi-only flag.
    #[must_use]
    pub const fn with_load_only_wifi(mut self, value: bool) -> Self {
        self.load_only_wifi = value;
        self
    }

    /// Sets the skip-decode flag.
    #[must_use]
    pub const fn with_skip_decode(mut self, value: bool) -> Self {
        self.skip_decode = value;
        self
    }
}

/// Immutable description of one fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Logical URL as seen by the reader; used for manga page decoding.
    pub old_url: ImageUrl,
    /// Rewritten URL that is actually requested.
    pub url: ImageUrl,
    /// Per-request options.
    pub options: FetchOptions,
}

impl FetchRequest {
    /// Creates a request.
    #[must_use]
    pub const fn new(old_url: ImageUrl, url: ImageUrl, options: FetchOptions) -> Self {
        Self {
            old_url,
            url,
            options,
        }
    }

    /// Creates a request whose logical and fetch URLs are the same.
    #[must_use]
    pub fn single(url: ImageUrl, options: FetchOptions) -> Self {
        Self::new(url.clone(), url, options)
    }
}
