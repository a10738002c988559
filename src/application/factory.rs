//! Builds fetchers over shared collaborators.

use std::sync::Arc;

use tracing::debug;

use super::fetcher::{FetchContext, ImageFetcher};
use crate::domain::entities::{FetchOptions, FetchRequest, ImageUrl};
use crate::domain::errors::FetchError;
use crate::infrastructure::cache::FailedUrlCache;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::{
    CurrentBook, ReqwestHttpClient, RuleDecoder, SourceRegistry, connectivity_for,
};

/// Creates [`ImageFetcher`]s that share one set of collaborators.
#[derive(Debug, Clone)]
pub struct FetcherFactory {
    ctx: FetchContext,
    current_book: Option<Arc<CurrentBook>>,
}

impl FetcherFactory {
    /// Creates a factory over explicit collaborators.
    #[must_use]
    pub const fn new(ctx: FetchContext) -> Self {
        Self {
            ctx,
            current_book: None,
        }
    }

    /// Wires the default adapters from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let current_book = Arc::new(CurrentBook::new());
        let ctx = FetchContext {
            http: Arc::new(ReqwestHttpClient::new(&config.http)?),
            sources: Arc::new(SourceRegistry::from_config(config)),
            decoder: Arc::new(RuleDecoder::new()),
            connectivity: connectivity_for(config.fetch.wifi),
            reading: current_book.clone(),
            failed_urls: Arc::new(FailedUrlCache::new(config.fetch.failed_url_capacity)),
        };
        debug!(
            wifi = ?config.fetch.wifi,
            failed_url_capacity = config.fetch.failed_url_capacity,
            "Fetcher factory ready"
        );
        Ok(Self {
            ctx,
            current_book: Some(current_book),
        })
    }

    /// Returns the shared collaborators.
    #[must_use]
    pub const fn context(&self) -> &FetchContext {
        &self.ctx
    }

    /// Returns the shared denylist.
    #[must_use]
    pub fn failed_urls(&self) -> Arc<FailedUrlCache> {
        self.ctx.failed_urls.clone()
    }

    /// Returns the reading context manga decoding reads the open book from.
    /// `None` when the factory was built over caller-supplied collaborators.
    #[must_use]
    pub fn reading_context(&self) -> Option<Arc<CurrentBook>> {
        self.current_book.clone()
    }

    /// Builds a fetcher for a logical URL, its fetch URL and options.
    #[must_use]
    pub fn build(&self, old_url: ImageUrl, url: ImageUrl, options: FetchOptions) -> ImageFetcher {
        self.build_request(FetchRequest::new(old_url, url, options))
    }

    /// Builds a fetcher for a prepared request.
    #[must_use]
    pub fn build_request(&self, request: FetchRequest) -> ImageFetcher {
        ImageFetcher::new(request, self.ctx.clone())
    }
}
