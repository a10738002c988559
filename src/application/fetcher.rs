//! Remote image fetcher.
//!
//! One [`ImageFetcher`] serves one [`FetchRequest`]: policy checks, header
//! resolution, a single HTTP request, then optional decoding.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::callback::{DataCallback, FetchResult, callback_channel, deliver};
use super::image_stream::ImageStream;
use crate::domain::entities::{BookSource, DataClass, DataSource, FetchRequest, Priority};
use crate::domain::errors::FetchError;
use crate::domain::ports::{
    COOKIE_JAR_HEADER, ClientProfile, ConnectivityPort, DecodedImage, HttpClientPort,
    HttpRequest, HttpResponse, ImageDecoderPort, ReadingContextPort, SourceLookupPort,
};
use crate::infrastructure::cache::FailedUrlCache;

/// Collaborators shared by every fetcher.
#[derive(Clone)]
pub struct FetchContext {
    /// HTTP transport.
    pub http: Arc<dyn HttpClientPort>,
    /// Source metadata lookup.
    pub sources: Arc<dyn SourceLookupPort>,
    /// Image decoder.
    pub decoder: Arc<dyn ImageDecoderPort>,
    /// Network type check for the wifi-only policy.
    pub connectivity: Arc<dyn ConnectivityPort>,
    /// Current book for manga decoding.
    pub reading: Arc<dyn ReadingContextPort>,
    /// Shared failed-URL denylist.
    pub failed_urls: Arc<FailedUrlCache>,
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("failed_urls", &self.failed_urls)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct InFlight {
    task: Option<JoinHandle<()>>,
    callback: Option<Box<dyn DataCallback>>,
}

/// Fetches one image and reports through a [`DataCallback`].
pub struct ImageFetcher {
    request: Arc<FetchRequest>,
    ctx: FetchContext,
    cancel: CancellationToken,
    stream_closed: CancellationToken,
    state: Arc<Mutex<InFlight>>,
}

impl std::fmt::Debug for ImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFetcher")
            .field("request", &self.request)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl ImageFetcher {
    /// Creates a fetcher for `request`.
    #[must_use]
    pub fn new(request: FetchRequest, ctx: FetchContext) -> Self {
        Self {
            request: Arc::new(request),
            ctx,
            cancel: CancellationToken::new(),
            stream_closed: CancellationToken::new(),
            state: Arc::new(Mutex::new(InFlight::default())),
        }
    }

    /// Returns the request this fetcher serves.
    #[must_use]
    pub fn request(&self) -> &FetchRequest {
        &self.request
    }

    /// Starts loading. Policy refusals are reported before this returns;
    /// everything else is reported from a spawned task.
    ///
    /// `priority` is accepted for interface parity and does not affect scheduling.
    ///
    /// A fetcher issues at most one request. The callback is dropped without
    /// being invoked when the fetcher was already cancelled or cleaned up, or
    /// when an earlier load was started.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn load_data(&self, priority: Priority, callback: impl DataCallback) {
        let url = self.request.url.to_string_url();
        trace!(url = %url, ?priority, "Loading image");

        if self.cancel.is_cancelled() {
            debug!(url = %url, "Fetcher cancelled, ignoring load");
            return;
        }

        if self.ctx.failed_urls.contains(&url) {
            debug!(url = %url, "Skipping previously failed image");
            Box::new(callback).on_load_failed(FetchError::skipped(url));
            return;
        }

        if self.request.options.load_only_wifi && !self.ctx.connectivity.is_wifi() {
            debug!(url = %url, "Not on wifi, refusing image load");
            Box::new(callback).on_load_failed(FetchError::WifiOnly);
            return;
        }

        let job = FetchJob {
            request: Arc::clone(&self.request),
            ctx: self.ctx.clone(),
            cancel: self.cancel.clone(),
            stream_closed: self.stream_closed.clone(),
            state: Arc::clone(&self.state),
        };

        let mut state = self.state.lock();
        // teardown cancels before taking the lock, so this check cannot race it
        if self.cancel.is_cancelled() || state.task.is_some() {
            drop(state);
            warn!(url = %url, "Image load already started or cancelled, ignoring load");
            return;
        }
        state.callback = Some(Box::new(callback));
        state.task = Some(tokio::spawn(job.run()));
    }

    /// Loads and waits for the outcome.
    /// Returns `None` if the fetcher was cancelled or cleaned up first.
    pub async fn fetch(&self, priority: Priority) -> Option<FetchResult> {
        let (callback, rx) = callback_channel();
        self.load_data(priority, callback);
        rx.await.ok()
    }

    /// Closes any delivered stream, stops pending work and forgets the callback.
    pub fn cleanup(&self) {
        self.stream_closed.cancel();
        self.teardown();
    }

    /// Stops the in-flight request and pending header resolution.
    /// No callback fires afterwards. Safe to call repeatedly.
    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            debug!(url = %self.request.url, "Cancelling image load");
        }
        self.teardown();
    }

    /// Returns true once `cancel` or `cleanup` has run.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Kind of data produced.
    #[must_use]
    pub const fn data_class(&self) -> DataClass {
        DataClass::ByteStream
    }

    /// Origin of the data produced.
    #[must_use]
    pub const fn data_source(&self) -> DataSource {
        DataSource::Remote
    }

    fn teardown(&self) {
        self.cancel.cancel();
        let (task, callback) = {
            let mut state = self.state.lock();
            (state.task.take(), state.callback.take())
        };
        if let Some(task) = task {
            task.abort();
        }
        drop(callback);
    }
}

/// Work moved into the spawned task.
struct FetchJob {
    request: Arc<FetchRequest>,
    ctx: FetchContext,
    cancel: CancellationToken,
    stream_closed: CancellationToken,
    state: Arc<Mutex<InFlight>>,
}

impl FetchJob {
    async fn run(self) {
        let outcome = tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            result = self.execute() => Some(result),
        };

        match outcome {
            Some(result) => self.deliver(result),
            None => trace!(url = %self.request.url, "Image load cancelled"),
        }
    }

    /// Invokes the callback while holding the state lock, so `cancel` either
    /// waits for the callback to finish or prevents it from running.
    /// Callbacks must not call back into their fetcher.
    fn deliver(&self, result: FetchResult) {
        let mut state = self.state.lock();
        let callback = if self.cancel.is_cancelled() {
            None
        } else {
            state.callback.take()
        };

        match callback {
            Some(callback) => deliver(callback, result),
            None => debug!(url = %self.request.url, "No callback registered, dropping result"),
        }
    }

    async fn execute(&self) -> FetchResult {
        let options = &self.request.options;
        let url = self.request.url.to_string_url();
        let (source, headers) = self.resolve_headers().await;

        let profile = if options.manga {
            ClientProfile::Manga
        } else {
            ClientProfile::Standard
        };
        let request = HttpRequest {
            url: url.clone(),
            headers,
        };

        let response = match self.ctx.http.execute(request, profile).await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %url, error = %e, "Image request failed");
                return Err(e);
            }
        };

        if !response.is_success() {
            debug!(url = %url, status = response.status, "Image request rejected");
            if !options.manga {
                self.ctx.failed_urls.insert(url);
            }
            return Err(FetchError::http(response.status, response.message));
        }

        self.decode(response, source.as_ref()).await
    }

    /// Source headers, then the cookie jar marker, then URL headers.
    /// Later entries replace earlier ones regardless of name case.
    async fn resolve_headers(&self) -> (Option<BookSource>, HashMap<String, String>) {
        let mut headers = HashMap::new();
        let mut source = None;

        if let Some(origin) = &self.request.options.source_origin {
            source = self.ctx.sources.get_source(origin).await;
            match &source {
                Some(s) => {
                    for (name, value) in self.ctx.sources.header_map(s).await {
                        merge_header(&mut headers, name, value);
                    }
                    if s.enabled_cookie_jar {
                        merge_header(&mut headers, COOKIE_JAR_HEADER.to_string(), "1".to_string());
                    }
                }
                None => debug!(origin = %origin, "Unknown source origin"),
            }
        }

        for (name, value) in self.request.url.headers() {
            merge_header(&mut headers, name.clone(), value.clone());
        }

        (source, headers)
    }

    async fn decode(&self, response: HttpResponse, source: Option<&BookSource>) -> FetchResult {
        let options = &self.request.options;
        let declared = response.content_length;
        let closed = self.stream_closed.clone();

        if options.skip_decode || self.ctx.decoder.skip_decode(source, !options.manga) {
            trace!(url = %self.request.url, "Passing image body through");
            return Ok(ImageStream::from_body(response.body, declared, closed));
        }

        if options.manga {
            let bytes = response.bytes().await?;
            let book = self.ctx.reading.current_book();
            let decoded = self
                .ctx
                .decoder
                .decode_page(self.request.old_url.as_str(), bytes, source, book.as_ref())
                .await
                .ok_or(FetchError::DecodeFailed)?;
            return Ok(ImageStream::from_bytes(decoded, closed));
        }

        match self
            .ctx
            .decoder
            .decode_cover(self.request.url.as_str(), response.body, source)
            .await
        {
            Some(DecodedImage::Buffered(bytes)) => Ok(ImageStream::from_bytes(bytes, closed)),
            Some(DecodedImage::Streamed(body)) => {
                Ok(ImageStream::from_body(body, declared, closed))
            }
            None => Err(FetchError::DecodeFailed),
        }
    }
}

fn merge_header(headers: &mut HashMap<String, String>, name: String, value: String) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}
