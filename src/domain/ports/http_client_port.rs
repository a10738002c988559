//! Port definition for the HTTP transport.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use futures_util::stream::BoxStream;

use crate::domain::errors::FetchError;

/// Upper bound for buffer preallocation from a declared content length.
const MAX_PREALLOC: usize = 8 * 1024 * 1024;

/// Marker header asking the transport to route the request through its cookie jar.
pub const COOKIE_JAR_HEADER: &str = "CookieJar";

/// Response body as a stream of chunks.
pub type BodyStream = BoxStream<'static, Result<Bytes, FetchError>>;

/// Which configured client carries the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientProfile {
    /// Covers and general images.
    #[default]
    Standard,
    /// Manga pages; typically longer timeouts.
    Manga,
}

/// Outgoing GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL.
    pub url: String,
    /// Header name/value pairs.
    pub headers: HashMap<String, String>,
}

/// Response head plus a streaming body.
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Reason phrase.
    pub message: String,
    /// Declared body length, if the server sent one.
    pub content_length: Option<u64>,
    /// Body chunks.
    pub body: BodyStream,
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("message", &self.message)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

impl HttpResponse {
    /// Builds a response around an in-memory body.
    #[must_use]
    pub fn from_bytes(status: u16, message: impl Into<String>, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self {
            status,
            message: message.into(),
            content_length: Some(body.len() as u64),
            body: futures_util::stream::once(async move { Ok(body) }).boxed(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Reads the whole body into memory.
    ///
    /// # Errors
    /// Returns the first transport error raised by the body stream.
    pub async fn bytes(self) -> Result<Bytes, FetchError> {
        collect_body(self.body, self.content_length).await
    }
}

/// Reads a body stream into one buffer.
///
/// # Errors
/// Returns the first transport error raised by the stream.
pub async fn collect_body(
    mut body: BodyStream,
    size_hint: Option<u64>,
) -> Result<Bytes, FetchError> {
    let capacity = size_hint
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or(0)
        .min(MAX_PREALLOC);
    let mut buf = BytesMut::with_capacity(capacity);
    while let Some(chunk) = body.next().await {
        buf.extend_from_slice(&chunk?);
    }
    Ok(buf.freeze())
}

/// Port for issuing image requests.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    /// Sends a GET request and returns once response headers arrive.
    /// Dropping the returned future cancels the request.
    async fn execute(
        &self,
        request: HttpRequest,
        profile: ClientProfile,
    ) -> Result<HttpResponse, FetchError>;
}

#[cfg(test)]
#[allow(dead_code)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    enum Reply {
        Body {
            status: u16,
            body: Bytes,
            declared: Option<u64>,
        },
        Error(FetchError),
        BrokenBody {
            status: u16,
            chunk: Bytes,
            error: FetchError,
        },
    }

    /// Scripted HTTP client recording every request.
    #[derive(Default)]
    pub struct MockHttpClient {
        replies: Mutex<HashMap<String, Reply>>,
        requests: Mutex<Vec<(HttpRequest, ClientProfile)>>,
        delay: Option<Duration>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Delays every response.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn respond(self, url: &str, status: u16, body: impl Into<Bytes>) -> Self {
            let body = body.into();
            let declared = Some(body.len() as u64);
            self.respond_with_length(url, status, body, declared)
        }

        pub fn respond_with_length(
            self,
            url: &str,
            status: u16,
            body: impl Into<Bytes>,
            declared: Option<u64>,
        ) -> Self {
            self.replies.lock().unwrap().insert(
                url.to_string(),
                Reply::Body {
                    status,
                    body: body.into(),
                    declared,
                },
            );
            self
        }

        pub fn fail(self, url: &str, error: FetchError) -> Self {
            self.replies
                .lock()
                .unwrap()
                .insert(url.to_string(), Reply::Error(error));
            self
        }

        /// Responds with `status`, yields `chunk`, then fails the body with `error`.
        pub fn respond_broken(
            self,
            url: &str,
            status: u16,
            chunk: impl Into<Bytes>,
            error: FetchError,
        ) -> Self {
            self.replies.lock().unwrap().insert(
                url.to_string(),
                Reply::BrokenBody {
                    status,
                    chunk: chunk.into(),
                    error,
                },
            );
            self
        }

        pub fn requests(&self) -> Vec<(HttpRequest, ClientProfile)> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    fn reason(status: u16) -> String {
        reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
            .to_string()
    }

    #[async_trait]
    impl HttpClientPort for MockHttpClient {
        async fn execute(
            &self,
            request: HttpRequest,
            profile: ClientProfile,
        ) -> Result<HttpResponse, FetchError> {
            let url = request.url.clone();
            self.requests.lock().unwrap().push((request, profile));

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let replies = self.replies.lock().unwrap();
            match replies.get(&url) {
                Some(Reply::Body {
                    status,
                    body,
                    declared,
                }) => {
                    let mut response = HttpResponse::from_bytes(*status, reason(*status), body.clone());
                    response.content_length = *declared;
                    Ok(response)
                }
                Some(Reply::Error(e)) => Err(e.clone()),
                Some(Reply::BrokenBody {
                    status,
                    chunk,
                    error,
                }) => Ok(HttpResponse {
                    status: *status,
                    message: reason(*status),
                    content_length: None,
                    body: futures_util::stream::iter(vec![Ok(chunk.clone()), Err(error.clone())])
                        .boxed(),
                }),
                None => Ok(HttpResponse::from_bytes(404, reason(404), Bytes::new())),
            }
        }
    }
}
