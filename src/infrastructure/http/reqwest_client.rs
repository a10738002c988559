//! reqwest-backed HTTP transport.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use tracing::{debug, trace, warn};

use crate::domain::errors::FetchError;
use crate::domain::ports::{
    COOKIE_JAR_HEADER, ClientProfile, HttpClientPort, HttpRequest, HttpResponse,
};
use crate::infrastructure::config::HttpConfig;

/// HTTP transport with separate cover and manga clients and a shared cookie jar.
pub struct ReqwestHttpClient {
    standard: Client,
    manga: Client,
    cookies: Arc<Jar>,
}

impl std::fmt::Debug for ReqwestHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestHttpClient").finish_non_exhaustive()
    }
}

impl ReqwestHttpClient {
    /// Creates both clients from configuration.
    ///
    /// # Errors
    /// Returns error if an HTTP client cannot be created.
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        Ok(Self {
            standard: Self::build_client(config, config.timeout_secs)?,
            manga: Self::build_client(config, config.manga_timeout_secs)?,
            cookies: Arc::new(Jar::default()),
        })
    }

    fn build_client(config: &HttpConfig, timeout_secs: u64) -> Result<Client, FetchError> {
        Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| FetchError::transport(format!("failed to create HTTP client: {e}")))
    }

    /// Returns the cookie jar shared by both clients.
    #[must_use]
    pub fn cookie_jar(&self) -> Arc<Jar> {
        self.cookies.clone()
    }

    const fn client(&self, profile: ClientProfile) -> &Client {
        match profile {
            ClientProfile::Standard => &self.standard,
            ClientProfile::Manga => &self.manga,
        }
    }

    /// Converts request headers, dropping the cookie jar marker.
    /// Returns whether the marker was present.
    fn build_headers(headers: &HashMap<String, String>) -> (HeaderMap, bool) {
        let mut map = HeaderMap::with_capacity(headers.len());
        let mut use_jar = false;

        for (name, value) in headers {
            if name.eq_ignore_ascii_case(COOKIE_JAR_HEADER) {
                use_jar = true;
                continue;
            }
            let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
                warn!(header = %name, "Skipping invalid header name");
                continue;
            };
            let Ok(header_value) = HeaderValue::from_str(value) else {
                warn!(header = %name, "Skipping invalid header value");
                continue;
            };
            map.insert(header_name, header_value);
        }

        (map, use_jar)
    }

    fn attach_cookies(&self, headers: &mut HeaderMap, url: &Url) {
        let Some(stored) = self.cookies.cookies(url) else {
            return;
        };
        let merged = match headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
            Some(existing) => stored
                .to_str()
                .ok()
                .and_then(|s| HeaderValue::from_str(&format!("{existing}; {s}")).ok())
                .unwrap_or(stored),
            None => stored,
        };
        headers.insert(header::COOKIE, merged);
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttpClient {
    async fn execute(
        &self,
        request: HttpRequest,
        profile: ClientProfile,
    ) -> Result<HttpResponse, FetchError> {
        let url = Url::parse(&request.url)
            .map_err(|e| FetchError::transport(format!("invalid URL {}: {e}", request.url)))?;
        let (mut headers, use_jar) = Self::build_headers(&request.headers);

        if use_jar {
            self.attach_cookies(&mut headers, &url);
        }

        debug!(url = %url, ?profile, use_jar, "Sending image request");

        let response = self
            .client(profile)
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Image request failed");
                FetchError::from(e)
            })?;

        if use_jar {
            let mut set_cookies = response.headers().get_all(header::SET_COOKIE).iter();
            self.cookies.set_cookies(&mut set_cookies, &url);
        }

        let status = response.status();
        let content_length = response.content_length();
        trace!(url = %url, status = status.as_u16(), ?content_length, "Image response");

        Ok(HttpResponse {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or_default().to_string(),
            content_length,
            body: response
                .bytes_stream()
                .map(|chunk| chunk.map_err(FetchError::from))
                .boxed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_headers_strips_marker() {
        let headers = HashMap::from([
            (COOKIE_JAR_HEADER.to_string(), "1".to_string()),
            ("Referer".to_string(), "https://example.com/".to_string()),
        ]);

        let (map, use_jar) = ReqwestHttpClient::build_headers(&headers);

        assert!(use_jar);
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(header::REFERER).and_then(|v| v.to_str().ok()),
            Some("https://example.com/")
        );
    }

    #[test]
    fn test_build_headers_skips_invalid() {
        let headers = HashMap::from([
            ("bad header".to_string(), "x".to_string()),
            ("X-Ok".to_string(), "bad\nvalue".to_string()),
            ("X-Good".to_string(), "1".to_string()),
        ]);

        let (map, use_jar) = ReqwestHttpClient::build_headers(&headers);

        assert!(!use_jar);
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("x-good"));
    }

    #[tokio::test]
    async fn test_attach_cookies_merges() -> Result<(), Box<dyn std::error::Error>> {
        let client = ReqwestHttpClient::new(&HttpConfig::default())?;
        let url = Url::parse("https://example.com/a.jpg")?;
        client.cookie_jar().add_cookie_str("session=abc", &url);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("lang=en"));
        client.attach_cookies(&mut headers, &url);

        assert_eq!(
            headers.get(header::COOKIE).and_then(|v| v.to_str().ok()),
            Some("lang=en; session=abc")
        );
        Ok(())
    }
}
