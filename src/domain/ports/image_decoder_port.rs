//! Port definition for image byte decoding.

use async_trait::async_trait;
use bytes::Bytes;

use super::http_client_port::BodyStream;
use crate::domain::entities::{Book, BookSource};

/// Output of a cover decode.
pub enum DecodedImage {
    /// Fully decoded in memory.
    Buffered(Bytes),
    /// Decoded on the fly; same length as the response body.
    Streamed(BodyStream),
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
            Self::Streamed(_) => f.write_str("Streamed(..)"),
        }
    }
}

/// Port for source-driven image decryption.
/// A `None` result means decoding failed.
#[async_trait]
pub trait ImageDecoderPort: Send + Sync {
    /// Returns true when the body should be passed through untouched.
    fn skip_decode(&self, source: Option<&BookSource>, is_cover: bool) -> bool;

    /// Decodes a fully buffered manga page.
    async fn decode_page(
        &self,
        url: &str,
        bytes: Bytes,
        source: Option<&BookSource>,
        book: Option<&Book>,
    ) -> Option<Bytes>;

    /// Decodes a streamed cover image.
    async fn decode_cover(
        &self,
        url: &str,
        body: BodyStream,
        source: Option<&BookSource>,
    ) -> Option<DecodedImage>;
}
