//! Rule-driven image decryption.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use tracing::{debug, trace, warn};

use crate::domain::entities::{Book, BookSource, DecodeRule};
use crate::domain::ports::{BodyStream, DecodedImage, ImageDecoderPort, collect_body};

/// Decoder applying a source's [`DecodeRule`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleDecoder;

impl RuleDecoder {
    /// Creates a decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn xor_key(key: &str) -> Option<Vec<u8>> {
        match hex::decode(key.trim()) {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            Ok(_) => {
                warn!("Empty xor key");
                None
            }
            Err(e) => {
                warn!(error = %e, "Invalid xor key");
                None
            }
        }
    }

    /// XORs `data` in place; `offset` is the position of `data[0]` in the whole body.
    fn apply_xor(data: &mut [u8], key: &[u8], offset: usize) {
        for (i, byte) in data.iter_mut().enumerate() {
            *byte ^= key[(offset + i) % key.len()];
        }
    }

    fn decode_base64(data: &[u8]) -> Option<Bytes> {
        let text = std::str::from_utf8(data).ok()?.trim();
        let payload = text
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map_or(text, |(_, payload)| payload);
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        match STANDARD.decode(cleaned) {
            Ok(decoded) => Some(Bytes::from(decoded)),
            Err(e) => {
                warn!(error = %e, "Invalid base64 image body");
                None
            }
        }
    }

    fn decode_buffer(rule: &DecodeRule, bytes: &[u8]) -> Option<Bytes> {
        match rule {
            DecodeRule::Xor { key } => {
                let key = Self::xor_key(key)?;
                let mut buf = BytesMut::from(bytes);
                Self::apply_xor(&mut buf, &key, 0);
                Some(buf.freeze())
            }
            DecodeRule::Base64 => Self::decode_base64(bytes),
        }
    }

    fn xor_stream(body: BodyStream, key: Vec<u8>) -> BodyStream {
        body.scan(0usize, move |offset, chunk| {
            let chunk = chunk.map(|chunk| {
                let mut buf = BytesMut::from(chunk.as_ref());
                Self::apply_xor(&mut buf, &key, *offset);
                *offset += buf.len();
                buf.freeze()
            });
            futures_util::future::ready(Some(chunk))
        })
        .boxed()
    }
}

#[async_trait]
impl ImageDecoderPort for RuleDecoder {
    fn skip_decode(&self, source: Option<&BookSource>, is_cover: bool) -> bool {
        source.and_then(|s| s.decode_rule(is_cover)).is_none()
    }

    async fn decode_page(
        &self,
        url: &str,
        bytes: Bytes,
        source: Option<&BookSource>,
        book: Option<&Book>,
    ) -> Option<Bytes> {
        let Some(rule) = source.and_then(|s| s.decode_rule(false)) else {
            return Some(bytes);
        };
        trace!(url = %url, book = ?book.map(|b| b.name.as_str()), "Decoding page");
        let decoded = Self::decode_buffer(rule, &bytes);
        if decoded.is_none() {
            debug!(url = %url, "Page decode produced no output");
        }
        decoded
    }

    async fn decode_cover(
        &self,
        url: &str,
        body: BodyStream,
        source: Option<&BookSource>,
    ) -> Option<DecodedImage> {
        let Some(rule) = source.and_then(|s| s.decode_rule(true)) else {
            return Some(DecodedImage::Streamed(body));
        };
        trace!(url = %url, "Decoding cover");
        match rule {
            DecodeRule::Xor { key } => {
                let key = Self::xor_key(key)?;
                Some(DecodedImage::Streamed(Self::xor_stream(body, key)))
            }
            DecodeRule::Base64 => {
                let bytes = match collect_body(body, None).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!(url = %url, error = %e, "Failed to read cover body");
                        return None;
                    }
                };
                Self::decode_base64(&bytes).map(DecodedImage::Buffered)
            }
        }
    }
}
