//! Content-length-aware image byte stream.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::Bytes;
use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;

use crate::domain::ports::BodyStream;

/// Readable image bytes with a known or unknown length.
///
/// When the length is known, reaching EOF early is reported as
/// [`io::ErrorKind::UnexpectedEof`]. Reads fail once the owning fetcher
/// has been cleaned up.
pub struct ImageStream {
    inner: Pin<Box<dyn AsyncRead + Send>>,
    content_length: Option<u64>,
    read: u64,
    closed: CancellationToken,
}

impl std::fmt::Debug for ImageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStream")
            .field("content_length", &self.content_length)
            .field("read", &self.read)
            .field("closed", &self.closed.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl ImageStream {
    /// Wraps any reader.
    pub fn new<R>(reader: R, content_length: Option<u64>, closed: CancellationToken) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        Self {
            inner: Box::pin(reader),
            content_length,
            read: 0,
            closed,
        }
    }

    /// Wraps an in-memory buffer; the length is the buffer size.
    #[must_use]
    pub fn from_bytes(bytes: Bytes, closed: CancellationToken) -> Self {
        let len = bytes.len() as u64;
        Self::new(io::Cursor::new(bytes), Some(len), closed)
    }

    /// Wraps a response body stream.
    #[must_use]
    pub fn from_body(
        body: BodyStream,
        content_length: Option<u64>,
        closed: CancellationToken,
    ) -> Self {
        let reader = StreamReader::new(body.map(|chunk| chunk.map_err(io::Error::other)));
        Self::new(reader, content_length, closed)
    }

    /// Declared length, if known.
    #[must_use]
    pub const fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Reads the remaining bytes.
    ///
    /// # Errors
    /// Returns the underlying read error, or `UnexpectedEof` if the stream
    /// ended before its declared length.
    pub async fn read_to_end(mut self) -> io::Result<Bytes> {
        let mut buf = Vec::new();
        AsyncReadExt::read_to_end(&mut self, &mut buf).await?;
        Ok(Bytes::from(buf))
    }
}

impl AsyncRead for ImageStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if this.closed.is_cancelled() {
            return Poll::Ready(Err(io::Error::other("image stream closed")));
        }

        let had_room = buf.remaining() > 0;
        let before = buf.filled().len();
        ready!(this.inner.as_mut().poll_read(cx, buf))?;
        let n = buf.filled().len() - before;
        this.read += n as u64;

        if n == 0
            && had_room
            && let Some(expected) = this.content_length
            && this.read < expected
        {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Failed to read all expected data, expected: {expected}, but read: {}",
                    this.read
                ),
            )));
        }

        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::FetchError;

    fn body(parts: &[&'static [u8]]) -> BodyStream {
        let chunks: Vec<Result<Bytes, FetchError>> =
            parts.iter().map(|p| Ok(Bytes::from_static(p))).collect();
        futures_util::stream::iter(chunks).boxed()
    }

    #[tokio::test]
    async fn test_from_bytes_reports_length() -> io::Result<()> {
        let stream = ImageStream::from_bytes(Bytes::from_static(b"abcd"), CancellationToken::new());

        assert_eq!(stream.content_length(), Some(4));
        assert_eq!(stream.read_to_end().await?.as_ref(), b"abcd");
        Ok(())
    }

    #[tokio::test]
    async fn test_body_with_unknown_length() -> io::Result<()> {
        let stream = ImageStream::from_body(body(&[b"ab", b"cd"]), None, CancellationToken::new());

        assert_eq!(stream.read_to_end().await?.as_ref(), b"abcd");
        Ok(())
    }

    #[tokio::test]
    async fn test_short_body_fails_at_eof() {
        let stream = ImageStream::from_body(body(&[b"ab"]), Some(5), CancellationToken::new());

        let err = stream.read_to_end().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn test_read_error_propagates() {
        let reader = tokio_test::io::Builder::new()
            .read(b"ab")
            .read_error(io::Error::other("connection reset"))
            .build();
        let stream = ImageStream::new(reader, Some(4), CancellationToken::new());

        let err = stream.read_to_end().await.unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
    }

    #[tokio::test]
    async fn test_closed_stream_rejects_reads() {
        let closed = CancellationToken::new();
        let stream = ImageStream::from_bytes(Bytes::from_static(b"abcd"), closed.clone());
        closed.cancel();

        let err = stream.read_to_end().await.unwrap_err();
        assert_eq!(err.to_string(), "image stream closed");
    }
}
