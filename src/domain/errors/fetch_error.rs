//! Image fetch error types.

use thiserror::Error;

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Refused locally by a loading policy (denylist, wifi-only).
    PolicySkip,
    /// The transport failed before a response was received.
    TransportFailure,
    /// The server answered with a non-success status.
    HttpStatusFailure,
    /// The decoder produced no output.
    DecodeFailure,
}

/// Image fetch error variants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("skipped previously failed image")]
    SkippedFailedImage { url: String },

    #[error("wifi-only image loading enabled")]
    WifiOnly,

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("cover re-decryption failed")]
    DecodeFailed,
}

impl FetchError {
    /// Creates a denylist skip error.
    #[must_use]
    pub fn skipped(url: impl Into<String>) -> Self {
        Self::SkippedFailedImage { url: url.into() }
    }

    /// Creates an HTTP status error.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SkippedFailedImage { .. } | Self::WifiOnly => ErrorKind::PolicySkip,
            Self::Http { .. } => ErrorKind::HttpStatusFailure,
            Self::Transport { .. } => ErrorKind::TransportFailure,
            Self::DecodeFailed => ErrorKind::DecodeFailure,
        }
    }

    /// Returns the HTTP status code carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns whether the request was refused before reaching the network.
    #[must_use]
    pub const fn is_policy_skip(&self) -> bool {
        matches!(self.kind(), ErrorKind::PolicySkip)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::transport(format!("request timed out: {e}"))
        } else if e.is_connect() {
            Self::transport(format!("failed to connect: {e}"))
        } else {
            Self::transport(e.to_string())
        }
    }
}
