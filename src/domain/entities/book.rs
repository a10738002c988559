//! Reading context passed to manga page decoding.

use serde::{Deserialize, Serialize};

/// The book currently open in the reader.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub name: String,
    pub author: String,
    pub book_url: String,
    /// Origin key of the book's source.
    pub origin: String,
}
