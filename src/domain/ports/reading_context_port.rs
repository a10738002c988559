//! Port exposing the book currently being read.

use crate::domain::entities::Book;

/// Supplies the reading context for manga page decoding.
#[cfg_attr(test, mockall::automock)]
pub trait ReadingContextPort: Send + Sync {
    /// Returns the open book, if any.
    fn current_book(&self) -> Option<Book>;
}
