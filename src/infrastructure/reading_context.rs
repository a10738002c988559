//! Shared "currently open book" holder.

use parking_lot::RwLock;

use crate::domain::entities::Book;
use crate::domain::ports::ReadingContextPort;

/// Process-owned reading context.
#[derive(Debug, Default)]
pub struct CurrentBook {
    book: RwLock<Option<Book>>,
}

impl CurrentBook {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the open book.
    pub fn set(&self, book: Book) {
        *self.book.write() = Some(book);
    }

    /// Clears the open book.
    pub fn clear(&self) {
        *self.book.write() = None;
    }
}

impl ReadingContextPort for CurrentBook {
    fn current_book(&self) -> Option<Book> {
        self.book.read().clone()
    }
}
