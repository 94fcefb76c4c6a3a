//! Per-book lifecycle operations.
//!
//! The series orchestrator cascades series-level deletions through this
//! sibling service so book-owned rows (media, metadata, read progress) are
//! cleaned up in one place.

use std::any::type_name_of_val;
use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use quire_model::{Book, BookId};

use crate::Result;
use crate::persistence::unit_of_work::SeriesStores;

/// Port the series orchestrator uses to cascade to books.
#[async_trait]
pub trait BookLifecycle: Send + Sync {
    /// Stamp the books as soft-deleted; rows stay in storage.
    async fn soft_delete_many(&self, books: &[Book]) -> Result<()>;
    /// Remove the books and every row they own.
    async fn delete_many(&self, books: &[Book]) -> Result<()>;
    /// Raw cover bytes for one book, if its media carries a cover.
    async fn get_thumbnail_bytes(&self, book_id: BookId) -> Result<Option<Vec<u8>>>;
}

/// Provides the book-level half of the deletion cascades.
#[derive(Clone)]
pub struct BookLifecycleService {
    stores: SeriesStores,
}

impl fmt::Debug for BookLifecycleService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookLifecycleService")
            .field("stores", &type_name_of_val(&self.stores))
            .finish()
    }
}

impl BookLifecycleService {
    pub fn new(stores: SeriesStores) -> Self {
        Self { stores }
    }
}

#[async_trait]
impl BookLifecycle for BookLifecycleService {
    async fn soft_delete_many(&self, books: &[Book]) -> Result<()> {
        if books.is_empty() {
            return Ok(());
        }
        debug!(count = books.len(), "soft deleting books");
        let deleted_date = Utc::now();
        let stamped: Vec<Book> = books
            .iter()
            .map(|book| {
                let mut book = book.clone();
                book.deleted_date = Some(deleted_date);
                book
            })
            .collect();
        self.stores.books.update(&stamped).await
    }

    async fn delete_many(&self, books: &[Book]) -> Result<()> {
        if books.is_empty() {
            return Ok(());
        }
        let book_ids: Vec<BookId> = books.iter().map(|book| book.id).collect();
        debug!(count = book_ids.len(), "deleting books");

        self.stores.media.delete_by_book_ids(&book_ids).await?;
        self.stores.book_metadata.delete_by_book_ids(&book_ids).await?;
        self.stores.read_progress.delete_by_book_ids(&book_ids).await?;
        self.stores.books.delete(&book_ids).await
    }

    async fn get_thumbnail_bytes(&self, book_id: BookId) -> Result<Option<Vec<u8>>> {
        let Some(media) = self.stores.media.find_by_book_id(book_id).await? else {
            return Ok(None);
        };
        let Some(cover_path) = media.cover_path else {
            return Ok(None);
        };

        match tokio::fs::read(&cover_path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) => {
                warn!(book = %book_id, path = %cover_path.display(), error = %err,
                    "book cover could not be read");
                Ok(None)
            }
        }
    }
}
