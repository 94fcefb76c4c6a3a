use async_trait::async_trait;
use quire_model::{Book, BookId, SeriesId, UserId};

use crate::Result;

/// Repository port for book rows.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books of a series, soft-deleted ones included, in a stable order.
    async fn find_all_by_series_id(&self, series_id: SeriesId) -> Result<Vec<Book>>;
    async fn find_all_by_series_ids(&self, series_ids: &[SeriesId]) -> Result<Vec<Book>>;
    async fn find_all_ids_by_series_id(&self, series_id: SeriesId) -> Result<Vec<BookId>>;

    /// Lowest-numbered active book of the series, if any.
    async fn find_first_id_in_series(&self, series_id: SeriesId) -> Result<Option<BookId>>;
    /// Highest-numbered active book of the series, if any.
    async fn find_last_id_in_series(&self, series_id: SeriesId) -> Result<Option<BookId>>;
    /// Lowest-numbered active book the user has not completed, if any.
    async fn find_first_unread_id_in_series(
        &self,
        series_id: SeriesId,
        user_id: UserId,
    ) -> Result<Option<BookId>>;

    async fn insert(&self, books: &[Book]) -> Result<()>;
    async fn update(&self, books: &[Book]) -> Result<()>;
    async fn delete(&self, book_ids: &[BookId]) -> Result<()>;
}
