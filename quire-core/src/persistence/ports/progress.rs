use async_trait::async_trait;
use quire_model::{BookId, ReadProgress, SeriesId, UserId};

use crate::Result;

/// Repository port for per-user read progress.
///
/// Identity is `(book_id, user_id)`; `save` upserts. Deletions of absent rows
/// are no-ops, never errors.
#[async_trait]
pub trait ReadProgressRepository: Send + Sync {
    async fn save(&self, progress: &[ReadProgress]) -> Result<()>;
    async fn find_all_by_book_ids_and_user_id(
        &self,
        book_ids: &[BookId],
        user_id: UserId,
    ) -> Result<Vec<ReadProgress>>;
    async fn delete_by_book_ids_and_user_id(
        &self,
        book_ids: &[BookId],
        user_id: UserId,
    ) -> Result<()>;
    async fn delete_by_book_ids(&self, book_ids: &[BookId]) -> Result<()>;
    async fn delete_by_series_ids(&self, series_ids: &[SeriesId]) -> Result<()>;
}
