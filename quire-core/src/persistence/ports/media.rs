use async_trait::async_trait;
use quire_model::{BookId, Media};

use crate::Result;

/// Repository port for the 1:1 technical media rows.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn find_by_book_id(&self, book_id: BookId) -> Result<Option<Media>>;
    /// Page counts for the given books in one round trip; books without a
    /// media row are absent from the result.
    async fn page_counts(&self, book_ids: &[BookId]) -> Result<Vec<(BookId, u32)>>;
    async fn insert(&self, media: &[Media]) -> Result<()>;
    async fn update(&self, media: &[Media]) -> Result<()>;
    async fn delete_by_book_ids(&self, book_ids: &[BookId]) -> Result<()>;
}
