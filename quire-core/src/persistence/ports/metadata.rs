use async_trait::async_trait;
use quire_model::{BookId, BookMetadata, BookMetadataAggregation, SeriesId, SeriesMetadata};

use crate::Result;

/// Repository port for the 1:1 series metadata rows.
#[async_trait]
pub trait SeriesMetadataRepository: Send + Sync {
    async fn find_by_series_id(&self, series_id: SeriesId) -> Result<Option<SeriesMetadata>>;
    async fn insert(&self, metadata: &SeriesMetadata) -> Result<()>;
    async fn delete(&self, series_ids: &[SeriesId]) -> Result<()>;
}

/// Repository port for the 1:1 book metadata rows.
#[async_trait]
pub trait BookMetadataRepository: Send + Sync {
    async fn find_all_by_book_ids(&self, book_ids: &[BookId]) -> Result<Vec<BookMetadata>>;
    async fn insert(&self, metadata: &[BookMetadata]) -> Result<()>;
    async fn update(&self, metadata: &[BookMetadata]) -> Result<()>;
    async fn delete_by_book_ids(&self, book_ids: &[BookId]) -> Result<()>;
}

/// Repository port for the per-series metadata rollup rows.
#[async_trait]
pub trait BookMetadataAggregationRepository: Send + Sync {
    async fn find_by_series_id(
        &self,
        series_id: SeriesId,
    ) -> Result<Option<BookMetadataAggregation>>;
    async fn insert(&self, aggregation: &BookMetadataAggregation) -> Result<()>;
    async fn delete(&self, series_ids: &[SeriesId]) -> Result<()>;
}
