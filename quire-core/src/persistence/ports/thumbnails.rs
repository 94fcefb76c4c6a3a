use async_trait::async_trait;
use quire_model::{SeriesId, SeriesThumbnail, ThumbnailId};

use crate::Result;

/// Repository port for series thumbnail records.
#[async_trait]
pub trait SeriesThumbnailRepository: Send + Sync {
    async fn find_all_by_series_id(&self, series_id: SeriesId) -> Result<Vec<SeriesThumbnail>>;
    async fn find_selected_by_series_id(
        &self,
        series_id: SeriesId,
    ) -> Result<Option<SeriesThumbnail>>;
    async fn insert(&self, thumbnail: &SeriesThumbnail) -> Result<()>;
    /// Make this thumbnail the sole selected one for its series: sets its
    /// flag and clears every sibling in one write.
    async fn mark_selected(&self, thumbnail: &SeriesThumbnail) -> Result<()>;
    async fn delete(&self, thumbnail_id: ThumbnailId) -> Result<()>;
    async fn delete_by_series_ids(&self, series_ids: &[SeriesId]) -> Result<()>;
}
