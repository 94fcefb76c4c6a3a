use async_trait::async_trait;
use quire_model::{CollectionId, SeriesId};

use crate::Result;

/// Repository port for collection membership (membership only, collections
/// themselves are owned elsewhere).
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    async fn add_series(&self, collection_id: CollectionId, series_id: SeriesId) -> Result<()>;
    async fn find_all_by_series_id(&self, series_id: SeriesId) -> Result<Vec<CollectionId>>;
    async fn remove_series_from_all(&self, series_ids: &[SeriesId]) -> Result<()>;
}
