use async_trait::async_trait;
use quire_model::{LibraryId, Series, SeriesId};

use crate::Result;

/// Repository port for series rows.
///
/// Soft-deleted series stay findable by id and by
/// [`find_all_by_library_id`](SeriesRepository::find_all_by_library_id);
/// only [`find_all_active_by_library_id`](SeriesRepository::find_all_active_by_library_id)
/// filters them out.
#[async_trait]
pub trait SeriesRepository: Send + Sync {
    async fn find_by_id(&self, series_id: SeriesId) -> Result<Option<Series>>;
    async fn find_all_by_library_id(&self, library_id: LibraryId) -> Result<Vec<Series>>;
    async fn find_all_active_by_library_id(&self, library_id: LibraryId) -> Result<Vec<Series>>;

    /// Inserting an already-present id fails with `Conflict` and must leave
    /// the batch unapplied.
    async fn insert(&self, series: &[Series]) -> Result<()>;
    async fn update(&self, series: &[Series]) -> Result<()>;
    async fn delete(&self, series_ids: &[SeriesId]) -> Result<()>;
}
