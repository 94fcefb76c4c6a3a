use crate::book::Book;
use crate::ids::{SeriesId, UserId};
use crate::progress::ReadProgress;
use crate::series::Series;
use crate::thumbnail::SeriesThumbnail;

/// Lifecycle events fanned out to subscribers (search index, cache
/// invalidation, UI push) after the triggering transaction commits.
///
/// Ordering is preserved only within a single publishing call site; no
/// cross-entity ordering is guaranteed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum DomainEvent {
    SeriesAdded(Series),
    SeriesUpdated(Series),
    SeriesDeleted(Series),
    BookAdded(Book),
    ReadProgressChanged(ReadProgress),
    ReadProgressDeleted(ReadProgress),
    ReadProgressSeriesChanged { series_id: SeriesId, user_id: UserId },
    ReadProgressSeriesDeleted { series_id: SeriesId, user_id: UserId },
    ThumbnailSeriesAdded(SeriesThumbnail),
}
