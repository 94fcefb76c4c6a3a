use url::Url;

use crate::ids::{SeriesId, ThumbnailId};

/// A candidate cover image for a series. The `url` references an image
/// resource the store does not own; callers must verify it still exists.
/// At most one thumbnail per series carries `selected = true` at rest.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesThumbnail {
    pub id: ThumbnailId,
    pub series_id: SeriesId,
    pub url: Url,
    pub selected: bool,
}

impl SeriesThumbnail {
    pub fn new(series_id: SeriesId, url: Url, selected: bool) -> Self {
        Self {
            id: ThumbnailId::new(),
            series_id,
            url,
            selected,
        }
    }
}
