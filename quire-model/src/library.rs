use crate::ids::LibraryId;

/// Policy governing which book supplies the default series cover when the
/// series has no selected thumbnail of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeriesCoverPolicy {
    #[default]
    First,
    FirstUnreadOrFirst,
    FirstUnreadOrLast,
    Last,
}

/// Minimal record describing a library and its cover-selection policy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Library {
    pub id: LibraryId,
    pub name: String,
    pub series_cover: SeriesCoverPolicy,
}

impl Library {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LibraryId::new(),
            name: name.into(),
            series_cover: SeriesCoverPolicy::default(),
        }
    }

    pub fn with_series_cover(mut self, policy: SeriesCoverPolicy) -> Self {
        self.series_cover = policy;
        self
    }
}
