use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::ids::{BookId, LibraryId, SeriesId};

/// A single book inside a series. `number` is the 1-based shelf position and
/// is recomputed by the series renumbering pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Book {
    pub id: BookId,
    pub series_id: SeriesId,
    pub library_id: LibraryId,
    pub name: String,
    pub number: u32,
    pub deleted_date: Option<DateTime<Utc>>,
}

impl Book {
    pub fn new(library_id: LibraryId, series_id: SeriesId, name: impl Into<String>, number: u32) -> Self {
        Self {
            id: BookId::new(),
            series_id,
            library_id,
            name: name.into(),
            number,
            deleted_date: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_date.is_some()
    }
}

/// Technical media record owned 1:1 by a book.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Media {
    pub book_id: BookId,
    pub page_count: u32,
    pub cover_path: Option<PathBuf>,
}

impl Media {
    /// Empty media shell created when a book is first attached to a series;
    /// analysis fills in the rest later.
    pub fn empty(book_id: BookId) -> Self {
        Self {
            book_id,
            page_count: 0,
            cover_path: None,
        }
    }
}

/// Human-editable metadata owned 1:1 by a book.
///
/// `number` is the displayed label, `number_sort` the numeric sort key; each
/// has its own lock flag suppressing automatic renumbering of that field only.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BookMetadata {
    pub book_id: BookId,
    pub title: String,
    pub number: String,
    pub number_sort: f32,
    pub number_lock: bool,
    pub number_sort_lock: bool,
}

impl BookMetadata {
    /// Metadata seeded from a book's initial position when it is added.
    pub fn seeded(book: &Book) -> Self {
        Self {
            book_id: book.id,
            title: book.name.clone(),
            number: book.number.to_string(),
            number_sort: book.number as f32,
            number_lock: false,
            number_sort_lock: false,
        }
    }
}

/// Metadata fields a targeted refresh task may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BookMetadataField {
    Number,
    NumberSort,
}
