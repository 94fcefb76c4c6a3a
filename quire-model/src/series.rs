use chrono::{DateTime, Utc};

use crate::ids::{LibraryId, SeriesId};

/// An ordered collection of books sharing a library.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Series {
    pub id: SeriesId,
    pub library_id: LibraryId,
    pub name: String,
    pub book_count: u32,
    /// `Some` marks the series as soft-deleted; the row stays in storage.
    pub deleted_date: Option<DateTime<Utc>>,
}

impl Series {
    pub fn new(library_id: LibraryId, name: impl Into<String>) -> Self {
        Self {
            id: SeriesId::new(),
            library_id,
            name: name.into(),
            book_count: 0,
            deleted_date: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_date.is_some()
    }
}

/// Editable metadata owned 1:1 by a series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesMetadata {
    pub series_id: SeriesId,
    pub title: String,
    /// Accent-stripped title used as the sort key.
    pub title_sort: String,
}

impl SeriesMetadata {
    pub fn from_series(series: &Series) -> Self {
        Self {
            series_id: series.id,
            title: series.name.clone(),
            title_sort: fold_accents(&series.name),
        }
    }
}

/// Denormalized per-series rollup of book metadata fields, recomputed by the
/// metadata aggregation task. Created empty alongside the series.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BookMetadataAggregation {
    pub series_id: SeriesId,
    pub authors: Vec<String>,
    pub release_date: Option<DateTime<Utc>>,
}

impl BookMetadataAggregation {
    pub fn empty(series_id: SeriesId) -> Self {
        Self {
            series_id,
            ..Self::default()
        }
    }
}

/// Strip combining accents from Latin text, leaving other characters alone.
///
/// Covers Latin-1 Supplement and the common Latin Extended-A letters, which is
/// what shelf names encounter in practice.
pub fn fold_accents(input: &str) -> String {
    input.chars().map(fold_char).collect()
}

fn fold_char(ch: char) -> char {
    match ch {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'À'..='Å' | 'Ā' | 'Ă' | 'Ą' => 'A',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => 'C',
        'ď' | 'đ' => 'd',
        'Ď' | 'Đ' => 'D',
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'È'..='Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => 'E',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => 'G',
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'Ì'..='Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => 'I',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => 'N',
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'Ò'..='Ö' | 'Ø' | 'Ō' | 'Ŏ' | 'Ő' => 'O',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'Ŕ' | 'Ŗ' | 'Ř' => 'R',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => 'S',
        'ţ' | 'ť' | 'ŧ' => 't',
        'Ţ' | 'Ť' | 'Ŧ' => 'T',
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'Ù'..='Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' | 'Ÿ' => 'Y',
        'ź' | 'ż' | 'ž' => 'z',
        'Ź' | 'Ż' | 'Ž' => 'Z',
        other => other,
    }
}
