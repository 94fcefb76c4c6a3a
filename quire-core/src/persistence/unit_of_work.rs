use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::Result;
use crate::persistence::ports::{
    BookMetadataAggregationRepository, BookMetadataRepository, BookRepository,
    CollectionRepository, LibraryRepository, MediaRepository, ReadProgressRepository,
    SeriesMetadataRepository, SeriesRepository, SeriesThumbnailRepository,
};

/// A transaction in flight. Every handle must be consumed by exactly one of
/// `commit` or `rollback`.
#[async_trait]
pub trait TransactionHandle: Send {
    async fn commit(self: Box<Self>) -> Result<()>;
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Entry point for scoped transactions spanning every repository of the same
/// adapter. Writes performed between `begin` and `commit` become visible
/// atomically; `rollback` discards them all.
#[async_trait]
pub trait TransactionScope: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn TransactionHandle>>;
}

/// Run `work` inside a transaction: commit on `Ok`, roll back on `Err`.
///
/// A failed rollback is logged and the original error wins, so callers always
/// see the failure that aborted the work.
pub async fn with_transaction<T, F>(scope: &dyn TransactionScope, work: F) -> Result<T>
where
    F: AsyncFnOnce() -> Result<T>,
{
    let tx = scope.begin().await?;
    match work().await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "transaction rollback failed");
            }
            Err(err)
        }
    }
}

/// Aggregates all repository ports the lifecycle services depend on.
///
/// This composition-based façade keeps construction and testing
/// straightforward: every field is a swappable `Arc<dyn Port>`.
#[derive(Clone)]
pub struct SeriesStores {
    pub libraries: Arc<dyn LibraryRepository>,
    pub series: Arc<dyn SeriesRepository>,
    pub books: Arc<dyn BookRepository>,
    pub series_metadata: Arc<dyn SeriesMetadataRepository>,
    pub book_metadata: Arc<dyn BookMetadataRepository>,
    pub aggregations: Arc<dyn BookMetadataAggregationRepository>,
    pub media: Arc<dyn MediaRepository>,
    pub read_progress: Arc<dyn ReadProgressRepository>,
    pub thumbnails: Arc<dyn SeriesThumbnailRepository>,
    pub collections: Arc<dyn CollectionRepository>,
    pub transactions: Arc<dyn TransactionScope>,
}

impl fmt::Debug for SeriesStores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeriesStores")
            .field("libraries", &type_name_of_val(self.libraries.as_ref()))
            .field("series", &type_name_of_val(self.series.as_ref()))
            .field("books", &type_name_of_val(self.books.as_ref()))
            .field(
                "series_metadata",
                &type_name_of_val(self.series_metadata.as_ref()),
            )
            .field(
                "book_metadata",
                &type_name_of_val(self.book_metadata.as_ref()),
            )
            .field("aggregations", &type_name_of_val(self.aggregations.as_ref()))
            .field("media", &type_name_of_val(self.media.as_ref()))
            .field(
                "read_progress",
                &type_name_of_val(self.read_progress.as_ref()),
            )
            .field("thumbnails", &type_name_of_val(self.thumbnails.as_ref()))
            .field("collections", &type_name_of_val(self.collections.as_ref()))
            .field(
                "transactions",
                &type_name_of_val(self.transactions.as_ref()),
            )
            .finish()
    }
}

#[derive(Default)]
pub struct SeriesStoresBuilder {
    libraries: Option<Arc<dyn LibraryRepository>>,
    series: Option<Arc<dyn SeriesRepository>>,
    books: Option<Arc<dyn BookRepository>>,
    series_metadata: Option<Arc<dyn SeriesMetadataRepository>>,
    book_metadata: Option<Arc<dyn BookMetadataRepository>>,
    aggregations: Option<Arc<dyn BookMetadataAggregationRepository>>,
    media: Option<Arc<dyn MediaRepository>>,
    read_progress: Option<Arc<dyn ReadProgressRepository>>,
    thumbnails: Option<Arc<dyn SeriesThumbnailRepository>>,
    collections: Option<Arc<dyn CollectionRepository>>,
    transactions: Option<Arc<dyn TransactionScope>>,
}

impl fmt::Debug for SeriesStoresBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeriesStoresBuilder")
            .field("libraries", &self.libraries.is_some())
            .field("series", &self.series.is_some())
            .field("books", &self.books.is_some())
            .field("series_metadata", &self.series_metadata.is_some())
            .field("book_metadata", &self.book_metadata.is_some())
            .field("aggregations", &self.aggregations.is_some())
            .field("media", &self.media.is_some())
            .field("read_progress", &self.read_progress.is_some())
            .field("thumbnails", &self.thumbnails.is_some())
            .field("collections", &self.collections.is_some())
            .field("transactions", &self.transactions.is_some())
            .finish()
    }
}

impl SeriesStoresBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_libraries(mut self, repo: Arc<dyn LibraryRepository>) -> Self {
        self.libraries = Some(repo);
        self
    }
    pub fn with_series(mut self, repo: Arc<dyn SeriesRepository>) -> Self {
        self.series = Some(repo);
        self
    }
    pub fn with_books(mut self, repo: Arc<dyn BookRepository>) -> Self {
        self.books = Some(repo);
        self
    }
    pub fn with_series_metadata(mut self, repo: Arc<dyn SeriesMetadataRepository>) -> Self {
        self.series_metadata = Some(repo);
        self
    }
    pub fn with_book_metadata(mut self, repo: Arc<dyn BookMetadataRepository>) -> Self {
        self.book_metadata = Some(repo);
        self
    }
    pub fn with_aggregations(mut self, repo: Arc<dyn BookMetadataAggregationRepository>) -> Self {
        self.aggregations = Some(repo);
        self
    }
    pub fn with_media(mut self, repo: Arc<dyn MediaRepository>) -> Self {
        self.media = Some(repo);
        self
    }
    pub fn with_read_progress(mut self, repo: Arc<dyn ReadProgressRepository>) -> Self {
        self.read_progress = Some(repo);
        self
    }
    pub fn with_thumbnails(mut self, repo: Arc<dyn SeriesThumbnailRepository>) -> Self {
        self.thumbnails = Some(repo);
        self
    }
    pub fn with_collections(mut self, repo: Arc<dyn CollectionRepository>) -> Self {
        self.collections = Some(repo);
        self
    }
    pub fn with_transactions(mut self, scope: Arc<dyn TransactionScope>) -> Self {
        self.transactions = Some(scope);
        self
    }

    /// Build a validated `SeriesStores`. Returns a string error if any
    /// required repository is missing. Keep errors simple for ease of use at
    /// call sites.
    pub fn build(self) -> std::result::Result<SeriesStores, String> {
        Ok(SeriesStores {
            libraries: self
                .libraries
                .ok_or_else(|| "missing LibraryRepository".to_string())?,
            series: self
                .series
                .ok_or_else(|| "missing SeriesRepository".to_string())?,
            books: self
                .books
                .ok_or_else(|| "missing BookRepository".to_string())?,
            series_metadata: self
                .series_metadata
                .ok_or_else(|| "missing SeriesMetadataRepository".to_string())?,
            book_metadata: self
                .book_metadata
                .ok_or_else(|| "missing BookMetadataRepository".to_string())?,
            aggregations: self
                .aggregations
                .ok_or_else(|| "missing BookMetadataAggregationRepository".to_string())?,
            media: self
                .media
                .ok_or_else(|| "missing MediaRepository".to_string())?,
            read_progress: self
                .read_progress
                .ok_or_else(|| "missing ReadProgressRepository".to_string())?,
            thumbnails: self
                .thumbnails
                .ok_or_else(|| "missing SeriesThumbnailRepository".to_string())?,
            collections: self
                .collections
                .ok_or_else(|| "missing CollectionRepository".to_string())?,
            transactions: self
                .transactions
                .ok_or_else(|| "missing TransactionScope".to_string())?,
        })
    }
}
