//! In-process storage adapter.
//!
//! Backs every repository port with plain maps behind one async mutex, and
//! implements [`TransactionScope`] by snapshotting all tables on `begin` and
//! restoring the snapshot on `rollback`. Writers are serialized: a second
//! `begin` while a transaction is open is a storage error, so callers must
//! consume every handle. Intended for tests and embedded use, not for
//! multi-writer production deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quire_model::{
    Book, BookId, BookMetadata, BookMetadataAggregation, CollectionId, Library, LibraryId, Media,
    ReadProgress, Series, SeriesId, SeriesMetadata, SeriesThumbnail, ThumbnailId, UserId,
};

use crate::error::{CoreError, Result};
use crate::persistence::ports::{
    BookMetadataAggregationRepository, BookMetadataRepository, BookRepository,
    CollectionRepository, LibraryRepository, MediaRepository, ReadProgressRepository,
    SeriesMetadataRepository, SeriesRepository, SeriesThumbnailRepository,
};
use crate::persistence::unit_of_work::{SeriesStores, TransactionHandle, TransactionScope};

#[derive(Debug, Default, Clone)]
struct Tables {
    libraries: HashMap<LibraryId, Library>,
    series: HashMap<SeriesId, Series>,
    series_metadata: HashMap<SeriesId, SeriesMetadata>,
    aggregations: HashMap<SeriesId, BookMetadataAggregation>,
    books: HashMap<BookId, Book>,
    book_metadata: HashMap<BookId, BookMetadata>,
    media: HashMap<BookId, Media>,
    read_progress: HashMap<(BookId, UserId), ReadProgress>,
    thumbnails: HashMap<ThumbnailId, SeriesThumbnail>,
    collection_members: Vec<(CollectionId, SeriesId)>,
}

impl Tables {
    /// Books of one series in stable id order, soft-deleted included.
    fn books_by_series(&self, series_id: SeriesId) -> Vec<Book> {
        let mut books: Vec<Book> = self
            .books
            .values()
            .filter(|book| book.series_id == series_id)
            .cloned()
            .collect();
        books.sort_by_key(|book| book.id);
        books
    }

    /// Active books of one series ordered by shelf number.
    fn active_books_by_number(&self, series_id: SeriesId) -> Vec<Book> {
        let mut books: Vec<Book> = self
            .books
            .values()
            .filter(|book| book.series_id == series_id && !book.is_deleted())
            .cloned()
            .collect();
        books.sort_by_key(|book| (book.number, book.id));
        books
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    tables: Tables,
    snapshot: Option<Tables>,
}

/// Shared in-process store. Cloning is cheap and every clone sees the same
/// tables.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose a [`SeriesStores`] façade where every port is backed by this
    /// store.
    pub fn stores(&self) -> SeriesStores {
        let this = Arc::new(self.clone());
        SeriesStores {
            libraries: this.clone(),
            series: this.clone(),
            books: this.clone(),
            series_metadata: this.clone(),
            book_metadata: this.clone(),
            aggregations: this.clone(),
            media: this.clone(),
            read_progress: this.clone(),
            thumbnails: this.clone(),
            collections: this.clone(),
            transactions: this,
        }
    }
}

struct MemoryTransaction {
    inner: Arc<Mutex<MemoryInner>>,
}

#[async_trait]
impl TransactionHandle for MemoryTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.inner.lock().await.snapshot = None;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if let Some(tables) = inner.snapshot.take() {
            inner.tables = tables;
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionScope for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn TransactionHandle>> {
        let mut inner = self.inner.lock().await;
        if inner.snapshot.is_some() {
            return Err(CoreError::Storage(
                "a transaction is already in progress".to_string(),
            ));
        }
        inner.snapshot = Some(inner.tables.clone());
        Ok(Box::new(MemoryTransaction {
            inner: self.inner.clone(),
        }))
    }
}

#[async_trait]
impl LibraryRepository for MemoryStore {
    async fn find_by_id(&self, library_id: LibraryId) -> Result<Library> {
        self.inner
            .lock()
            .await
            .tables
            .libraries
            .get(&library_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("library {library_id}")))
    }

    async fn save(&self, library: &Library) -> Result<()> {
        self.inner
            .lock()
            .await
            .tables
            .libraries
            .insert(library.id, library.clone());
        Ok(())
    }
}

#[async_trait]
impl SeriesRepository for MemoryStore {
    async fn find_by_id(&self, series_id: SeriesId) -> Result<Option<Series>> {
        Ok(self.inner.lock().await.tables.series.get(&series_id).cloned())
    }

    async fn find_all_by_library_id(&self, library_id: LibraryId) -> Result<Vec<Series>> {
        let inner = self.inner.lock().await;
        let mut series: Vec<Series> = inner
            .tables
            .series
            .values()
            .filter(|series| series.library_id == library_id)
            .cloned()
            .collect();
        series.sort_by_key(|series| series.id);
        Ok(series)
    }

    async fn find_all_active_by_library_id(&self, library_id: LibraryId) -> Result<Vec<Series>> {
        let all = self.find_all_by_library_id(library_id).await?;
        Ok(all.into_iter().filter(|series| !series.is_deleted()).collect())
    }

    async fn insert(&self, series: &[Series]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for one in series {
            if inner.tables.series.contains_key(&one.id) {
                return Err(CoreError::Conflict(format!("series {} already exists", one.id)));
            }
        }
        for one in series {
            inner.tables.series.insert(one.id, one.clone());
        }
        Ok(())
    }

    async fn update(&self, series: &[Series]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for one in series {
            if !inner.tables.series.contains_key(&one.id) {
                return Err(CoreError::NotFound(format!("series {}", one.id)));
            }
            inner.tables.series.insert(one.id, one.clone());
        }
        Ok(())
    }

    async fn delete(&self, series_ids: &[SeriesId]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for id in series_ids {
            inner.tables.series.remove(id);
        }
        Ok(())
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn find_all_by_series_id(&self, series_id: SeriesId) -> Result<Vec<Book>> {
        Ok(self.inner.lock().await.tables.books_by_series(series_id))
    }

    async fn find_all_by_series_ids(&self, series_ids: &[SeriesId]) -> Result<Vec<Book>> {
        let inner = self.inner.lock().await;
        let mut books = Vec::new();
        for series_id in series_ids {
            books.extend(inner.tables.books_by_series(*series_id));
        }
        Ok(books)
    }

    async fn find_all_ids_by_series_id(&self, series_id: SeriesId) -> Result<Vec<BookId>> {
        Ok(BookRepository::find_all_by_series_id(self, series_id)
            .await?
            .into_iter()
            .map(|book| book.id)
            .collect())
    }

    async fn find_first_id_in_series(&self, series_id: SeriesId) -> Result<Option<BookId>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .tables
            .active_books_by_number(series_id)
            .first()
            .map(|book| book.id))
    }

    async fn find_last_id_in_series(&self, series_id: SeriesId) -> Result<Option<BookId>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .tables
            .active_books_by_number(series_id)
            .last()
            .map(|book| book.id))
    }

    async fn find_first_unread_id_in_series(
        &self,
        series_id: SeriesId,
        user_id: UserId,
    ) -> Result<Option<BookId>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .tables
            .active_books_by_number(series_id)
            .iter()
            .find(|book| {
                inner
                    .tables
                    .read_progress
                    .get(&(book.id, user_id))
                    .map(|progress| !progress.completed)
                    .unwrap_or(true)
            })
            .map(|book| book.id))
    }

    async fn insert(&self, books: &[Book]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for book in books {
            if inner.tables.books.contains_key(&book.id) {
                return Err(CoreError::Conflict(format!("book {} already exists", book.id)));
            }
        }
        for book in books {
            inner.tables.books.insert(book.id, book.clone());
        }
        Ok(())
    }

    async fn update(&self, books: &[Book]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for book in books {
            if !inner.tables.books.contains_key(&book.id) {
                return Err(CoreError::NotFound(format!("book {}", book.id)));
            }
            inner.tables.books.insert(book.id, book.clone());
        }
        Ok(())
    }

    async fn delete(&self, book_ids: &[BookId]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for id in book_ids {
            inner.tables.books.remove(id);
        }
        Ok(())
    }
}

#[async_trait]
impl SeriesMetadataRepository for MemoryStore {
    async fn find_by_series_id(&self, series_id: SeriesId) -> Result<Option<SeriesMetadata>> {
        Ok(self
            .inner
            .lock()
            .await
            .tables
            .series_metadata
            .get(&series_id)
            .cloned())
    }

    async fn insert(&self, metadata: &SeriesMetadata) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.tables.series_metadata.contains_key(&metadata.series_id) {
            return Err(CoreError::Conflict(format!(
                "series metadata {} already exists",
                metadata.series_id
            )));
        }
        inner
            .tables
            .series_metadata
            .insert(metadata.series_id, metadata.clone());
        Ok(())
    }

    async fn delete(&self, series_ids: &[SeriesId]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for id in series_ids {
            inner.tables.series_metadata.remove(id);
        }
        Ok(())
    }
}

#[async_trait]
impl BookMetadataRepository for MemoryStore {
    async fn find_all_by_book_ids(&self, book_ids: &[BookId]) -> Result<Vec<BookMetadata>> {
        let inner = self.inner.lock().await;
        Ok(book_ids
            .iter()
            .filter_map(|id| inner.tables.book_metadata.get(id).cloned())
            .collect())
    }

    async fn insert(&self, metadata: &[BookMetadata]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for one in metadata {
            if inner.tables.book_metadata.contains_key(&one.book_id) {
                return Err(CoreError::Conflict(format!(
                    "book metadata {} already exists",
                    one.book_id
                )));
            }
        }
        for one in metadata {
            inner.tables.book_metadata.insert(one.book_id, one.clone());
        }
        Ok(())
    }

    async fn update(&self, metadata: &[BookMetadata]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for one in metadata {
            if !inner.tables.book_metadata.contains_key(&one.book_id) {
                return Err(CoreError::NotFound(format!("book metadata {}", one.book_id)));
            }
            inner.tables.book_metadata.insert(one.book_id, one.clone());
        }
        Ok(())
    }

    async fn delete_by_book_ids(&self, book_ids: &[BookId]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for id in book_ids {
            inner.tables.book_metadata.remove(id);
        }
        Ok(())
    }
}

#[async_trait]
impl BookMetadataAggregationRepository for MemoryStore {
    async fn find_by_series_id(
        &self,
        series_id: SeriesId,
    ) -> Result<Option<BookMetadataAggregation>> {
        Ok(self
            .inner
            .lock()
            .await
            .tables
            .aggregations
            .get(&series_id)
            .cloned())
    }

    async fn insert(&self, aggregation: &BookMetadataAggregation) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.tables.aggregations.contains_key(&aggregation.series_id) {
            return Err(CoreError::Conflict(format!(
                "aggregation {} already exists",
                aggregation.series_id
            )));
        }
        inner
            .tables
            .aggregations
            .insert(aggregation.series_id, aggregation.clone());
        Ok(())
    }

    async fn delete(&self, series_ids: &[SeriesId]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for id in series_ids {
            inner.tables.aggregations.remove(id);
        }
        Ok(())
    }
}

#[async_trait]
impl MediaRepository for MemoryStore {
    async fn find_by_book_id(&self, book_id: BookId) -> Result<Option<Media>> {
        Ok(self.inner.lock().await.tables.media.get(&book_id).cloned())
    }

    async fn page_counts(&self, book_ids: &[BookId]) -> Result<Vec<(BookId, u32)>> {
        let inner = self.inner.lock().await;
        Ok(book_ids
            .iter()
            .filter_map(|id| inner.tables.media.get(id).map(|media| (*id, media.page_count)))
            .collect())
    }

    async fn insert(&self, media: &[Media]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for one in media {
            if inner.tables.media.contains_key(&one.book_id) {
                return Err(CoreError::Conflict(format!(
                    "media {} already exists",
                    one.book_id
                )));
            }
        }
        for one in media {
            inner.tables.media.insert(one.book_id, one.clone());
        }
        Ok(())
    }

    async fn update(&self, media: &[Media]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for one in media {
            if !inner.tables.media.contains_key(&one.book_id) {
                return Err(CoreError::NotFound(format!("media {}", one.book_id)));
            }
            inner.tables.media.insert(one.book_id, one.clone());
        }
        Ok(())
    }

    async fn delete_by_book_ids(&self, book_ids: &[BookId]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for id in book_ids {
            inner.tables.media.remove(id);
        }
        Ok(())
    }
}

#[async_trait]
impl ReadProgressRepository for MemoryStore {
    async fn save(&self, progress: &[ReadProgress]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for one in progress {
            inner
                .tables
                .read_progress
                .insert((one.book_id, one.user_id), one.clone());
        }
        Ok(())
    }

    async fn find_all_by_book_ids_and_user_id(
        &self,
        book_ids: &[BookId],
        user_id: UserId,
    ) -> Result<Vec<ReadProgress>> {
        let inner = self.inner.lock().await;
        Ok(book_ids
            .iter()
            .filter_map(|id| inner.tables.read_progress.get(&(*id, user_id)).cloned())
            .collect())
    }

    async fn delete_by_book_ids_and_user_id(
        &self,
        book_ids: &[BookId],
        user_id: UserId,
    ) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for id in book_ids {
            inner.tables.read_progress.remove(&(*id, user_id));
        }
        Ok(())
    }

    async fn delete_by_book_ids(&self, book_ids: &[BookId]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner
            .tables
            .read_progress
            .retain(|(book_id, _), _| !book_ids.contains(book_id));
        Ok(())
    }

    async fn delete_by_series_ids(&self, series_ids: &[SeriesId]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let doomed: Vec<BookId> = inner
            .tables
            .books
            .values()
            .filter(|book| series_ids.contains(&book.series_id))
            .map(|book| book.id)
            .collect();
        inner
            .tables
            .read_progress
            .retain(|(book_id, _), _| !doomed.contains(book_id));
        Ok(())
    }
}

#[async_trait]
impl SeriesThumbnailRepository for MemoryStore {
    async fn find_all_by_series_id(&self, series_id: SeriesId) -> Result<Vec<SeriesThumbnail>> {
        let inner = self.inner.lock().await;
        let mut thumbnails: Vec<SeriesThumbnail> = inner
            .tables
            .thumbnails
            .values()
            .filter(|thumbnail| thumbnail.series_id == series_id)
            .cloned()
            .collect();
        thumbnails.sort_by_key(|thumbnail| thumbnail.id);
        Ok(thumbnails)
    }

    async fn find_selected_by_series_id(
        &self,
        series_id: SeriesId,
    ) -> Result<Option<SeriesThumbnail>> {
        Ok(SeriesThumbnailRepository::find_all_by_series_id(self, series_id)
            .await?
            .into_iter()
            .find(|thumbnail| thumbnail.selected))
    }

    async fn insert(&self, thumbnail: &SeriesThumbnail) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.tables.thumbnails.contains_key(&thumbnail.id) {
            return Err(CoreError::Conflict(format!(
                "thumbnail {} already exists",
                thumbnail.id
            )));
        }
        inner.tables.thumbnails.insert(thumbnail.id, thumbnail.clone());
        Ok(())
    }

    async fn mark_selected(&self, thumbnail: &SeriesThumbnail) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if !inner.tables.thumbnails.contains_key(&thumbnail.id) {
            return Err(CoreError::NotFound(format!("thumbnail {}", thumbnail.id)));
        }
        let series_id = thumbnail.series_id;
        let selected_id = thumbnail.id;
        for row in inner.tables.thumbnails.values_mut() {
            if row.series_id == series_id {
                row.selected = row.id == selected_id;
            }
        }
        Ok(())
    }

    async fn delete(&self, thumbnail_id: ThumbnailId) -> Result<()> {
        self.inner.lock().await.tables.thumbnails.remove(&thumbnail_id);
        Ok(())
    }

    async fn delete_by_series_ids(&self, series_ids: &[SeriesId]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner
            .tables
            .thumbnails
            .retain(|_, thumbnail| !series_ids.contains(&thumbnail.series_id));
        Ok(())
    }
}

#[async_trait]
impl CollectionRepository for MemoryStore {
    async fn add_series(&self, collection_id: CollectionId, series_id: SeriesId) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let member = (collection_id, series_id);
        if !inner.tables.collection_members.contains(&member) {
            inner.tables.collection_members.push(member);
        }
        Ok(())
    }

    async fn find_all_by_series_id(&self, series_id: SeriesId) -> Result<Vec<CollectionId>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .tables
            .collection_members
            .iter()
            .filter(|(_, member)| *member == series_id)
            .map(|(collection_id, _)| *collection_id)
            .collect())
    }

    async fn remove_series_from_all(&self, series_ids: &[SeriesId]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner
            .tables
            .collection_members
            .retain(|(_, member)| !series_ids.contains(member));
        Ok(())
    }
}
