//! Series lifecycle orchestration.
//!
//! Composes the repository ports, the book lifecycle, the event publisher,
//! and the task trigger into the operations that keep a series consistent:
//! creation, book-set mutation and renumbering, deletion cascades, bulk read
//! progress, and cover-thumbnail selection with self-healing housekeeping.
//!
//! Multi-entity writes run inside one [`with_transaction`] scope and events
//! are published only after the commit succeeds. The renumbering and
//! housekeeping routines are read-compute-write sequences without their own
//! lock; callers that may race on the same series must serialize per series
//! (for SQL adapters, a row lock on the series record).

use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use quire_model::{
    Book, BookId, BookMetadata, BookMetadataAggregation, BookMetadataField, DomainEvent,
    ReadProgress, Series, SeriesCoverPolicy, SeriesId, SeriesMetadata, SeriesThumbnail, UserId,
    natural_cmp,
};

use crate::domain::books::BookLifecycle;
use crate::error::{CoreError, Result};
use crate::events::EventPublisher;
use crate::persistence::unit_of_work::{SeriesStores, with_transaction};
use crate::tasks::TaskTrigger;

/// Orchestrates every mutation of a series and its dependent rows.
#[derive(Clone)]
pub struct SeriesLifecycleService {
    stores: SeriesStores,
    books: Arc<dyn BookLifecycle>,
    events: Arc<dyn EventPublisher>,
    tasks: Arc<dyn TaskTrigger>,
}

impl fmt::Debug for SeriesLifecycleService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeriesLifecycleService")
            .field("stores", &type_name_of_val(&self.stores))
            .field("books", &type_name_of_val(self.books.as_ref()))
            .field("events", &type_name_of_val(self.events.as_ref()))
            .field("tasks", &type_name_of_val(self.tasks.as_ref()))
            .finish()
    }
}

impl SeriesLifecycleService {
    pub fn new(
        stores: SeriesStores,
        books: Arc<dyn BookLifecycle>,
        events: Arc<dyn EventPublisher>,
        tasks: Arc<dyn TaskTrigger>,
    ) -> Self {
        Self {
            stores,
            books,
            events,
            tasks,
        }
    }

    /// Persist a new series with its metadata siblings in one transaction and
    /// return the stored row.
    pub async fn create_series(&self, series: Series) -> Result<Series> {
        debug!(series = %series.id, name = %series.name, "creating series");

        let metadata = SeriesMetadata::from_series(&series);
        let aggregation = BookMetadataAggregation::empty(series.id);

        with_transaction(self.stores.transactions.as_ref(), async || {
            self.stores.series.insert(std::slice::from_ref(&series)).await?;
            self.stores.series_metadata.insert(&metadata).await?;
            self.stores.aggregations.insert(&aggregation).await?;
            Ok(())
        })
        .await?;

        self.publish(DomainEvent::SeriesAdded(series.clone())).await;

        // Re-read to surface storage-assigned defaults.
        self.stores
            .series
            .find_by_id(series.id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("series {}", series.id)))
    }

    /// Attach books to a series, creating their media and metadata rows.
    ///
    /// Every candidate must belong to the series' library; the first mismatch
    /// aborts before anything is written. Returns the books as persisted.
    pub async fn add_books(&self, series: &Series, books_to_add: Vec<Book>) -> Result<Vec<Book>> {
        for book in &books_to_add {
            if book.library_id != series.library_id {
                return Err(CoreError::InvariantViolation(format!(
                    "cannot add book {} to series {}: libraries differ",
                    book.id, series.id
                )));
            }
        }

        let to_add: Vec<Book> = books_to_add
            .into_iter()
            .map(|mut book| {
                book.series_id = series.id;
                book
            })
            .collect();
        let media: Vec<_> = to_add.iter().map(|book| quire_model::Media::empty(book.id)).collect();
        let metadata: Vec<_> = to_add.iter().map(BookMetadata::seeded).collect();

        with_transaction(self.stores.transactions.as_ref(), async || {
            self.stores.books.insert(&to_add).await?;
            self.stores.media.insert(&media).await?;
            self.stores.book_metadata.insert(&metadata).await?;
            Ok(())
        })
        .await?;

        for book in &to_add {
            self.publish(DomainEvent::BookAdded(book.clone())).await;
        }
        Ok(to_add)
    }

    /// Renumber the series' books to their 1-based rank under natural name
    /// ordering, respecting per-field metadata locks, and refresh the cached
    /// book count.
    pub async fn sort_books(&self, series: &Series) -> Result<()> {
        debug!(series = %series.id, "sorting books");

        let books = self.stores.books.find_all_by_series_id(series.id).await?;
        let book_ids: Vec<BookId> = books.iter().map(|book| book.id).collect();
        let metadata = self.stores.book_metadata.find_all_by_book_ids(&book_ids).await?;

        let mut sorted: Vec<(Book, BookMetadata)> = Vec::with_capacity(books.len());
        for book in books.iter() {
            let meta = metadata
                .iter()
                .find(|meta| meta.book_id == book.id)
                .cloned()
                .ok_or_else(|| CoreError::NotFound(format!("book metadata {}", book.id)))?;
            sorted.push((book.clone(), meta));
        }
        sorted.sort_by(|a, b| natural_cmp(&a.0.name, &b.0.name));

        let renumbered: Vec<Book> = sorted
            .iter()
            .enumerate()
            .map(|(index, (book, _))| {
                let mut book = book.clone();
                book.number = index as u32 + 1;
                book
            })
            .collect();
        self.stores.books.update(&renumbered).await?;

        // Metadata rows with both fields locked are left alone entirely.
        let old_to_new: Vec<(BookMetadata, BookMetadata)> = sorted
            .iter()
            .enumerate()
            .filter(|(_, (_, meta))| !(meta.number_lock && meta.number_sort_lock))
            .map(|(index, (_, meta))| {
                let rank = index as u32 + 1;
                let mut updated = meta.clone();
                if !meta.number_lock {
                    updated.number = rank.to_string();
                }
                if !meta.number_sort_lock {
                    updated.number_sort = rank as f32;
                }
                (meta.clone(), updated)
            })
            .collect();
        let updates: Vec<BookMetadata> =
            old_to_new.iter().map(|(_, updated)| updated.clone()).collect();
        self.stores.book_metadata.update(&updates).await?;

        // Refresh metadata to reimport the book number, else the series
        // resorting would overwrite it.
        for (old, updated) in &old_to_new {
            if old.number != updated.number || old.number_sort != updated.number_sort {
                debug!(book = %updated.book_id, "metadata numbering changed, requesting refresh");
                if let Err(err) = self
                    .tasks
                    .refresh_book_metadata(
                        updated.book_id,
                        vec![BookMetadataField::Number, BookMetadataField::NumberSort],
                    )
                    .await
                {
                    warn!(book = %updated.book_id, error = %err,
                        "failed to request metadata refresh");
                }
            }
        }

        if let Some(current) = self.stores.series.find_by_id(series.id).await? {
            let mut updated = current;
            updated.book_count = books.len() as u32;
            self.stores.series.update(std::slice::from_ref(&updated)).await?;
        }
        Ok(())
    }

    /// Reversibly delete a batch of series: cascade a soft delete to their
    /// books, then stamp each series' `deleted_date`.
    pub async fn soft_delete_many(&self, series: Vec<Series>) -> Result<()> {
        let series_ids: Vec<SeriesId> = series.iter().map(|one| one.id).collect();
        info!(?series_ids, "soft delete series");
        let deleted_date = Utc::now();

        let books = self.stores.books.find_all_by_series_ids(&series_ids).await?;
        let stamped: Vec<Series> = series
            .iter()
            .map(|one| {
                let mut one = one.clone();
                one.deleted_date = Some(deleted_date);
                one
            })
            .collect();

        with_transaction(self.stores.transactions.as_ref(), async || {
            self.books.soft_delete_many(&books).await?;
            self.stores.series.update(&stamped).await?;
            Ok(())
        })
        .await?;

        for one in stamped {
            self.publish(DomainEvent::SeriesUpdated(one)).await;
        }
        Ok(())
    }

    /// Irreversibly delete a batch of series and every dependent row, all in
    /// one transaction.
    pub async fn delete_many(&self, series: Vec<Series>) -> Result<()> {
        let series_ids: Vec<SeriesId> = series.iter().map(|one| one.id).collect();
        info!(?series_ids, "delete series");

        let books = self.stores.books.find_all_by_series_ids(&series_ids).await?;

        with_transaction(self.stores.transactions.as_ref(), async || {
            self.books.delete_many(&books).await?;

            self.stores.read_progress.delete_by_series_ids(&series_ids).await?;
            self.stores.collections.remove_series_from_all(&series_ids).await?;
            self.stores.thumbnails.delete_by_series_ids(&series_ids).await?;
            self.stores.series_metadata.delete(&series_ids).await?;
            self.stores.aggregations.delete(&series_ids).await?;

            self.stores.series.delete(&series_ids).await?;
            Ok(())
        })
        .await?;

        for one in series {
            self.publish(DomainEvent::SeriesDeleted(one)).await;
        }
        Ok(())
    }

    /// Mark every book of the series as fully read for the user in one bulk
    /// write.
    pub async fn mark_read_progress_completed(
        &self,
        series_id: SeriesId,
        user_id: UserId,
    ) -> Result<()> {
        let book_ids = self.stores.books.find_all_ids_by_series_id(series_id).await?;
        let progress: Vec<ReadProgress> = self
            .stores
            .media
            .page_counts(&book_ids)
            .await?
            .into_iter()
            .map(|(book_id, page_count)| ReadProgress::completed(book_id, user_id, page_count))
            .collect();

        self.stores.read_progress.save(&progress).await?;

        for one in &progress {
            self.publish(DomainEvent::ReadProgressChanged(one.clone())).await;
        }
        self.publish(DomainEvent::ReadProgressSeriesChanged { series_id, user_id })
            .await;
        Ok(())
    }

    /// Remove the user's read progress for every book of the series. Removing
    /// progress that does not exist is a no-op.
    pub async fn delete_read_progress(&self, series_id: SeriesId, user_id: UserId) -> Result<()> {
        let book_ids = self.stores.books.find_all_ids_by_series_id(series_id).await?;
        let progress = self
            .stores
            .read_progress
            .find_all_by_book_ids_and_user_id(&book_ids, user_id)
            .await?;
        self.stores
            .read_progress
            .delete_by_book_ids_and_user_id(&book_ids, user_id)
            .await?;

        for one in progress {
            self.publish(DomainEvent::ReadProgressDeleted(one)).await;
        }
        self.publish(DomainEvent::ReadProgressSeriesDeleted { series_id, user_id })
            .await;
        Ok(())
    }

    /// The series' selected thumbnail, running housekeeping first when the
    /// selection is missing or its backing resource is gone.
    pub async fn get_thumbnail(&self, series_id: SeriesId) -> Result<Option<SeriesThumbnail>> {
        let selected = self.stores.thumbnails.find_selected_by_series_id(series_id).await?;

        match selected {
            Some(thumbnail) if thumbnail_exists(&thumbnail) => Ok(Some(thumbnail)),
            _ => {
                self.thumbnails_housekeeping(series_id).await?;
                self.stores.thumbnails.find_selected_by_series_id(series_id).await
            }
        }
    }

    /// Raw cover bytes for the series: its own selected thumbnail when one
    /// resolves, otherwise the library's cover policy applied to its books.
    /// Resolving nothing is `Ok(None)`, not an error.
    pub async fn get_thumbnail_bytes(
        &self,
        series_id: SeriesId,
        user_id: UserId,
    ) -> Result<Option<Vec<u8>>> {
        if let Some(thumbnail) = self.get_thumbnail(series_id).await? {
            if let Some(bytes) = read_thumbnail_bytes(&thumbnail).await {
                return Ok(Some(bytes));
            }
        }

        let Some(series) = self.stores.series.find_by_id(series_id).await? else {
            return Ok(None);
        };
        let library = self.stores.libraries.find_by_id(series.library_id).await?;

        let book_id = match library.series_cover {
            SeriesCoverPolicy::First => {
                self.stores.books.find_first_id_in_series(series_id).await?
            }
            SeriesCoverPolicy::FirstUnreadOrFirst => {
                match self
                    .stores
                    .books
                    .find_first_unread_id_in_series(series_id, user_id)
                    .await?
                {
                    Some(book_id) => Some(book_id),
                    None => self.stores.books.find_first_id_in_series(series_id).await?,
                }
            }
            SeriesCoverPolicy::FirstUnreadOrLast => {
                match self
                    .stores
                    .books
                    .find_first_unread_id_in_series(series_id, user_id)
                    .await?
                {
                    Some(book_id) => Some(book_id),
                    None => self.stores.books.find_last_id_in_series(series_id).await?,
                }
            }
            SeriesCoverPolicy::Last => {
                self.stores.books.find_last_id_in_series(series_id).await?
            }
        };

        match book_id {
            Some(book_id) => self.books.get_thumbnail_bytes(book_id).await,
            None => Ok(None),
        }
    }

    /// Add a thumbnail, replacing any existing record with the same url. A
    /// thumbnail arriving pre-selected is promoted to the sole selection.
    pub async fn add_thumbnail(&self, thumbnail: SeriesThumbnail) -> Result<()> {
        let existing = self
            .stores
            .thumbnails
            .find_all_by_series_id(thumbnail.series_id)
            .await?;
        for duplicate in existing.iter().filter(|one| one.url == thumbnail.url) {
            self.stores.thumbnails.delete(duplicate.id).await?;
        }
        self.stores.thumbnails.insert(&thumbnail).await?;

        self.publish(DomainEvent::ThumbnailSeriesAdded(thumbnail.clone())).await;

        if thumbnail.selected {
            self.stores.thumbnails.mark_selected(&thumbnail).await?;
        }
        Ok(())
    }

    /// Idempotent repair pass over the series' thumbnails: drop records whose
    /// backing resource is gone, then converge on exactly one selection when
    /// any thumbnails remain. Safe to run repeatedly and from any caller.
    pub async fn thumbnails_housekeeping(&self, series_id: SeriesId) -> Result<()> {
        info!(series = %series_id, "house keeping thumbnails");

        let mut remaining = Vec::new();
        for thumbnail in self.stores.thumbnails.find_all_by_series_id(series_id).await? {
            if thumbnail_exists(&thumbnail) {
                remaining.push(thumbnail);
            } else {
                warn!(thumbnail = %thumbnail.id, url = %thumbnail.url,
                    "thumbnail resource is gone, removing entry");
                self.stores.thumbnails.delete(thumbnail.id).await?;
            }
        }

        let selected: Vec<&SeriesThumbnail> =
            remaining.iter().filter(|thumbnail| thumbnail.selected).collect();
        if selected.len() > 1 {
            info!(series = %series_id, "more than one thumbnail is selected, keeping the first");
            self.stores.thumbnails.mark_selected(selected[0]).await?;
        } else if selected.is_empty() {
            if let Some(first) = remaining.first() {
                info!(series = %series_id, "series has no selected thumbnail, choosing one");
                self.stores.thumbnails.mark_selected(first).await?;
            }
        }
        Ok(())
    }

    async fn publish(&self, event: DomainEvent) {
        if let Err(err) = self.events.publish(event).await {
            warn!(error = %err, "failed to publish lifecycle event");
        }
    }
}

/// Filesystem stat for a thumbnail's backing resource. Any error (including
/// non-file urls) counts as missing.
fn thumbnail_exists(thumbnail: &SeriesThumbnail) -> bool {
    match thumbnail.url.to_file_path() {
        Ok(path) => path.try_exists().unwrap_or(false),
        Err(()) => false,
    }
}

async fn read_thumbnail_bytes(thumbnail: &SeriesThumbnail) -> Option<Vec<u8>> {
    let path = thumbnail.url.to_file_path().ok()?;
    match tokio::fs::read(&path).await {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            warn!(thumbnail = %thumbnail.id, error = %err, "thumbnail could not be read");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use quire_model::Library;
    use url::Url;

    use crate::domain::books::BookLifecycleService;
    use crate::events::InProcEventBus;
    use crate::persistence::memory::MemoryStore;
    use crate::persistence::ports::{
        BookMetadataRepository, BookRepository, SeriesRepository, SeriesThumbnailRepository,
    };
    use crate::tasks::{MockTaskTrigger, QueuedTaskTrigger};

    fn service_with_tasks(
        store: &MemoryStore,
        tasks: Arc<dyn TaskTrigger>,
    ) -> SeriesLifecycleService {
        let stores = store.stores();
        SeriesLifecycleService::new(
            stores.clone(),
            Arc::new(BookLifecycleService::new(stores)),
            Arc::new(InProcEventBus::new(64)),
            tasks,
        )
    }

    fn service(store: &MemoryStore) -> SeriesLifecycleService {
        let (tasks, _rx) = QueuedTaskTrigger::new();
        service_with_tasks(store, Arc::new(tasks))
    }

    async fn seeded_series(store: &MemoryStore, names: &[&str]) -> Series {
        let library = Library::new("Shelf");
        let series = service(store)
            .create_series(Series::new(library.id, "Series"))
            .await
            .unwrap();
        let books: Vec<Book> = names
            .iter()
            .enumerate()
            .map(|(index, name)| Book::new(library.id, series.id, *name, index as u32 + 1))
            .collect();
        service(store).add_books(&series, books).await.unwrap();
        series
    }

    #[tokio::test]
    async fn renumbering_follows_natural_name_order() {
        let store = MemoryStore::new();
        let series = seeded_series(&store, &["Chapter 10", "chapter 2", "Chapter 1"]).await;

        service(&store).sort_books(&series).await.unwrap();

        let mut books = BookRepository::find_all_by_series_id(&store, series.id)
            .await
            .unwrap();
        books.sort_by_key(|book| book.number);
        let names: Vec<&str> = books.iter().map(|book| book.name.as_str()).collect();
        assert_eq!(names, vec!["Chapter 1", "chapter 2", "Chapter 10"]);
        let numbers: Vec<u32> = books.iter().map(|book| book.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        let stored = SeriesRepository::find_by_id(&store, series.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.book_count, 3);
    }

    #[tokio::test]
    async fn refresh_is_requested_only_for_changed_numbering() {
        let store = MemoryStore::new();
        // Already in natural order with matching metadata: nothing changes.
        let series = seeded_series(&store, &["Book 1", "Book 2"]).await;

        let mut tasks = MockTaskTrigger::new();
        tasks.expect_refresh_book_metadata().never();
        service_with_tasks(&store, Arc::new(tasks))
            .sort_books(&series)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn refresh_targets_number_fields_of_moved_books() {
        let store = MemoryStore::new();
        let series = seeded_series(&store, &["Book 2", "Book 1"]).await;

        let mut tasks = MockTaskTrigger::new();
        tasks
            .expect_refresh_book_metadata()
            .withf(|_, fields| {
                fields == &[BookMetadataField::Number, BookMetadataField::NumberSort]
            })
            .times(2)
            .returning(|_, _| Ok(()));
        service_with_tasks(&store, Arc::new(tasks))
            .sort_books(&series)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn number_lock_keeps_the_label_but_updates_the_sort_key() {
        let store = MemoryStore::new();
        let series = seeded_series(&store, &["Book 2", "Book 1"]).await;
        let books = BookRepository::find_all_by_series_id(&store, series.id)
            .await
            .unwrap();
        let locked = books.iter().find(|book| book.name == "Book 2").unwrap();
        let mut meta = BookMetadataRepository::find_all_by_book_ids(&store, &[locked.id])
            .await
            .unwrap()
            .remove(0);
        meta.number_lock = true;
        BookMetadataRepository::update(&store, std::slice::from_ref(&meta))
            .await
            .unwrap();

        service(&store).sort_books(&series).await.unwrap();

        let meta = BookMetadataRepository::find_all_by_book_ids(&store, &[locked.id])
            .await
            .unwrap()
            .remove(0);
        // "Book 2" ranks second; the label keeps its seeded value "1".
        assert_eq!(meta.number, "1");
        assert_eq!(meta.number_sort, 2.0);
    }

    #[tokio::test]
    async fn number_sort_lock_keeps_the_sort_key_but_updates_the_label() {
        let store = MemoryStore::new();
        let series = seeded_series(&store, &["Book 2", "Book 1"]).await;
        let books = BookRepository::find_all_by_series_id(&store, series.id)
            .await
            .unwrap();
        let locked = books.iter().find(|book| book.name == "Book 2").unwrap();
        let mut meta = BookMetadataRepository::find_all_by_book_ids(&store, &[locked.id])
            .await
            .unwrap()
            .remove(0);
        meta.number_sort_lock = true;
        BookMetadataRepository::update(&store, std::slice::from_ref(&meta))
            .await
            .unwrap();

        service(&store).sort_books(&series).await.unwrap();

        let meta = BookMetadataRepository::find_all_by_book_ids(&store, &[locked.id])
            .await
            .unwrap()
            .remove(0);
        assert_eq!(meta.number, "2");
        assert_eq!(meta.number_sort, 1.0);
    }

    #[tokio::test]
    async fn cross_library_books_are_rejected_before_any_write() {
        let store = MemoryStore::new();
        let library = Library::new("Shelf");
        let other_library = Library::new("Elsewhere");
        let series = service(&store)
            .create_series(Series::new(library.id, "Series"))
            .await
            .unwrap();

        let good = Book::new(library.id, series.id, "Book 1", 1);
        let stray = Book::new(other_library.id, series.id, "Book 2", 2);
        let result = service(&store).add_books(&series, vec![good, stray]).await;

        assert!(matches!(result, Err(CoreError::InvariantViolation(_))));
        assert!(
            BookRepository::find_all_by_series_id(&store, series.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn duplicate_series_ids_conflict() {
        let store = MemoryStore::new();
        let library = Library::new("Shelf");
        let series = Series::new(library.id, "Series");

        service(&store).create_series(series.clone()).await.unwrap();
        let result = service(&store).create_series(series).await;
        assert!(matches!(result, Err(CoreError::Conflict(_))));
    }

    fn file_thumbnail(series_id: SeriesId, path: &std::path::Path, selected: bool) -> SeriesThumbnail {
        let url = Url::from_file_path(path).unwrap();
        SeriesThumbnail::new(series_id, url, selected)
    }

    #[tokio::test]
    async fn housekeeping_collapses_multiple_selections_to_one() {
        let store = MemoryStore::new();
        let series_id = SeriesId::new();
        let dir = tempfile::tempdir().unwrap();
        for index in 0..3 {
            let path = dir.path().join(format!("cover-{index}.jpg"));
            std::fs::File::create(&path)
                .unwrap()
                .write_all(b"img")
                .unwrap();
            // Bypass add_thumbnail to fabricate an inconsistent state.
            SeriesThumbnailRepository::insert(&store, &file_thumbnail(series_id, &path, true))
                .await
                .unwrap();
        }

        service(&store).thumbnails_housekeeping(series_id).await.unwrap();

        let all = SeriesThumbnailRepository::find_all_by_series_id(&store, series_id)
            .await
            .unwrap();
        assert_eq!(all.iter().filter(|thumbnail| thumbnail.selected).count(), 1);
    }

    #[tokio::test]
    async fn housekeeping_selects_one_when_none_are_selected() {
        let store = MemoryStore::new();
        let series_id = SeriesId::new();
        let dir = tempfile::tempdir().unwrap();
        for index in 0..2 {
            let path = dir.path().join(format!("cover-{index}.jpg"));
            std::fs::File::create(&path)
                .unwrap()
                .write_all(b"img")
                .unwrap();
            SeriesThumbnailRepository::insert(&store, &file_thumbnail(series_id, &path, false))
                .await
                .unwrap();
        }

        service(&store).thumbnails_housekeeping(series_id).await.unwrap();

        let all = SeriesThumbnailRepository::find_all_by_series_id(&store, series_id)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().filter(|thumbnail| thumbnail.selected).count(), 1);
    }

    #[tokio::test]
    async fn housekeeping_drops_missing_files_and_reselects() {
        let store = MemoryStore::new();
        let series_id = SeriesId::new();
        let dir = tempfile::tempdir().unwrap();

        let gone = dir.path().join("gone.jpg");
        std::fs::File::create(&gone).unwrap().write_all(b"img").unwrap();
        let selected = file_thumbnail(series_id, &gone, true);
        SeriesThumbnailRepository::insert(&store, &selected).await.unwrap();
        std::fs::remove_file(&gone).unwrap();

        let kept_path = dir.path().join("kept.jpg");
        std::fs::File::create(&kept_path)
            .unwrap()
            .write_all(b"img")
            .unwrap();
        let kept = file_thumbnail(series_id, &kept_path, false);
        SeriesThumbnailRepository::insert(&store, &kept).await.unwrap();

        service(&store).thumbnails_housekeeping(series_id).await.unwrap();

        let all = SeriesThumbnailRepository::find_all_by_series_id(&store, series_id)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, kept.id);
        assert!(all[0].selected);
    }

    #[tokio::test]
    async fn housekeeping_is_idempotent() {
        let store = MemoryStore::new();
        let series_id = SeriesId::new();
        let dir = tempfile::tempdir().unwrap();
        for index in 0..3 {
            let path = dir.path().join(format!("cover-{index}.jpg"));
            std::fs::File::create(&path)
                .unwrap()
                .write_all(b"img")
                .unwrap();
            SeriesThumbnailRepository::insert(
                &store,
                &file_thumbnail(series_id, &path, false),
            )
            .await
            .unwrap();
        }

        let lifecycle = service(&store);
        lifecycle.thumbnails_housekeeping(series_id).await.unwrap();
        let first_pass = SeriesThumbnailRepository::find_all_by_series_id(&store, series_id)
            .await
            .unwrap();
        lifecycle.thumbnails_housekeeping(series_id).await.unwrap();
        let second_pass = SeriesThumbnailRepository::find_all_by_series_id(&store, series_id)
            .await
            .unwrap();

        assert_eq!(first_pass, second_pass);
    }

    #[tokio::test]
    async fn adding_a_thumbnail_dedups_by_url_and_promotes_selection() {
        let store = MemoryStore::new();
        let series_id = SeriesId::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.jpg");
        std::fs::File::create(&path).unwrap().write_all(b"img").unwrap();

        let lifecycle = service(&store);
        let first = file_thumbnail(series_id, &path, false);
        lifecycle.add_thumbnail(first.clone()).await.unwrap();

        let replacement = file_thumbnail(series_id, &path, true);
        lifecycle.add_thumbnail(replacement.clone()).await.unwrap();

        let all = SeriesThumbnailRepository::find_all_by_series_id(&store, series_id)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, replacement.id);
        assert!(all[0].selected);
    }
}
