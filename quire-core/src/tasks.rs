//! Asynchronous task triggering.
//!
//! Renumbering requests targeted metadata refreshes so a later automatic
//! import does not clobber freshly computed numbering. The trigger is
//! non-blocking and gives no completion signal back to the caller; the task
//! runner retries or fails independently.

use async_trait::async_trait;
use tokio::sync::mpsc;

use quire_model::{BookId, BookMetadataField};

use crate::error::{CoreError, Result};

/// A request handed to the background task runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRequest {
    RefreshBookMetadata {
        book_id: BookId,
        fields: Vec<BookMetadataField>,
    },
}

/// Outbound port for requesting background work.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskTrigger: Send + Sync {
    /// Request a metadata refresh scoped to `fields` for one book.
    async fn refresh_book_metadata(
        &self,
        book_id: BookId,
        fields: Vec<BookMetadataField>,
    ) -> Result<()>;
}

/// Queue-backed trigger: enqueues requests on an unbounded channel so the
/// publishing side never blocks. The receiving half belongs to whatever
/// runtime drains the queue.
#[derive(Debug, Clone)]
pub struct QueuedTaskTrigger {
    sender: mpsc::UnboundedSender<TaskRequest>,
}

impl QueuedTaskTrigger {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TaskRequest>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl TaskTrigger for QueuedTaskTrigger {
    async fn refresh_book_metadata(
        &self,
        book_id: BookId,
        fields: Vec<BookMetadataField>,
    ) -> Result<()> {
        self.sender
            .send(TaskRequest::RefreshBookMetadata { book_id, fields })
            .map_err(|_| CoreError::Storage("task queue is closed".to_string()))
    }
}
