use async_trait::async_trait;
use quire_model::{Library, LibraryId};

use crate::Result;

/// Repository port for library lookups. The lifecycle core only reads the
/// cover-selection policy; library management lives elsewhere.
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// Fails with `NotFound` when the library is absent; every series must
    /// belong to one.
    async fn find_by_id(&self, library_id: LibraryId) -> Result<Library>;
    async fn save(&self, library: &Library) -> Result<()>;
}
