//! Storage port for the session record and per-character progress.

use async_trait::async_trait;

use gamenight_domain::{CharacterName, CharacterProgress, SessionRecord};

use super::error::StorageError;

/// Durable home of the single session record.
///
/// Implementations must make `save` atomic: a reader, or a crash mid-write,
/// sees either the previous record or the new one, never a mix.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionPersistence: Send + Sync {
    /// Last successfully saved record, `None` when nothing was ever saved.
    async fn load(&self) -> Result<Option<SessionRecord>, StorageError>;

    async fn save(&self, record: &SessionRecord) -> Result<(), StorageError>;

    /// Store a copy of an ended session. Returns where it was written.
    async fn archive(&self, record: &SessionRecord) -> Result<String, StorageError>;

    /// Counters a previous canon session saved for `character`.
    async fn load_progress(
        &self,
        character: &CharacterName,
    ) -> Result<Option<CharacterProgress>, StorageError>;

    async fn save_progress(&self, progress: &CharacterProgress) -> Result<(), StorageError>;
}
