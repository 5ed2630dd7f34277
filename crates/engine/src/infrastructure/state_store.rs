//! State store - sole owner of the live session record.
//!
//! All writes funnel through [`StateStore::mutate`], which holds a FIFO
//! lock for the whole read-modify-persist cycle, so concurrent commands and
//! the timer driver apply one at a time in arrival order. Readers get an
//! `Arc` snapshot and never wait on a write in progress.
//!
//! A mutation works on a private copy. The copy becomes the current record
//! only after it is durably saved; if the closure fails nothing is written,
//! and if the save fails the last-good record stays current.
//!
//! Starting and ending a session write more than the live file (the archive
//! copy, player progress) and do so under the same lock, so no command can
//! slip in between the archive and the live record it was taken from.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use gamenight_domain::{CharacterName, CharacterProgress, DomainError, SessionRecord};

use crate::error::EngineError;
use crate::infrastructure::ports::{SessionPersistence, StorageError};

pub struct StateStore {
    persistence: Arc<dyn SessionPersistence>,
    writer: Mutex<()>,
    current: RwLock<Option<Arc<SessionRecord>>>,
    healthy: AtomicBool,
}

impl StateStore {
    /// Load the last-good record, if any.
    pub async fn open(persistence: Arc<dyn SessionPersistence>) -> Result<Self, StorageError> {
        let record = persistence.load().await?;
        if let Some(record) = &record {
            tracing::info!(
                session_id = %record.session().id,
                adventure = %record.session().adventure,
                mode = %record.mode(),
                "Loaded session record"
            );
        }
        Ok(Self {
            persistence,
            writer: Mutex::new(()),
            current: RwLock::new(record.map(Arc::new)),
            healthy: AtomicBool::new(true),
        })
    }

    /// Point-in-time snapshot of the current record.
    pub async fn read(&self) -> Option<Arc<SessionRecord>> {
        self.current.read().await.clone()
    }

    /// False after a failed save, until the next successful one.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    /// Apply `f` to a copy of the record and persist the result.
    ///
    /// Fails with `NoActiveSession` when no record exists. A closure that
    /// leaves the record unchanged skips the write.
    pub async fn mutate<T, F>(&self, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut SessionRecord) -> Result<T, EngineError>,
    {
        let _writer = self.writer.lock().await;
        let Some(current) = self.read().await else {
            return Err(DomainError::NoActiveSession.into());
        };

        let mut working = SessionRecord::clone(&current);
        let output = f(&mut working)?;
        if working == *current {
            return Ok(output);
        }

        self.persist(working).await?;
        Ok(output)
    }

    /// Like [`mutate`](Self::mutate), but refuses to touch a record that
    /// violates its invariants.
    pub async fn mutate_checked<T, F>(&self, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut SessionRecord) -> Result<T, EngineError>,
    {
        self.mutate(|record| {
            if let Err(e) = record.check_invariants() {
                tracing::error!(error = %e, "Session record invariant violated; refusing mutation");
                return Err(e.into());
            }
            f(record)
        })
        .await
    }

    /// End the live session: archive the ended copy, carry canon progress
    /// into the player files, then persist it as the live record.
    ///
    /// Any failure before the final save leaves the session open, so the
    /// command can be retried.
    pub async fn end_session(
        &self,
        canon: bool,
        now: DateTime<Utc>,
    ) -> Result<(SessionRecord, String), EngineError> {
        let _writer = self.writer.lock().await;
        let Some(current) = self.read().await else {
            return Err(DomainError::NoActiveSession.into());
        };
        let (ended, archived_to) = self.archive_ended(&current, canon, now).await?;
        self.persist(ended.clone()).await?;
        Ok((ended, archived_to))
    }

    /// Install a brand-new record. A session that is still running is ended
    /// as non-canon and archived first; returns where it went.
    pub async fn start_session(
        &self,
        record: SessionRecord,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, EngineError> {
        let _writer = self.writer.lock().await;
        let archived_to = match self.read().await {
            Some(previous) if previous.session().is_active() => {
                let (_, archived_to) = self.archive_ended(&previous, false, now).await?;
                tracing::warn!(
                    session_id = %previous.session().id,
                    archived_to = %archived_to,
                    "Replacing a session that was never ended"
                );
                Some(archived_to)
            }
            _ => None,
        };
        self.persist(record).await?;
        Ok(archived_to)
    }

    /// Counters saved by earlier canon sessions.
    pub async fn load_progress(
        &self,
        character: &CharacterName,
    ) -> Result<Option<CharacterProgress>, EngineError> {
        Ok(self.persistence.load_progress(character).await?)
    }

    // Caller holds the writer lock.
    async fn archive_ended(
        &self,
        current: &SessionRecord,
        canon: bool,
        now: DateTime<Utc>,
    ) -> Result<(SessionRecord, String), EngineError> {
        let mut ended = current.clone();
        ended.end(canon, now)?;
        let archived_to = self.persistence.archive(&ended).await?;

        if canon {
            let mut saved = Vec::with_capacity(ended.participants().len());
            for participant in ended.participants() {
                let previous = self
                    .persistence
                    .load_progress(participant.character_name())
                    .await?;
                saved.push(CharacterProgress::after_session(participant, previous.as_ref()));
            }
            for progress in &saved {
                self.persistence.save_progress(progress).await?;
                tracing::debug!(
                    character = %progress.name,
                    sessions_played = progress.sessions_played,
                    "Saved character progress"
                );
            }
        }
        Ok((ended, archived_to))
    }

    // Caller holds the writer lock.
    async fn persist(&self, record: SessionRecord) -> Result<(), EngineError> {
        match self.persistence.save(&record).await {
            Ok(()) => {
                if !self.healthy.swap(true, Ordering::SeqCst) {
                    tracing::info!("Storage healthy again");
                }
                *self.current.write().await = Some(Arc::new(record));
                Ok(())
            }
            Err(e) => {
                self.healthy.store(false, Ordering::SeqCst);
                tracing::warn!(error = %e, "Failed to persist session record; keeping last-good state");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::JsonFilePersistence;
    use crate::infrastructure::ports::MockSessionPersistence;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use gamenight_domain::{AdventureId, SessionStatus, ViewerId};
    use tokio::sync::Notify;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 20, 0, 0).unwrap()
    }

    fn record() -> SessionRecord {
        SessionRecord::new(
            AdventureId::new("escape-from-mos-eisley").unwrap(),
            vec![CharacterName::new("Kira").unwrap()],
            120,
            now(),
        )
        .unwrap()
    }

    fn kira() -> CharacterName {
        CharacterName::new("Kira").unwrap()
    }

    async fn file_store(dir: &std::path::Path) -> StateStore {
        let store = StateStore::open(Arc::new(JsonFilePersistence::new(dir)))
            .await
            .unwrap();
        store.start_session(record(), now()).await.unwrap();
        store
    }

    /// File storage whose `archive` parks until the test releases it.
    struct GatedArchive {
        inner: JsonFilePersistence,
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl SessionPersistence for GatedArchive {
        async fn load(&self) -> Result<Option<SessionRecord>, StorageError> {
            self.inner.load().await
        }

        async fn save(&self, record: &SessionRecord) -> Result<(), StorageError> {
            self.inner.save(record).await
        }

        async fn archive(&self, record: &SessionRecord) -> Result<String, StorageError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.archive(record).await
        }

        async fn load_progress(
            &self,
            character: &CharacterName,
        ) -> Result<Option<CharacterProgress>, StorageError> {
            self.inner.load_progress(character).await
        }

        async fn save_progress(&self, progress: &CharacterProgress) -> Result<(), StorageError> {
            self.inner.save_progress(progress).await
        }
    }

    #[tokio::test]
    async fn mutate_without_session_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::open(Arc::new(JsonFilePersistence::new(dir.path())))
            .await
            .unwrap();

        let result = store.mutate(|_| Ok(())).await;

        assert!(matches!(
            result,
            Err(EngineError::Domain(DomainError::NoActiveSession))
        ));
    }

    #[tokio::test]
    async fn mutation_is_persisted_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(dir.path()).await;

        store
            .mutate(|r| Ok(r.award_character_points(&kira(), 3, now())?))
            .await
            .unwrap();

        let reopened = StateStore::open(Arc::new(JsonFilePersistence::new(dir.path())))
            .await
            .unwrap();
        let snapshot = reopened.read().await.unwrap();
        assert_eq!(snapshot.participant(&kira()).unwrap().character_points(), 8);
    }

    #[tokio::test]
    async fn failed_closure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(dir.path()).await;
        let before = store.read().await.unwrap();

        let result = store
            .mutate(|r| {
                r.award_character_points(&kira(), 3, now())?;
                Err::<(), _>(DomainError::validation("late failure").into())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(store.read().await.unwrap(), before);
    }

    #[tokio::test]
    async fn storage_failure_rolls_back_and_marks_unhealthy() {
        let mut persistence = MockSessionPersistence::new();
        persistence.expect_load().returning(|| Ok(Some(record())));
        let mut calls = 0;
        persistence.expect_save().returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(StorageError::io("persist", "disk full"))
            } else {
                Ok(())
            }
        });
        let store = StateStore::open(Arc::new(persistence)).await.unwrap();
        let before = store.read().await.unwrap();

        let failed = store
            .mutate(|r| Ok(r.award_character_points(&kira(), 3, now())?))
            .await;

        assert!(matches!(failed, Err(EngineError::Storage(_))));
        assert!(!store.is_healthy());
        assert_eq!(store.read().await.unwrap(), before);

        store
            .mutate(|r| Ok(r.award_character_points(&kira(), 3, now())?))
            .await
            .unwrap();

        assert!(store.is_healthy());
        let after = store.read().await.unwrap();
        assert_eq!(after.participant(&kira()).unwrap().character_points(), 8);
    }

    #[tokio::test]
    async fn unchanged_record_skips_the_write() {
        let mut persistence = MockSessionPersistence::new();
        persistence.expect_load().returning(|| Ok(Some(record())));
        persistence.expect_save().never();
        let store = StateStore::open(Arc::new(persistence)).await.unwrap();

        let idle = store.mutate(|r| Ok(r.idle_report())).await.unwrap();

        assert!(idle.is_empty());
    }

    #[tokio::test]
    async fn checked_mutation_refuses_broken_record() {
        let mut broken = serde_json::to_value(record()).unwrap();
        broken["session"]["mode"] = serde_json::json!("combat");
        let broken: SessionRecord = serde_json::from_value(broken).unwrap();

        let mut persistence = MockSessionPersistence::new();
        persistence
            .expect_load()
            .returning(move || Ok(Some(broken.clone())));
        persistence.expect_save().never();
        let store = StateStore::open(Arc::new(persistence)).await.unwrap();

        let result = store
            .mutate_checked(|r| Ok(r.award_character_points(&kira(), 1, now())?))
            .await;

        assert!(matches!(
            result,
            Err(EngineError::Domain(DomainError::InvariantViolation(_)))
        ));
    }

    #[tokio::test]
    async fn concurrent_mutations_all_apply() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(file_store(dir.path()).await);

        let tasks = (0..16).map(|_| {
            let store = Arc::clone(&store);
            async move {
                store
                    .mutate(|r| Ok(r.award_character_points(&kira(), 1, now())?))
                    .await
            }
        });
        let results = futures_util::future::join_all(tasks).await;

        assert!(results.iter().all(Result::is_ok));
        let snapshot = store.read().await.unwrap();
        assert_eq!(snapshot.participant(&kira()).unwrap().character_points(), 5 + 16);

        let on_disk = JsonFilePersistence::new(dir.path()).load().await.unwrap().unwrap();
        assert_eq!(on_disk, *snapshot);
    }

    #[tokio::test]
    async fn readers_see_whole_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(dir.path()).await;
        let before = store.read().await.unwrap();

        store
            .mutate(|r| {
                Ok(r.join(ViewerId::new("mira").unwrap(), kira(), now())?)
            })
            .await
            .unwrap();

        assert!(before.participant(&kira()).unwrap().controller().is_bot());
        let after = store.read().await.unwrap();
        assert!(!after.participant(&kira()).unwrap().controller().is_bot());
    }

    #[tokio::test]
    async fn writes_wait_while_the_session_is_archived() {
        let dir = tempfile::tempdir().unwrap();
        let inner = JsonFilePersistence::new(dir.path());
        inner.save(&record()).await.unwrap();
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let persistence = GatedArchive {
            inner,
            entered: Arc::clone(&entered),
            release: Arc::clone(&release),
        };
        let store = Arc::new(StateStore::open(Arc::new(persistence)).await.unwrap());

        let ending = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.end_session(false, now()).await }
        });
        entered.notified().await;

        let late = tokio::spawn({
            let store = Arc::clone(&store);
            async move {
                store
                    .mutate(|r| Ok(r.award_character_points(&kira(), 3, now())?))
                    .await
            }
        });
        tokio::task::yield_now().await;
        assert!(!late.is_finished());
        release.notify_one();

        let (ended, archived_to) = ending.await.unwrap().unwrap();
        assert!(matches!(
            late.await.unwrap(),
            Err(EngineError::Domain(DomainError::NoActiveSession))
        ));

        let archived: SessionRecord =
            serde_json::from_slice(&std::fs::read(&archived_to).unwrap()).unwrap();
        let live = store.read().await.unwrap();
        assert_eq!(archived, *live);
        assert_eq!(archived, ended);
        assert_eq!(live.session().status, SessionStatus::Ended);
        assert_eq!(live.participant(&kira()).unwrap().character_points(), 5);
    }

    #[tokio::test]
    async fn starting_over_a_running_session_archives_it_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(dir.path()).await;
        let old_id = store.read().await.unwrap().session().id;

        let archived_to = store.start_session(record(), now()).await.unwrap();

        let expected = dir.path().join("sessions").join(format!("{old_id}.json"));
        assert_eq!(archived_to, Some(expected.display().to_string()));
        let archived: SessionRecord =
            serde_json::from_slice(&std::fs::read(&expected).unwrap()).unwrap();
        assert_eq!(archived.session().status, SessionStatus::Ended);
        assert!(!archived.session().canon);
        assert!(!dir.path().join("players").exists());
    }

    #[tokio::test]
    async fn failed_archive_leaves_session_open() {
        let mut persistence = MockSessionPersistence::new();
        persistence.expect_load().returning(|| Ok(Some(record())));
        persistence
            .expect_archive()
            .returning(|_| Err(StorageError::io("persist", "disk full")));
        persistence.expect_save().never();
        persistence.expect_save_progress().never();
        let store = StateStore::open(Arc::new(persistence)).await.unwrap();

        let result = store.end_session(true, now()).await;

        assert!(matches!(result, Err(EngineError::Storage(_))));
        assert!(store.read().await.unwrap().session().is_active());
    }
}
