//! Start a new session record.

use std::path::PathBuf;
use std::sync::Arc;

use gamenight_domain::{AdventureId, CharacterName, DomainError, SessionRecord};

use crate::error::EngineError;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::StateStore;

/// Initialise a session for an adventure.
///
/// Replaces whatever record is current. A session that was still running is
/// archived first so its log is not lost. Pre-generated characters start
/// from the counters their last canon session saved.
pub struct InitSession {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
    adventures_dir: Option<PathBuf>,
    default_turn_timeout_secs: u64,
}

impl InitSession {
    pub fn new(
        store: Arc<StateStore>,
        clock: Arc<dyn ClockPort>,
        adventures_dir: Option<PathBuf>,
        default_turn_timeout_secs: u64,
    ) -> Self {
        Self {
            store,
            clock,
            adventures_dir,
            default_turn_timeout_secs,
        }
    }

    pub async fn execute(
        &self,
        adventure: AdventureId,
        bot_characters: Vec<CharacterName>,
        turn_timeout_secs: Option<u64>,
    ) -> Result<SessionRecord, EngineError> {
        if let Some(dir) = &self.adventures_dir {
            let file = dir.join(format!("{adventure}.md"));
            if !tokio::fs::try_exists(&file).await.unwrap_or(false) {
                return Err(DomainError::validation(format!(
                    "Adventure file not found: {}",
                    file.display()
                ))
                .into());
            }
        }

        let now = self.clock.now();
        let mut record = SessionRecord::new(
            adventure,
            bot_characters,
            turn_timeout_secs.unwrap_or(self.default_turn_timeout_secs),
            now,
        )?;
        let names: Vec<CharacterName> = record
            .participants()
            .iter()
            .map(|p| p.character_name().clone())
            .collect();
        for character in &names {
            if let Some(progress) = self.store.load_progress(character).await? {
                record.restore_progress(&progress);
            }
        }

        self.store.start_session(record.clone(), now).await?;
        tracing::info!(
            session_id = %record.session().id,
            adventure = %record.session().adventure,
            bots = record.participants().len(),
            "Session initialised"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{name, Harness};

    fn use_case(h: &Harness, adventures_dir: Option<PathBuf>) -> InitSession {
        InitSession::new(h.store.clone(), h.clock.port(), adventures_dir, 120)
    }

    #[tokio::test]
    async fn creates_bot_controlled_pregens() {
        let h = Harness::empty().await;

        let record = use_case(&h, None)
            .execute(
                AdventureId::new("escape-from-mos-eisley").unwrap(),
                vec![name("Kira"), name("Renn")],
                None,
            )
            .await
            .unwrap();

        assert_eq!(record.participants().len(), 2);
        assert!(record
            .participants()
            .iter()
            .all(|p| p.controller().is_bot()));
        assert_eq!(h.snapshot().await.as_ref(), &record);
    }

    #[tokio::test]
    async fn missing_adventure_file_is_rejected() {
        let h = Harness::empty().await;
        let adventures = h.dir.path().join("adventures");
        std::fs::create_dir_all(&adventures).unwrap();

        let err = use_case(&h, Some(adventures.clone()))
            .execute(AdventureId::new("lost-adventure").unwrap(), vec![], None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Domain(DomainError::Validation(_))));

        std::fs::write(adventures.join("lost-adventure.md"), "# Lost").unwrap();
        assert!(use_case(&h, Some(adventures))
            .execute(AdventureId::new("lost-adventure").unwrap(), vec![], None)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn replacing_a_running_session_archives_it() {
        let h = Harness::with_session().await;
        let old_id = h.snapshot().await.session().id;

        use_case(&h, None)
            .execute(AdventureId::new("second-heist").unwrap(), vec![], None)
            .await
            .unwrap();

        let archived = h.dir.path().join("sessions").join(format!("{old_id}.json"));
        assert!(archived.exists());
        assert_eq!(h.snapshot().await.session().adventure.as_str(), "second-heist");
    }
}
