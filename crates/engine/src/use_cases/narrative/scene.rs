use std::sync::Arc;

use gamenight_domain::{OpeningCrawl, SceneUpdate, Session};

use crate::error::EngineError;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::StateStore;

/// Partial update of act, scene and narration. Returns the updated session.
pub struct UpdateScene {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
}

impl UpdateScene {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(&self, update: SceneUpdate) -> Result<Session, EngineError> {
        let now = self.clock.now();
        let session = self
            .store
            .mutate_checked(|record| {
                record.update_scene(update, now)?;
                Ok(record.session().clone())
            })
            .await?;
        tracing::info!(act = %session.act, scene = %session.scene, "Scene updated");
        Ok(session)
    }
}

pub struct SetCrawl {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
}

impl SetCrawl {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(&self, crawl: OpeningCrawl) -> Result<OpeningCrawl, EngineError> {
        let now = self.clock.now();
        let stored = crawl.clone();
        self.store
            .mutate_checked(|record| Ok(record.set_crawl(stored, now)?))
            .await?;
        tracing::info!(title = %crawl.title, "Opening crawl set");
        Ok(crawl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::Harness;
    use gamenight_shared::ErrorKind;

    #[tokio::test]
    async fn scene_update_keeps_unspecified_fields() {
        let h = Harness::with_session().await;
        let update = UpdateScene::new(h.store.clone(), h.clock.port());

        update
            .execute(SceneUpdate {
                act: Some("2".into()),
                scene: Some("Docking Bay 94".into()),
                narration: None,
            })
            .await
            .unwrap();
        let session = update
            .execute(SceneUpdate {
                narration: Some("Stormtroopers round the corner.".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(session.act, "2");
        assert_eq!(session.scene, "Docking Bay 94");
        assert_eq!(session.narration, "Stormtroopers round the corner.");
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let h = Harness::with_session().await;
        let err = UpdateScene::new(h.store.clone(), h.clock.port())
            .execute(SceneUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[tokio::test]
    async fn crawl_can_only_be_set_once() {
        let h = Harness::with_session().await;
        let set = SetCrawl::new(h.store.clone(), h.clock.port());
        let crawl = OpeningCrawl::new(
            "STAR WARS",
            "Episode IV: A New Hope",
            vec!["It is a period of civil war.".into()],
        )
        .unwrap();

        set.execute(crawl.clone()).await.unwrap();
        let err = set.execute(crawl).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert_eq!(
            h.snapshot().await.session().crawl.as_ref().unwrap().title,
            "STAR WARS"
        );
    }
}
