//! Shared fixtures for use case tests: a temp-dir store, a hand-driven clock
//! and a two-map terrain catalog.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

use gamenight_domain::{
    AdventureId, CharacterName, MapId, SessionRecord, TerrainCatalog, TerrainMap, ViewerId,
};

use crate::infrastructure::persistence::JsonFilePersistence;
use crate::infrastructure::ports::{ClockPort, MockClockPort};
use crate::infrastructure::StateStore;

pub const CANTINA: &str = r#"{
    "width": 1200,
    "height": 900,
    "positions": {
        "entrance": {"x": 600, "y": 850, "desc": "Main door"},
        "bar-stool-l3": {"x": 420, "y": 300},
        "booth-1": {"x": 100, "y": 120}
    },
    "zones": {"bar": {"desc": "The long bar", "positions": ["bar-stool-l3"]}},
    "connections": {"entrance": {"map": "streets.svg", "position": "cantina-door"}}
}"#;

pub const STREETS: &str = r#"{
    "positions": {
        "cantina-door": {"x": 50, "y": 60},
        "market": {"x": 500, "y": 500}
    },
    "connections": {"cantina-door": {"map": "cantina.svg", "position": "entrance"}}
}"#;

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 20, 0, 0).unwrap()
}

pub fn name(s: &str) -> CharacterName {
    CharacterName::new(s).unwrap()
}

pub fn viewer(s: &str) -> ViewerId {
    ViewerId::new(s).unwrap()
}

pub fn map(s: &str) -> MapId {
    MapId::new(s).unwrap()
}

pub fn terrain() -> Arc<dyn TerrainCatalog> {
    let maps: HashMap<MapId, Arc<TerrainMap>> = [("cantina.svg", CANTINA), ("streets.svg", STREETS)]
        .into_iter()
        .map(|(id, json)| (map(id), Arc::new(serde_json::from_str(json).unwrap())))
        .collect();
    Arc::new(maps)
}

/// Clock the test moves by hand.
#[derive(Clone)]
pub struct TestClock(Arc<Mutex<DateTime<Utc>>>);

impl TestClock {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(start())))
    }

    pub fn advance(&self, secs: i64) {
        let mut now = self.0.lock().unwrap();
        *now += Duration::seconds(secs);
    }

    pub fn port(&self) -> Arc<dyn ClockPort> {
        let time = Arc::clone(&self.0);
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(move || *time.lock().unwrap());
        Arc::new(clock)
    }
}

pub struct Harness {
    pub store: Arc<StateStore>,
    pub clock: TestClock,
    pub terrain: Arc<dyn TerrainCatalog>,
    pub dir: TempDir,
}

impl Harness {
    /// Store with no session yet.
    pub async fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::open(Arc::new(JsonFilePersistence::new(dir.path())))
            .await
            .unwrap();
        Self {
            store: Arc::new(store),
            clock: TestClock::new(),
            terrain: terrain(),
            dir,
        }
    }

    /// Session with bot-held Kira and Renn; Kira then joined by viewer `mira`.
    pub async fn with_session() -> Self {
        let harness = Self::empty().await;
        let mut record = SessionRecord::new(
            AdventureId::new("escape-from-mos-eisley").unwrap(),
            vec![name("Kira"), name("Renn")],
            120,
            start(),
        )
        .unwrap();
        record.join(viewer("mira"), name("Kira"), start()).unwrap();
        harness.store.start_session(record, start()).await.unwrap();
        harness
    }

    pub async fn snapshot(&self) -> Arc<SessionRecord> {
        self.store.read().await.unwrap()
    }
}
