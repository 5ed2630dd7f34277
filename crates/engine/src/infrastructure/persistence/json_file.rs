//! JSON file storage for the session record.
//!
//! Layout under the data directory:
//! - `state/game-state.json` - the live record, read directly by the overlay
//! - `sessions/<session-id>.json` - archived copies of ended sessions
//! - `sessions/<session-id>.md` - recap stub for the narrator to fill in
//! - `players/<character-slug>.json` - character sheet carrying progression
//!
//! Every write goes to a temporary file in the target directory and is then
//! renamed over the destination, so readers only ever see whole files.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use gamenight_domain::{CharacterName, CharacterProgress, SessionRecord};

use crate::infrastructure::ports::{SessionPersistence, StorageError};

pub const STATE_FILE: &str = "game-state.json";

#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    state_path: PathBuf,
    archive_dir: PathBuf,
    players_dir: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            state_path: data_dir.join("state").join(STATE_FILE),
            archive_dir: data_dir.join("sessions"),
            players_dir: data_dir.join("players"),
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// Player file for `character`; `None` when the name has no file-safe
    /// characters at all.
    pub fn player_path(&self, character: &CharacterName) -> Option<PathBuf> {
        let slug = character.slug();
        (!slug.is_empty()).then(|| self.players_dir.join(format!("{slug}.json")))
    }
}

/// Atomically replace `path` with `bytes`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let dir = path
        .parent()
        .ok_or_else(|| StorageError::io("resolve_dir", format!("{} has no parent", path.display())))?;
    std::fs::create_dir_all(dir).map_err(|e| StorageError::io("create_dir", e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StorageError::io("create_temp", e))?;
    tmp.write_all(bytes)
        .map_err(|e| StorageError::io("write_temp", e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StorageError::io("sync_temp", e))?;
    tmp.persist(path)
        .map_err(|e| StorageError::io("persist", e.error))?;
    Ok(())
}

fn write_record(path: &Path, record: &SessionRecord) -> Result<(), StorageError> {
    let json = serde_json::to_vec_pretty(record).map_err(StorageError::serialization)?;
    write_atomic(path, &json)
}

fn read_json(path: &Path, operation: &'static str) -> Result<Option<serde_json::Value>, StorageError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(operation, e)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StorageError::corrupt(format!("{}: {e}", path.display())))
}

fn read_record(path: &Path) -> Result<Option<SessionRecord>, StorageError> {
    read_json(path, "read_state")?
        .map(|value| {
            serde_json::from_value(value)
                .map_err(|e| StorageError::corrupt(format!("{}: {e}", path.display())))
        })
        .transpose()
}

fn read_progress(path: &Path) -> Result<Option<CharacterProgress>, StorageError> {
    read_json(path, "read_player")?
        .map(|value| {
            serde_json::from_value(value)
                .map_err(|e| StorageError::corrupt(format!("{}: {e}", path.display())))
        })
        .transpose()
}

/// Write the progression keys into the player file, keeping every other
/// key a hand-authored sheet carries.
fn merge_progress(path: &Path, progress: &CharacterProgress) -> Result<(), StorageError> {
    let mut sheet = match read_json(path, "read_player")? {
        Some(serde_json::Value::Object(sheet)) => sheet,
        Some(_) => {
            return Err(StorageError::corrupt(format!(
                "{}: player file is not an object",
                path.display()
            )))
        }
        None => serde_json::Map::new(),
    };
    let serde_json::Value::Object(update) =
        serde_json::to_value(progress).map_err(StorageError::serialization)?
    else {
        return Err(StorageError::serialization("progress is not an object"));
    };
    sheet.extend(update);
    let json = serde_json::to_vec_pretty(&sheet).map_err(StorageError::serialization)?;
    write_atomic(path, &json)
}

/// Markdown stub the narrator fills in after the game.
fn recap_stub(record: &SessionRecord) -> String {
    let session = record.session();
    let players = record
        .participants()
        .iter()
        .map(|p| format!("{} ({})", p.character_name(), p.controller()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "# {}\n\n**Adventure:** {}\n**Canon:** {}\n**Players:** {}\n**Acts completed:** {}\n\n## Recap\n\n",
        session.id,
        session.adventure,
        if session.canon { "CANON" } else { "non-canon" },
        players,
        session.act,
    )
}

fn write_recap(path: &Path, record: &SessionRecord) -> Result<(), StorageError> {
    if path.exists() {
        return Ok(());
    }
    write_atomic(path, recap_stub(record).as_bytes())
}

async fn blocking<T, F>(operation: &'static str, f: F) -> Result<T, StorageError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::io(operation, e))?
}

#[async_trait]
impl SessionPersistence for JsonFilePersistence {
    async fn load(&self) -> Result<Option<SessionRecord>, StorageError> {
        let path = self.state_path.clone();
        blocking("load", move || read_record(&path)).await
    }

    async fn save(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let path = self.state_path.clone();
        let record = record.clone();
        blocking("save", move || write_record(&path, &record)).await
    }

    /// Writes the JSON copy and, unless one already exists, the recap stub.
    async fn archive(&self, record: &SessionRecord) -> Result<String, StorageError> {
        let id = record.session().id;
        let path = self.archive_dir.join(format!("{id}.json"));
        let recap = self.archive_dir.join(format!("{id}.md"));
        let record = record.clone();
        let written = path.clone();
        blocking("archive", move || {
            write_record(&path, &record)?;
            write_recap(&recap, &record)
        })
        .await?;
        Ok(written.display().to_string())
    }

    async fn load_progress(
        &self,
        character: &CharacterName,
    ) -> Result<Option<CharacterProgress>, StorageError> {
        let Some(path) = self.player_path(character) else {
            return Ok(None);
        };
        blocking("load_progress", move || read_progress(&path)).await
    }

    async fn save_progress(&self, progress: &CharacterProgress) -> Result<(), StorageError> {
        let Some(path) = self.player_path(&progress.name) else {
            tracing::warn!(character = %progress.name, "No file-safe name; progress not saved");
            return Ok(());
        };
        let progress = progress.clone();
        blocking("save_progress", move || merge_progress(&path, &progress)).await
    }
}
