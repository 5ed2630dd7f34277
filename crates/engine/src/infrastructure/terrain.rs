//! Terrain catalog backed by `<maps>/<map-base>-terrain.json` files.
//!
//! Terrain is authored outside the engine and read-only here. Parsed maps are
//! cached for the life of the process; misses are not cached so a file
//! dropped in mid-session becomes usable without a restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;

use gamenight_domain::{MapId, TerrainCatalog, TerrainMap};

const TERRAIN_SUFFIX: &str = "-terrain.json";

pub struct FsTerrainCatalog {
    maps_dir: PathBuf,
    cache: DashMap<String, Arc<TerrainMap>>,
}

impl FsTerrainCatalog {
    pub fn new(maps_dir: impl Into<PathBuf>) -> Self {
        Self {
            maps_dir: maps_dir.into(),
            cache: DashMap::new(),
        }
    }

    pub fn maps_dir(&self) -> &Path {
        &self.maps_dir
    }

    /// Parse every terrain file in the maps directory. Returns how many loaded.
    ///
    /// Unreadable or malformed files are logged and skipped; lookups for
    /// those maps will simply report no terrain.
    pub fn preload(&self) -> usize {
        let entries = match std::fs::read_dir(&self.maps_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    dir = %self.maps_dir.display(),
                    error = %e,
                    "Maps directory not readable; terrain will load on demand"
                );
                return 0;
            }
        };
        entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                name.strip_suffix(TERRAIN_SUFFIX).map(str::to_string)
            })
            .filter(|base| self.load(base).is_some())
            .count()
    }

    fn load(&self, base: &str) -> Option<Arc<TerrainMap>> {
        if let Some(hit) = self.cache.get(base) {
            return Some(Arc::clone(hit.value()));
        }
        let path = self.maps_dir.join(format!("{base}{TERRAIN_SUFFIX}"));
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read terrain");
                return None;
            }
        };
        match serde_json::from_slice::<TerrainMap>(&bytes) {
            Ok(terrain) => {
                let terrain = Arc::new(terrain);
                self.cache.insert(base.to_string(), Arc::clone(&terrain));
                tracing::debug!(map = %base, positions = terrain.positions.len(), "Terrain loaded");
                Some(terrain)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Malformed terrain file");
                None
            }
        }
    }
}

impl TerrainCatalog for FsTerrainCatalog {
    fn terrain(&self, map: &MapId) -> Option<Arc<TerrainMap>> {
        self.load(map.base())
    }
}
