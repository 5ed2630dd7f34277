//! Terrain - externally authored per-map data.
//!
//! Terrain files are read-only to the engine. Keys are kept as the raw strings
//! the authoring tool wrote; lookups compare them case-sensitively against
//! validated [`PositionName`]s.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::camera::Zoom;
use crate::error::DomainError;
use crate::value_objects::{MapId, PositionName};

pub const DEFAULT_MAP_WIDTH: u32 = 1200;
pub const DEFAULT_MAP_HEIGHT: u32 = 900;

/// Zone name used for positions that no zone lists.
pub const UNGROUPED_ZONE: &str = "other";

fn default_width() -> u32 {
    DEFAULT_MAP_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_MAP_HEIGHT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPosition {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Zone {
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub positions: Vec<String>,
}

/// Rectangle the narrator describes around. Never used for pathing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: String,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    #[serde(default)]
    pub desc: String,
}

/// Where an exit position on this map leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub map: String,
    pub position: String,
}

impl Connection {
    /// Connection targets may be written with or without the file extension.
    pub fn leads_to(&self, map: &MapId) -> bool {
        self.map == map.as_str() || strip_extension(&self.map) == map.base()
    }
}

fn strip_extension(map: &str) -> &str {
    map.rsplit_once('.').map_or(map, |(base, _)| base)
}

/// A framing the map author saved for the overlay camera.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraPreset {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub zoom: Option<Zoom>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainMap {
    #[serde(default)]
    pub map: Option<String>,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub positions: BTreeMap<String, NamedPosition>,
    #[serde(default)]
    pub zones: BTreeMap<String, Zone>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub connections: BTreeMap<String, Connection>,
    #[serde(default, alias = "defaultEntry")]
    pub default_entry: Option<String>,
    #[serde(default, alias = "cameraPresets")]
    pub camera_presets: BTreeMap<String, CameraPreset>,
}

impl Default for TerrainMap {
    fn default() -> Self {
        Self {
            map: None,
            width: DEFAULT_MAP_WIDTH,
            height: DEFAULT_MAP_HEIGHT,
            positions: BTreeMap::new(),
            zones: BTreeMap::new(),
            obstacles: Vec::new(),
            connections: BTreeMap::new(),
            default_entry: None,
            camera_presets: BTreeMap::new(),
        }
    }
}

/// One zone's worth of positions for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionGroup {
    pub zone: String,
    pub desc: String,
    pub positions: Vec<(String, NamedPosition)>,
}

impl TerrainMap {
    /// Sorted names of every position on the map.
    pub fn position_names(&self) -> Vec<String> {
        self.positions.keys().cloned().collect()
    }

    pub fn position(&self, name: &PositionName) -> Option<&NamedPosition> {
        self.positions.get(name.as_str())
    }

    /// Look up a named position or fail listing the valid alternatives.
    pub fn require_position(
        &self,
        map: &MapId,
        name: &PositionName,
    ) -> Result<&NamedPosition, DomainError> {
        self.position(name).ok_or_else(|| DomainError::UnknownPosition {
            map: map.to_string(),
            position: name.to_string(),
            valid: self.position_names(),
        })
    }

    /// The connection leaving from `exit`, if that position is an exit.
    pub fn connection_from(&self, exit: &str) -> Option<&Connection> {
        self.connections.get(exit)
    }

    /// Exits on this map that lead to `target`, with their coordinates when
    /// the exit is also a named position.
    pub fn exits_to<'a>(
        &'a self,
        target: &'a MapId,
    ) -> impl Iterator<Item = (&'a str, &'a Connection, Option<&'a NamedPosition>)> + 'a {
        self.connections
            .iter()
            .filter(move |(_, conn)| conn.leads_to(target))
            .map(move |(exit, conn)| (exit.as_str(), conn, self.positions.get(exit)))
    }

    /// Positions grouped by zone in zone-name order; positions no zone lists
    /// land in a trailing [`UNGROUPED_ZONE`] group.
    pub fn grouped_positions(&self) -> Vec<PositionGroup> {
        let mut shown = BTreeSet::new();
        let mut groups: Vec<PositionGroup> = self
            .zones
            .iter()
            .map(|(zone, data)| PositionGroup {
                zone: zone.clone(),
                desc: data.desc.clone(),
                positions: data
                    .positions
                    .iter()
                    .filter_map(|name| {
                        let pos = self.positions.get(name)?;
                        shown.insert(name.clone());
                        Some((name.clone(), pos.clone()))
                    })
                    .collect(),
            })
            .collect();

        let ungrouped: Vec<_> = self
            .positions
            .iter()
            .filter(|(name, _)| !shown.contains(*name))
            .map(|(name, pos)| (name.clone(), pos.clone()))
            .collect();
        if !ungrouped.is_empty() {
            groups.push(PositionGroup {
                zone: UNGROUPED_ZONE.to_string(),
                desc: String::new(),
                positions: ungrouped,
            });
        }
        groups
    }
}

/// Read-only access to loaded terrain, keyed by map.
pub trait TerrainCatalog: Send + Sync {
    /// `None` when the map has no terrain file.
    fn terrain(&self, map: &MapId) -> Option<Arc<TerrainMap>>;
}

impl TerrainCatalog for HashMap<MapId, Arc<TerrainMap>> {
    fn terrain(&self, map: &MapId) -> Option<Arc<TerrainMap>> {
        self.get(map)
            .or_else(|| {
                self.iter()
                    .find(|(id, _)| id.same_map(map))
                    .map(|(_, terrain)| terrain)
            })
            .cloned()
    }
}
