//! Overlay camera: explicit aiming plus the framing that follows tokens,
//! combat and scene changes.

use chrono::{DateTime, Utc};

use super::session_record::SessionRecord;
use crate::entities::{
    Camera, CameraTarget, TerrainCatalog, TokenKind, Zoom, OVERVIEW_HEIGHT, OVERVIEW_WIDTH,
};
use crate::error::DomainError;
use crate::value_objects::PositionName;

/// Where `set-camera` points the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraAim {
    /// Track the centroid of the visible PC tokens
    FollowParty,
    Position(PositionName),
    /// Named preset from the active map's terrain
    Preset(String),
    Point { x: i32, y: i32 },
    /// Only change the zoom
    Keep,
}

impl SessionRecord {
    /// Aim the overlay camera. A requested zoom is clamped and applied after
    /// the aim, so it also overrides a preset's own zoom.
    pub fn set_camera(
        &mut self,
        terrain: &dyn TerrainCatalog,
        aim: CameraAim,
        zoom: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<Camera, DomainError> {
        self.ensure_active()?;
        let zoom = zoom.map(Zoom::clamped).transpose()?;
        let current = self.current_camera();

        let mut camera = match aim {
            CameraAim::FollowParty => {
                let (x, y) = self.party_centroid().unwrap_or((current.x, current.y));
                Camera::at(x, y, current.zoom, CameraTarget::Party)
            }
            CameraAim::Position(position) => {
                let map = self
                    .session
                    .active_map_id()
                    .cloned()
                    .ok_or_else(|| DomainError::validation("No map set. Use set-map first."))?;
                let data = terrain
                    .terrain(&map)
                    .ok_or_else(|| DomainError::validation(format!("No terrain data for '{map}'")))?;
                let spot = data.require_position(&map, &position)?;
                Camera {
                    focus: Some(position.to_string()),
                    ..Camera::at(spot.x, spot.y, current.zoom, CameraTarget::Position)
                }
            }
            CameraAim::Preset(name) => {
                let data = self
                    .session
                    .active_map_id()
                    .and_then(|map| terrain.terrain(map))
                    .ok_or_else(|| DomainError::validation("No map set. Use set-map first."))?;
                let preset = data.camera_presets.get(&name).ok_or_else(|| {
                    let available: Vec<&str> =
                        data.camera_presets.keys().map(String::as_str).collect();
                    DomainError::validation(format!(
                        "Unknown camera preset '{name}'. Available: {}",
                        if available.is_empty() {
                            "(none)".to_string()
                        } else {
                            available.join(", ")
                        }
                    ))
                })?;
                Camera {
                    focus: Some(name.clone()),
                    ..Camera::at(
                        preset.x,
                        preset.y,
                        preset.zoom.unwrap_or(current.zoom),
                        CameraTarget::Preset,
                    )
                }
            }
            CameraAim::Point { x, y } => Camera::at(x, y, current.zoom, CameraTarget::Manual),
            CameraAim::Keep => {
                if zoom.is_none() {
                    return Err(DomainError::validation(
                        "set-camera needs a position, preset, coordinates, follow-party or a zoom",
                    ));
                }
                current
            }
        };
        if let Some(zoom) = zoom {
            camera.zoom = zoom;
        }

        self.camera = Some(camera.clone());
        self.touch(now);
        Ok(camera)
    }

    /// Integer mean of the visible PC tokens on the active map.
    pub fn party_centroid(&self) -> Option<(i32, i32)> {
        let pcs: Vec<_> = self
            .visible_tokens()
            .into_iter()
            .filter(|t| t.kind == TokenKind::Pc)
            .collect();
        if pcs.is_empty() {
            return None;
        }
        let n = pcs.len() as i64;
        let sx: i64 = pcs.iter().map(|t| i64::from(t.x)).sum();
        let sy: i64 = pcs.iter().map(|t| i64::from(t.y)).sum();
        Some((
            i32::try_from(sx / n).unwrap_or_default(),
            i32::try_from(sy / n).unwrap_or_default(),
        ))
    }

    /// The stored camera, or an overview of the active map.
    fn current_camera(&self) -> Camera {
        self.camera.clone().unwrap_or_else(|| self.overview_camera())
    }

    fn overview_camera(&self) -> Camera {
        match &self.session.active_map {
            Some(map) => Camera::overview(map.width, map.height),
            None => Camera::overview(OVERVIEW_WIDTH, OVERVIEW_HEIGHT),
        }
    }

    /// Re-aim a party or combat camera after tokens moved.
    pub(crate) fn refresh_party_camera(&mut self) {
        let Some(camera) = &self.camera else {
            return;
        };
        if !matches!(camera.target, CameraTarget::Party | CameraTarget::Combat) {
            return;
        }
        if let Some((x, y)) = self.party_centroid() {
            if let Some(camera) = self.camera.as_mut() {
                camera.x = x;
                camera.y = y;
            }
        }
    }

    /// Close in on the party when combat starts.
    pub(crate) fn frame_combat(&mut self) {
        let current = self.current_camera();
        let (x, y) = self.party_centroid().unwrap_or((current.x, current.y));
        self.camera = Some(Camera::at(x, y, Zoom::COMBAT, CameraTarget::Combat));
    }

    /// Pull back once combat is over: onto the party when it is on the
    /// map, otherwise to an overview.
    pub(crate) fn frame_after_combat(&mut self) {
        self.camera = Some(match self.party_centroid() {
            Some((x, y)) => Camera::at(x, y, Zoom::FIT, CameraTarget::Party),
            None => self.overview_camera(),
        });
    }

    /// Fresh overview for a newly loaded map.
    pub(crate) fn reset_camera(&mut self) {
        self.camera = Some(self.overview_camera());
    }

    /// After a scene switch a following camera keeps following; anything
    /// else starts over from an overview.
    pub(crate) fn reframe_scene(&mut self) {
        let following = self
            .camera
            .as_ref()
            .is_some_and(|c| c.target == CameraTarget::Party);
        if following {
            match self.party_centroid() {
                Some(_) => self.refresh_party_camera(),
                None => self.reset_camera(),
            }
        } else {
            self.reset_camera();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::super::session_record::test_support::*;
    use super::*;
    use crate::entities::{TerrainMap, TokenStyle, MAX_ZOOM, MIN_ZOOM};
    use crate::value_objects::MapId;

    const CANTINA: &str = r##"{
        "width": 1200,
        "height": 900,
        "positions": {
            "entrance": {"x": 600, "y": 850},
            "bar": {"x": 400, "y": 250},
            "booth-1": {"x": 100, "y": 120}
        },
        "camera_presets": {
            "bar-closeup": {"x": 500, "y": 270, "zoom": 3.0},
            "door": {"x": 600, "y": 800}
        }
    }"##;

    fn catalog() -> HashMap<MapId, Arc<TerrainMap>> {
        HashMap::from([(
            MapId::new("cantina.svg").unwrap(),
            Arc::new(serde_json::from_str::<TerrainMap>(CANTINA).unwrap()),
        )])
    }

    fn cantina() -> SessionRecord {
        let mut r = record();
        r.set_map(&catalog(), MapId::new("cantina.svg").unwrap(), None, false, now())
            .unwrap();
        r
    }

    fn place(r: &mut SessionRecord, who: &str, at: &str) {
        r.join(viewer(&who.to_lowercase()), name(who), now()).unwrap();
        r.move_token(
            &catalog(),
            name(who),
            MapId::new("cantina.svg").unwrap(),
            PositionName::new(at).unwrap(),
            TokenStyle::default(),
            now(),
        )
        .unwrap();
    }

    fn aim(r: &mut SessionRecord, aim: CameraAim, zoom: Option<f64>) -> Result<Camera, DomainError> {
        r.set_camera(&catalog(), aim, zoom, now())
    }

    #[test]
    fn set_map_starts_at_an_overview() {
        let r = cantina();
        let camera = r.camera().unwrap();
        assert_eq!((camera.x, camera.y), (600, 450));
        assert_eq!(camera.zoom, Zoom::FIT);
        assert_eq!(camera.target, CameraTarget::Overview);
    }

    #[test]
    fn position_and_preset_aim_at_terrain_points() {
        let mut r = cantina();
        let camera = aim(&mut r, CameraAim::Position(PositionName::new("bar").unwrap()), None).unwrap();
        assert_eq!((camera.x, camera.y), (400, 250));
        assert_eq!(camera.label(), "bar");

        let camera = aim(&mut r, CameraAim::Preset("bar-closeup".into()), None).unwrap();
        assert_eq!((camera.x, camera.y), (500, 270));
        assert_eq!(camera.zoom.value(), 3.0);

        // An explicit zoom beats the preset's.
        let camera = aim(&mut r, CameraAim::Preset("bar-closeup".into()), Some(1.5)).unwrap();
        assert_eq!(camera.zoom.value(), 1.5);

        // A preset without zoom keeps the current one.
        let camera = aim(&mut r, CameraAim::Preset("door".into()), None).unwrap();
        assert_eq!(camera.zoom.value(), 1.5);
    }

    #[test]
    fn unknown_preset_lists_the_available_ones() {
        let mut r = cantina();
        let err = aim(&mut r, CameraAim::Preset("vault".into()), None).unwrap_err();
        assert!(err.to_string().contains("bar-closeup, door"));
        assert!(aim(&mut r, CameraAim::Position(PositionName::new("roof").unwrap()), None).is_err());
    }

    #[test]
    fn zoom_is_clamped_to_range() {
        let mut r = cantina();
        assert_eq!(aim(&mut r, CameraAim::Keep, Some(20.0)).unwrap().zoom.value(), MAX_ZOOM);
        assert_eq!(aim(&mut r, CameraAim::Keep, Some(0.0)).unwrap().zoom.value(), MIN_ZOOM);
        assert!(aim(&mut r, CameraAim::Keep, None).is_err());
    }

    #[test]
    fn manual_point_needs_no_map() {
        let mut r = record();
        let camera = aim(&mut r, CameraAim::Point { x: 10, y: 20 }, Some(2.0)).unwrap();
        assert_eq!((camera.x, camera.y, camera.target), (10, 20, CameraTarget::Manual));
        assert!(aim(&mut r, CameraAim::Preset("door".into()), None).is_err());
    }

    #[test]
    fn following_party_tracks_token_moves() {
        let mut r = cantina();
        place(&mut r, "Kira", "bar");
        place(&mut r, "Renn", "booth-1");
        let camera = aim(&mut r, CameraAim::FollowParty, None).unwrap();
        assert_eq!((camera.x, camera.y), (250, 185));

        r.move_token(
            &catalog(),
            name("Renn"),
            MapId::new("cantina.svg").unwrap(),
            PositionName::new("entrance").unwrap(),
            TokenStyle::default(),
            now(),
        )
        .unwrap();
        let camera = r.camera().unwrap();
        assert_eq!((camera.x, camera.y), (500, 550));
        assert_eq!(camera.target, CameraTarget::Party);
    }

    #[test]
    fn manual_camera_ignores_token_moves() {
        let mut r = cantina();
        place(&mut r, "Kira", "bar");
        aim(&mut r, CameraAim::Point { x: 1, y: 2 }, None).unwrap();
        place(&mut r, "Renn", "entrance");
        let camera = r.camera().unwrap();
        assert_eq!((camera.x, camera.y), (1, 2));
    }

    #[test]
    fn npcs_and_hidden_tokens_do_not_pull_the_centroid() {
        let mut r = cantina();
        place(&mut r, "Kira", "bar");
        r.move_token(
            &catalog(),
            name("Greedo"),
            MapId::new("cantina.svg").unwrap(),
            PositionName::new("entrance").unwrap(),
            TokenStyle::default(),
            now(),
        )
        .unwrap();
        assert_eq!(r.party_centroid(), Some((400, 250)));
    }

    #[test]
    fn combat_zooms_in_and_ending_pulls_back() {
        let mut r = cantina();
        place(&mut r, "Kira", "bar");
        place(&mut r, "Renn", "booth-1");

        r.start_initiative(vec![name("Kira"), name("Renn")], None, &catalog(), now())
            .unwrap();
        let camera = r.camera().unwrap();
        assert_eq!(camera.zoom, Zoom::COMBAT);
        assert_eq!(camera.target, CameraTarget::Combat);
        assert_eq!((camera.x, camera.y), (250, 185));

        r.end_combat(now()).unwrap();
        let camera = r.camera().unwrap();
        assert_eq!(camera.zoom, Zoom::FIT);
        assert_eq!((camera.x, camera.y), (250, 185));
    }

    #[test]
    fn combat_without_party_ends_on_overview() {
        let mut r = cantina();
        r.start_initiative(vec![name("Greedo")], None, &catalog(), now())
            .unwrap();
        r.end_combat(now()).unwrap();
        let camera = r.camera().unwrap();
        assert_eq!(camera.target, CameraTarget::Overview);
        assert_eq!((camera.x, camera.y), (600, 450));
    }

    #[test]
    fn overview_without_map_uses_default_frame() {
        let mut r = record();
        r.start_initiative(vec![name("Greedo")], None, &catalog(), now())
            .unwrap();
        r.end_combat(now()).unwrap();
        let camera = r.camera().unwrap();
        assert_eq!((camera.x, camera.y), (960, 540));
    }

    #[test]
    fn new_map_resets_the_camera() {
        let mut r = cantina();
        aim(&mut r, CameraAim::Keep, Some(4.0)).unwrap();
        r.set_map(&catalog(), MapId::new("streets.svg").unwrap(), None, true, now())
            .unwrap();
        let camera = r.camera().unwrap();
        assert_eq!(camera.target, CameraTarget::Overview);
        assert_eq!(camera.zoom, Zoom::FIT);
    }
}
