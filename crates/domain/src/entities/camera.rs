//! Overlay camera: where the pan/zoom view is centred and how far it is
//! zoomed. The engine writes it; the overlay only reads it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 5.0;

/// Frame used for an overview when no map is loaded.
pub const OVERVIEW_WIDTH: u32 = 1920;
pub const OVERVIEW_HEIGHT: u32 = 1080;

/// Zoom factor, finite and clamped to `MIN_ZOOM..=MAX_ZOOM`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Zoom(f64);

// Never NaN: every constructor goes through `clamped`.
impl Eq for Zoom {}

impl Zoom {
    /// Whole map in view.
    pub const FIT: Zoom = Zoom(1.0);
    /// Close-up used while combat runs.
    pub const COMBAT: Zoom = Zoom(2.5);

    pub fn clamped(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() {
            return Err(DomainError::validation("Zoom must be a finite number"));
        }
        Ok(Self(value.clamp(MIN_ZOOM, MAX_ZOOM)))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Zoom {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::clamped(value)
    }
}

impl From<Zoom> for f64 {
    fn from(zoom: Zoom) -> f64 {
        zoom.0
    }
}

impl fmt::Display for Zoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the camera is pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraTarget {
    /// Centre of the active map
    Overview,
    /// Centroid of the visible PC tokens, re-aimed as tokens move
    Party,
    /// Party centroid framed at combat zoom
    Combat,
    /// Explicit pixel coordinates
    Manual,
    /// A named position on the active map
    Position,
    /// A preset from the active map's terrain
    Preset,
}

impl fmt::Display for CameraTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CameraTarget::Overview => "overview",
            CameraTarget::Party => "party",
            CameraTarget::Combat => "combat",
            CameraTarget::Manual => "manual",
            CameraTarget::Position => "position",
            CameraTarget::Preset => "preset",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub x: i32,
    pub y: i32,
    pub zoom: Zoom,
    pub target: CameraTarget,
    /// Position or preset name for the named targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
}

impl Camera {
    /// Whole map, centred.
    pub fn overview(width: u32, height: u32) -> Self {
        Self {
            x: i32::try_from(width / 2).unwrap_or(i32::MAX),
            y: i32::try_from(height / 2).unwrap_or(i32::MAX),
            zoom: Zoom::FIT,
            target: CameraTarget::Overview,
            focus: None,
        }
    }

    pub fn at(x: i32, y: i32, zoom: Zoom, target: CameraTarget) -> Self {
        Self {
            x,
            y,
            zoom,
            target,
            focus: None,
        }
    }

    /// `party`, or the focus name for position and preset targets.
    pub fn label(&self) -> String {
        match &self.focus {
            Some(focus) => focus.clone(),
            None => self.target.to_string(),
        }
    }
}
