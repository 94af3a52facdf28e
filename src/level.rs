//! Level data
//!
//! A level is a set of named object layers, each a list of rectangles in world
//! coordinates. `LevelSource` hands out levels by number; `LevelLayout` checks
//! a map and sorts its layers into what the session builds from.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::sim::geom::Rect;

pub const WALL_CONTACT_LAYER: &str = "wall_contact";
pub const SPRINGBOARDS_LAYER: &str = "springboards";
pub const BATTERIES_LAYER: &str = "batteries";
pub const START_MARKER_LAYER: &str = "start_level_marker";
pub const DEATH_LAYER: &str = "death";
pub const END_FLAG_LAYER: &str = "end_flag";
pub const RISING_ONLY_LAYER: &str = "rising_only";

/// One object of a layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelObject {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Rising platforms only: destroy copies once their top passes this height.
    /// Zero means no boundary, see `boundary()`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_top: Option<f32>,
}

impl LevelObject {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// `boundary_top`, with an exported zero read as unset
    pub fn boundary(&self) -> Option<f32> {
        self.boundary_top.filter(|top| *top != 0.0)
    }
}

impl From<Rect> for LevelObject {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            boundary_top: None,
        }
    }
}

/// Layer name to objects. Layers not present are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelMap {
    layers: BTreeMap<String, Vec<LevelObject>>,
}

impl LevelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str, resource: &str) -> Result<Self, LevelError> {
        serde_json::from_str(json).map_err(|source| LevelError::Parse {
            resource: resource.to_string(),
            source,
        })
    }

    /// Builder: replace a layer's objects
    pub fn with_layer<I, O>(mut self, name: &str, objects: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<LevelObject>,
    {
        self.layers
            .insert(name.to_string(), objects.into_iter().map(Into::into).collect());
        self
    }

    pub fn layer(&self, name: &str) -> &[LevelObject] {
        self.layers.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Provides levels by number
pub trait LevelSource {
    fn load(&self, level: u32) -> Result<LevelMap, LevelError>;

    /// Human-readable name of a level's resource, used in errors and logs
    fn resource_name(&self, level: u32) -> String;
}

/// Loads `level_{n}.json` files from a directory
#[derive(Debug, Clone)]
pub struct LevelDirectory {
    root: PathBuf,
}

impl LevelDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, level: u32) -> PathBuf {
        self.root.join(format!("level_{level}.json"))
    }
}

impl LevelSource for LevelDirectory {
    fn load(&self, level: u32) -> Result<LevelMap, LevelError> {
        let resource = self.resource_name(level);
        let json = std::fs::read_to_string(self.path_for(level)).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                LevelError::Missing {
                    resource: self.root.display().to_string(),
                    level,
                }
            } else {
                LevelError::Io {
                    resource: resource.clone(),
                    source,
                }
            }
        })?;
        LevelMap::from_json(&json, &resource)
    }

    fn resource_name(&self, level: u32) -> String {
        self.path_for(level).display().to_string()
    }
}

/// Levels held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticLevels {
    maps: BTreeMap<u32, LevelMap>,
}

impl StaticLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: u32, map: LevelMap) -> Self {
        self.maps.insert(level, map);
        self
    }

    pub fn insert(&mut self, level: u32, map: LevelMap) {
        self.maps.insert(level, map);
    }
}

impl LevelSource for StaticLevels {
    fn load(&self, level: u32) -> Result<LevelMap, LevelError> {
        self.maps.get(&level).cloned().ok_or_else(|| LevelError::Missing {
            resource: "static levels".to_string(),
            level,
        })
    }

    fn resource_name(&self, level: u32) -> String {
        format!("static level {level}")
    }
}

/// A validated level, layers split by role
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub walls: Vec<Rect>,
    pub springboards: Vec<Rect>,
    pub pickups: Vec<Rect>,
    pub start_marker: Rect,
    pub hazards: Vec<Rect>,
    pub win_markers: Vec<Rect>,
    pub rising: Vec<LevelObject>,
}

impl LevelLayout {
    /// Split a map into layers. Exactly one start marker is required.
    pub fn from_map(map: &LevelMap, resource: &str) -> Result<Self, LevelError> {
        let rects = |name: &str| -> Vec<Rect> { map.layer(name).iter().map(LevelObject::rect).collect() };

        let markers = map.layer(START_MARKER_LAYER);
        let [marker] = markers else {
            return Err(LevelError::InvalidMarkerCount {
                resource: resource.to_string(),
                expected: 1,
                actual: markers.len(),
            });
        };

        Ok(Self {
            walls: rects(WALL_CONTACT_LAYER),
            springboards: rects(SPRINGBOARDS_LAYER),
            pickups: rects(BATTERIES_LAYER),
            start_marker: marker.rect(),
            hazards: rects(DEATH_LAYER),
            win_markers: rects(END_FLAG_LAYER),
            rising: map.layer(RISING_ONLY_LAYER).to_vec(),
        })
    }
}
