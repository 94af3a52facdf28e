//! Draw-order boundary
//!
//! The session describes a frame as batches handed to a `SceneSink`, back to
//! front: platforms, walls, pickups, hazards, win markers, player, then HUD
//! text. A renderer implements the sink; the simulation never draws.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::geom::Rect;
use crate::sim::player::{AnimationFrame, Facing};

/// Batches in the order they are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DrawLayer {
    Platforms,
    Walls,
    Pickups,
    Hazards,
    WinMarkers,
    Player,
    Hud,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    Left,
    #[default]
    Center,
    Right,
}

/// A line of text in world coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub text: String,
    pub position: Vec2,
    pub font_size: f32,
    pub anchor: Anchor,
}

impl TextItem {
    pub fn new(text: impl Into<String>, position: Vec2, font_size: f32, anchor: Anchor) -> Self {
        Self {
            text: text.into(),
            position,
            font_size,
            anchor,
        }
    }
}

/// Receives one frame's draw batches
pub trait SceneSink {
    /// Start a frame with the camera's lower-left corner
    fn begin_frame(&mut self, view_left: i32, view_bottom: i32);

    fn draw_rects(&mut self, layer: DrawLayer, rects: &[Rect]);

    fn draw_player(&mut self, rect: &Rect, facing: Facing, frame: &AnimationFrame);

    fn draw_text(&mut self, item: &TextItem);

    fn end_frame(&mut self) {}
}

/// One recorded sink call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Begin { view_left: i32, view_bottom: i32 },
    Rects { layer: DrawLayer, rects: Vec<Rect> },
    Player { rect: Rect, facing: Facing, frame: AnimationFrame },
    Text(TextItem),
    End,
}

impl DrawCall {
    pub fn layer(&self) -> Option<DrawLayer> {
        match self {
            DrawCall::Rects { layer, .. } => Some(*layer),
            DrawCall::Player { .. } => Some(DrawLayer::Player),
            DrawCall::Text(_) => Some(DrawLayer::Hud),
            DrawCall::Begin { .. } | DrawCall::End => None,
        }
    }
}

/// Sink that keeps every call, for headless runs and tests
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub calls: Vec<DrawCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Layers in the order they were drawn
    pub fn layers(&self) -> Vec<DrawLayer> {
        self.calls.iter().filter_map(DrawCall::layer).collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text(item) => Some(item.text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl SceneSink for RecordingSink {
    fn begin_frame(&mut self, view_left: i32, view_bottom: i32) {
        self.calls.push(DrawCall::Begin {
            view_left,
            view_bottom,
        });
    }

    fn draw_rects(&mut self, layer: DrawLayer, rects: &[Rect]) {
        self.calls.push(DrawCall::Rects {
            layer,
            rects: rects.to_vec(),
        });
    }

    fn draw_player(&mut self, rect: &Rect, facing: Facing, frame: &AnimationFrame) {
        self.calls.push(DrawCall::Player {
            rect: *rect,
            facing,
            frame: frame.clone(),
        });
    }

    fn draw_text(&mut self, item: &TextItem) {
        self.calls.push(DrawCall::Text(item.clone()));
    }

    fn end_frame(&mut self) {
        self.calls.push(DrawCall::End);
    }
}
