//! Scrolling camera
//!
//! The camera only moves when the player gets closer than `margin` to an edge
//! of the window, then moves just far enough to restore the margin. Offsets
//! never go below zero and always sit on whole pixels.

use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::tuning::WorldTuning;

/// Result of one camera update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraUpdate {
    pub view_left: i32,
    pub view_bottom: i32,
    /// Whether any margin rule fired this update
    pub changed: bool,
}

/// Margin-based viewport tracker
#[derive(Debug, Clone)]
pub struct ScrollCamera {
    view_left: f32,
    view_bottom: f32,
    width: f32,
    height: f32,
    margin: f32,
}

impl ScrollCamera {
    pub fn new(world: &WorldTuning) -> Self {
        Self {
            view_left: 0.0,
            view_bottom: 0.0,
            width: world.width,
            height: world.height,
            margin: world.viewport_margin,
        }
    }

    pub fn view_left(&self) -> i32 {
        self.view_left as i32
    }

    pub fn view_bottom(&self) -> i32 {
        self.view_bottom as i32
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Visible area in world coordinates
    pub fn viewport(&self) -> Rect {
        Rect::new(self.view_left, self.view_bottom, self.width, self.height)
    }

    /// Setup-time placement: push the view past the player if it starts
    /// beyond the margin, otherwise start at the origin
    pub fn snap_to(&mut self, player: &Rect) {
        self.view_bottom = if player.bottom() > self.margin {
            (player.bottom() + self.margin).trunc()
        } else {
            0.0
        };
        self.view_left = if player.left() > self.margin {
            (player.left() + self.margin).trunc()
        } else {
            0.0
        };
    }

    /// Apply the margin rules for the player's current bounds
    pub fn update(&mut self, player: &Rect) -> CameraUpdate {
        let mut changed = false;

        let left_boundary = self.view_left + self.margin;
        if player.left() < left_boundary {
            self.view_left -= left_boundary - player.left();
            changed = true;
        }

        let right_boundary = self.view_left + self.width - self.margin;
        if player.right() > right_boundary {
            self.view_left += player.right() - right_boundary;
            changed = true;
        }

        let bottom_boundary = self.view_bottom + self.margin;
        if player.bottom() < bottom_boundary {
            self.view_bottom -= bottom_boundary - player.bottom();
            changed = true;
        }

        let top_boundary = self.view_bottom + self.height - self.margin;
        if player.top() > top_boundary {
            self.view_bottom += player.top() - top_boundary;
            changed = true;
        }

        self.view_left = self.view_left.max(0.0).trunc();
        self.view_bottom = self.view_bottom.max(0.0).trunc();

        CameraUpdate {
            view_left: self.view_left(),
            view_bottom: self.view_bottom(),
            changed,
        }
    }
}
