//! The player entity and its walk animation

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::physics::Body;
use crate::tuning::{MotionProfile, Tuning};

/// Which way the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

/// Frame selection for the walk cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationFrame {
    Idle,
    Walk(u32),
}

#[derive(Debug, Clone)]
pub struct Animation {
    pub frame: AnimationFrame,
    frames: u32,
    distance_per_frame: f32,
    current: u32,
    last_x: f32,
}

impl Animation {
    /// `frames` below one is treated as a single frame
    pub fn new(frames: u32, distance_per_frame: f32, x: f32) -> Self {
        Self {
            frame: AnimationFrame::Idle,
            frames: frames.max(1),
            distance_per_frame,
            current: 0,
            last_x: x,
        }
    }

    fn rest(&mut self, x: f32) {
        self.frame = AnimationFrame::Idle;
        self.last_x = x;
        self.current = 0;
    }
}

/// The one player of a level session
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub facing: Facing,
    pub animation: Animation,
}

impl Player {
    /// Place a player so its center is at `center`
    pub fn new(center: Vec2, tuning: &Tuning) -> Self {
        let rect = Rect::from_center(center, tuning.player.width, tuning.player.height);
        let (mass, friction) = match tuning.physics.profile {
            MotionProfile::Force => (
                tuning.physics.force.player_mass,
                tuning.physics.force.player_friction,
            ),
            MotionProfile::Direct => (1.0, 1.0),
        };
        Self {
            body: Body::new(rect, mass, friction),
            facing: Facing::Right,
            animation: Animation::new(
                tuning.player.animation_frames,
                tuning.player.distance_before_change_texture,
                center.x,
            ),
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect
    }

    pub fn center(&self) -> Vec2 {
        self.body.rect.center()
    }

    /// Advance facing and walk frame from the latest physics state
    pub fn update_animation(&mut self, grounded: bool) {
        let change_x = self.body.vel.x;
        if change_x < 0.0 && self.facing == Facing::Right {
            self.facing = Facing::Left;
        } else if change_x > 0.0 && self.facing == Facing::Left {
            self.facing = Facing::Right;
        }

        let x = self.body.rect.center_x();
        if !grounded || change_x == 0.0 {
            self.animation.rest(x);
            return;
        }

        let anim = &mut self.animation;
        if (anim.last_x - x).abs() >= anim.distance_per_frame {
            anim.last_x = x;
            anim.current = (anim.current + 1) % anim.frames;
            anim.frame = AnimationFrame::Walk(anim.current);
        }
    }
}
