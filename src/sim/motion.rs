//! Player motion from held-direction intents
//!
//! Force profile: every tick pushes the body with a ground or air force and
//! toggles friction so ground contact does not fight the thrust.
//! Direct profile: key presses set horizontal speed, releases zero it.

use glam::Vec2;

use super::physics::{Body, PhysicsBackend};
use crate::input::Intent;
use crate::tuning::{MotionProfile, PhysicsTuning};

#[derive(Debug, Clone, Default)]
pub struct PlayerMotionController {
    left_held: bool,
    right_held: bool,
}

impl PlayerMotionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left_held(&self) -> bool {
        self.left_held
    }

    pub fn right_held(&self) -> bool {
        self.right_held
    }

    /// A direction key went down. Jump is handled by `jump`.
    pub fn press(&mut self, intent: Intent, body: &mut Body, tuning: &PhysicsTuning) {
        match intent {
            Intent::MoveLeft => {
                self.left_held = true;
                if tuning.profile == MotionProfile::Direct {
                    body.vel.x = -tuning.direct.movement_speed;
                }
            }
            Intent::MoveRight => {
                self.right_held = true;
                if tuning.profile == MotionProfile::Direct {
                    body.vel.x = tuning.direct.movement_speed;
                }
            }
            Intent::Jump => {}
        }
    }

    /// A direction key went up
    pub fn release(&mut self, intent: Intent, body: &mut Body, tuning: &PhysicsTuning) {
        match intent {
            Intent::MoveLeft => self.left_held = false,
            Intent::MoveRight => self.right_held = false,
            Intent::Jump => return,
        }
        if tuning.profile == MotionProfile::Direct {
            body.vel.x = 0.0;
        }
    }

    /// Per-tick thrust. Only the force profile does anything here.
    pub fn apply(
        &self,
        body: &mut Body,
        grounded: bool,
        physics: &dyn PhysicsBackend,
        tuning: &PhysicsTuning,
    ) {
        if physics.profile() != MotionProfile::Force {
            return;
        }

        let magnitude = if grounded {
            tuning.force.move_force_on_ground
        } else {
            tuning.force.move_force_in_air
        };

        match (self.left_held, self.right_held) {
            (true, false) => {
                physics.apply_force(body, Vec2::new(-magnitude, 0.0));
            }
            (false, true) => {
                physics.apply_force(body, Vec2::new(magnitude, 0.0));
                physics.set_friction(body, 0.0);
            }
            _ => physics.set_friction(body, 1.0),
        }
    }

    /// Launch the body upward with an already resolved magnitude
    pub fn jump(&self, body: &mut Body, magnitude: f32, physics: &dyn PhysicsBackend) {
        match physics.profile() {
            MotionProfile::Force => physics.apply_impulse(body, Vec2::new(0.0, magnitude)),
            MotionProfile::Direct => body.vel.y = magnitude,
        }
    }
}
