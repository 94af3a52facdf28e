//! Physics back-ends
//!
//! The session only talks to `PhysicsBackend`. Two small back-ends satisfy it:
//! - `ForceBackend`: forces and impulses on a body with mass, friction and
//!   speed caps; units are pixels and seconds.
//! - `DirectBackend`: velocities are set directly and integrated once per
//!   frame; units are pixels per frame and `dt` is ignored.
//!
//! Neither is a general physics engine. They resolve the player against
//! static and kinematic rectangles, which is all a level needs.

use glam::Vec2;

use super::collision::{Axis, is_supported, move_and_collide};
use super::geom::Rect;
use crate::tuning::{DirectTuning, ForceTuning, MotionProfile, Tuning};

/// Probe distance for the grounded query of the force back-end
const FORCE_GROUND_PROBE: f32 = 1.0;
/// The frame-based engine checks a few pixels below the player
const DIRECT_GROUND_PROBE: f32 = 5.0;

/// The player's physical state
#[derive(Debug, Clone)]
pub struct Body {
    pub rect: Rect,
    pub vel: Vec2,
    /// Force accumulated since the last step
    pub force: Vec2,
    pub friction: f32,
    pub mass: f32,
}

impl Body {
    pub fn new(rect: Rect, mass: f32, friction: f32) -> Self {
        Self {
            rect,
            vel: Vec2::ZERO,
            force: Vec2::ZERO,
            friction,
            mass,
        }
    }
}

/// Capabilities the gameplay core needs from a physics engine
pub trait PhysicsBackend {
    /// Which control scheme this back-end expects
    fn profile(&self) -> MotionProfile;

    /// Accumulate a force for the next step
    fn apply_force(&self, body: &mut Body, force: Vec2);

    /// Instantaneous change of momentum
    fn apply_impulse(&self, body: &mut Body, impulse: Vec2);

    fn set_friction(&self, body: &mut Body, friction: f32);

    /// Whether the body rests on one of `solids`
    fn is_on_ground(&self, body: &Body, solids: &[Rect]) -> bool;

    /// Advance the body by one step against `solids`
    fn step(&mut self, body: &mut Body, solids: &[Rect], dt: f32);

    /// Move a kinematic rect by `displacement` pixels for this frame.
    /// `vel` receives whatever velocity the back-end tracks for it.
    fn drive_kinematic(&self, rect: &mut Rect, vel: &mut Vec2, displacement: Vec2, dt: f32);
}

/// Build the back-end selected by the tuning
pub fn backend_for(tuning: &Tuning) -> Box<dyn PhysicsBackend> {
    match tuning.physics.profile {
        MotionProfile::Force => Box::new(ForceBackend::new(tuning.physics.force.clone())),
        MotionProfile::Direct => Box::new(DirectBackend::new(tuning.physics.direct.clone())),
    }
}

/// Force/impulse integrator
#[derive(Debug, Clone)]
pub struct ForceBackend {
    tuning: ForceTuning,
}

impl ForceBackend {
    pub fn new(tuning: ForceTuning) -> Self {
        Self { tuning }
    }

    /// Coulomb-style friction: slow horizontal motion by mu * g while grounded
    fn apply_ground_friction(&self, body: &mut Body, dt: f32) {
        let mu = body.friction * self.tuning.wall_friction;
        let decel = mu * self.tuning.gravity * dt;
        if body.vel.x.abs() <= decel {
            body.vel.x = 0.0;
        } else {
            body.vel.x -= decel * body.vel.x.signum();
        }
    }
}

impl PhysicsBackend for ForceBackend {
    fn profile(&self) -> MotionProfile {
        MotionProfile::Force
    }

    fn apply_force(&self, body: &mut Body, force: Vec2) {
        body.force += force;
    }

    fn apply_impulse(&self, body: &mut Body, impulse: Vec2) {
        body.vel += impulse / body.mass;
    }

    fn set_friction(&self, body: &mut Body, friction: f32) {
        body.friction = friction;
    }

    fn is_on_ground(&self, body: &Body, solids: &[Rect]) -> bool {
        body.vel.y <= 0.0 && is_supported(&body.rect, solids, FORCE_GROUND_PROBE)
    }

    fn step(&mut self, body: &mut Body, solids: &[Rect], dt: f32) {
        let grounded = self.is_on_ground(body, solids);

        let accel = Vec2::new(0.0, -self.tuning.gravity) + body.force / body.mass;
        body.vel += accel * dt;
        body.force = Vec2::ZERO;

        if grounded {
            self.apply_ground_friction(body, dt);
        }

        body.vel *= self.tuning.damping.powf(dt);
        body.vel.x = body
            .vel
            .x
            .clamp(-self.tuning.max_horizontal_speed, self.tuning.max_horizontal_speed);
        body.vel.y = body
            .vel
            .y
            .clamp(-self.tuning.max_vertical_speed, self.tuning.max_vertical_speed);

        let vertical = move_and_collide(body.rect, body.vel.y * dt, Axis::Y, solids);
        body.rect = vertical.rect;
        if vertical.hit {
            body.vel.y = 0.0;
        }

        let horizontal = move_and_collide(body.rect, body.vel.x * dt, Axis::X, solids);
        body.rect = horizontal.rect;
        if horizontal.hit {
            body.vel.x = 0.0;
        }
    }

    fn drive_kinematic(&self, rect: &mut Rect, vel: &mut Vec2, displacement: Vec2, dt: f32) {
        // Kinematic velocity is not kept across steps; re-derive it every frame
        if dt > 0.0 {
            *vel = displacement / dt;
            rect.translate(*vel * dt);
        } else {
            *vel = Vec2::ZERO;
        }
    }
}

/// Frame-based platformer integrator
#[derive(Debug, Clone)]
pub struct DirectBackend {
    tuning: DirectTuning,
}

impl DirectBackend {
    pub fn new(tuning: DirectTuning) -> Self {
        Self { tuning }
    }
}

impl PhysicsBackend for DirectBackend {
    fn profile(&self) -> MotionProfile {
        MotionProfile::Direct
    }

    fn apply_force(&self, _body: &mut Body, _force: Vec2) {
        // Movement is velocity driven in this profile
    }

    fn apply_impulse(&self, body: &mut Body, impulse: Vec2) {
        body.vel += impulse;
    }

    fn set_friction(&self, _body: &mut Body, _friction: f32) {}

    fn is_on_ground(&self, body: &Body, solids: &[Rect]) -> bool {
        is_supported(&body.rect, solids, DIRECT_GROUND_PROBE)
    }

    fn step(&mut self, body: &mut Body, solids: &[Rect], _dt: f32) {
        body.vel.y -= self.tuning.gravity;

        let vertical = move_and_collide(body.rect, body.vel.y, Axis::Y, solids);
        body.rect = vertical.rect;
        if vertical.hit {
            body.vel.y = 0.0;
        }

        // Horizontal speed is owned by input; a wall only stops this frame's move
        let horizontal = move_and_collide(body.rect, body.vel.x, Axis::X, solids);
        body.rect = horizontal.rect;
    }

    fn drive_kinematic(&self, rect: &mut Rect, vel: &mut Vec2, displacement: Vec2, _dt: f32) {
        *vel = displacement;
        rect.translate(displacement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn floor() -> Vec<Rect> {
        vec![Rect::new(-1000.0, 0.0, 4000.0, 128.0)]
    }

    fn body_on_floor() -> Body {
        Body::new(Rect::new(100.0, 128.0, 64.0, 64.0), 2.0, 1.0)
    }

    #[test]
    fn test_force_backend_falls_under_gravity() {
        let mut physics = ForceBackend::new(ForceTuning::default());
        let mut body = Body::new(Rect::new(0.0, 500.0, 64.0, 64.0), 2.0, 1.0);
        physics.step(&mut body, &[], DT);
        assert!(body.vel.y < 0.0);
        assert!(body.rect.bottom() < 500.0);
    }

    #[test]
    fn test_force_backend_rests_on_floor() {
        let mut physics = ForceBackend::new(ForceTuning::default());
        let mut body = body_on_floor();
        for _ in 0..30 {
            physics.step(&mut body, &floor(), DT);
        }
        assert_eq!(body.rect.bottom(), 128.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(physics.is_on_ground(&body, &floor()));
    }

    #[test]
    fn test_force_backend_impulse_launches_off_ground() {
        let mut physics = ForceBackend::new(ForceTuning::default());
        let mut body = body_on_floor();
        physics.apply_impulse(&mut body, Vec2::new(0.0, 1800.0));
        assert_eq!(body.vel.y, 900.0);
        assert!(!physics.is_on_ground(&body, &floor()));

        physics.step(&mut body, &floor(), DT);
        assert!(body.rect.bottom() > 128.0);
    }

    #[test]
    fn test_force_backend_caps_horizontal_speed() {
        let tuning = ForceTuning::default();
        let max = tuning.max_horizontal_speed;
        let mut physics = ForceBackend::new(tuning);
        let mut body = body_on_floor();
        physics.set_friction(&mut body, 0.0);
        for _ in 0..120 {
            physics.apply_force(&mut body, Vec2::new(8000.0, 0.0));
            physics.step(&mut body, &floor(), DT);
        }
        assert!((body.vel.x - max).abs() < 0.001);
    }

    #[test]
    fn test_force_backend_friction_stops_sliding() {
        let mut physics = ForceBackend::new(ForceTuning::default());
        let mut body = body_on_floor();
        body.vel.x = 300.0;
        for _ in 0..60 {
            physics.step(&mut body, &floor(), DT);
        }
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_force_backend_kinematic_matches_displacement() {
        let physics = ForceBackend::new(ForceTuning::default());
        let mut rect = Rect::new(0.0, 0.0, 128.0, 64.0);
        let mut vel = Vec2::ZERO;
        physics.drive_kinematic(&mut rect, &mut vel, Vec2::new(0.0, 3.0), DT);
        assert!((vel.y - 180.0).abs() < 0.01);
        assert!((rect.bottom() - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_direct_backend_gravity_per_frame() {
        let mut physics = DirectBackend::new(DirectTuning::default());
        let mut body = Body::new(Rect::new(0.0, 500.0, 64.0, 64.0), 1.0, 1.0);
        physics.step(&mut body, &[], DT);
        assert!((body.vel.y + 0.7).abs() < 0.0001);
        assert!((body.rect.bottom() - 499.3).abs() < 0.001);
    }

    #[test]
    fn test_direct_backend_keeps_input_speed_against_wall() {
        let mut physics = DirectBackend::new(DirectTuning::default());
        let wall = Rect::new(166.0, 128.0, 50.0, 300.0);
        let mut solids = floor();
        solids.push(wall);
        let mut body = body_on_floor();
        body.vel.x = 4.0;
        physics.step(&mut body, &solids, DT);
        assert_eq!(body.rect.right(), 166.0);
        assert_eq!(body.vel.x, 4.0);
    }

    #[test]
    fn test_backend_for_profile() {
        let tuning = Tuning::with_profile(MotionProfile::Direct);
        assert_eq!(backend_for(&tuning).profile(), MotionProfile::Direct);
        assert_eq!(backend_for(&Tuning::default()).profile(), MotionProfile::Force);
    }
}
