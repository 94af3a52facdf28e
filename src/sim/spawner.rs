//! Rising platforms
//!
//! Each `rising_only` marker spawns a copy of itself every `spawn_interval`
//! seconds. Copies rise until they pass their `boundary_top` or leave the
//! camera's view on the left, right or top.

use glam::Vec2;

use super::geom::Rect;
use super::physics::PhysicsBackend;
use super::world::{EntityId, EntityKind, World};
use crate::tuning::PlatformTuning;

/// Spawn point for rising platforms
#[derive(Debug, Clone)]
pub struct PlatformSpawner {
    pub template: Rect,
    pub boundary_top: Option<f32>,
    pub interval: f32,
    /// Seconds until the next spawn; starts at zero so the first copy appears at once
    countdown: f32,
}

impl PlatformSpawner {
    pub fn new(template: Rect, boundary_top: Option<f32>, interval: f32) -> Self {
        Self {
            template,
            boundary_top,
            interval,
            countdown: 0.0,
        }
    }

    /// Whether this spawner fires on this tick
    pub fn update(&mut self, delta_time: f32) -> bool {
        self.countdown -= delta_time;
        if self.countdown <= 0.0 {
            self.countdown = self.interval;
            return true;
        }
        false
    }
}

/// Why a platform was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullReason {
    PastBoundary,
    OutOfView,
}

/// Spawns, moves and culls rising platforms
#[derive(Debug, Clone)]
pub struct MovingPlatformSpawner {
    spawners: Vec<PlatformSpawner>,
    rise_speed: f32,
}

impl MovingPlatformSpawner {
    pub fn new(tuning: &PlatformTuning) -> Self {
        Self {
            spawners: Vec::new(),
            rise_speed: tuning.rise_speed,
        }
    }

    pub fn add_spawner(&mut self, spawner: PlatformSpawner) {
        self.spawners.push(spawner);
    }

    pub fn spawners(&self) -> &[PlatformSpawner] {
        &self.spawners
    }

    pub fn clear(&mut self) {
        self.spawners.clear();
    }

    /// Spawn due platforms, then cull and move the live ones.
    ///
    /// The cull pass ends at the first removal, so the platforms after it are
    /// neither checked nor moved on that tick. Level timings depend on this.
    pub fn tick(
        &mut self,
        delta_time: f32,
        viewport: &Rect,
        world: &mut World,
        physics: &dyn PhysicsBackend,
    ) -> Vec<(EntityId, CullReason)> {
        for spawner in &mut self.spawners {
            if spawner.update(delta_time) {
                let id = world.spawn(EntityKind::Platform, spawner.template);
                if let Some(platform) = world.get_mut(id) {
                    platform.vel = Vec2::new(0.0, self.rise_speed);
                    platform.boundary_top = spawner.boundary_top;
                }
                log::debug!("spawned rising platform {:?}", id);
            }
        }

        let mut culled = Vec::new();
        let live: Vec<EntityId> = world.platforms.clone();
        for id in live {
            let Some(platform) = world.get(id) else {
                continue;
            };
            let rect = platform.rect;

            let reason = if platform.boundary_top.is_some_and(|top| rect.top() > top) {
                Some(CullReason::PastBoundary)
            } else if rect.right() > viewport.right()
                || rect.left() < viewport.left()
                || rect.top() > viewport.top()
            {
                // Bottom excluded: platforms start below the visible area
                Some(CullReason::OutOfView)
            } else {
                None
            };

            if let Some(reason) = reason {
                world.destroy(id);
                log::debug!("culled rising platform {:?} ({:?})", id, reason);
                culled.push((id, reason));
                break;
            }

            if let Some(platform) = world.get_mut(id) {
                let displacement = Vec2::new(0.0, self.rise_speed);
                physics.drive_kinematic(&mut platform.rect, &mut platform.vel, displacement, delta_time);
            }
        }
        culled
    }
}
