//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One `update` per frame, driven by the host's frame interval
//! - Seeded RNG only
//! - Stable iteration order (arena ids, spawn order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod geom;
pub mod jump;
pub mod motion;
pub mod physics;
pub mod player;
pub mod power;
pub mod random;
pub mod session;
pub mod spawner;
pub mod world;

#[cfg(test)]
mod scenarios;

pub use camera::{CameraUpdate, ScrollCamera};
pub use geom::Rect;
pub use jump::compute_jump_magnitude;
pub use motion::PlayerMotionController;
pub use physics::{Body, DirectBackend, ForceBackend, PhysicsBackend, backend_for};
pub use player::{AnimationFrame, Facing, Player};
pub use power::{PowerModel, format_remaining};
pub use random::SelfCorrectingRange;
pub use session::{LevelSession, SessionEvent, SessionPhase};
pub use spawner::{CullReason, MovingPlatformSpawner, PlatformSpawner};
pub use world::{Entity, EntityId, EntityKind, World};
