//! Collision queries and axis-separated collision response
//!
//! Both physics back-ends move the player one axis at a time and push it back
//! out of whatever it ended up overlapping. Queries for hazards, pickups and
//! win markers are plain overlap tests against an index set.

use glam::Vec2;

use super::geom::Rect;
use super::world::{EntityId, World};

/// Movement axis for collision response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Result of moving a rect along one axis
#[derive(Debug, Clone, Copy)]
pub struct CollisionResult {
    /// Rect after movement and push-out
    pub rect: Rect,
    /// Whether any solid blocked the movement
    pub hit: bool,
}

/// Whether `rect` overlaps any entity in `set`
pub fn overlaps_any(world: &World, rect: &Rect, set: &[EntityId]) -> bool {
    world.rects(set).any(|other| rect.overlaps(&other))
}

/// All entities in `set` overlapping `rect`, in set order
pub fn overlapping(world: &World, rect: &Rect, set: &[EntityId]) -> Vec<EntityId> {
    set.iter()
        .copied()
        .filter(|&id| world.rect(id).is_some_and(|other| rect.overlaps(&other)))
        .collect()
}

/// Move `rect` by `delta` along `axis`, then push it out of overlapping solids.
///
/// Positive movement is stopped at the nearest solid's near edge, negative (or
/// zero, on the Y axis) movement rests on the highest blocking edge. A zero
/// move on the Y axis still resolves overlap so a rising platform lifts the
/// player instead of swallowing it.
pub fn move_and_collide(rect: Rect, delta: f32, axis: Axis, solids: &[Rect]) -> CollisionResult {
    let moved = match axis {
        Axis::X => rect.translated(Vec2::new(delta, 0.0)),
        Axis::Y => rect.translated(Vec2::new(0.0, delta)),
    };

    if axis == Axis::X && delta == 0.0 {
        return CollisionResult {
            rect: moved,
            hit: false,
        };
    }

    let hits: Vec<&Rect> = solids.iter().filter(|s| moved.overlaps(s)).collect();
    if hits.is_empty() {
        return CollisionResult {
            rect: moved,
            hit: false,
        };
    }

    let mut resolved = moved;
    match (axis, delta > 0.0) {
        (Axis::X, true) => {
            let wall = hits.iter().map(|s| s.left()).fold(f32::INFINITY, f32::min);
            resolved.x = wall - resolved.width;
        }
        (Axis::X, false) => {
            let wall = hits.iter().map(|s| s.right()).fold(f32::NEG_INFINITY, f32::max);
            resolved.x = wall;
        }
        (Axis::Y, true) => {
            let ceiling = hits.iter().map(|s| s.bottom()).fold(f32::INFINITY, f32::min);
            resolved.y = ceiling - resolved.height;
        }
        (Axis::Y, false) => {
            let floor = hits.iter().map(|s| s.top()).fold(f32::NEG_INFINITY, f32::max);
            resolved.y = floor;
        }
    }

    CollisionResult {
        rect: resolved,
        hit: true,
    }
}

/// Whether a rect is resting on a solid: probe `distance` below it
pub fn is_supported(rect: &Rect, solids: &[Rect], distance: f32) -> bool {
    let probe = rect.translated(Vec2::new(0.0, -distance));
    solids.iter().any(|s| probe.overlaps(s))
}
