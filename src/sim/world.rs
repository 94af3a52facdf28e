//! Entity arena and per-kind index sets
//!
//! Every level object lives in one arena and is referenced by `EntityId`.
//! The kind lists (walls, hazards, pickups, ...) only hold ids, so moving an
//! entity between lists never copies it and removing it from a list never
//! destroys it. `destroy` is the only way an entity leaves the arena.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;

/// Index of an entity in the world arena (never reused within a level)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Closed set of level object kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Solid ground
    Wall,
    /// Solid tile that also grants a boosted jump above it
    Springboard,
    /// Solid tile the player starts on
    StartMarker,
    /// Kills on contact
    Hazard,
    /// Power battery
    Pickup,
    /// Level end flag
    WinMarker,
    /// Rising platform spawned at runtime
    Platform,
}

impl EntityKind {
    /// Whether the player collides with this kind
    pub fn is_solid(&self) -> bool {
        matches!(
            self,
            EntityKind::Wall | EntityKind::Springboard | EntityKind::StartMarker | EntityKind::Platform
        )
    }
}

/// A level object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub rect: Rect,
    /// Velocity (units depend on the physics back-end)
    pub vel: Vec2,
    /// Destroy once the top edge rises past this height
    pub boundary_top: Option<f32>,
}

/// All entities of one level plus the kind index sets
#[derive(Debug, Clone, Default)]
pub struct World {
    slots: Vec<Option<Entity>>,
    /// Static solids drawn as walls (ground, springboards, start marker)
    pub walls: Vec<EntityId>,
    /// Everything the player collides with (walls plus live platforms)
    pub contact: Vec<EntityId>,
    pub hazards: Vec<EntityId>,
    /// Active (visible, collectable) pickups; dormant ones are absent
    pub pickups: Vec<EntityId>,
    pub win_markers: Vec<EntityId>,
    /// Live rising platforms in spawn order
    pub platforms: Vec<EntityId>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to the arena and to the index sets its kind belongs to
    pub fn spawn(&mut self, kind: EntityKind, rect: Rect) -> EntityId {
        let id = EntityId(self.slots.len() as u32);
        self.slots.push(Some(Entity {
            id,
            kind,
            rect,
            vel: Vec2::ZERO,
            boundary_top: None,
        }));

        match kind {
            EntityKind::Wall | EntityKind::Springboard | EntityKind::StartMarker => {
                self.walls.push(id);
                self.contact.push(id);
            }
            EntityKind::Hazard => self.hazards.push(id),
            EntityKind::Pickup => self.pickups.push(id),
            EntityKind::WinMarker => self.win_markers.push(id),
            EntityKind::Platform => {
                self.platforms.push(id);
                self.contact.push(id);
            }
        }
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(id.0 as usize).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots.get_mut(id.0 as usize).and_then(|slot| slot.as_mut())
    }

    pub fn rect(&self, id: EntityId) -> Option<Rect> {
        self.get(id).map(|e| e.rect)
    }

    /// Remove an entity from the arena and every index set
    pub fn destroy(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.slots.get_mut(id.0 as usize).and_then(|slot| slot.take())?;
        for set in [
            &mut self.walls,
            &mut self.contact,
            &mut self.hazards,
            &mut self.pickups,
            &mut self.win_markers,
            &mut self.platforms,
        ] {
            set.retain(|&other| other != id);
        }
        Some(entity)
    }

    /// Number of entities still in the arena
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Rects of the entities in an index set, in set order
    pub fn rects<'a>(&'a self, set: &'a [EntityId]) -> impl Iterator<Item = Rect> + 'a {
        set.iter().filter_map(|&id| self.rect(id))
    }

    /// Rects of everything the player collides with
    pub fn solids(&self) -> Vec<Rect> {
        self.rects(&self.contact).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_places_kinds_in_sets() {
        let mut world = World::new();
        let wall = world.spawn(EntityKind::Wall, Rect::new(0.0, 0.0, 10.0, 10.0));
        let spring = world.spawn(EntityKind::Springboard, Rect::new(10.0, 0.0, 10.0, 10.0));
        let pickup = world.spawn(EntityKind::Pickup, Rect::new(0.0, 20.0, 5.0, 5.0));
        let platform = world.spawn(EntityKind::Platform, Rect::new(50.0, 0.0, 10.0, 2.0));

        assert_eq!(world.walls, vec![wall, spring]);
        assert_eq!(world.contact, vec![wall, spring, platform]);
        assert_eq!(world.pickups, vec![pickup]);
        assert_eq!(world.platforms, vec![platform]);
        assert!(world.hazards.is_empty());
    }

    #[test]
    fn test_springboard_enters_contact_once() {
        let mut world = World::new();
        let spring = world.spawn(EntityKind::Springboard, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(world.contact.iter().filter(|&&id| id == spring).count(), 1);
        assert_eq!(world.solids().len(), 1);
    }

    #[test]
    fn test_destroy_removes_from_every_set() {
        let mut world = World::new();
        let platform = world.spawn(EntityKind::Platform, Rect::new(0.0, 0.0, 10.0, 2.0));
        assert_eq!(world.live_count(), 1);

        let removed = world.destroy(platform).unwrap();
        assert_eq!(removed.kind, EntityKind::Platform);
        assert!(world.get(platform).is_none());
        assert!(world.contact.is_empty());
        assert!(world.platforms.is_empty());
        assert_eq!(world.live_count(), 0);

        // Destroying twice is a no-op
        assert!(world.destroy(platform).is_none());
    }

    #[test]
    fn test_ids_not_reused_after_destroy() {
        let mut world = World::new();
        let first = world.spawn(EntityKind::Platform, Rect::default());
        world.destroy(first);
        let second = world.spawn(EntityKind::Platform, Rect::default());
        assert_ne!(first, second);
    }
}
