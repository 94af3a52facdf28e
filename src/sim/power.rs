//! Power resource
//!
//! Two policies share one interface:
//! - `ExpiringPower`: each battery grants a random number of seconds and
//!   respawns after a random dormant period. This is the default.
//! - `DecayingPower`: one scalar drains at a fixed rate; each battery adds one
//!   unit and is gone for good.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::overlapping;
use super::geom::Rect;
use super::random::SelfCorrectingRange;
use super::world::{EntityId, World};
use crate::consts::TIME_PER_POWER_DECREASE_SECONDS;
use crate::tuning::{PowerPolicy, Tuning};

/// Display text for a remaining amount, in half steps
pub fn format_remaining(remaining: f32) -> String {
    if remaining < 0.0 {
        return "No Power".to_string();
    }
    let whole = remaining.floor();
    let decimal = remaining - whole;
    if decimal >= 0.5 {
        format!("{}.5", whole as i64)
    } else if whole == 0.0 {
        "No Power".to_string()
    } else {
        format!("{}.0", whole as i64)
    }
}

/// A collected pickup waiting to respawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DormantPickup {
    /// Level clock time at which the pickup may come back
    pub revive_at: f32,
    pub pickup: EntityId,
}

/// Pickups grant random duration and respawn after a random dormant period
#[derive(Debug, Clone)]
pub struct ExpiringPower {
    /// Level time, advanced at `time_scale` of the host interval
    clock: f32,
    time_scale: f32,
    power_time_remaining: f32,
    dormant: Vec<DormantPickup>,
    power_generator: SelfCorrectingRange,
    dormant_generator: SelfCorrectingRange,
    rng: Pcg32,
}

impl ExpiringPower {
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        Self {
            clock: 0.0,
            time_scale: tuning.time_scale,
            power_time_remaining: 0.0,
            dormant: Vec::new(),
            power_generator: SelfCorrectingRange::from_range(tuning.power.power_duration),
            dormant_generator: SelfCorrectingRange::from_range(tuning.power.dormant_duration),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn has_power(&self) -> bool {
        self.power_time_remaining > 0.0
    }

    pub fn power_time_remaining(&self) -> f32 {
        self.power_time_remaining
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn dormant(&self) -> &[DormantPickup] {
        &self.dormant
    }

    /// Collect a pickup: hide it, schedule its revival, add its duration
    pub fn on_collision(&mut self, pickup: EntityId, world: &mut World) -> f32 {
        world.pickups.retain(|&id| id != pickup);

        let dormant_for = self.dormant_generator.generate(&mut self.rng);
        self.dormant.push(DormantPickup {
            revive_at: self.clock + dormant_for,
            pickup,
        });

        let granted = self.power_generator.generate(&mut self.rng);
        self.power_time_remaining += granted;
        log::debug!(
            "pickup {:?} collected: +{granted}s power, dormant for {dormant_for}s",
            pickup
        );
        granted
    }

    /// Advance the clock, revive due pickups the player is not standing on,
    /// and drain power
    pub fn tick(&mut self, delta_time: f32, player: &Rect, world: &mut World) {
        let dt = delta_time * self.time_scale;
        self.clock += dt;

        let clock = self.clock;
        let mut revived = Vec::new();
        self.dormant.retain(|record| {
            if record.revive_at > clock {
                return true;
            }
            let blocked = world
                .rect(record.pickup)
                .is_some_and(|rect| rect.overlaps(player));
            if blocked {
                // Reviving under the player would collect it again at once
                return true;
            }
            revived.push(record.pickup);
            false
        });
        for pickup in revived {
            log::debug!("pickup {:?} revived at clock {clock:.2}", pickup);
            world.pickups.push(pickup);
        }

        if self.has_power() {
            self.power_time_remaining -= dt;
        }
    }
}

/// One scalar that drains steadily
#[derive(Debug, Clone)]
pub struct DecayingPower {
    power: f32,
    time_per_decrease: f32,
}

impl DecayingPower {
    pub fn new(tuning: &Tuning) -> Self {
        let mut time_per_decrease = tuning.power.time_per_power_decrease_seconds;
        if time_per_decrease.is_nan() || time_per_decrease <= 0.0 {
            log::warn!(
                "time_per_power_decrease_seconds {} is not positive, using {}",
                time_per_decrease,
                TIME_PER_POWER_DECREASE_SECONDS
            );
            time_per_decrease = TIME_PER_POWER_DECREASE_SECONDS;
        }
        Self {
            power: tuning.power.initial_power,
            time_per_decrease,
        }
    }

    pub fn has_power(&self) -> bool {
        self.power > 0.0
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    /// Collect a pickup for good: it leaves the world
    pub fn on_collision(&mut self, pickup: EntityId, world: &mut World) -> f32 {
        world.destroy(pickup);
        self.power += 1.0;
        1.0
    }

    pub fn tick(&mut self, delta_time: f32) {
        self.power -= delta_time / self.time_per_decrease;
    }
}

/// Power model selected by `PowerPolicy`
#[derive(Debug, Clone)]
pub enum PowerModel {
    Expiring(ExpiringPower),
    Decaying(DecayingPower),
}

impl PowerModel {
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        match tuning.power.policy {
            PowerPolicy::Expiring => PowerModel::Expiring(ExpiringPower::new(tuning, seed)),
            PowerPolicy::GlobalDecay => PowerModel::Decaying(DecayingPower::new(tuning)),
        }
    }

    pub fn has_power(&self) -> bool {
        match self {
            PowerModel::Expiring(p) => p.has_power(),
            PowerModel::Decaying(p) => p.has_power(),
        }
    }

    /// Remaining amount (seconds or units depending on policy)
    pub fn remaining(&self) -> f32 {
        match self {
            PowerModel::Expiring(p) => p.power_time_remaining(),
            PowerModel::Decaying(p) => p.power(),
        }
    }

    pub fn remaining_label(&self) -> String {
        format_remaining(self.remaining())
    }

    /// Collect one pickup; returns what it granted
    pub fn on_collision(&mut self, pickup: EntityId, world: &mut World) -> f32 {
        match self {
            PowerModel::Expiring(p) => p.on_collision(pickup, world),
            PowerModel::Decaying(p) => p.on_collision(pickup, world),
        }
    }

    /// Collect every active pickup overlapping the player
    pub fn collect_overlapping(&mut self, player: &Rect, world: &mut World) -> Vec<(EntityId, f32)> {
        overlapping(world, player, &world.pickups)
            .into_iter()
            .map(|id| (id, self.on_collision(id, world)))
            .collect()
    }

    pub fn tick(&mut self, delta_time: f32, player: &Rect, world: &mut World) {
        match self {
            PowerModel::Expiring(p) => p.tick(delta_time, player, world),
            PowerModel::Decaying(p) => p.tick(delta_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::EntityKind;

    fn world_with_pickup() -> (World, EntityId) {
        let mut world = World::new();
        let id = world.spawn(EntityKind::Pickup, Rect::new(500.0, 128.0, 32.0, 32.0));
        (world, id)
    }

    fn far_away() -> Rect {
        Rect::new(0.0, 1000.0, 64.0, 64.0)
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(-0.1), "No Power");
        assert_eq!(format_remaining(0.0), "No Power");
        assert_eq!(format_remaining(0.2), "No Power");
        assert_eq!(format_remaining(0.7), "0.5");
        assert_eq!(format_remaining(3.2), "3.0");
        assert_eq!(format_remaining(3.5), "3.5");
        assert_eq!(format_remaining(12.99), "12.5");
    }

    #[test]
    fn test_no_power_after_construction() {
        let power = ExpiringPower::new(&Tuning::default(), 1);
        assert!(!power.has_power());
        assert_eq!(power.power_time_remaining(), 0.0);
    }

    #[test]
    fn test_pickup_is_additive() {
        let tuning = Tuning::default();
        let mut power = ExpiringPower::new(&tuning, 1);
        let mut world = World::new();
        let a = world.spawn(EntityKind::Pickup, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = world.spawn(EntityKind::Pickup, Rect::new(50.0, 0.0, 10.0, 10.0));

        let first = power.on_collision(a, &mut world);
        assert!(power.has_power());
        assert_eq!(power.power_time_remaining(), first);

        let before = power.power_time_remaining();
        let second = power.on_collision(b, &mut world);
        assert_eq!(power.power_time_remaining(), before + second);

        let (low, high) = tuning.power.power_duration;
        assert!(first >= low && first < high);
    }

    #[test]
    fn test_collision_moves_pickup_to_dormant() {
        let (mut world, id) = world_with_pickup();
        let mut power = ExpiringPower::new(&Tuning::default(), 3);
        power.on_collision(id, &mut world);

        assert!(world.pickups.is_empty());
        assert!(world.get(id).is_some(), "dormant pickups stay in the arena");
        assert_eq!(power.dormant().len(), 1);
        assert_eq!(power.dormant()[0].pickup, id);
        assert!(power.dormant()[0].revive_at >= 15.0);
    }

    #[test]
    fn test_tick_uses_scaled_time() {
        let (mut world, id) = world_with_pickup();
        let mut power = ExpiringPower::new(&Tuning::default(), 5);
        power.on_collision(id, &mut world);
        let before = power.power_time_remaining();

        power.tick(1.0, &far_away(), &mut world);
        assert!((power.clock() - 0.5).abs() < 1e-6);
        assert!((power.power_time_remaining() - (before - 0.5)).abs() < 1e-4);
    }

    #[test]
    fn test_pickup_revives_after_dormant_period() {
        let (mut world, id) = world_with_pickup();
        let mut power = ExpiringPower::new(&Tuning::default(), 9);
        power.on_collision(id, &mut world);
        let revive_at = power.dormant()[0].revive_at;

        // Not yet due
        power.tick((revive_at - 1.0) * 2.0, &far_away(), &mut world);
        assert!(world.pickups.is_empty());

        power.tick(4.0, &far_away(), &mut world);
        assert_eq!(world.pickups, vec![id]);
        assert!(power.dormant().is_empty());
    }

    #[test]
    fn test_no_revive_while_player_overlaps() {
        let (mut world, id) = world_with_pickup();
        let mut power = ExpiringPower::new(&Tuning::default(), 11);
        power.on_collision(id, &mut world);
        let revive_at = power.dormant()[0].revive_at;

        // Player parked on the pickup's position well past its revival time
        let on_top = Rect::new(490.0, 128.0, 64.0, 64.0);
        power.tick(revive_at * 2.0 + 10.0, &on_top, &mut world);
        power.tick(1.0 / 60.0, &on_top, &mut world);
        assert!(world.pickups.is_empty());
        assert_eq!(power.dormant().len(), 1);

        // Player walks away; the next tick revives it
        power.tick(1.0 / 60.0, &far_away(), &mut world);
        assert_eq!(world.pickups, vec![id]);
    }

    #[test]
    fn test_power_stops_draining_at_zero_crossing() {
        let (mut world, id) = world_with_pickup();
        let mut power = ExpiringPower::new(&Tuning::default(), 2);
        power.on_collision(id, &mut world);
        let granted = power.power_time_remaining();

        // Drain past zero: one step may overshoot, then it stops
        power.tick(granted * 2.0 + 1.0, &far_away(), &mut world);
        assert!(!power.has_power());
        let after = power.power_time_remaining();
        power.tick(1.0, &far_away(), &mut world);
        assert_eq!(power.power_time_remaining(), after);
    }

    #[test]
    fn test_decaying_power_policy() {
        let mut tuning = Tuning::default();
        tuning.power.policy = PowerPolicy::GlobalDecay;
        let (mut world, id) = world_with_pickup();
        let mut power = PowerModel::new(&tuning, 0);

        assert!(power.has_power());
        assert_eq!(power.remaining(), 3.0);

        power.tick(10.0, &far_away(), &mut world);
        assert!((power.remaining() - 2.0).abs() < 1e-5);

        let granted = power.on_collision(id, &mut world);
        assert_eq!(granted, 1.0);
        assert!((power.remaining() - 3.0).abs() < 1e-5);
        assert!(world.get(id).is_none(), "collected pickups are destroyed");

        power.tick(31.0, &far_away(), &mut world);
        assert!(!power.has_power());
        assert_eq!(power.remaining_label(), "No Power");
    }

    #[test]
    fn test_non_positive_decay_time_uses_default() {
        let mut tuning = Tuning::default();
        tuning.power.policy = PowerPolicy::GlobalDecay;
        tuning.power.time_per_power_decrease_seconds = 0.0;
        let (mut world, _) = world_with_pickup();
        let mut power = PowerModel::new(&tuning, 0);

        power.tick(10.0, &far_away(), &mut world);
        assert!(power.remaining().is_finite());
        assert!((power.remaining() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_collect_overlapping_only_touches_player_pickups() {
        let tuning = Tuning::default();
        let mut world = World::new();
        let near = world.spawn(EntityKind::Pickup, Rect::new(10.0, 10.0, 10.0, 10.0));
        let far = world.spawn(EntityKind::Pickup, Rect::new(900.0, 10.0, 10.0, 10.0));
        let mut power = PowerModel::new(&tuning, 4);

        let collected = power.collect_overlapping(&Rect::new(0.0, 0.0, 64.0, 64.0), &mut world);
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].0, near);
        assert_eq!(world.pickups, vec![far]);
    }
}
