//! Level session state machine
//!
//! Owns everything that lives for one level and drives it one frame at a time:
//!
//! ```text
//! Loading -> Active -> Dead            (retry: setup() again)
//!                   -> Won -> Active   (next level, loaded in place)
//!                   -> Terminal        (last level done)
//! ```
//!
//! Transitions never fail. Only `setup()`, which loads a level, returns errors.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::{CameraUpdate, ScrollCamera};
use super::collision::overlaps_any;
use super::geom::Rect;
use super::jump::{compute_jump_magnitude, springboard_zone};
use super::motion::PlayerMotionController;
use super::physics::{PhysicsBackend, backend_for};
use super::player::Player;
use super::power::PowerModel;
use super::spawner::{MovingPlatformSpawner, PlatformSpawner};
use super::world::{EntityId, EntityKind, World};
use crate::error::LevelError;
use crate::hud::{Hud, PICKUP_FLASH_SECONDS};
use crate::input::{Intent, Key, intent_for};
use crate::level::{LevelLayout, LevelSource};
use crate::render::{DrawLayer, SceneSink};
use crate::tuning::Tuning;

/// Distance below the player's height at which falling counts as death
const FALL_DEATH_DEPTH: f32 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No playable level yet (before the first setup or after a failed one)
    Loading,
    Active,
    Dead,
    /// Passed through while the next level loads
    Won,
    /// Every level completed
    Terminal,
}

/// Things the session reports to whoever hosts it
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    LevelLoaded { level: u32 },
    LoadFailed { level: u32, message: String },
    ViewportChanged(CameraUpdate),
    PickupCollected { pickup: EntityId, granted: f32 },
    /// Reached the end flag without power
    NotEnoughPower,
    LevelCompleted { level: u32 },
    Died { level: u32 },
    GameWon,
}

pub struct LevelSession {
    tuning: Tuning,
    source: Box<dyn LevelSource>,
    physics: Box<dyn PhysicsBackend>,
    level: u32,
    phase: SessionPhase,
    inactive: bool,
    world: World,
    /// Springboard zones, fixed after load
    zones: Vec<Rect>,
    player: Player,
    camera: ScrollCamera,
    power: PowerModel,
    spawner: MovingPlatformSpawner,
    motion: PlayerMotionController,
    hud: Hud,
    events: Vec<SessionEvent>,
}

impl LevelSession {
    /// Create a session at the start level. Nothing is loaded until `setup()`.
    pub fn new(tuning: &Tuning, source: Box<dyn LevelSource>) -> Self {
        let power = PowerModel::new(tuning, tuning.seed);
        let hud = Hud::new(tuning, &power.remaining_label());
        Self {
            tuning: tuning.clone(),
            source,
            physics: backend_for(tuning),
            level: tuning.levels.start_level,
            phase: SessionPhase::Loading,
            inactive: true,
            world: World::new(),
            zones: Vec::new(),
            player: Player::new(Vec2::ZERO, tuning),
            camera: ScrollCamera::new(&tuning.world),
            power,
            spawner: MovingPlatformSpawner::new(&tuning.platforms),
            motion: PlayerMotionController::new(),
            hud,
            events: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Choose the level the next `setup()` loads
    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_inactive(&self) -> bool {
        self.inactive
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn zones(&self) -> &[Rect] {
        &self.zones
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn camera(&self) -> &ScrollCamera {
        &self.camera
    }

    pub fn power(&self) -> &PowerModel {
        &self.power
    }

    pub fn spawner(&self) -> &MovingPlatformSpawner {
        &self.spawner
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn motion(&self) -> &PlayerMotionController {
        &self.motion
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether the physics back-end reports the player standing on something
    pub fn is_grounded(&self) -> bool {
        self.physics.is_on_ground(&self.player.body, &self.world.solids())
    }

    /// Load the current level and reset all per-level state
    pub fn setup(&mut self) -> Result<(), LevelError> {
        self.phase = SessionPhase::Loading;
        self.inactive = true;

        let resource = self.source.resource_name(self.level);
        let map = self.source.load(self.level)?;
        let layout = LevelLayout::from_map(&map, &resource)?;

        let tuning = &self.tuning;
        let mut world = World::new();
        let mut zones = Vec::with_capacity(layout.springboards.len());
        for &wall in &layout.walls {
            world.spawn(EntityKind::Wall, wall);
        }
        for &tile in &layout.springboards {
            world.spawn(EntityKind::Springboard, tile);
            zones.push(springboard_zone(
                &tile,
                tuning.world.tile_width,
                tuning.world.tile_height,
            ));
        }
        world.spawn(EntityKind::StartMarker, layout.start_marker);
        for &pickup in &layout.pickups {
            world.spawn(EntityKind::Pickup, pickup);
        }
        for &hazard in &layout.hazards {
            world.spawn(EntityKind::Hazard, hazard);
        }
        for &flag in &layout.win_markers {
            world.spawn(EntityKind::WinMarker, flag);
        }

        let mut spawner = MovingPlatformSpawner::new(&tuning.platforms);
        for rising in &layout.rising {
            spawner.add_spawner(PlatformSpawner::new(
                rising.rect(),
                rising.boundary(),
                tuning.platforms.spawn_interval,
            ));
        }

        // Start past the marker's right edge, lifted so the player drops into place
        let marker = layout.start_marker;
        let start = Vec2::new(
            marker.center_x() + tuning.world.tile_height / 2.0,
            tuning.world.start_y_lift + marker.center_y() - tuning.world.tile_width / 2.0,
        );
        let center = Vec2::new(
            start.x + tuning.player.height / 2.0,
            start.y + tuning.player.width / 2.0,
        );
        let player = Player::new(center, tuning);

        let mut camera = ScrollCamera::new(&tuning.world);
        camera.snap_to(&player.rect());

        let seed = tuning.seed.wrapping_add(u64::from(self.level));
        let power = PowerModel::new(tuning, seed);
        let hud = Hud::new(tuning, &power.remaining_label());

        self.world = world;
        self.zones = zones;
        self.spawner = spawner;
        self.player = player;
        self.camera = camera;
        self.power = power;
        self.hud = hud;
        self.motion = PlayerMotionController::new();
        self.physics = backend_for(&self.tuning);

        self.inactive = false;
        self.phase = SessionPhase::Active;
        self.events.push(SessionEvent::LevelLoaded { level: self.level });
        log::info!(
            "Level {} loaded from {} ({} entities, {} springboards, {} rising spawners)",
            self.level,
            resource,
            self.world.live_count(),
            self.zones.len(),
            self.spawner.spawners().len()
        );
        Ok(())
    }

    /// Advance one frame
    pub fn update(&mut self, delta_time: f32) {
        if self.inactive {
            return;
        }

        self.hud.update(delta_time);

        let viewport = self.camera.viewport();
        self.spawner
            .tick(delta_time, &viewport, &mut self.world, self.physics.as_ref());

        let player_rect = self.player.rect();
        self.power.tick(delta_time, &player_rect, &mut self.world);
        self.hud.power.set_value(&self.power.remaining_label());

        let solids = self.world.solids();
        let grounded = self.physics.is_on_ground(&self.player.body, &solids);
        self.player.update_animation(grounded);

        if self.should_die() {
            self.death();
            return;
        }

        let camera = self.camera.update(&self.player.rect());
        if camera.changed && !self.inactive {
            self.events.push(SessionEvent::ViewportChanged(camera));
        }

        self.motion.apply(
            &mut self.player.body,
            grounded,
            self.physics.as_ref(),
            &self.tuning.physics,
        );
        self.physics.step(&mut self.player.body, &solids, delta_time);

        let player_rect = self.player.rect();
        let collected = self.power.collect_overlapping(&player_rect, &mut self.world);
        if !collected.is_empty() {
            self.hud.power.set_value(&self.power.remaining_label());
            self.hud.power.flash(PICKUP_FLASH_SECONDS);
        }
        for (pickup, granted) in collected {
            self.events.push(SessionEvent::PickupCollected { pickup, granted });
        }

        if overlaps_any(&self.world, &player_rect, &self.world.win_markers) {
            self.win();
        }
    }

    pub fn key_press(&mut self, key: Key) {
        if self.inactive {
            return;
        }
        let Some(intent) = intent_for(key) else {
            return;
        };
        match intent {
            Intent::Jump => self.try_jump(),
            Intent::MoveLeft | Intent::MoveRight => {
                self.motion
                    .press(intent, &mut self.player.body, &self.tuning.physics)
            }
        }
    }

    pub fn key_release(&mut self, key: Key) {
        if let Some(intent) = intent_for(key) {
            self.motion
                .release(intent, &mut self.player.body, &self.tuning.physics);
        }
    }

    /// Draw the level back to front
    pub fn render(&self, sink: &mut dyn SceneSink) {
        let view_left = self.camera.view_left();
        let view_bottom = self.camera.view_bottom();
        sink.begin_frame(view_left, view_bottom);

        let batches = [
            (DrawLayer::Platforms, &self.world.platforms),
            (DrawLayer::Walls, &self.world.walls),
            (DrawLayer::Pickups, &self.world.pickups),
            (DrawLayer::Hazards, &self.world.hazards),
            (DrawLayer::WinMarkers, &self.world.win_markers),
        ];
        for (layer, set) in batches {
            let rects: Vec<Rect> = self.world.rects(set).collect();
            sink.draw_rects(layer, &rects);
        }

        sink.draw_player(
            &self.player.rect(),
            self.player.facing,
            &self.player.animation.frame,
        );

        for item in self.hud.items(view_left, view_bottom) {
            sink.draw_text(&item);
        }
        sink.end_frame();
    }

    fn try_jump(&mut self) {
        let solids = self.world.solids();
        if !self.physics.is_on_ground(&self.player.body, &solids) {
            return;
        }
        let (base, boosted) = self.tuning.physics.jump_magnitudes();
        let magnitude = compute_jump_magnitude(self.player.center(), &self.zones, base, boosted);
        log::debug!("jump with magnitude {magnitude}");
        self.motion
            .jump(&mut self.player.body, magnitude, self.physics.as_ref());
    }

    fn should_die(&self) -> bool {
        let center = self.player.center();
        overlaps_any(&self.world, &self.player.rect(), &self.world.hazards)
            || center.y < self.tuning.player.height - FALL_DEATH_DEPTH
            || center.x <= self.tuning.player.width / 2.0
    }

    fn death(&mut self) {
        self.inactive = true;
        self.phase = SessionPhase::Dead;
        self.events.push(SessionEvent::Died { level: self.level });
        log::info!("Player died on level {}", self.level);
    }

    fn win(&mut self) {
        if !self.power.has_power() {
            if !self.hud.not_enough_power.is_visible() {
                self.events.push(SessionEvent::NotEnoughPower);
            }
            self.hud.not_enough_power.show("");
            return;
        }

        let completed = self.level;
        self.phase = SessionPhase::Won;
        self.events.push(SessionEvent::LevelCompleted { level: completed });
        log::info!("Level {completed} completed");

        self.level += 1;
        if self.level > self.tuning.levels.max_level {
            self.inactive = true;
            self.phase = SessionPhase::Terminal;
            self.level = self.tuning.levels.start_level;
            self.events.push(SessionEvent::GameWon);
            log::info!("All {} levels completed", self.tuning.levels.max_level);
            return;
        }

        if let Err(err) = self.setup() {
            log::error!("Failed to load level {}: {err}", self.level);
            self.events.push(SessionEvent::LoadFailed {
                level: self.level,
                message: err.to_string(),
            });
        }
    }
}
