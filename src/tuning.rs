//! Game balance and tunables
//!
//! Built once at startup and handed by reference to every component. Loaded from
//! JSON; any field missing from the file keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Which control scheme / physics back-end drives the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MotionProfile {
    /// Forces and impulses on a body with mass and friction (seconds based)
    #[default]
    Force,
    /// Velocity set directly from input, integrated once per frame
    Direct,
}

impl MotionProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            MotionProfile::Force => "force",
            MotionProfile::Direct => "direct",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "force" => Some(MotionProfile::Force),
            "direct" | "simple" => Some(MotionProfile::Direct),
            _ => None,
        }
    }
}

/// How the power resource behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PowerPolicy {
    /// Pickups add random duration and respawn after a random dormant period
    #[default]
    Expiring,
    /// One scalar that drains steadily; pickups add one unit and never return
    GlobalDecay,
}

/// Window and tile geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub width: f32,
    pub height: f32,
    pub tile_width: f32,
    pub tile_height: f32,
    pub viewport_margin: f32,
    pub start_y_lift: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
            viewport_margin: VIEWPORT_MARGIN,
            start_y_lift: START_Y_LIFT,
        }
    }
}

/// Constants for the force-based back-end
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceTuning {
    pub gravity: f32,
    pub damping: f32,
    pub player_mass: f32,
    pub player_friction: f32,
    pub wall_friction: f32,
    pub move_force_on_ground: f32,
    pub move_force_in_air: f32,
    pub jump_impulse: f32,
    pub boosted_jump_impulse: f32,
    pub max_horizontal_speed: f32,
    pub max_vertical_speed: f32,
}

impl Default for ForceTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            damping: DEFAULT_DAMPING,
            player_mass: PLAYER_MASS,
            player_friction: PLAYER_FRICTION,
            wall_friction: WALL_FRICTION,
            move_force_on_ground: PLAYER_MOVE_FORCE_ON_GROUND,
            move_force_in_air: PLAYER_MOVE_FORCE_IN_AIR,
            jump_impulse: PLAYER_JUMP_IMPULSE,
            boosted_jump_impulse: BOOSTED_PLAYER_JUMP_IMPULSE,
            max_horizontal_speed: PLAYER_MAX_HORIZONTAL_SPEED,
            max_vertical_speed: PLAYER_MAX_VERTICAL_SPEED,
        }
    }
}

/// Constants for the simple per-frame back-end
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectTuning {
    pub gravity: f32,
    pub movement_speed: f32,
    pub jump_speed: f32,
    pub boosted_jump_speed: f32,
}

impl Default for DirectTuning {
    fn default() -> Self {
        Self {
            gravity: DIRECT_GRAVITY,
            movement_speed: PLAYER_MOVEMENT_SPEED,
            jump_speed: PLAYER_JUMP_SPEED,
            boosted_jump_speed: BOOSTED_PLAYER_JUMP_SPEED,
        }
    }
}

/// Physics profile selection plus both profiles' constants.
///
/// The two profiles are tuned independently; never mix their numbers.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PhysicsTuning {
    pub profile: MotionProfile,
    pub force: ForceTuning,
    pub direct: DirectTuning,
}

impl PhysicsTuning {
    /// (base, boosted) jump magnitude for the active profile
    pub fn jump_magnitudes(&self) -> (f32, f32) {
        match self.profile {
            MotionProfile::Force => (self.force.jump_impulse, self.force.boosted_jump_impulse),
            MotionProfile::Direct => (self.direct.jump_speed, self.direct.boosted_jump_speed),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerTuning {
    pub policy: PowerPolicy,
    /// (low, high) seconds of power granted per pickup
    pub power_duration: (f32, f32),
    /// (low, high) seconds a collected pickup stays dormant
    pub dormant_duration: (f32, f32),
    /// Global-decay policy only
    pub initial_power: f32,
    pub time_per_power_decrease_seconds: f32,
}

impl Default for PowerTuning {
    fn default() -> Self {
        Self {
            policy: PowerPolicy::Expiring,
            power_duration: POWER_DURATION_RANGE,
            dormant_duration: DORMANT_DURATION_RANGE,
            initial_power: INITIAL_POWER,
            time_per_power_decrease_seconds: TIME_PER_POWER_DECREASE_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformTuning {
    /// Seconds between spawns at each rising-platform marker
    pub spawn_interval: f32,
    /// Upward displacement per frame
    pub rise_speed: f32,
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self {
            spawn_interval: PLATFORM_SPAWN_INTERVAL,
            rise_speed: PLATFORM_RISE_SPEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    pub max_level: u32,
    pub start_level: u32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            max_level: MAX_LEVEL,
            start_level: START_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    pub animation_frames: u32,
    pub distance_before_change_texture: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            animation_frames: PLAYER_ANIMATION_FRAMES,
            distance_before_change_texture: DISTANCE_BEFORE_CHANGE_TEXTURE,
        }
    }
}

/// Complete game tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub physics: PhysicsTuning,
    pub power: PowerTuning,
    pub platforms: PlatformTuning,
    pub levels: LevelTuning,
    pub player: PlayerTuning,
    /// Multiplier applied to the host frame interval for power and screen clocks
    pub time_scale: f32,
    /// Seconds the "not enough power" message stays visible
    pub not_enough_power_seconds: f32,
    /// Seed for the pickup generators
    pub seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world: WorldTuning::default(),
            physics: PhysicsTuning::default(),
            power: PowerTuning::default(),
            platforms: PlatformTuning::default(),
            levels: LevelTuning::default(),
            player: PlayerTuning::default(),
            time_scale: TIME_SCALE,
            not_enough_power_seconds: NOT_ENOUGH_POWER_SECONDS,
            seed: DEFAULT_SEED,
        }
    }
}

impl Tuning {
    /// Default tuning with a different physics profile
    pub fn with_profile(profile: MotionProfile) -> Self {
        let mut tuning = Self::default();
        tuning.physics.profile = profile;
        tuning
    }

    /// Parse tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field: &'static str, reason: &str| {
            Err(TuningError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };

        if self.levels.start_level == 0 || self.levels.start_level > self.levels.max_level {
            return invalid("levels.start_level", "must be within 1..=max_level");
        }
        if self.world.width <= 2.0 * self.world.viewport_margin
            || self.world.height <= 2.0 * self.world.viewport_margin
        {
            return invalid("world.viewport_margin", "margins leave no room on screen");
        }
        if self.physics.force.player_mass <= 0.0 {
            return invalid("physics.force.player_mass", "must be positive");
        }
        let (low, high) = self.power.power_duration;
        if low >= high {
            return invalid("power.power_duration", "low must be below high");
        }
        let (low, high) = self.power.dormant_duration;
        if low >= high {
            return invalid("power.dormant_duration", "low must be below high");
        }
        if self.platforms.spawn_interval <= 0.0 {
            return invalid("platforms.spawn_interval", "must be positive");
        }
        let decay = self.power.time_per_power_decrease_seconds;
        if decay.is_nan() || decay <= 0.0 {
            return invalid("power.time_per_power_decrease_seconds", "must be positive");
        }
        if self.player.animation_frames == 0 {
            return invalid("player.animation_frames", "must be at least 1");
        }
        Ok(())
    }
}
