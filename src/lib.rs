//! Ice Game - a tile-based side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic gameplay simulation (movement, camera, power, level flow)
//! - `level`: Level layers and the sources that provide them
//! - `tuning`: Data-driven game balance
//! - `hud`: Text labels drawn over the level
//! - `flow`: Screens around the gameplay (instructions, game over, victory)
//! - `render`: Draw-order boundary consumed by a renderer

pub mod error;
pub mod flow;
pub mod hud;
pub mod input;
pub mod level;
pub mod render;
pub mod sim;
pub mod tuning;

pub use error::{LevelError, TuningError};
pub use flow::{Game, Screen};
pub use tuning::Tuning;

/// Default gameplay constants
///
/// These are the values `Tuning::default()` is built from. Gameplay code never
/// reads them directly; it receives a `Tuning` instead.
pub mod consts {
    /// Window size in pixels
    pub const WIDTH: f32 = 10.0 * TILE_WIDTH;
    pub const HEIGHT: f32 = 6.0 * TILE_HEIGHT;

    /// Tile size in pixels (maps are scaled by 0.5 at load)
    pub const TILE_WIDTH: f32 = 128.0;
    pub const TILE_HEIGHT: f32 = TILE_WIDTH;

    /// Distance the player may get from the window edge before it scrolls
    pub const VIEWPORT_MARGIN: f32 = 280.0;

    /// Extra height added to the start marker so the player drops onto it
    pub const START_Y_LIFT: f32 = 100.0;

    /// Player sprite size
    pub const PLAYER_WIDTH: f32 = 64.0;
    pub const PLAYER_HEIGHT: f32 = 64.0;

    /// Force-based engine (pixels, seconds)
    pub const GRAVITY: f32 = 1500.0;
    pub const DEFAULT_DAMPING: f32 = 1.0;
    pub const PLAYER_FRICTION: f32 = 1.0;
    pub const WALL_FRICTION: f32 = 0.7;
    pub const PLAYER_MASS: f32 = 2.0;
    pub const PLAYER_MAX_HORIZONTAL_SPEED: f32 = 450.0;
    pub const PLAYER_MAX_VERTICAL_SPEED: f32 = 1600.0;
    pub const PLAYER_MOVE_FORCE_ON_GROUND: f32 = 8000.0;
    pub const PLAYER_MOVE_FORCE_IN_AIR: f32 = 900.0;
    pub const PLAYER_JUMP_IMPULSE: f32 = 1800.0;
    pub const BOOSTED_PLAYER_JUMP_IMPULSE: f32 = 2700.0;

    /// Simple platformer engine (pixels per frame)
    pub const DIRECT_GRAVITY: f32 = 0.7;
    pub const PLAYER_MOVEMENT_SPEED: f32 = 4.0;
    pub const PLAYER_JUMP_SPEED: f32 = 12.0;
    pub const BOOSTED_PLAYER_JUMP_SPEED: f32 = 18.0;

    /// Level progression
    pub const MAX_LEVEL: u32 = 3;
    pub const START_LEVEL: u32 = 1;

    /// Power duration granted per pickup (seconds, self-correcting range)
    pub const POWER_DURATION_RANGE: (f32, f32) = (8.0, 36.0);
    /// Time a collected pickup stays dormant before it respawns
    pub const DORMANT_DURATION_RANGE: (f32, f32) = (15.0, 40.0);
    /// Global-decay policy: starting power and seconds per unit lost
    pub const INITIAL_POWER: f32 = 3.0;
    pub const TIME_PER_POWER_DECREASE_SECONDS: f32 = 10.0;

    /// Host frame interval appears to run at double real time
    pub const TIME_SCALE: f32 = 0.5;

    /// Rising platforms
    pub const PLATFORM_SPAWN_INTERVAL: f32 = 3.0;
    pub const PLATFORM_RISE_SPEED: f32 = 3.0;

    /// Player walk animation
    pub const PLAYER_ANIMATION_FRAMES: u32 = 3;
    pub const DISTANCE_BEFORE_CHANGE_TEXTURE: f32 = 20.0;

    /// Seconds the "not enough power" message stays on screen
    pub const NOT_ENOUGH_POWER_SECONDS: f32 = 3.0;

    /// Default RNG seed for pickup generators
    pub const DEFAULT_SEED: u64 = 0x1CE_6A3E;
}
