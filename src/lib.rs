//! Canvas Invaders - A Space-Invaders-style arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, waves, collisions, game state)
//! - `upgrades`: Shop items, costs and derived player stats
//! - `persistence`: Save data (score bank + upgrades) with tolerant loading
//! - `platform`: Storage backends and asset loading
//! - `renderer`: Draw list and Canvas 2D backend
//! - `session`: Fixed timestep scheduler and Playing/GameOver state machine

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod ui;
pub mod upgrades;
pub mod variant;

pub use error::{ShopError, StorageError};
pub use highscores::HighScores;
pub use persistence::SaveData;
pub use session::Session;
pub use settings::Settings;
pub use upgrades::{PlayerStats, ShopItem, Upgrades};
pub use variant::{VariantConfig, VariantKind};

/// Game configuration constants
pub mod consts {
    /// Nominal simulation step (60 Hz, velocities are expressed per step)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap fed into the accumulator (tab switches etc.)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Gap between the player's bottom edge and the arena floor
    pub const PLAYER_FLOOR_GAP: f32 = 10.0;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 15.0;
    pub const PLAYER_BULLET_SPEED: f32 = 7.0;
    pub const ENEMY_BULLET_SPEED: f32 = 3.0;
    /// Horizontal speed of sideways shots
    pub const SIDE_SHOT_DRIFT: f32 = 3.0;

    /// Enemies
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 30.0;
    pub const ENEMY_DESCENT: f32 = 15.0;
    pub const ENEMY_FIRE_MIN_MS: f64 = 1000.0;
    pub const ENEMY_FIRE_MAX_MS: f64 = 3000.0;

    /// Wave layout
    pub const WAVE_START_X: f32 = 50.0;
    pub const WAVE_START_Y: f32 = 50.0;
    pub const WAVE_SPACING: f32 = 60.0;
    pub const WAVE_ROWS: u32 = 3;

    /// Difficulty ramp
    pub const INITIAL_ENEMY_SPEED: f32 = 1.0;
    pub const ENEMY_SPEED_STEP: f32 = 0.1;
    pub const INITIAL_ENEMIES_PER_ROW: u32 = 5;
    pub const MAX_ENEMIES_PER_ROW: u32 = 10;
    /// Levels between enemies-per-row increases
    pub const ROW_GROWTH_EVERY: u32 = 5;
    pub const INITIAL_SPAWN_INTERVAL_MS: f64 = 3000.0;
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 50.0;
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 1000.0;

    /// Player fire rate
    pub const BASE_FIRE_COOLDOWN_MS: f64 = 300.0;
    pub const FIRE_COOLDOWN_STEP_MS: f64 = 50.0;
    pub const MIN_FIRE_COOLDOWN_MS: f64 = 50.0;

    /// Shop
    pub const DOUBLE_SHOT_COST: u64 = 500;
    pub const FIRE_RATE_BASE_COST: u64 = 200;
    pub const MAX_FIRE_RATE_LEVEL: u8 = 5;
    pub const EXTRA_LIFE_BASE_COST: u64 = 300;
    pub const MAX_LIVES_LEVEL: u8 = 3;
    pub const BULLET_SPEED_BASE_COST: u64 = 150;
    pub const MAX_BULLET_SPEED_LEVEL: u8 = 5;
    pub const BULLET_SPEED_STEP: f32 = 1.0;
    pub const SIDE_SHOT_COST: u64 = 750;
}
