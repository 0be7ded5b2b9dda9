//! Game state and core simulation types
//!
//! Entities are plain records; the tick and wave modules operate on them.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::wave::{Difficulty, spawn_wave};
use crate::consts::*;
use crate::upgrades::PlayerStats;
use crate::variant::VariantConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, simulation frozen until restart
    GameOver,
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                ARENA_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                ARENA_HEIGHT - PLAYER_HEIGHT - PLAYER_FLOOR_GAP,
            ),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
        }
    }
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Move horizontally by `axis * speed` and clamp to the arena
    pub fn steer(&mut self, axis: f32) {
        self.pos.x += axis.clamp(-1.0, 1.0) * self.speed;
        self.clamp_to_arena();
    }

    pub fn clamp_to_arena(&mut self) {
        self.pos.x = self.pos.x.clamp(0.0, ARENA_WIDTH - self.size.x);
    }
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub owner: Owner,
}

impl Bullet {
    /// Bullet horizontally centred on `center_x` with its top at `top`
    pub fn new(center_x: f32, top: f32, vel: Vec2, owner: Owner) -> Self {
        Self {
            pos: Vec2::new(center_x - BULLET_WIDTH / 2.0, top),
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            vel,
            owner,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Still inside the vertical bounds and not fully off either side
    pub fn in_bounds(&self) -> bool {
        let r = self.rect();
        r.top() > 0.0 && r.top() < ARENA_HEIGHT && r.right() > 0.0 && r.left() < ARENA_WIDTH
    }
}

/// An invader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Wave this enemy marches with
    pub wave_id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Velocity applied on the last tick
    pub vel: Vec2,
    pub fire_cooldown_ms: f64,
    pub last_fire_ms: f64,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Bottom-centre muzzle position
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y)
    }
}

/// Shared marching state of enemies spawned together
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    pub id: u32,
    /// +1 marching right, -1 marching left
    pub direction: f32,
}

/// Things that happened during a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    EnemyDestroyed { points: u64 },
    PlayerHit { lives_left: u32 },
    WaveSpawned { level: u32 },
    WaveDescended { wave_id: u32 },
    GameOver { score: u64, level: u32 },
}

/// Complete game state (deterministic for a seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation clock in milliseconds
    pub time_ms: f64,
    /// Score earned this run
    pub score: u64,
    pub lives: u32,
    pub player: Player,
    /// Player and enemy bullets
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub waves: Vec<Wave>,
    pub difficulty: Difficulty,
    /// Stats derived from purchased upgrades
    pub stats: PlayerStats,
    pub config: VariantConfig,
    pub last_player_fire_ms: Option<f64>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh run: empty field plus the initial 5x3 wave
    pub fn new(seed: u64, config: VariantConfig, stats: PlayerStats) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            time_ms: 0.0,
            score: 0,
            lives: stats.max_lives,
            player: Player::default(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            waves: Vec::new(),
            difficulty: Difficulty::default(),
            stats,
            config,
            last_player_fire_ms: None,
            events: Vec::new(),
            next_id: 1,
        };

        spawn_wave(&mut state);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Swap in new upgrade stats mid-run; extra max lives are granted now
    pub fn apply_stats(&mut self, stats: PlayerStats) {
        if stats.max_lives > self.stats.max_lives {
            self.lives += stats.max_lives - self.stats.max_lives;
        }
        self.stats = stats;
    }

    pub fn bullets_of(&self, owner: Owner) -> impl Iterator<Item = &Bullet> {
        self.bullets.iter().filter(move |b| b.owner == owner)
    }

    /// Move into GameOver (idempotent)
    pub fn end_game(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            score: self.score,
            level: self.difficulty.level,
        });
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
