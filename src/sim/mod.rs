//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{Rect, aabb_overlap};
pub use state::{Bullet, Enemy, GameEvent, GamePhase, GameState, Owner, Player, Wave};
pub use tick::{TickInput, fire_player, tick};
pub use wave::{Difficulty, march_waves, spawn_wave, update_spawner};
