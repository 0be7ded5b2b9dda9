//! Simulation tick
//!
//! One call advances the game by one step: input, movement, enemy fire,
//! collision resolution, then the wave timer.

use glam::Vec2;
use rand::Rng;

use super::state::{Bullet, GameEvent, GamePhase, GameState, Owner};
use super::wave::{march_waves, update_spawner};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left arrow held
    pub left: bool,
    /// Right arrow held
    pub right: bool,
    /// Fire pressed (one-shot, cleared by the caller after the tick)
    pub fire: bool,
}

impl TickInput {
    /// Horizontal steering: -1, 0 or +1
    pub fn axis(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Advance the game state by one step of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ms += dt_ms;

    // Player
    state.player.steer(input.axis());
    if input.fire {
        fire_player(state);
    }

    // Bullets
    for bullet in state.bullets.iter_mut() {
        bullet.advance();
    }
    state.bullets.retain(Bullet::in_bounds);

    // Enemies
    march_waves(state);
    fire_enemies(state);

    resolve_collisions(state);

    if state.phase == GamePhase::Playing {
        update_spawner(state);
    }
}

/// Fire the player's weapon if the cooldown has elapsed.
///
/// Returns the number of bullets spawned.
pub fn fire_player(state: &mut GameState) -> usize {
    let now = state.time_ms;
    if let Some(last) = state.last_player_fire_ms {
        if now - last <= state.stats.fire_cooldown_ms {
            return 0;
        }
    }

    let player = state.player.rect();
    let speed = state.stats.bullet_speed;
    let up = Vec2::new(0.0, -speed);
    let before = state.bullets.len();

    if state.stats.double_shot {
        let w = player.size.x;
        for x in [player.left() + w / 4.0, player.left() + w * 3.0 / 4.0] {
            state
                .bullets
                .push(Bullet::new(x, player.top(), up, Owner::Player));
        }
    } else {
        state
            .bullets
            .push(Bullet::new(player.center().x, player.top(), up, Owner::Player));
    }

    if state.stats.side_shot {
        let cx = player.center().x;
        for drift in [-SIDE_SHOT_DRIFT, SIDE_SHOT_DRIFT] {
            let vel = Vec2::new(drift, -speed);
            state
                .bullets
                .push(Bullet::new(cx, player.top(), vel, Owner::Player));
        }
    }

    state.last_player_fire_ms = Some(now);
    state.bullets.len() - before
}

/// Every enemy whose cooldown elapsed drops a bullet and rolls a new cooldown
fn fire_enemies(state: &mut GameState) {
    let now = state.time_ms;
    let down = Vec2::new(0.0, ENEMY_BULLET_SPEED);

    for enemy in state.enemies.iter_mut() {
        if now - enemy.last_fire_ms > enemy.fire_cooldown_ms {
            let muzzle = enemy.muzzle();
            state.bullets.push(Bullet::new(muzzle.x, muzzle.y, down, Owner::Enemy));
            enemy.last_fire_ms = now;
            enemy.fire_cooldown_ms = state.rng.random_range(ENEMY_FIRE_MIN_MS..ENEMY_FIRE_MAX_MS);
        }
    }
}

/// Resolve collisions in priority order:
/// player bullets vs enemies, enemy bullets vs player, enemies vs player,
/// enemies reaching the floor.
fn resolve_collisions(state: &mut GameState) {
    // Player bullets vs enemies: each bullet takes out at most one enemy
    let mut kills = 0u64;
    let enemies = &mut state.enemies;
    state.bullets.retain(|bullet| {
        if bullet.owner != Owner::Player {
            return true;
        }
        let rect = bullet.rect();
        match enemies.iter().position(|e| e.rect().overlaps(&rect)) {
            Some(index) => {
                enemies.remove(index);
                kills += 1;
                false
            }
            None => true,
        }
    });
    let points = state.config.points_per_kill;
    for _ in 0..kills {
        state.score += points;
        state.events.push(GameEvent::EnemyDestroyed { points });
    }

    // Enemy bullets vs player
    let player = state.player.rect();
    let mut hits = 0u32;
    state.bullets.retain(|bullet| {
        let hit = bullet.owner == Owner::Enemy && bullet.rect().overlaps(&player);
        if hit {
            hits += 1;
        }
        !hit
    });
    for _ in 0..hits {
        if state.phase == GamePhase::GameOver {
            break;
        }
        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::PlayerHit {
            lives_left: state.lives,
        });
        if state.lives == 0 {
            state.end_game();
        }
    }

    // Enemies vs player, enemies reaching the floor
    let rammed = state.enemies.iter().any(|e| e.rect().overlaps(&player));
    let landed = state.enemies.iter().any(|e| e.rect().bottom() > ARENA_HEIGHT);
    if rammed || landed {
        state.end_game();
    }
}
