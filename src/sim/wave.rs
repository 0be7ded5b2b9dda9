//! Enemy waves and the difficulty ramp
//!
//! Waves march as a block: when any member crosses a side of the arena the
//! whole wave reverses and drops by [`ENEMY_DESCENT`]. A timer spawns a new
//! wave every `spawn_interval_ms`, each one a little faster than the last.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, GameEvent, GameState, Wave};
use crate::consts::*;

/// Linear difficulty curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Number of timed waves spawned so far
    pub level: u32,
    /// Horizontal enemy speed (px per tick)
    pub enemy_speed: f32,
    pub enemies_per_row: u32,
    pub rows: u32,
    pub spawn_interval_ms: f64,
    pub last_spawn_ms: f64,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            level: 0,
            enemy_speed: INITIAL_ENEMY_SPEED,
            enemies_per_row: INITIAL_ENEMIES_PER_ROW,
            rows: WAVE_ROWS,
            spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            last_spawn_ms: 0.0,
        }
    }
}

impl Difficulty {
    /// Step to the next level
    pub fn level_up(&mut self) {
        self.level += 1;
        self.enemy_speed = INITIAL_ENEMY_SPEED * (1.0 + self.level as f32 * ENEMY_SPEED_STEP);
        if self.level % ROW_GROWTH_EVERY == 0 {
            self.enemies_per_row = (self.enemies_per_row + 1).min(MAX_ENEMIES_PER_ROW);
        }
        self.spawn_interval_ms =
            (self.spawn_interval_ms - SPAWN_INTERVAL_STEP_MS).max(MIN_SPAWN_INTERVAL_MS);
    }

    /// Whether the spawn timer has elapsed at `now_ms`
    pub fn spawn_due(&self, now_ms: f64) -> bool {
        now_ms - self.last_spawn_ms > self.spawn_interval_ms
    }
}

/// Spawn a grid of `rows x enemies_per_row` enemies as one new wave
pub fn spawn_wave(state: &mut GameState) {
    let wave_id = state.next_entity_id();
    state.waves.push(Wave {
        id: wave_id,
        direction: 1.0,
    });

    let rows = state.difficulty.rows;
    let per_row = state.difficulty.enemies_per_row;
    for row in 0..rows {
        for col in 0..per_row {
            let id = state.next_entity_id();
            let fire_cooldown_ms = state.rng.random_range(ENEMY_FIRE_MIN_MS..ENEMY_FIRE_MAX_MS);
            state.enemies.push(Enemy {
                id,
                wave_id,
                pos: Vec2::new(
                    WAVE_START_X + col as f32 * WAVE_SPACING,
                    WAVE_START_Y + row as f32 * WAVE_SPACING,
                ),
                size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
                vel: Vec2::ZERO,
                fire_cooldown_ms,
                last_fire_ms: state.time_ms,
            });
        }
    }

    log::debug!(
        "Spawned wave {} ({}x{}) at {:.0}ms",
        wave_id,
        per_row,
        rows,
        state.time_ms
    );
}

/// Advance every wave one step, reversing and descending on wall contact
pub fn march_waves(state: &mut GameState) {
    let speed = state.difficulty.enemy_speed;

    for wave in state.waves.iter_mut() {
        let step = speed * wave.direction;
        let mut min_left = f32::INFINITY;
        let mut max_right = f32::NEG_INFINITY;

        for enemy in state.enemies.iter_mut().filter(|e| e.wave_id == wave.id) {
            enemy.pos.x += step;
            enemy.vel = Vec2::new(step, 0.0);
            min_left = min_left.min(enemy.pos.x);
            max_right = max_right.max(enemy.pos.x + enemy.size.x);
        }

        let correction = if min_left < 0.0 {
            -min_left
        } else if max_right > ARENA_WIDTH {
            ARENA_WIDTH - max_right
        } else {
            continue;
        };

        wave.direction = -wave.direction;
        for enemy in state.enemies.iter_mut().filter(|e| e.wave_id == wave.id) {
            enemy.pos.x += correction;
            enemy.pos.y += ENEMY_DESCENT;
            enemy.vel = Vec2::new(step + correction, ENEMY_DESCENT);
        }
        state.events.push(GameEvent::WaveDescended { wave_id: wave.id });
    }

    state
        .waves
        .retain(|w| state.enemies.iter().any(|e| e.wave_id == w.id));
}

/// Spawn the next wave and ramp difficulty when the timer has elapsed
pub fn update_spawner(state: &mut GameState) -> bool {
    if !state.difficulty.spawn_due(state.time_ms) {
        return false;
    }

    spawn_wave(state);
    state.difficulty.last_spawn_ms = state.time_ms;
    state.difficulty.level_up();
    state.events.push(GameEvent::WaveSpawned {
        level: state.difficulty.level,
    });
    log::debug!(
        "Level {}: speed {:.2}, {} per row, next wave in {:.0}ms",
        state.difficulty.level,
        state.difficulty.enemy_speed,
        state.difficulty.enemies_per_row,
        state.difficulty.spawn_interval_ms
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upgrades::PlayerStats;
    use crate::variant::VariantKind;

    fn new_state() -> GameState {
        GameState::new(42, VariantKind::Classic.config(), PlayerStats::default())
    }

    #[test]
    fn test_initial_grid_layout() {
        let state = new_state();
        let first = &state.enemies[0];
        assert_eq!(first.pos, Vec2::new(50.0, 50.0));
        let last = state.enemies.last().unwrap();
        assert_eq!(last.pos, Vec2::new(50.0 + 4.0 * 60.0, 50.0 + 2.0 * 60.0));
        for enemy in &state.enemies {
            assert!(enemy.fire_cooldown_ms >= ENEMY_FIRE_MIN_MS);
            assert!(enemy.fire_cooldown_ms < ENEMY_FIRE_MAX_MS);
        }
    }

    #[test]
    fn test_wave_marches_without_flip_in_open_space() {
        let mut state = new_state();
        let before: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();
        march_waves(&mut state);
        for (enemy, old) in state.enemies.iter().zip(before) {
            assert_eq!(enemy.pos, old + Vec2::new(1.0, 0.0));
        }
        assert_eq!(state.waves[0].direction, 1.0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_wave_flips_and_descends_when_any_member_crosses() {
        let mut state = new_state();
        // Push only the rightmost column to the wall
        let right_id = state.enemies[4].id;
        for enemy in state.enemies.iter_mut() {
            if enemy.id == right_id {
                enemy.pos.x = ARENA_WIDTH - ENEMY_WIDTH - 0.5;
            }
        }
        let before_y: Vec<f32> = state.enemies.iter().map(|e| e.pos.y).collect();

        march_waves(&mut state);

        assert_eq!(state.waves[0].direction, -1.0);
        for (enemy, y) in state.enemies.iter().zip(before_y) {
            assert_eq!(enemy.pos.y, y + ENEMY_DESCENT);
            assert!(enemy.pos.x + enemy.size.x <= ARENA_WIDTH);
        }
        assert_eq!(
            state.events,
            vec![GameEvent::WaveDescended {
                wave_id: state.waves[0].id
            }]
        );
    }

    #[test]
    fn test_left_wall_flip() {
        let mut state = new_state();
        state.waves[0].direction = -1.0;
        let offset = state.enemies[0].pos.x - 0.5;
        for enemy in state.enemies.iter_mut() {
            enemy.pos.x -= offset;
        }

        march_waves(&mut state);

        assert_eq!(state.waves[0].direction, 1.0);
        let min_x = state
            .enemies
            .iter()
            .map(|e| e.pos.x)
            .fold(f32::INFINITY, f32::min);
        assert_eq!(min_x, 0.0);
    }

    #[test]
    fn test_waves_are_independent() {
        let mut state = new_state();
        state.time_ms = 5000.0;
        assert!(update_spawner(&mut state));
        assert_eq!(state.waves.len(), 2);

        // Only the first wave touches the wall
        let first_wave = state.waves[0].id;
        for enemy in state.enemies.iter_mut().filter(|e| e.wave_id == first_wave) {
            enemy.pos.x += 500.0;
        }
        march_waves(&mut state);
        assert_eq!(state.waves[0].direction, -1.0);
        assert_eq!(state.waves[1].direction, 1.0);
    }

    #[test]
    fn test_empty_waves_are_pruned() {
        let mut state = new_state();
        state.enemies.clear();
        march_waves(&mut state);
        assert!(state.waves.is_empty());
    }

    #[test]
    fn test_spawner_waits_for_interval() {
        let mut state = new_state();
        state.time_ms = INITIAL_SPAWN_INTERVAL_MS;
        assert!(!update_spawner(&mut state));
        state.time_ms = INITIAL_SPAWN_INTERVAL_MS + 1.0;
        assert!(update_spawner(&mut state));
        assert_eq!(state.difficulty.level, 1);
        assert_eq!(state.enemies.len(), 30);
        assert_eq!(state.difficulty.last_spawn_ms, state.time_ms);
        assert_eq!(state.events, vec![GameEvent::WaveSpawned { level: 1 }]);
    }

    #[test]
    fn test_difficulty_ramp() {
        let mut difficulty = Difficulty::default();
        for _ in 0..4 {
            difficulty.level_up();
        }
        assert_eq!(difficulty.enemies_per_row, 5);
        difficulty.level_up();
        assert_eq!(difficulty.level, 5);
        assert_eq!(difficulty.enemies_per_row, 6);
        assert!((difficulty.enemy_speed - 1.5).abs() < 1e-6);
        assert_eq!(difficulty.spawn_interval_ms, 2750.0);

        for _ in 0..100 {
            difficulty.level_up();
        }
        assert_eq!(difficulty.enemies_per_row, MAX_ENEMIES_PER_ROW);
        assert_eq!(difficulty.spawn_interval_ms, MIN_SPAWN_INTERVAL_MS);
    }
}
