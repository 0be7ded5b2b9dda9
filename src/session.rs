//! Game session
//!
//! Owns the simulation, the persistent save and the storage backend, and
//! drives the Playing -> GameOver -> restart cycle. The host calls
//! [`Session::frame`] once per animation frame; the session converts wall
//! time into fixed simulation steps.

use crate::consts::*;
use crate::error::ShopError;
use crate::highscores::HighScores;
use crate::persistence::SaveData;
use crate::platform::storage::Storage;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::upgrades::ShopItem;
use crate::variant::{VariantConfig, VariantKind};

pub struct Session<S: Storage> {
    state: GameState,
    save: SaveData,
    high_scores: HighScores,
    variant: VariantConfig,
    storage: S,
    /// Input applied on the next step; `fire` is cleared once consumed
    pub input: TickInput,
    accumulator: f64,
    last_time: Option<f64>,
    /// Save changed since the last write
    dirty: bool,
    /// Leaderboard rank of the last finished run
    last_rank: Option<usize>,
}

impl<S: Storage> Session<S> {
    /// Load persisted data from `storage` and start a run
    pub fn new(storage: S, variant: VariantKind, seed: u64) -> Self {
        let save = SaveData::load(&storage);
        let high_scores = HighScores::load(&storage);
        let variant = variant.config();
        let state = GameState::new(seed, variant.clone(), save.upgrades.stats(&variant));
        log::info!("Session started: {} mode, seed {}", variant.kind.as_str(), seed);

        Self {
            state,
            save,
            high_scores,
            variant,
            storage,
            input: TickInput::default(),
            accumulator: 0.0,
            last_time: None,
            dirty: false,
            last_rank: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn save_data(&self) -> &SaveData {
        &self.save
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn variant(&self) -> &VariantConfig {
        &self.variant
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Advance by the wall time elapsed since the previous frame.
    ///
    /// Returns the number of simulation steps run.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => SIM_DT_MS,
        };
        self.last_time = Some(now_ms);

        if self.state.phase == GamePhase::GameOver {
            self.accumulator = 0.0;
            return 0;
        }

        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT_MS;
            substeps += 1;
            if self.state.phase == GamePhase::GameOver {
                break;
            }
        }

        self.flush();
        substeps
    }

    /// Run exactly one simulation step and process its events
    pub fn step(&mut self) {
        tick(&mut self.state, &self.input, SIM_DT_MS);
        // Clear one-shot inputs after processing
        self.input.fire = false;

        for event in self.state.drain_events() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::EnemyDestroyed { points } => {
                self.save.score += points;
                self.dirty = true;
            }
            GameEvent::PlayerHit { lives_left } => {
                log::info!("Player hit, {} lives left", lives_left);
            }
            GameEvent::WaveSpawned { level } => {
                log::debug!("Wave spawned, level {}", level);
            }
            GameEvent::WaveDescended { .. } => {}
            GameEvent::GameOver { score, level } => {
                log::info!("Game over: score {}, level {}", score, level);
                self.last_rank = self.high_scores.add_score(
                    score,
                    level,
                    self.variant.kind,
                    self.last_time.unwrap_or_default(),
                );
                if let Some(rank) = self.last_rank {
                    log::info!("New high score, rank {}", rank);
                    if let Err(e) = self.high_scores.save(&mut self.storage) {
                        log::warn!("Could not save high scores: {e}");
                    }
                }
                self.persist();
            }
        }
    }

    /// Buy the next level of `item` with banked score and apply it at once
    pub fn purchase(&mut self, item: ShopItem) -> Result<u64, ShopError> {
        let cost = self
            .save
            .upgrades
            .purchase(item, &mut self.save.score, &self.variant)?;
        self.state
            .apply_stats(self.save.upgrades.stats(&self.variant));
        log::info!("Bought {} for {} (bank {})", item.name(), cost, self.save.score);
        self.persist();
        Ok(cost)
    }

    /// Start a fresh run after a game over, keeping the bank and upgrades.
    ///
    /// Ignored while a run is in progress; returns whether a new run began.
    pub fn restart(&mut self, seed: u64) -> bool {
        if self.state.phase != GamePhase::GameOver {
            log::debug!("Restart ignored, run still in progress");
            return false;
        }
        self.reset(seed);
        true
    }

    /// Switch mode and start a fresh run in it, abandoning the current one
    pub fn switch_variant(&mut self, kind: VariantKind, seed: u64) {
        self.variant = kind.config();
        self.reset(seed);
        log::info!("Switched to {} mode", kind.as_str());
    }

    fn reset(&mut self, seed: u64) {
        self.state = GameState::new(
            seed,
            self.variant.clone(),
            self.save.upgrades.stats(&self.variant),
        );
        self.accumulator = 0.0;
        self.last_time = None;
        // Held arrows stay held across the restart
        self.input.fire = false;
        self.last_rank = None;
        log::info!("Game restarted with seed: {}", seed);
    }

    /// Write pending save changes now
    pub fn flush(&mut self) {
        if self.dirty {
            self.persist();
        }
    }

    /// Write the save blob; failures are logged and retried on the next change
    fn persist(&mut self) {
        match self.save.save(&mut self.storage) {
            Ok(()) => self.dirty = false,
            Err(e) => log::warn!("Could not persist save: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::SAVE_KEY;
    use crate::platform::storage::MemoryStorage;
    use crate::sim::{Bullet, Owner};
    use glam::Vec2;

    fn session() -> Session<MemoryStorage> {
        Session::new(MemoryStorage::new(), VariantKind::Classic, 1)
    }

    fn kill_one(session: &mut Session<MemoryStorage>) {
        let target = session.state.enemies[0].rect();
        session.state.bullets.push(Bullet::new(
            target.center().x,
            target.center().y,
            Vec2::ZERO,
            Owner::Player,
        ));
        session.step();
    }

    #[test]
    fn test_frame_runs_fixed_steps() {
        let mut s = session();
        assert_eq!(s.frame(1000.0), 1);
        // 60ms later: 3 steps at 60Hz, 10ms carried over
        assert_eq!(s.frame(1060.0), 3);
        // Long stall is clamped to 100ms
        assert_eq!(s.frame(60_000.0), 6);
    }

    #[test]
    fn test_fire_is_consumed_once() {
        let mut s = session();
        s.input.fire = true;
        s.frame(0.0);
        assert!(!s.input.fire);
        assert_eq!(s.state().bullets_of(Owner::Player).count(), 1);
    }

    #[test]
    fn test_kills_are_banked_and_persisted() {
        let mut s = session();
        kill_one(&mut s);
        assert_eq!(s.save_data().score, 100);
        s.frame(0.0);
        let stored = SaveData::load(s.storage());
        assert_eq!(stored.score, 100);
    }

    #[test]
    fn test_purchase_applies_and_persists() {
        let mut s = session();
        for _ in 0..5 {
            kill_one(&mut s);
        }
        assert_eq!(s.save_data().score, 500);

        assert_eq!(s.purchase(ShopItem::DoubleShot), Ok(500));
        assert_eq!(s.save_data().score, 0);
        assert!(s.state().stats.double_shot);
        assert!(SaveData::load(s.storage()).upgrades.double_shot);

        assert_eq!(
            s.purchase(ShopItem::FireRate),
            Err(ShopError::InsufficientScore {
                cost: 200,
                available: 0
            })
        );
    }

    #[test]
    fn test_game_over_freezes_and_records() {
        let mut s = session();
        kill_one(&mut s);
        s.state.enemies[0].pos = s.state.player.pos;
        s.step();
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert_eq!(s.last_rank(), Some(1));
        assert_eq!(s.high_scores().top_score(), Some(100));

        let time = s.state().time_ms;
        assert_eq!(s.frame(10.0), 0);
        assert_eq!(s.frame(500.0), 0);
        assert_eq!(s.state().time_ms, time);
    }

    #[test]
    fn test_restart_keeps_bank_and_upgrades() {
        let mut s = session();
        for _ in 0..3 {
            kill_one(&mut s);
        }
        s.purchase(ShopItem::FireRate).unwrap();
        s.state.end_game();
        s.step();

        assert!(s.restart(2));
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.state().score, 0);
        assert_eq!(s.state().enemies.len(), 15);
        assert_eq!(s.save_data().score, 100);
        assert_eq!(s.state().stats.fire_cooldown_ms, 250.0);
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut s = session();
        for i in 1..=120 {
            s.frame(i as f64 * SIM_DT_MS);
        }
        kill_one(&mut s);
        let time = s.state().time_ms;
        let enemies = s.state().enemies.len();

        assert!(!s.restart(2));
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.state().time_ms, time);
        assert_eq!(s.state().score, 100);
        assert_eq!(s.state().enemies.len(), enemies);
        assert!(s.high_scores().is_empty());
    }

    #[test]
    fn test_restart_keeps_held_direction() {
        let mut s = session();
        s.state.end_game();
        s.step();
        s.input.left = true;
        s.input.fire = true;

        assert!(s.restart(4));
        assert!(s.input.left);
        assert!(!s.input.fire);
        let x = s.state().player.pos.x;
        s.step();
        assert_eq!(s.state().player.pos.x, x - PLAYER_SPEED);
    }

    #[test]
    fn test_new_session_reads_existing_save() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(SAVE_KEY, r#"{"score": 900, "double_shot": true}"#)
            .unwrap();
        let s = Session::new(storage, VariantKind::Classic, 5);
        assert_eq!(s.save_data().score, 900);
        assert!(s.state().stats.double_shot);
    }

    #[test]
    fn test_corrupt_save_starts_fresh() {
        let mut storage = MemoryStorage::new();
        storage.set_item(SAVE_KEY, "}}}").unwrap();
        let s = Session::new(storage, VariantKind::Classic, 5);
        assert_eq!(s.save_data(), &SaveData::default());
    }

    #[test]
    fn test_switch_variant() {
        let mut s = session();
        kill_one(&mut s);
        s.switch_variant(VariantKind::Lives, 3);
        assert_eq!(s.variant().kind, VariantKind::Lives);
        assert_eq!(s.state().lives, 3);
        assert_eq!(s.state().config.points_per_kill, 10);
        // Mid-run switch starts over
        assert_eq!(s.state().score, 0);
        assert_eq!(s.phase(), GamePhase::Playing);
    }
}
