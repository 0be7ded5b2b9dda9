//! End-to-end: play, bank, buy, persist to disk, come back in a new session.

use canvas_invaders::consts::*;
use canvas_invaders::platform::{FileStorage, Storage};
use canvas_invaders::sim::{GamePhase, TickInput};
use canvas_invaders::{
    HighScores, SaveData, Session, Settings, ShopError, ShopItem, VariantKind,
};

/// Park the ship under the front-left enemy and fire until it dies
fn snipe_front_left<S: Storage>(session: &mut Session<S>) {
    let before = session.state().enemies.len();
    for _ in 0..400 {
        let state = session.state();
        let Some(target) = state
            .enemies
            .iter()
            .filter(|e| e.wave_id == state.waves[0].id)
            .max_by(|a, b| {
                a.pos
                    .y
                    .total_cmp(&b.pos.y)
                    .then(b.pos.x.total_cmp(&a.pos.x))
            })
            .map(|e| e.rect().center().x)
        else {
            return;
        };
        let dx = target - state.player.rect().center().x;
        session.input = TickInput {
            left: dx < -PLAYER_SPEED,
            right: dx > PLAYER_SPEED,
            fire: true,
        };
        session.step();
        if session.state().enemies.len() < before || session.phase() == GamePhase::GameOver {
            return;
        }
    }
}

#[test]
fn start_state_matches_classic_layout() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::new(FileStorage::new(dir.path()), VariantKind::Classic, 11);
    let state = session.state();
    assert_eq!(state.score, 0);
    assert_eq!(state.enemies.len(), 15);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(session.save_data(), &SaveData::default());
}

#[test]
fn kills_bank_and_survive_restart_of_the_process() {
    let dir = tempfile::tempdir().unwrap();

    let banked = {
        let mut session = Session::new(FileStorage::new(dir.path()), VariantKind::Classic, 11);
        snipe_front_left(&mut session);
        assert_eq!(session.state().enemies.len(), 14);
        assert_eq!(session.state().score, 100);
        session.flush();
        session.save_data().score
    };
    assert_eq!(banked, 100);

    let storage = FileStorage::new(dir.path());
    assert_eq!(SaveData::load(&storage).score, 100);

    let mut session = Session::new(storage, VariantKind::Classic, 12);
    assert_eq!(session.save_data().score, 100);
    assert_eq!(
        session.purchase(ShopItem::FireRate),
        Err(ShopError::InsufficientScore {
            cost: 200,
            available: 100
        })
    );
    assert_eq!(session.save_data().score, 100);
}

#[test]
fn purchases_persist_and_shape_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    SaveData {
        score: 1000,
        ..Default::default()
    }
    .save(&mut storage)
    .unwrap();

    let mut session = Session::new(storage, VariantKind::Classic, 3);
    assert_eq!(session.purchase(ShopItem::DoubleShot), Ok(500));
    assert_eq!(session.purchase(ShopItem::FireRate), Ok(200));
    assert_eq!(session.save_data().score, 300);

    let reloaded = SaveData::load(&FileStorage::new(dir.path()));
    assert!(reloaded.upgrades.double_shot);
    assert_eq!(reloaded.upgrades.fire_rate_level, 1);
    assert_eq!(reloaded.score, 300);

    session.input.fire = true;
    session.step();
    let player_bullets = session
        .state()
        .bullets
        .iter()
        .filter(|b| b.vel.y < 0.0)
        .count();
    assert_eq!(player_bullets, 2);
}

#[test]
fn game_over_records_high_score_and_waits_for_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(FileStorage::new(dir.path()), VariantKind::Classic, 5);
    snipe_front_left(&mut session);

    // Let the invaders win: stand still until something ends the run
    session.input = TickInput::default();
    let mut clock = 0.0;
    while session.phase() == GamePhase::Playing && clock < 10.0 * 60.0 * 1000.0 {
        clock += SIM_DT_MS;
        session.frame(clock);
    }
    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(session.frame(clock + 1000.0), 0);
    assert_eq!(session.last_rank(), Some(1));

    let scores = HighScores::load(&FileStorage::new(dir.path()));
    assert_eq!(scores.top_score(), Some(session.state().score));

    assert!(session.restart(6));
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.state().score, 0);
    assert!(session.frame(clock + 2000.0) > 0);
}

#[test]
fn chosen_mode_is_remembered_for_the_next_launch() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    let mut settings = Settings::load(&storage);
    assert_eq!(settings.variant, VariantKind::Classic);
    assert_eq!(settings.remember_variant(VariantKind::Lives, &mut storage), Ok(true));

    let storage = FileStorage::new(dir.path());
    let settings = Settings::load(&storage);
    let mut session = Session::new(storage, settings.variant, 8);
    assert_eq!(session.variant().kind, VariantKind::Lives);
    assert_eq!(session.state().lives, 3);

    // Switching mid-run starts over in the new mode
    session.switch_variant(VariantKind::Arsenal, 9);
    assert_eq!(session.variant().kind, VariantKind::Arsenal);
    assert_eq!(session.phase(), GamePhase::Playing);
    let mut settings = settings;
    assert_eq!(
        settings.remember_variant(VariantKind::Arsenal, session.storage_mut()),
        Ok(true)
    );
    assert_eq!(
        Settings::load(&FileStorage::new(dir.path())).variant,
        VariantKind::Arsenal
    );
}
