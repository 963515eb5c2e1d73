//! End-to-end runs of the assembled game against recording backends.

use std::thread;
use std::time::{Duration, Instant};

use invaders::core::constants::{MAX_ACTIVE_ALIEN_BULLETS, SHIP_X_MAX, SHIP_X_MIN};
use invaders::core::GameStatus;
use invaders::rendering::{NullBackend, RecordingBackend};
use invaders::{Game, GameConfig, MoveDirection};

fn fast_config() -> GameConfig {
    GameConfig {
        input_period_ms: 1,
        ship_period_ms: 2,
        player_bullet_period_ms: 2,
        alien_matrix_period_ms: 1,
        alien_bullet_period_ms: 2,
        screen_period_ms: 5,
        rng_seed: Some(99),
        ..GameConfig::default()
    }
}

/// Polls `condition` until it holds or `timeout` passes.
fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

#[test]
fn ship_moves_and_stays_in_band() {
    let mut game = Game::new(fast_config()).unwrap();
    game.start(NullBackend::default()).unwrap();
    let input = game.input();
    let ship = || game.objects().ship().snapshot().position.x;

    input.request_move(MoveDirection::Right);
    let playing = || game.objects().score().is_playing();
    assert!(wait_for(Duration::from_secs(2), || ship() == SHIP_X_MAX || !playing()));
    input.request_move(MoveDirection::Left);
    for _ in 0..100 {
        let x = ship();
        assert!((SHIP_X_MIN..=SHIP_X_MAX).contains(&x));
        thread::sleep(Duration::from_millis(1));
    }
    game.shutdown().unwrap();
}

#[test]
fn alien_fire_never_exceeds_pool() {
    let config = GameConfig { shoot_chance: 1, ..fast_config() };
    let mut game = Game::new(config).unwrap();
    game.start(NullBackend::default()).unwrap();
    for _ in 0..200 {
        let active = game.objects().alien_bullets().active_count();
        assert!(active <= MAX_ACTIVE_ALIEN_BULLETS);
        thread::sleep(Duration::from_millis(1));
    }
    let report = game.shutdown().unwrap();
    let in_flight = report.snapshot.alien_bullets.iter().filter(|b| b.active).count();
    assert!(in_flight <= MAX_ACTIVE_ALIEN_BULLETS);
}

#[test]
fn pause_freezes_formation_and_resume_restarts_it() {
    let mut game = Game::new(fast_config()).unwrap();
    game.start(NullBackend::default()).unwrap();
    let input = game.input();

    input.pause();
    assert!(wait_for(Duration::from_secs(1), || game.is_paused()));
    // Let any tick already past its pause check finish
    thread::sleep(Duration::from_millis(20));
    let frozen = game.objects().aliens().snapshot();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(game.objects().aliens().snapshot(), frozen);

    input.resume();
    assert!(wait_for(Duration::from_secs(1), || {
        !game.is_paused() && game.objects().aliens().snapshot() != frozen
    }));
    game.shutdown().unwrap();
}

#[test]
fn quit_stops_every_thread() {
    let mut game = Game::new(fast_config()).unwrap();
    game.start(RecordingBackend::new(2)).unwrap();
    thread::sleep(Duration::from_millis(30));

    game.input().quit();
    assert!(!game.is_running());
    let report = game.shutdown().unwrap();
    assert_eq!(report.tasks.len(), 5);
    assert!(report.tasks.iter().all(|task| task.ticks > 0));
    assert!(report.frames.frames > 0);
}

#[test]
fn restart_after_game_over() {
    let mut game = Game::new(fast_config()).unwrap();
    game.objects().score().add(120);
    game.objects().score().game_over();
    game.start(NullBackend::default()).unwrap();

    let round = game.objects().round();
    game.input().restart();
    assert!(wait_for(Duration::from_secs(1), || game.objects().round() > round));

    let score = game.objects().score().snapshot();
    assert_eq!(score.status, GameStatus::Playing);
    assert_eq!(score.current, 0);
    assert_eq!(score.high, 120);
    assert_eq!(score.level, 1);
    game.shutdown().unwrap();
}

#[test]
fn toml_config_drives_the_game() {
    let config = GameConfig::from_toml_str(
        "ship_speed = 9\nrender_queue_capacity = 4\nscreen_period_ms = 2\n",
    )
    .unwrap();
    let mut game = Game::new(config).unwrap();
    game.start(NullBackend::default()).unwrap();
    thread::sleep(Duration::from_millis(30));

    let report = game.shutdown().unwrap();
    // A frame has far more than four commands
    assert!(report.queue.dropped > 0);
    assert!(report.frames.frames > 0);
}
