//! Full sessions driven through `Game` + `Lifecycle`

use neon_arcade::games::snake::{Cell, Snake};
use neon_arcade::games::{Cadence, Game};
use neon_arcade::highscores::BestScore;
use neon_arcade::input::{self, Direction, Intent};
use neon_arcade::lifecycle::{Lifecycle, RecordingScheduler};
use neon_arcade::sim::{GameRng, RandomSource, Status};
use neon_arcade::{GameKind, MemoryStore, ScoreStore, Tuning};

type Snapshot = (Status, u32, Vec<(&'static str, String)>);

fn scripted_run(kind: GameKind, seed: u64, steps: u32) -> Vec<Snapshot> {
    let mut game = kind.create(
        &Tuning::default(),
        Box::new(GameRng::new(seed)),
        Box::new(MemoryStore::new()),
    );
    let mut life = Lifecycle::new(RecordingScheduler::default(), 0.032);
    let mut script = GameRng::new(seed + 1);
    let keys: Vec<Intent> = input::keymap(kind).iter().map(|(_, i)| *i).collect();

    life.dispatch(game.as_mut(), Intent::Restart);
    let mut trace = Vec::new();
    let mut now = 0.0;
    for _ in 0..steps {
        if script.unit() < 0.1 {
            let intent = keys[script.index(keys.len())];
            // Keep the run going; restarts would only reset the trace
            if !matches!(intent, Intent::Restart | Intent::Pause) {
                life.dispatch(game.as_mut(), intent);
            }
        }
        now += 16.0;
        life.tick(game.as_mut(), now);
        trace.push((game.status(), game.score(), game.stats()));
        if !life.is_running() {
            break;
        }
    }
    trace
}

#[test]
fn test_runs_are_deterministic_per_seed() {
    for kind in GameKind::ALL {
        let a = scripted_run(kind, 42, 900);
        let b = scripted_run(kind, 42, 900);
        assert_eq!(a, b, "{kind} diverged");
    }
}

#[test]
fn test_score_never_decreases_while_playing() {
    for kind in GameKind::ALL {
        let trace = scripted_run(kind, 7, 1500);
        let mut last = 0;
        for (status, score, _) in &trace {
            if *status == Status::Playing {
                assert!(*score >= last, "{kind} score went down");
            }
            last = *score;
        }
    }
}

#[test]
fn test_loop_stops_on_game_over_and_restarts() {
    for kind in GameKind::ALL {
        let mut game = kind.create(
            &Tuning::default(),
            Box::new(GameRng::new(99)),
            Box::new(MemoryStore::new()),
        );
        let mut life = Lifecycle::new(RecordingScheduler::default(), 0.032);
        life.dispatch(game.as_mut(), Intent::Restart);
        assert!(life.is_running());

        let mut now = 0.0;
        for _ in 0..200_000 {
            if !life.is_running() {
                break;
            }
            now += 16.0;
            life.tick(game.as_mut(), now);
        }
        if game.status() == Status::GameOver {
            assert_eq!(life.scheduler().live(), 0, "{kind} left a loop running");
            life.dispatch(game.as_mut(), Intent::Restart);
            assert_eq!(game.status(), Status::Playing);
            assert_eq!(game.score(), 0);
            assert_eq!(life.scheduler().live(), 1);
        }
    }
}

#[test]
fn test_suspend_pauses_every_game() {
    for kind in GameKind::ALL {
        let mut game = kind.create(
            &Tuning::default(),
            Box::new(GameRng::new(3)),
            Box::new(MemoryStore::new()),
        );
        let mut life = Lifecycle::new(RecordingScheduler::default(), 0.032);
        life.dispatch(game.as_mut(), Intent::Restart);
        life.suspend(game.as_mut());
        assert_eq!(game.status(), Status::Paused);
        assert!(!life.is_running());
        life.dispatch(game.as_mut(), Intent::Pause);
        assert_eq!(game.status(), Status::Playing);
        assert_eq!(life.scheduler().live(), 1);
    }
}

#[test]
fn test_best_score_survives_sessions() {
    let store = MemoryStore::new();
    let mut snake = Snake::new(
        Tuning::default().snake,
        Box::new(GameRng::new(1)),
        BestScore::load(GameKind::Snake.storage_key(), Box::new(store.clone())),
    );
    let mut life = Lifecycle::new(RecordingScheduler::default(), 0.032);
    life.dispatch(&mut snake, Intent::Move(Direction::Right));
    snake.food = Some(Cell::new(11, 10));
    life.tick(&mut snake, 0.0);
    assert_eq!(snake.score(), 10);
    assert_eq!(store.get("snake-best-score").as_deref(), Some("10"));

    while life.is_running() {
        life.tick(&mut snake, 0.0);
    }
    assert_eq!(snake.status(), Status::GameOver);
    let best = snake.best();
    assert!(best >= 10);

    let next = GameKind::Snake.create(
        &Tuning::default(),
        Box::new(GameRng::new(2)),
        Box::new(store.clone()),
    );
    assert_eq!(next.best(), best);
    assert_eq!(next.score(), 0);
}

#[test]
fn test_garbage_best_reads_as_zero() {
    for raw in ["", "abc", "-4", "NaN", "Infinity"] {
        let store = MemoryStore::with("tetris-best", raw);
        assert_eq!(store.read("tetris-best").as_deref(), Some(raw));
        let game = GameKind::Tetris.create(
            &Tuning::default(),
            Box::new(GameRng::new(1)),
            Box::new(store),
        );
        assert_eq!(game.best(), 0, "{raw:?}");
    }
}

#[test]
fn test_tuning_override_reaches_cadence() {
    let json = r#"{ "snake": { "base_tick_ms": 200 }, "tetris": { "base_drop_ms": 600 } }"#;
    let tuning = Tuning::from_json(json).unwrap();
    assert_eq!(tuning.snake.min_tick_ms, 78);

    let mut snake =
        GameKind::Snake.create(&tuning, Box::new(GameRng::new(1)), Box::new(MemoryStore::new()));
    snake.apply(Intent::Restart);
    assert_eq!(snake.cadence(), Cadence::Interval { ms: 200 });

    let mut tetris =
        GameKind::Tetris.create(&tuning, Box::new(GameRng::new(1)), Box::new(MemoryStore::new()));
    tetris.apply(Intent::Restart);
    assert_eq!(tetris.cadence(), Cadence::Interval { ms: 600 });
}
