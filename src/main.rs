//! Neon Arcade entry point
//!
//! On the web this mounts every `canvas[data-game]` on the page. Natively it
//! runs a headless soak of each game with a seeded RNG and scripted input.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    neon_arcade::platform::init_logging();
    log::info!("Neon Arcade starting...");
    match neon_arcade::platform::mount_all() {
        Ok(count) => log::info!("Neon Arcade running ({count} games mounted)"),
        Err(e) => log::error!("Neon Arcade failed to start: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use neon_arcade::games::Cadence;
    use neon_arcade::input::{self, Intent};
    use neon_arcade::lifecycle::{Lifecycle, RecordingScheduler};
    use neon_arcade::sim::{GameRng, RandomSource, Status};
    use neon_arcade::{GameKind, MemoryStore, Tuning};

    /// 60 Hz refresh
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_STEPS: u32 = 20_000;
    /// Chance per step that the script presses something
    const PRESS_CHANCE: f32 = 0.12;

    pub struct SoakReport {
        pub kind: GameKind,
        pub status: Status,
        pub score: u32,
        pub best: u32,
        pub steps: u32,
        pub elapsed_ms: f64,
    }

    /// Gameplay intents a player could produce for `kind`
    fn palette(kind: GameKind) -> Vec<Intent> {
        let mut intents: Vec<Intent> = input::keymap(kind)
            .iter()
            .map(|(_, intent)| *intent)
            .filter(|intent| !matches!(intent, Intent::Pause | Intent::Restart | Intent::Confirm))
            .collect();
        intents.dedup();
        intents
    }

    /// Play one session until game over or `MAX_STEPS` scheduled callbacks
    pub fn soak(kind: GameKind, tuning: &Tuning, seed: u64) -> SoakReport {
        let store = MemoryStore::new();
        let mut game = kind.create(tuning, Box::new(GameRng::new(seed)), Box::new(store));
        let mut life = Lifecycle::new(RecordingScheduler::default(), tuning.engine.max_frame_dt);
        let mut script = GameRng::new(seed ^ 0x5eed);
        let moves = palette(kind);
        let (world_width, _) = kind.world_size();

        life.dispatch(game.as_mut(), Intent::Restart);
        let mut now = 0.0;
        let mut steps = 0;
        while life.is_running() && steps < MAX_STEPS {
            if script.unit() < PRESS_CHANCE {
                let intent = if moves.is_empty() || script.unit() < 0.2 {
                    Intent::PointerDown {
                        x: script.range(0.0, world_width),
                    }
                } else {
                    moves[script.index(moves.len())]
                };
                life.dispatch(game.as_mut(), intent);
                if kind == GameKind::Meteor && script.unit() < 0.3 {
                    life.dispatch(game.as_mut(), Intent::Halt);
                }
            }

            now += match life.active() {
                Some(Cadence::Interval { ms }) => ms as f64,
                _ => FRAME_MS,
            };
            life.tick(game.as_mut(), now);
            steps += 1;
        }
        life.teardown();

        SoakReport {
            kind,
            status: game.status(),
            score: game.score(),
            best: game.best(),
            steps,
            elapsed_ms: now,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_arcade::{GameKind, Tuning};

    env_logger::init();
    log::info!("Neon Arcade (native) starting...");
    log::info!("The games run in the browser - run with `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match Tuning::load_file(std::path::Path::new(&path)) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning: {e}");
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    println!("\nRunning headless soak...");
    for (i, kind) in GameKind::ALL.into_iter().enumerate() {
        let report = headless::soak(kind, &tuning, 0xa5ca_de00 + i as u64);
        println!(
            "  {:<15} {:<9} score {:>5}  best {:>5}  {:>6} steps  {:>8.1}s",
            report.kind.title(),
            report.status.as_str(),
            report.score,
            report.best,
            report.steps,
            report.elapsed_ms / 1000.0,
        );
    }
}
