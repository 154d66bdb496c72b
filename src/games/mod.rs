//! The arcade cabinet's games
//!
//! Each game owns its world, reacts to intents and advances itself. The
//! `Game` trait is the seam the lifecycle controller and the platform glue
//! drive them through.

pub mod dodger;
pub mod flappy;
pub mod hoops;
pub mod meteor;
pub mod snake;
pub mod tetris;

use std::fmt;
use std::str::FromStr;

use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::error::ArcadeError;
use crate::highscores::{BestScore, ScoreStore};
use crate::input::Intent;
use crate::renderer::Scene;
use crate::sim::{RandomSource, Status};
use crate::tuning::Tuning;

pub use dodger::Dodger;
pub use flappy::Flappy;
pub use hoops::Hoops;
pub use meteor::MeteorCatch;
pub use snake::Snake;
pub use tetris::Tetris;

/// How a game wants to be scheduled while playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Once per display refresh with a clamped `dt`
    Frame,
    /// Fixed-interval discrete tick
    Interval { ms: u32 },
}

/// A single game session
pub trait Game {
    fn kind(&self) -> GameKind;

    fn status(&self) -> Status;

    fn score(&self) -> u32;

    /// Persisted best score, always `>= score()`
    fn best(&self) -> u32;

    /// React to an intent. Invalid intents for the current status are ignored.
    fn apply(&mut self, intent: Intent);

    /// Advance the world. Frame games integrate over `dt` seconds; interval
    /// games run exactly one discrete tick and ignore `dt`.
    fn advance(&mut self, dt: f32);

    fn cadence(&self) -> Cadence;

    /// Draw the current world into `scene`
    fn paint(&self, scene: &mut Scene);

    /// Extra HUD values beyond score/best/status (misses, level...)
    fn stats(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Pause if playing; never resumes
    fn suspend(&mut self) {
        if self.status() == Status::Playing {
            self.apply(Intent::Pause);
        }
    }
}

/// Registered games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Flappy,
    Meteor,
    Dodger,
    Hoops,
    Snake,
    Tetris,
}

impl GameKind {
    pub const ALL: [GameKind; 6] = [
        GameKind::Flappy,
        GameKind::Meteor,
        GameKind::Dodger,
        GameKind::Hoops,
        GameKind::Snake,
        GameKind::Tetris,
    ];

    /// URL/DOM identifier
    pub fn slug(self) -> &'static str {
        match self {
            GameKind::Flappy => "fluppy-bird",
            GameKind::Meteor => "meteor-catch",
            GameKind::Dodger => "neon-dodger",
            GameKind::Hoops => "tap-tap-shoots",
            GameKind::Snake => "snake",
            GameKind::Tetris => "tetris",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKind::Flappy => "Fluppy Bird",
            GameKind::Meteor => "Meteor Catch",
            GameKind::Dodger => "Neon Dodger",
            GameKind::Hoops => "Tap Tap Shoots",
            GameKind::Snake => "Snake",
            GameKind::Tetris => "Tetris",
        }
    }

    /// Key of the persisted best score
    pub fn storage_key(self) -> &'static str {
        match self {
            GameKind::Flappy => "fluppy-bird-best",
            GameKind::Meteor => "meteor-catch-best",
            GameKind::Dodger => "neon-dodger-best",
            GameKind::Hoops => "tap-tap-shoots-best",
            GameKind::Snake => "snake-best-score",
            GameKind::Tetris => "tetris-best",
        }
    }

    /// Logical world size (width, height)
    pub fn world_size(self) -> (f32, f32) {
        match self {
            GameKind::Snake => (snake::WORLD_SIZE, snake::WORLD_SIZE),
            _ => (WORLD_WIDTH, WORLD_HEIGHT),
        }
    }

    /// Build a fresh session in `Ready`, reading the best score from `store`
    pub fn create(
        self,
        tuning: &Tuning,
        rng: Box<dyn RandomSource>,
        store: Box<dyn ScoreStore>,
    ) -> Box<dyn Game> {
        let best = BestScore::load(self.storage_key(), store);
        match self {
            GameKind::Flappy => Box::new(Flappy::new(tuning.flappy.clone(), rng, best)),
            GameKind::Meteor => Box::new(MeteorCatch::new(tuning.meteor.clone(), rng, best)),
            GameKind::Dodger => Box::new(Dodger::new(tuning.dodger.clone(), rng, best)),
            GameKind::Hoops => Box::new(Hoops::new(tuning.hoops.clone(), rng, best)),
            GameKind::Snake => Box::new(Snake::new(tuning.snake.clone(), rng, best)),
            GameKind::Tetris => Box::new(Tetris::new(tuning.tetris.clone(), rng, best)),
        }
    }
}

impl FromStr for GameKind {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| ArcadeError::UnknownGame(s.to_string()))
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Fresh scene sized to a game's world
pub fn scene_for(game: &dyn Game) -> Scene {
    let (width, height) = game.kind().world_size();
    Scene::new(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::GameRng;

    #[test]
    fn test_slug_roundtrip() {
        for kind in GameKind::ALL {
            assert_eq!(kind.slug().parse::<GameKind>().unwrap(), kind);
        }
        assert!(matches!(
            "pong".parse::<GameKind>(),
            Err(ArcadeError::UnknownGame(_))
        ));
    }

    #[test]
    fn test_create_reads_best() {
        for kind in GameKind::ALL {
            let store = MemoryStore::with(kind.storage_key(), "7");
            let game = kind.create(&Tuning::default(), Box::new(GameRng::new(1)), Box::new(store));
            assert_eq!(game.kind(), kind);
            assert_eq!(game.status(), Status::Ready);
            assert_eq!(game.score(), 0);
            assert_eq!(game.best(), 7);
        }
    }

    #[test]
    fn test_every_game_paints_in_ready() {
        for kind in GameKind::ALL {
            let game = kind.create(
                &Tuning::default(),
                Box::new(GameRng::new(2)),
                Box::new(MemoryStore::new()),
            );
            let mut scene = scene_for(game.as_ref());
            game.paint(&mut scene);
            assert!(!scene.is_empty(), "{kind} drew nothing");
        }
    }

    #[test]
    fn test_suspend_only_pauses() {
        for kind in GameKind::ALL {
            let mut game = kind.create(
                &Tuning::default(),
                Box::new(GameRng::new(3)),
                Box::new(MemoryStore::new()),
            );
            game.suspend();
            assert_eq!(game.status(), Status::Ready);
            game.apply(Intent::Restart);
            assert_eq!(game.status(), Status::Playing);
            game.suspend();
            assert_eq!(game.status(), Status::Paused);
            game.suspend();
            assert_eq!(game.status(), Status::Paused);
        }
    }
}
