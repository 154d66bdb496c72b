//! Neon Arcade - canvas arcade mini-games
//!
//! Core modules:
//! - `sim`: Shared simulation engine (status machine, frame clock, shapes, collisions, RNG)
//! - `games`: Fluppy Bird, Meteor Catch, Neon Dodger, Tap Tap Shoots, Snake, Tetris
//! - `input`: Keyboard/pointer/touch normalization into intents
//! - `renderer`: Backend-agnostic scene lists and viewport math
//! - `lifecycle`: Starts/stops the frame or tick scheduler from game status
//! - `platform`: Browser glue (wasm32 only)
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod games;
pub mod highscores;
pub mod input;
pub mod lifecycle;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use error::ArcadeError;
pub use games::{Game, GameKind};
pub use highscores::{BestScore, MemoryStore, ScoreStore};
pub use tuning::Tuning;

/// Engine-wide constants
pub mod consts {
    /// Logical world size shared by the portrait canvas games
    pub const WORLD_WIDTH: f32 = 360.0;
    pub const WORLD_HEIGHT: f32 = 640.0;

    /// Largest frame delta fed to a simulation step (seconds)
    pub const MAX_FRAME_DT: f32 = 0.032;

    /// Device pixel ratio cap for canvas backing stores
    pub const MAX_PIXEL_RATIO: f64 = 2.0;
}

/// Clamp that tolerates an inverted range (returns `min` when `min > max`)
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max.max(min))
}
