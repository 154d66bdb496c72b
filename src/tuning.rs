//! Data-driven game balance
//!
//! Every constant a game's feel depends on lives here. Each section and
//! field defaults to the shipped value, so a tuning document only has to
//! name what it overrides:
//!
//! ```json
//! { "meteor": { "cooldown_floor": 0.3 }, "engine": { "max_frame_dt": 0.02 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, MAX_PIXEL_RATIO};
use crate::error::ArcadeError;

/// Fluppy Bird physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappyTuning {
    pub gravity: f32,
    /// Vertical velocity set by a flap (negative is up)
    pub flap_velocity: f32,
    pub pipe_speed: f32,
    pub pipe_width: f32,
    pub pipe_gap: f32,
    /// Seconds between pipe spawns
    pub spawn_period: f32,
    pub ground_height: f32,
}

impl Default for FlappyTuning {
    fn default() -> Self {
        Self {
            gravity: 1700.0,
            flap_velocity: -520.0,
            pipe_speed: 170.0,
            pipe_width: 68.0,
            pipe_gap: 180.0,
            spawn_period: 1.3,
            ground_height: 84.0,
        }
    }
}

/// Meteor Catch spawn curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteorTuning {
    pub paddle_speed: f32,
    pub base_speed: f32,
    /// Random extra speed, uniform in `[0, speed_jitter)`
    pub speed_jitter: f32,
    pub speed_per_point: f32,
    pub first_spawn: f32,
    pub cooldown_base: f32,
    pub cooldown_step: f32,
    pub cooldown_floor: f32,
    pub miss_limit: u32,
}

impl Default for MeteorTuning {
    fn default() -> Self {
        Self {
            paddle_speed: 310.0,
            base_speed: 150.0,
            speed_jitter: 80.0,
            speed_per_point: 2.0,
            first_spawn: 0.78,
            cooldown_base: 0.92,
            cooldown_step: 0.01,
            cooldown_floor: 0.34,
            miss_limit: 3,
        }
    }
}

impl MeteorTuning {
    /// Spawn cooldown at `score`; non-increasing in score, never below the floor
    pub fn cooldown(&self, score: u32) -> f32 {
        (self.cooldown_base - self.cooldown_step * score as f32).max(self.cooldown_floor)
    }
}

/// Neon Dodger spawn curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DodgerTuning {
    pub base_speed: f32,
    /// Obstacle speed gained per second of play
    pub acceleration: f32,
    pub first_spawn: f32,
    pub cooldown_base: f32,
    pub cooldown_step: f32,
    pub cooldown_floor: f32,
}

impl Default for DodgerTuning {
    fn default() -> Self {
        Self {
            base_speed: 220.0,
            acceleration: 6.0,
            first_spawn: 0.25,
            cooldown_base: 1.08,
            cooldown_step: 0.02,
            cooldown_floor: 0.42,
        }
    }
}

impl DodgerTuning {
    pub fn cooldown(&self, score: u32) -> f32 {
        (self.cooldown_base - self.cooldown_step * score as f32).max(self.cooldown_floor)
    }
}

/// Tap Tap Shoots ball and rim response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoopsTuning {
    pub gravity: f32,
    /// Horizontal velocity multiplier applied every frame in the air
    pub air_drag: f32,
    /// Upward speed of a shot
    pub shot_speed: f32,
    /// Share of the current horizontal velocity kept by a new shot
    pub shot_carry: f32,
    /// Horizontal push toward the hoop at full aim
    pub aim_strength: f32,
    pub max_shot_vx: f32,
    /// Normal-component multiplier of a rim bounce (2.0 is a perfect mirror)
    pub rim_restitution: f32,
    pub rim_damping: f32,
    pub wall_damping: f32,
    pub ceiling_damping: f32,
    pub floor_bounce: f32,
    /// Below this landing speed a scored ball stops bouncing and rolls
    pub floor_bounce_min: f32,
    pub floor_bounce_friction: f32,
    pub roll_friction: f32,
    /// Horizontal speed under which a rolling ball comes to rest
    pub rest_speed: f32,
    /// Score at which the hoop reaches full difficulty
    pub difficulty_score: f32,
}

impl Default for HoopsTuning {
    fn default() -> Self {
        Self {
            gravity: 1260.0,
            air_drag: 0.997,
            shot_speed: 600.0,
            shot_carry: 0.35,
            aim_strength: 250.0,
            max_shot_vx: 300.0,
            rim_restitution: 1.7,
            rim_damping: 0.82,
            wall_damping: 0.72,
            ceiling_damping: 0.7,
            floor_bounce: 0.46,
            floor_bounce_min: 70.0,
            floor_bounce_friction: 0.94,
            roll_friction: 0.86,
            rest_speed: 12.0,
            difficulty_score: 30.0,
        }
    }
}

/// Snake tick speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeTuning {
    pub base_tick_ms: u32,
    pub min_tick_ms: u32,
    /// Milliseconds removed from the tick per food eaten
    pub tick_step_ms: u32,
    pub food_points: u32,
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self {
            base_tick_ms: 140,
            min_tick_ms: 78,
            tick_step_ms: 4,
            food_points: 10,
        }
    }
}

/// Tetris gravity curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetrisTuning {
    pub base_drop_ms: u32,
    pub drop_step_ms: u32,
    pub min_drop_ms: u32,
    pub lines_per_level: u32,
}

impl Default for TetrisTuning {
    fn default() -> Self {
        Self {
            base_drop_ms: 820,
            drop_step_ms: 55,
            min_drop_ms: 110,
            lines_per_level: 10,
        }
    }
}

impl TetrisTuning {
    /// 1-based level for a total of cleared lines
    pub fn level(&self, lines: u32) -> u32 {
        lines / self.lines_per_level.max(1) + 1
    }

    /// Gravity interval at `level`, floor-clamped
    pub fn drop_interval_ms(&self, level: u32) -> u32 {
        let step = self.drop_step_ms.saturating_mul(level.saturating_sub(1));
        self.base_drop_ms.saturating_sub(step).max(self.min_drop_ms)
    }
}

/// Loop and canvas limits shared by every game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineTuning {
    pub max_frame_dt: f32,
    pub max_pixel_ratio: f64,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            max_frame_dt: MAX_FRAME_DT,
            max_pixel_ratio: MAX_PIXEL_RATIO,
        }
    }
}

/// Complete tuning document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub flappy: FlappyTuning,
    pub meteor: MeteorTuning,
    pub dodger: DodgerTuning,
    pub hoops: HoopsTuning,
    pub snake: SnakeTuning,
    pub tetris: TetrisTuning,
    pub engine: EngineTuning,
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon-arcade-tuning";

    pub fn from_json(json: &str) -> Result<Self, ArcadeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ArcadeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an optional document, falling back to defaults on absence or error
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Some(Err(err)) => {
                log::warn!("Ignoring invalid tuning: {err}");
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok())
            .flatten();
        Self::from_json_or_default(stored.as_deref())
    }

    /// Load tuning from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, ArcadeError> {
        let json = std::fs::read_to_string(path)
            .map_err(|err| ArcadeError::Storage(format!("{}: {err}", path.display())))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{ "meteor": { "cooldown_floor": 0.3 } }"#).unwrap();
        assert_eq!(tuning.meteor.cooldown_floor, 0.3);
        assert_eq!(tuning.meteor.base_speed, 150.0);
        assert_eq!(tuning.snake, SnakeTuning::default());
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = Tuning::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ArcadeError::Tuning(_)));
        assert_eq!(Tuning::from_json_or_default(Some("{ nope")), Tuning::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_meteor_cooldown_floor() {
        let meteor = MeteorTuning::default();
        assert!((meteor.cooldown(0) - 0.92).abs() < 1e-6);
        assert_eq!(meteor.cooldown(500), 0.34);
    }

    #[test]
    fn test_tetris_levels() {
        let tetris = TetrisTuning::default();
        assert_eq!(tetris.level(0), 1);
        assert_eq!(tetris.level(9), 1);
        assert_eq!(tetris.level(10), 2);
        assert_eq!(tetris.drop_interval_ms(1), 820);
        assert_eq!(tetris.drop_interval_ms(2), 765);
        assert_eq!(tetris.drop_interval_ms(40), 110);
    }

    proptest! {
        #[test]
        fn prop_difficulty_is_monotonic(score in 0u32..2000) {
            let t = Tuning::default();
            prop_assert!(t.meteor.cooldown(score + 1) <= t.meteor.cooldown(score));
            prop_assert!(t.meteor.cooldown(score) >= t.meteor.cooldown_floor);
            prop_assert!(t.dodger.cooldown(score + 1) <= t.dodger.cooldown(score));
            prop_assert!(t.dodger.cooldown(score) >= t.dodger.cooldown_floor);
        }

        #[test]
        fn prop_drop_interval_is_monotonic(lines in 0u32..1000) {
            let t = TetrisTuning::default();
            let now = t.drop_interval_ms(t.level(lines));
            let later = t.drop_interval_ms(t.level(lines + 1));
            prop_assert!(later <= now);
            prop_assert!(now >= t.min_drop_ms);
        }
    }
}
