//! Meteor Catch
//!
//! Slide the paddle under falling meteors. Each catch scores a point and
//! speeds up the next spawns; a meteor reaching the bottom is a miss, and
//! the run ends once misses hit the limit.

use glam::Vec2;

use super::{Cadence, Game, GameKind};
use crate::clamp;
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::highscores::{BestScore, Scoreboard};
use crate::input::{Direction, Intent};
use crate::renderer::{Color, Paint, Scene};
use crate::sim::{Body, Cooldown, IdCounter, RandomSource, Status};
use crate::tuning::MeteorTuning;

pub const PADDLE_WIDTH: f32 = 92.0;
pub const PADDLE_HEIGHT: f32 = 18.0;
pub const PADDLE_Y: f32 = WORLD_HEIGHT - 52.0;

const MIN_RADIUS: f32 = 11.0;
const RADIUS_SPREAD: f32 = 7.0;
/// Meteors spawn this far above the top edge
const SPAWN_CLEARANCE: f32 = 4.0;
/// Horizontal slack trimmed off each side of a meteor for the catch test
const CATCH_GRACE: f32 = 6.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Meteor {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
}

impl Meteor {
    pub fn body(&self) -> Body {
        Body::circle(self.pos.x, self.pos.y, self.radius)
    }
}

pub struct MeteorCatch {
    pub tuning: MeteorTuning,
    pub status: Status,
    pub board: Scoreboard,
    /// Paddle left edge
    pub paddle_x: f32,
    pub paddle_velocity: f32,
    pub meteors: Vec<Meteor>,
    pub misses: u32,
    pub spawn: Cooldown,
    ids: IdCounter,
    rng: Box<dyn RandomSource>,
}

fn centered_paddle() -> f32 {
    WORLD_WIDTH / 2.0 - PADDLE_WIDTH / 2.0
}

fn max_paddle_x() -> f32 {
    WORLD_WIDTH - PADDLE_WIDTH
}

impl MeteorCatch {
    pub fn new(tuning: MeteorTuning, rng: Box<dyn RandomSource>, best: BestScore) -> Self {
        let spawn = Cooldown::new(tuning.first_spawn);
        Self {
            tuning,
            status: Status::Ready,
            board: Scoreboard::new(best),
            paddle_x: centered_paddle(),
            paddle_velocity: 0.0,
            meteors: Vec::new(),
            misses: 0,
            spawn,
            ids: IdCounter::default(),
            rng,
        }
    }

    pub fn start(&mut self) {
        self.spawn = Cooldown::new(self.tuning.first_spawn);
        self.ids = IdCounter::default();
        self.meteors.clear();
        self.paddle_x = centered_paddle();
        self.paddle_velocity = 0.0;
        self.misses = 0;
        self.board.reset();
        self.status = Status::Playing;
        log::info!("Meteor Catch: start");
    }

    pub fn paddle(&self) -> Body {
        Body::rect(self.paddle_x, PADDLE_Y, PADDLE_WIDTH, PADDLE_HEIGHT)
    }

    /// Center the paddle on a world x, clamped inside the world
    pub fn steer_to(&mut self, x: f32) {
        self.paddle_x = clamp(x - PADDLE_WIDTH / 2.0, 0.0, max_paddle_x());
    }

    /// Whether `meteor` is touching the paddle closely enough to count
    pub fn is_caught(&self, meteor: &Meteor) -> bool {
        meteor
            .body()
            .bounds()
            .inset(CATCH_GRACE, 0.0)
            .intersects(&self.paddle().bounds(), true)
    }

    fn spawn_meteor(&mut self) {
        let radius = MIN_RADIUS + self.rng.unit() * RADIUS_SPREAD;
        let x = radius + self.rng.unit() * (WORLD_WIDTH - radius * 2.0);
        let speed = self.tuning.base_speed
            + self.rng.unit() * self.tuning.speed_jitter
            + self.board.score as f32 * self.tuning.speed_per_point;
        let id = self.ids.next_id();
        self.meteors.push(Meteor {
            id,
            pos: Vec2::new(x, -radius - SPAWN_CLEARANCE),
            radius,
            speed,
        });
    }

    fn game_over(&mut self) {
        self.status = Status::GameOver;
        self.paddle_velocity = 0.0;
        self.board.finalize();
        log::info!(
            "Meteor Catch: game over, score {} after {} misses",
            self.board.score,
            self.misses
        );
    }

    fn step(&mut self, dt: f32) {
        self.paddle_x = clamp(
            self.paddle_x + self.paddle_velocity * dt,
            0.0,
            max_paddle_x(),
        );

        if self.spawn.advance(dt) {
            self.spawn_meteor();
            self.spawn.rearm(self.tuning.cooldown(self.board.score));
        }

        let mut meteors = std::mem::take(&mut self.meteors);
        let mut caught = 0;
        let mut missed = 0;
        meteors.retain_mut(|meteor| {
            meteor.pos.y += meteor.speed * dt;
            if self.is_caught(meteor) {
                caught += 1;
                return false;
            }
            if meteor.pos.y - meteor.radius > WORLD_HEIGHT {
                missed += 1;
                return false;
            }
            true
        });
        self.meteors = meteors;

        for _ in 0..caught {
            self.board.award(1);
        }
        self.misses += missed;
        if self.misses >= self.tuning.miss_limit.max(1) {
            self.game_over();
        }
    }
}

impl Game for MeteorCatch {
    fn kind(&self) -> GameKind {
        GameKind::Meteor
    }

    fn status(&self) -> Status {
        self.status
    }

    fn score(&self) -> u32 {
        self.board.score
    }

    fn best(&self) -> u32 {
        self.board.best()
    }

    fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Move(Direction::Left) if self.status.is_playing() => {
                self.paddle_velocity = -self.tuning.paddle_speed;
            }
            Intent::Move(Direction::Right) if self.status.is_playing() => {
                self.paddle_velocity = self.tuning.paddle_speed;
            }
            Intent::Halt => self.paddle_velocity = 0.0,
            Intent::PointerMove { x } if self.status.is_playing() => self.steer_to(x),
            Intent::Confirm | Intent::Primary | Intent::PointerDown { .. }
                if self.status.is_idle() =>
            {
                self.start()
            }
            Intent::Restart => self.start(),
            Intent::Pause => {
                self.paddle_velocity = 0.0;
                self.status = self.status.toggle_pause();
            }
            _ => {}
        }
    }

    fn advance(&mut self, dt: f32) {
        if self.status.is_playing() {
            self.step(dt);
        }
    }

    fn cadence(&self) -> Cadence {
        Cadence::Frame
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        vec![(
            "misses",
            format!("{}/{}", self.misses, self.tuning.miss_limit),
        )]
    }

    fn paint(&self, scene: &mut Scene) {
        scene.background(Paint::vertical(
            0.0,
            WORLD_HEIGHT,
            Color::hex(0x0f1f39),
            Color::hex(0x070b16),
        ));

        let star = Color::rgba(133, 205, 255, 0.2);
        for i in 0..32u32 {
            let x = (i * 57) as f32 % WORLD_WIDTH;
            let y = (i * 83) as f32 % WORLD_HEIGHT;
            scene.fill_rect(x, y, 2.0, 2.0, star);
        }

        for meteor in &self.meteors {
            let Vec2 { x, y } = meteor.pos;
            scene.circle(
                meteor.pos,
                meteor.radius,
                Paint::Radial {
                    inner: Vec2::new(x - 3.0, y - 3.0),
                    inner_radius: 2.0,
                    outer: meteor.pos,
                    outer_radius: meteor.radius + 2.0,
                    stops: vec![
                        (0.0, Color::hex(0xffe7ad)),
                        (0.4, Color::hex(0xffb43b)),
                        (1.0, Color::hex(0xdb5d11)),
                    ],
                },
            );
        }

        let x = self.paddle_x;
        scene.fill_rect(
            x,
            PADDLE_Y,
            PADDLE_WIDTH,
            PADDLE_HEIGHT,
            Paint::linear(
                Vec2::new(x, PADDLE_Y),
                Vec2::new(x + PADDLE_WIDTH, PADDLE_Y + PADDLE_HEIGHT),
                Color::hex(0x55f0ff),
                Color::hex(0x2b9dff),
            ),
        );
        scene.fill_rect(
            x + 8.0,
            PADDLE_Y + 4.0,
            PADDLE_WIDTH - 16.0,
            PADDLE_HEIGHT - 8.0,
            Color::rgba(0, 0, 0, 0.22),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::SequenceRng;
    use proptest::prelude::*;

    fn game_with(store: MemoryStore) -> MeteorCatch {
        MeteorCatch::new(
            MeteorTuning::default(),
            Box::new(SequenceRng::constant(0.5)),
            BestScore::load(GameKind::Meteor.storage_key(), Box::new(store)),
        )
    }

    fn playing() -> MeteorCatch {
        let mut g = game_with(MemoryStore::new());
        g.start();
        g.spawn.rearm(1000.0);
        g
    }

    fn meteor(id: u32, x: f32, y: f32) -> Meteor {
        Meteor {
            id,
            pos: Vec2::new(x, y),
            radius: 12.0,
            speed: 200.0,
        }
    }

    #[test]
    fn test_two_misses_keep_playing_three_end() {
        let store = MemoryStore::new();
        let mut g = game_with(store.clone());
        g.start();
        g.spawn.rearm(1000.0);
        g.board.award(4);

        g.meteors.push(meteor(1, 20.0, 660.0));
        g.meteors.push(meteor(2, 340.0, 660.0));
        g.advance(0.016);
        assert_eq!(g.misses, 2);
        assert_eq!(g.status, Status::Playing);
        assert!(g.meteors.is_empty());

        g.meteors.push(meteor(3, 20.0, 660.0));
        g.advance(0.016);
        assert_eq!(g.misses, 3);
        assert_eq!(g.status, Status::GameOver);
        assert_eq!(store.get("meteor-catch-best").as_deref(), Some("4"));
    }

    #[test]
    fn test_catch_scores_and_removes() {
        let mut g = playing();
        g.meteors.push(meteor(1, 180.0, 578.0));
        g.advance(0.016);
        assert_eq!(g.score(), 1);
        assert!(g.meteors.is_empty());
        assert_eq!(g.misses, 0);
    }

    #[test]
    fn test_catch_grace_at_paddle_edge() {
        let g = playing();
        let center = g.paddle_x + PADDLE_WIDTH / 2.0;
        // |dx| <= 46 + r - 6 is a catch, beyond is not
        let edge = center + 46.0 + 12.0 - 6.0;
        assert!(g.is_caught(&meteor(1, edge, 590.0)));
        assert!(!g.is_caught(&meteor(2, edge + 0.5, 590.0)));
        // Vertically inclusive at the paddle top
        assert!(g.is_caught(&meteor(3, center, PADDLE_Y - 12.0)));
        assert!(!g.is_caught(&meteor(4, center, PADDLE_Y - 12.5)));
    }

    #[test]
    fn test_first_spawn_parameters() {
        let mut g = game_with(MemoryStore::new());
        g.start();
        g.advance(0.5);
        assert!(g.meteors.is_empty());
        g.advance(0.3);
        assert_eq!(g.meteors.len(), 1);
        let m = &g.meteors[0];
        assert_eq!(m.id, 1);
        assert_eq!(m.radius, 14.5);
        assert_eq!(m.pos.x, 180.0);
        assert_eq!(m.speed, 190.0);
        assert!((g.spawn.remaining() - 0.92).abs() < 1e-6);
    }

    #[test]
    fn test_keyboard_moves_and_halts() {
        let mut g = playing();
        g.apply(Intent::Move(Direction::Right));
        g.advance(0.032);
        assert!((g.paddle_x - (134.0 + 310.0 * 0.032)).abs() < 1e-3);
        g.apply(Intent::Halt);
        let x = g.paddle_x;
        g.advance(0.032);
        assert_eq!(g.paddle_x, x);
    }

    #[test]
    fn test_pointer_centres_paddle_clamped() {
        let mut g = playing();
        g.apply(Intent::PointerMove { x: 100.0 });
        assert_eq!(g.paddle_x, 54.0);
        g.apply(Intent::PointerMove { x: 5.0 });
        assert_eq!(g.paddle_x, 0.0);
        g.apply(Intent::PointerMove { x: 400.0 });
        assert_eq!(g.paddle_x, 268.0);
    }

    #[test]
    fn test_movement_ignored_when_not_playing() {
        let mut g = game_with(MemoryStore::new());
        g.apply(Intent::Move(Direction::Left));
        assert_eq!(g.paddle_velocity, 0.0);
        g.apply(Intent::PointerDown { x: 10.0 });
        assert_eq!(g.status, Status::Playing);
    }

    fn any_intent() -> impl Strategy<Value = Intent> {
        prop_oneof![
            Just(Intent::Move(Direction::Left)),
            Just(Intent::Move(Direction::Right)),
            Just(Intent::Halt),
            (-100.0f32..500.0).prop_map(|x| Intent::PointerMove { x }),
        ]
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_in_world(
            steps in prop::collection::vec((any_intent(), 0.0f32..0.032), 1..200)
        ) {
            let mut g = playing();
            for (intent, dt) in steps {
                g.apply(intent);
                g.advance(dt);
                prop_assert!(g.paddle_x >= 0.0);
                prop_assert!(g.paddle_x <= WORLD_WIDTH - PADDLE_WIDTH);
            }
        }

        #[test]
        fn prop_score_and_best_monotonic(seed in any::<u64>()) {
            let mut g = MeteorCatch::new(
                MeteorTuning::default(),
                Box::new(crate::sim::GameRng::new(seed)),
                BestScore::load("meteor-catch-best", Box::new(MemoryStore::new())),
            );
            g.start();
            let mut last = 0;
            for frame in 0..600 {
                let x = (frame as f32 * 7.0) % WORLD_WIDTH;
                g.apply(Intent::PointerMove { x });
                g.advance(0.016);
                prop_assert!(g.score() >= last);
                prop_assert!(g.best() >= g.score());
                last = g.score();
            }
        }
    }
}
