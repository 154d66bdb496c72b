//! Neon Dodger
//!
//! Three lanes, one ship. Blocks fall in random lanes, faster the longer the
//! run lasts; each block that clears the ship scores once, any block that
//! hits it ends the run.

use glam::Vec2;

use super::{Cadence, Game, GameKind};
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::highscores::{BestScore, Scoreboard};
use crate::input::{Direction, Intent};
use crate::renderer::{Color, Paint, Scene};
use crate::sim::{Body, Cooldown, IdCounter, RandomSource, Status};
use crate::tuning::DodgerTuning;

pub const LANE_COUNT: usize = 3;
pub const LANE_WIDTH: f32 = WORLD_WIDTH / LANE_COUNT as f32;
pub const PLAYER_WIDTH: f32 = 58.0;
pub const PLAYER_HEIGHT: f32 = 46.0;
pub const PLAYER_Y: f32 = WORLD_HEIGHT - 92.0;
pub const OBSTACLE_WIDTH: f32 = 62.0;
pub const OBSTACLE_HEIGHT: f32 = 44.0;

const START_LANE: usize = 1;
const SPAWN_Y: f32 = -OBSTACLE_HEIGHT - 10.0;
/// An obstacle counts once its top passes this line
const COUNT_LINE: f32 = PLAYER_Y + PLAYER_HEIGHT + 4.0;
const CULL_Y: f32 = WORLD_HEIGHT + 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    pub lane: usize,
    pub y: f32,
    pub counted: bool,
}

impl Obstacle {
    pub fn body(&self) -> Body {
        Body::rect(
            lane_x(self.lane, OBSTACLE_WIDTH),
            self.y,
            OBSTACLE_WIDTH,
            OBSTACLE_HEIGHT,
        )
    }
}

/// Left edge of an entity `width` wide centred in `lane`
pub fn lane_x(lane: usize, width: f32) -> f32 {
    lane as f32 * LANE_WIDTH + (LANE_WIDTH - width) / 2.0
}

pub struct Dodger {
    pub tuning: DodgerTuning,
    pub status: Status,
    pub board: Scoreboard,
    pub lane: usize,
    /// Current fall speed of every obstacle
    pub speed: f32,
    pub obstacles: Vec<Obstacle>,
    pub spawn: Cooldown,
    ids: IdCounter,
    rng: Box<dyn RandomSource>,
}

impl Dodger {
    pub fn new(tuning: DodgerTuning, rng: Box<dyn RandomSource>, best: BestScore) -> Self {
        let speed = tuning.base_speed;
        let spawn = Cooldown::new(tuning.first_spawn);
        Self {
            tuning,
            status: Status::Ready,
            board: Scoreboard::new(best),
            lane: START_LANE,
            speed,
            obstacles: Vec::new(),
            spawn,
            ids: IdCounter::default(),
            rng,
        }
    }

    pub fn start(&mut self) {
        self.lane = START_LANE;
        self.speed = self.tuning.base_speed;
        self.obstacles.clear();
        self.spawn = Cooldown::new(self.tuning.first_spawn);
        self.ids = IdCounter::default();
        self.board.reset();
        self.status = Status::Playing;
        log::info!("Neon Dodger: start");
    }

    /// Shift one lane, clamped to the outer lanes
    pub fn shift(&mut self, step: i32) {
        if !self.status.is_playing() {
            return;
        }
        let target = self.lane as i32 + step;
        self.lane = target.clamp(0, LANE_COUNT as i32 - 1) as usize;
    }

    pub fn player(&self) -> Body {
        Body::rect(
            lane_x(self.lane, PLAYER_WIDTH),
            PLAYER_Y,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
        )
    }

    fn game_over(&mut self) {
        self.status = Status::GameOver;
        self.board.finalize();
        log::info!("Neon Dodger: game over, score {}", self.board.score);
    }

    fn step(&mut self, dt: f32) {
        self.speed += dt * self.tuning.acceleration;

        if self.spawn.advance(dt) {
            let lane = self.rng.index(LANE_COUNT);
            let id = self.ids.next_id();
            self.obstacles.push(Obstacle {
                id,
                lane,
                y: SPAWN_Y,
                counted: false,
            });
            self.spawn.rearm(self.tuning.cooldown(self.board.score));
        }

        let fall = self.speed * dt;
        for obstacle in &mut self.obstacles {
            obstacle.y += fall;
        }

        let player = self.player();
        for i in 0..self.obstacles.len() {
            if !self.obstacles[i].counted && self.obstacles[i].y > COUNT_LINE {
                self.obstacles[i].counted = true;
                self.board.award(1);
            }
            if self.obstacles[i].body().overlaps(&player) {
                self.game_over();
                return;
            }
        }

        self.obstacles.retain(|obstacle| obstacle.y < CULL_Y);
    }
}

impl Game for Dodger {
    fn kind(&self) -> GameKind {
        GameKind::Dodger
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
            Intent::Move(Direction::Left) => self.shift(-1),
            Intent::Move(Direction::Right) => self.shift(1),
            Intent::PointerDown { x } => match self.status {
                Status::Playing if x < WORLD_WIDTH / 2.0 => self.shift(-1),
                Status::Playing => self.shift(1),
                Status::Paused => {}
                Status::Ready | Status::GameOver => self.start(),
            },
            Intent::Confirm | Intent::Primary if self.status.is_idle() => self.start(),
            Intent::Restart => self.start(),
            Intent::Pause => self.status = self.status.toggle_pause(),
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

    fn paint(&self, scene: &mut Scene) {
        scene.background(Paint::vertical(
            0.0,
            WORLD_HEIGHT,
            Color::hex(0x110b27),
            Color::hex(0x070910),
        ));

        let divider = Color::rgba(143, 255, 247, 0.17);
        for lane in 0..=LANE_COUNT {
            let x = lane as f32 * LANE_WIDTH;
            scene.line(Vec2::new(x, 0.0), Vec2::new(x, WORLD_HEIGHT), divider, 2.0);
        }

        for obstacle in &self.obstacles {
            let b = obstacle.body().bounds();
            scene.fill_rect(
                b.min.x,
                b.min.y,
                OBSTACLE_WIDTH,
                OBSTACLE_HEIGHT,
                Paint::linear(b.min, b.max, Color::hex(0xff5f89), Color::hex(0xff2f64)),
            );
            scene.stroke_rect(
                b.min.x + 1.0,
                b.min.y + 1.0,
                OBSTACLE_WIDTH - 2.0,
                OBSTACLE_HEIGHT - 2.0,
                Color::rgba(255, 231, 240, 0.46),
                1.0,
            );
        }

        let p = self.player().bounds();
        scene.fill_rect(
            p.min.x,
            p.min.y,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
            Paint::linear(p.min, p.max, Color::hex(0x2effdd), Color::hex(0x00a8ff)),
        );
        scene.fill_rect(
            p.min.x + 10.0,
            p.min.y + 10.0,
            PLAYER_WIDTH - 20.0,
            PLAYER_HEIGHT - 20.0,
            Color::rgba(0, 0, 0, 0.45),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::SequenceRng;
    use proptest::prelude::*;

    fn playing() -> Dodger {
        let mut g = Dodger::new(
            DodgerTuning::default(),
            Box::new(SequenceRng::constant(0.0)),
            BestScore::load(GameKind::Dodger.storage_key(), Box::new(MemoryStore::new())),
        );
        g.start();
        g
    }

    fn obstacle(id: u32, lane: usize, y: f32) -> Obstacle {
        Obstacle {
            id,
            lane,
            y,
            counted: false,
        }
    }

    #[test]
    fn test_same_lane_overlap_ends_run() {
        let mut g = playing();
        g.spawn.rearm(100.0);
        g.obstacles.push(obstacle(1, 1, 510.0));
        g.advance(0.016);
        assert_eq!(g.status, Status::GameOver);
    }

    #[test]
    fn test_touching_edge_is_not_a_hit() {
        let mut g = playing();
        g.spawn.rearm(100.0);
        // Bottom edge lands exactly on the ship's top edge
        g.obstacles.push(obstacle(1, 1, PLAYER_Y - OBSTACLE_HEIGHT));
        g.advance(0.0);
        assert_eq!(g.status, Status::Playing);
    }

    #[test]
    fn test_other_lane_passes_and_counts_once() {
        let mut g = playing();
        g.spawn.rearm(100.0);
        g.obstacles.push(obstacle(1, 0, 590.0));
        for _ in 0..10 {
            g.advance(0.016);
        }
        assert_eq!(g.status, Status::Playing);
        assert_eq!(g.score(), 1);
        assert!(g.obstacles[0].counted);
    }

    #[test]
    fn test_culled_below_world() {
        let mut g = playing();
        g.spawn.rearm(100.0);
        g.obstacles.push(obstacle(1, 2, 659.0));
        g.advance(0.016);
        assert!(g.obstacles.is_empty());
        assert_eq!(g.score(), 1);
    }

    #[test]
    fn test_first_spawn_and_speed_growth() {
        let mut g = playing();
        g.advance(0.03);
        g.advance(0.03);
        assert!(g.obstacles.is_empty());
        for _ in 0..7 {
            g.advance(0.03);
        }
        assert_eq!(g.obstacles.len(), 1);
        assert_eq!(g.obstacles[0].lane, 0);
        assert!((g.speed - (220.0 + 9.0 * 0.03 * 6.0)).abs() < 1e-3);
    }

    #[test]
    fn test_pointer_midline() {
        let mut g = playing();
        g.apply(Intent::PointerDown { x: 100.0 });
        assert_eq!(g.lane, 0);
        g.apply(Intent::PointerDown { x: 100.0 });
        assert_eq!(g.lane, 0);
        g.apply(Intent::PointerDown { x: 180.0 });
        assert_eq!(g.lane, 1);
        g.apply(Intent::PointerDown { x: 300.0 });
        g.apply(Intent::PointerDown { x: 300.0 });
        assert_eq!(g.lane, 2);
    }

    #[test]
    fn test_tap_starts_when_idle() {
        let mut g = Dodger::new(
            DodgerTuning::default(),
            Box::new(SequenceRng::constant(0.0)),
            BestScore::load("neon-dodger-best", Box::new(MemoryStore::new())),
        );
        g.apply(Intent::PointerDown { x: 10.0 });
        assert_eq!(g.status, Status::Playing);
        assert_eq!(g.lane, START_LANE);
    }

    proptest! {
        #[test]
        fn prop_ship_stays_in_world(moves in prop::collection::vec(any::<bool>(), 0..50)) {
            let mut g = playing();
            for left in moves {
                g.apply(Intent::Move(if left { Direction::Left } else { Direction::Right }));
                let b = g.player().bounds();
                prop_assert!(g.lane < LANE_COUNT);
                prop_assert!(b.min.x >= 0.0 && b.max.x <= WORLD_WIDTH);
            }
        }
    }
}
