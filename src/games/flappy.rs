//! Fluppy Bird
//!
//! Gravity pulls the bird down, a flap resets its vertical velocity. Pipe
//! pairs scroll in from the right on a fixed period; touching a pipe, the
//! ground or the ceiling ends the run.

use glam::Vec2;

use super::{Cadence, Game, GameKind};
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::highscores::{BestScore, Scoreboard};
use crate::input::{Direction, Intent};
use crate::renderer::{Color, Paint, Scene};
use crate::sim::{Body, Cooldown, IdCounter, RandomSource, Status};
use crate::tuning::FlappyTuning;

pub const BIRD_X: f32 = 92.0;
pub const BIRD_WIDTH: f32 = 52.0;
pub const BIRD_HEIGHT: f32 = 40.0;
/// Bird y at the start of a run
pub const BIRD_START_Y: f32 = WORLD_HEIGHT / 2.0 - 40.0;

/// Hitbox inset from the sprite's left/top edges
const HITBOX_INSET: f32 = 4.0;
/// Hitbox shrink relative to the sprite size
const HITBOX_TRIM_X: f32 = 10.0;
const HITBOX_TRIM_Y: f32 = 8.0;

/// Gap centres are kept this far from the ceiling and the ground
const GAP_MARGIN: f32 = 130.0;
const PIPE_SPAWN_X: f32 = WORLD_WIDTH + 20.0;
/// Pipes are dropped once their right edge is this far off-screen
const PIPE_CULL_MARGIN: f32 = 10.0;

/// A pipe pair sharing one gap
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Vertical centre of the gap
    pub gap_y: f32,
    pub scored: bool,
}

pub struct Flappy {
    pub tuning: FlappyTuning,
    pub status: Status,
    pub board: Scoreboard,
    pub bird_y: f32,
    pub bird_velocity: f32,
    pub pipes: Vec<Pipe>,
    pub spawn: Cooldown,
    ids: IdCounter,
    rng: Box<dyn RandomSource>,
}

impl Flappy {
    pub fn new(tuning: FlappyTuning, rng: Box<dyn RandomSource>, best: BestScore) -> Self {
        Self {
            tuning,
            status: Status::Ready,
            board: Scoreboard::new(best),
            bird_y: BIRD_START_Y,
            bird_velocity: 0.0,
            pipes: Vec::new(),
            spawn: Cooldown::new(0.0),
            ids: IdCounter::default(),
            rng,
        }
    }

    /// Reset the world and enter `Playing`
    pub fn start(&mut self) {
        self.bird_y = BIRD_START_Y;
        self.bird_velocity = 0.0;
        self.pipes.clear();
        // First pipe appears on the first frame
        self.spawn = Cooldown::new(0.0);
        self.ids = IdCounter::default();
        self.board.reset();
        self.status = Status::Playing;
        log::info!("Fluppy Bird: start");
    }

    pub fn flap(&mut self) {
        match self.status {
            Status::Ready => self.start(),
            Status::Playing => {}
            Status::Paused | Status::GameOver => return,
        }
        self.bird_velocity = self.tuning.flap_velocity;
    }

    fn ground_y(&self) -> f32 {
        WORLD_HEIGHT - self.tuning.ground_height
    }

    /// Collision box of the bird, tighter than its sprite
    pub fn bird_hitbox(&self) -> Body {
        Body::rect(
            BIRD_X + HITBOX_INSET,
            self.bird_y + HITBOX_INSET,
            BIRD_WIDTH - HITBOX_TRIM_X,
            BIRD_HEIGHT - HITBOX_TRIM_Y,
        )
    }

    /// Solid parts of a pipe pair: above the gap and below it down to the ground
    pub fn pipe_bodies(&self, pipe: &Pipe) -> [Body; 2] {
        let half_gap = self.tuning.pipe_gap / 2.0;
        let width = self.tuning.pipe_width;
        let top_height = pipe.gap_y - half_gap;
        let bottom_y = pipe.gap_y + half_gap;
        [
            Body::rect(pipe.x, 0.0, width, top_height),
            Body::rect(pipe.x, bottom_y, width, self.ground_y() - bottom_y),
        ]
    }

    fn spawn_pipe(&mut self) {
        let min_gap = GAP_MARGIN;
        let max_gap = self.ground_y() - GAP_MARGIN;
        let gap_y = self.rng.range(min_gap, max_gap).floor();
        let id = self.ids.next_id();
        self.pipes.push(Pipe {
            id,
            x: PIPE_SPAWN_X,
            gap_y,
            scored: false,
        });
    }

    fn game_over(&mut self) {
        self.status = Status::GameOver;
        self.board.finalize();
        log::info!("Fluppy Bird: game over, score {}", self.board.score);
    }

    /// Sprite tilt in degrees, nose-down when falling
    pub fn bird_tilt(&self) -> f32 {
        (self.bird_velocity / -self.tuning.flap_velocity.min(-1.0) * 55.0).clamp(-30.0, 50.0)
    }

    fn step(&mut self, dt: f32) {
        if self.spawn.advance(dt) {
            self.spawn_pipe();
            self.spawn.rearm(self.tuning.spawn_period);
        }

        self.bird_velocity += self.tuning.gravity * dt;
        self.bird_y += self.bird_velocity * dt;

        let scroll = self.tuning.pipe_speed * dt;
        let width = self.tuning.pipe_width;
        for pipe in &mut self.pipes {
            pipe.x -= scroll;
        }
        self.pipes.retain(|pipe| pipe.x + width > -PIPE_CULL_MARGIN);

        let bird = self.bird_hitbox();
        let bounds = bird.bounds();
        if bounds.min.y <= 0.0 || bounds.max.y >= self.ground_y() {
            self.game_over();
            return;
        }

        let mut crashed = false;
        let mut passed = 0;
        for i in 0..self.pipes.len() {
            let [top, bottom] = self.pipe_bodies(&self.pipes[i]);
            if bird.overlaps(&top) || bird.overlaps(&bottom) {
                crashed = true;
                break;
            }
            let pipe = &mut self.pipes[i];
            if !pipe.scored && pipe.x + width < bounds.min.x {
                pipe.scored = true;
                passed += 1;
            }
        }
        for _ in 0..passed {
            self.board.award(1);
        }
        if crashed {
            self.game_over();
        }
    }
}

impl Game for Flappy {
    fn kind(&self) -> GameKind {
        GameKind::Flappy
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
            Intent::Primary | Intent::Move(Direction::Up) | Intent::PointerDown { .. } => {
                self.flap()
            }
            Intent::Confirm if self.status.is_idle() => self.start(),
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
            Color::hex(0x173866),
            Color::hex(0x0b1428),
        ));
        scene.circle(Vec2::new(290.0, 96.0), 30.0, Color::rgba(255, 237, 153, 0.4));

        let width = self.tuning.pipe_width;
        for pipe in &self.pipes {
            for body in self.pipe_bodies(pipe) {
                let b = body.bounds();
                scene.fill_rect(
                    b.min.x,
                    b.min.y,
                    b.width(),
                    b.height(),
                    Paint::linear(
                        Vec2::new(b.min.x, 0.0),
                        Vec2::new(b.max.x, 0.0),
                        Color::hex(0x2fe28c),
                        Color::hex(0x0fa05a),
                    ),
                );
            }
            // Lips facing the gap
            let half_gap = self.tuning.pipe_gap / 2.0;
            let lip = Color::hex(0x0b8f4e);
            scene.fill_rect(pipe.x - 4.0, pipe.gap_y - half_gap - 22.0, width + 8.0, 22.0, lip);
            scene.fill_rect(pipe.x - 4.0, pipe.gap_y + half_gap, width + 8.0, 22.0, lip);
        }

        let ground_y = self.ground_y();
        scene.fill_rect(
            0.0,
            ground_y,
            WORLD_WIDTH,
            self.tuning.ground_height,
            Paint::vertical(ground_y, WORLD_HEIGHT, Color::hex(0x2f8f55), Color::hex(0x1d6139)),
        );

        let center = Vec2::new(BIRD_X + BIRD_WIDTH / 2.0, self.bird_y + BIRD_HEIGHT / 2.0);
        scene.with_transform(center, self.bird_tilt().to_radians(), |s| {
            s.ellipse(Vec2::ZERO, Vec2::new(22.0, 16.0), Color::hex(0xffd54f));
            s.circle(Vec2::new(8.0, -5.0), 5.2, Color::hex(0xffffff));
            s.circle(Vec2::new(9.0, -5.0), 2.1, Color::hex(0x111111));
            s.fill_rect(17.0, -2.0, 12.0, 6.0, Color::hex(0xff8f00));
        });
    }
}
