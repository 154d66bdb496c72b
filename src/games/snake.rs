//! Snake
//!
//! Grid game on a fixed interval. Up to two buffered turns are drained one
//! per tick, food makes the snake grow and tick faster, filling the whole
//! board wins.

use std::collections::VecDeque;

use glam::Vec2;

use super::{Cadence, Game, GameKind};
use crate::highscores::{BestScore, Scoreboard};
use crate::input::{Direction, DirectionQueue, Intent};
use crate::renderer::{Color, Paint, Scene};
use crate::sim::{RandomSource, Status};
use crate::tuning::SnakeTuning;

pub const GRID_SIZE: i32 = 20;
pub const CELL_SIZE: f32 = 20.0;
pub const WORLD_SIZE: f32 = GRID_SIZE as f32 * CELL_SIZE;

/// Food never spawns within this Manhattan distance of the head, if avoidable
const FOOD_SAFE_DISTANCE: i32 = 2;
const START_LENGTH: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn in_bounds(self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }

    pub fn center(self) -> Vec2 {
        Vec2::new(
            self.x as f32 * CELL_SIZE + CELL_SIZE / 2.0,
            self.y as f32 * CELL_SIZE + CELL_SIZE / 2.0,
        )
    }
}

/// Three cells from the board centre, trailing opposite to `facing`
pub fn initial_body(facing: Direction) -> VecDeque<Cell> {
    let head = Cell::new(GRID_SIZE / 2, GRID_SIZE / 2);
    let back = facing.opposite();
    let mut body = VecDeque::with_capacity((GRID_SIZE * GRID_SIZE) as usize);
    let mut cell = head;
    for _ in 0..START_LENGTH {
        body.push_back(cell);
        cell = cell.step(back);
    }
    body
}

pub struct Snake {
    pub tuning: SnakeTuning,
    pub status: Status,
    pub board: Scoreboard,
    /// Head first
    pub body: VecDeque<Cell>,
    pub direction: Direction,
    pub queue: DirectionQueue,
    pub food: Option<Cell>,
    pub tick_ms: u32,
    /// Last run ended by filling the board
    pub won: bool,
    rng: Box<dyn RandomSource>,
}

impl Snake {
    pub fn new(tuning: SnakeTuning, rng: Box<dyn RandomSource>, best: BestScore) -> Self {
        let tick_ms = tuning.base_tick_ms;
        let mut snake = Self {
            tuning,
            status: Status::Ready,
            board: Scoreboard::new(best),
            body: initial_body(Direction::Right),
            direction: Direction::Right,
            queue: DirectionQueue::default(),
            food: None,
            tick_ms,
            won: false,
            rng,
        };
        snake.food = snake.spawn_food();
        snake
    }

    pub fn start(&mut self, facing: Direction) {
        self.body = initial_body(facing);
        self.direction = facing;
        self.queue.clear();
        self.food = self.spawn_food();
        self.tick_ms = self.tuning.base_tick_ms;
        self.won = false;
        self.board.reset();
        self.status = Status::Playing;
        log::info!("Snake: start facing {facing:?}");
    }

    pub fn head(&self) -> Cell {
        // Body always holds at least the starting cells
        self.body.front().copied().unwrap_or(Cell::new(0, 0))
    }

    /// Random free cell, preferring ones away from the head; `None` on a full board
    pub fn spawn_food(&mut self) -> Option<Cell> {
        let head = self.head();
        let free: Vec<Cell> = (0..GRID_SIZE)
            .flat_map(|y| (0..GRID_SIZE).map(move |x| Cell::new(x, y)))
            .filter(|cell| !self.body.contains(cell))
            .collect();
        if free.is_empty() {
            return None;
        }
        let safe: Vec<Cell> = free
            .iter()
            .copied()
            .filter(|cell| cell.manhattan(head) > FOOD_SAFE_DISTANCE)
            .collect();
        let pool = if safe.is_empty() { free } else { safe };
        Some(pool[self.rng.index(pool.len())])
    }

    fn pause(&mut self) {
        if self.status.is_playing() {
            self.queue.clear();
            self.status = Status::Paused;
        }
    }

    fn resume(&mut self) {
        if self.status == Status::Paused {
            self.status = Status::Playing;
        }
    }

    fn steer(&mut self, dir: Direction) {
        match self.status {
            Status::Ready | Status::GameOver => self.start(dir),
            Status::Paused => {
                self.queue.push(self.direction, dir);
                self.resume();
            }
            Status::Playing => {
                self.queue.push(self.direction, dir);
            }
        }
    }

    fn end(&mut self, won: bool) {
        self.won = won;
        self.status = Status::GameOver;
        self.queue.clear();
        self.board.finalize();
        log::info!(
            "Snake: {} with score {}",
            if won { "board cleared" } else { "crashed" },
            self.board.score
        );
    }

    /// One discrete move
    pub fn tick(&mut self) {
        self.direction = self.queue.drain(self.direction);
        let next = self.head().step(self.direction);

        if !next.in_bounds() {
            self.end(false);
            return;
        }

        let eating = self.food == Some(next);
        // The tail moves out of the way unless the snake is growing
        let solid = if eating {
            self.body.len()
        } else {
            self.body.len().saturating_sub(1)
        };
        if self.body.iter().take(solid).any(|&cell| cell == next) {
            self.end(false);
            return;
        }

        self.body.push_front(next);
        if !eating {
            self.body.pop_back();
            return;
        }

        self.board.award(self.tuning.food_points);
        self.tick_ms = self
            .tick_ms
            .saturating_sub(self.tuning.tick_step_ms)
            .max(self.tuning.min_tick_ms);
        self.food = self.spawn_food();
        if self.food.is_none() {
            self.end(true);
        }
    }

    fn head_angle(&self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self.direction {
            Direction::Up => -FRAC_PI_2,
            Direction::Down => FRAC_PI_2,
            Direction::Left => PI,
            Direction::Right => 0.0,
        }
    }
}

impl Game for Snake {
    fn kind(&self) -> GameKind {
        GameKind::Snake
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
            Intent::Move(dir) => self.steer(dir),
            Intent::Confirm | Intent::Primary => match self.status {
                Status::Playing => self.pause(),
                Status::Paused => self.resume(),
                Status::Ready | Status::GameOver => self.start(Direction::Right),
            },
            Intent::Pause => match self.status {
                Status::Playing => self.pause(),
                Status::Paused => self.resume(),
                _ => {}
            },
            Intent::Restart => self.start(Direction::Right),
            _ => {}
        }
    }

    fn advance(&mut self, _dt: f32) {
        if self.status.is_playing() {
            self.tick();
        }
    }

    fn cadence(&self) -> Cadence {
        Cadence::Interval { ms: self.tick_ms }
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        vec![
            ("length", self.body.len().to_string()),
            ("tick", format!("{}ms", self.tick_ms)),
            ("outcome", if self.won { "won" } else { "" }.to_string()),
        ]
    }

    fn paint(&self, scene: &mut Scene) {
        scene.background(Paint::vertical(
            0.0,
            WORLD_SIZE,
            Color::hex(0x060f16),
            Color::hex(0x05090e),
        ));

        let grid = Color::rgba(140, 223, 206, 0.07);
        for i in 0..=GRID_SIZE {
            let at = i as f32 * CELL_SIZE;
            scene.line(Vec2::new(at, 0.0), Vec2::new(at, WORLD_SIZE), grid, 1.0);
            scene.line(Vec2::new(0.0, at), Vec2::new(WORLD_SIZE, at), grid, 1.0);
        }

        if let Some(food) = self.food {
            let c = food.center();
            scene.circle(
                c,
                CELL_SIZE * 0.33,
                Paint::Radial {
                    inner: c - Vec2::splat(3.0),
                    inner_radius: 2.0,
                    outer: c,
                    outer_radius: CELL_SIZE / 2.0 + 3.0,
                    stops: vec![
                        (0.0, Color::hex(0xffd9f4)),
                        (0.55, Color::hex(0xff5fd2)),
                        (1.0, Color::hex(0x8b1fb4)),
                    ],
                },
            );
            scene.ellipse(
                c + Vec2::new(1.0, -CELL_SIZE * 0.34),
                Vec2::new(3.0, 2.0),
                Color::hex(0x7fffd2),
            );
        }

        let centers: Vec<Vec2> = self.body.iter().map(|cell| cell.center()).collect();
        for pair in centers.windows(2) {
            scene.line(pair[0], pair[1], Color::hex(0x103f34), CELL_SIZE * 0.78);
        }
        for pair in centers.windows(2) {
            scene.line(pair[0], pair[1], Color::hex(0x2ac789), CELL_SIZE * 0.62);
        }

        let last = centers.len().saturating_sub(1).max(1) as f32;
        for (index, &center) in centers.iter().enumerate().skip(1).rev() {
            let progress = 1.0 - index as f32 / last;
            let radius = CELL_SIZE * (0.24 + progress * 0.14);
            scene.circle(
                center,
                radius,
                Paint::Radial {
                    inner: center - Vec2::splat(2.0),
                    inner_radius: 1.0,
                    outer: center,
                    outer_radius: radius,
                    stops: vec![
                        (0.0, Color::hex(0xa9ffe0)),
                        (0.65, Color::hex(0x3ac996)),
                        (1.0, Color::hex(0x11664a)),
                    ],
                },
            );
        }

        let playing = self.status.is_playing();
        scene.with_transform(self.head().center(), self.head_angle(), |s| {
            s.ellipse(
                Vec2::ZERO,
                Vec2::new(CELL_SIZE * 0.6, CELL_SIZE * 0.5),
                Paint::Radial {
                    inner: Vec2::splat(-2.0),
                    inner_radius: 2.0,
                    outer: Vec2::ZERO,
                    outer_radius: CELL_SIZE * 0.7,
                    stops: vec![
                        (0.0, Color::hex(0xdcffef)),
                        (0.42, Color::hex(0x59eeb2)),
                        (1.0, Color::hex(0x168b60)),
                    ],
                },
            );
            for eye_y in [-CELL_SIZE * 0.15, CELL_SIZE * 0.15] {
                s.circle(Vec2::new(CELL_SIZE * 0.2, eye_y), CELL_SIZE * 0.09, Color::hex(0xeefdf6));
                s.circle(Vec2::new(CELL_SIZE * 0.24, eye_y), CELL_SIZE * 0.045, Color::hex(0x0d2a20));
            }
            if playing {
                let tongue = Color::hex(0xff88cd);
                let root = Vec2::new(CELL_SIZE * 0.52, 0.0);
                s.line(root, Vec2::new(CELL_SIZE * 0.83, -3.0), tongue, 2.0);
                s.line(root, Vec2::new(CELL_SIZE * 0.83, 3.0), tongue, 2.0);
            }
        });
    }
}
