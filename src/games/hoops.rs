//! Tap Tap Shoots
//!
//! Every tap throws the ball up and toward a drifting hoop. The ball bounces
//! off walls, ceiling and the two rim posts; dropping through the rim scores
//! once per shot. A shot that lands on the floor without scoring ends the run.

use glam::Vec2;

use super::{Cadence, Game, GameKind};
use crate::clamp;
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::highscores::{BestScore, Scoreboard};
use crate::input::{Direction, Intent};
use crate::renderer::{Color, Paint, Scene};
use crate::sim::collision::{bounce_high, bounce_low, resolve_contact};
use crate::sim::{Cooldown, RandomSource, Status, circle_point_contact};
use crate::tuning::HoopsTuning;

pub const FLOOR_HEIGHT: f32 = 72.0;
pub const FLOOR_Y: f32 = WORLD_HEIGHT - FLOOR_HEIGHT;
pub const BALL_RADIUS: f32 = 16.0;
pub const BALL_START: Vec2 = Vec2::new(116.0, FLOOR_Y - BALL_RADIUS);
pub const HOOP_START: Vec2 = Vec2::new(WORLD_WIDTH - 56.0, 270.0);
pub const HOOP_WIDTH: f32 = 68.0;
pub const RIM_INNER_RADIUS: f32 = 20.0;
pub const RIM_RADIUS: f32 = 7.0;
/// Rim posts sit slightly below the hoop's centre line
const RIM_DROP: f32 = 2.0;
/// Horizontal distance at which a shot gets full aim assist
const AIM_RANGE: f32 = 180.0;
/// Hoop targets stay this far from the right wall
const HOOP_RIGHT_MARGIN: f32 = 62.0;
const FIRST_RETARGET: f32 = 0.8;
const SCORE_RETARGET: f32 = 0.35;
const BACKBOARD_WIDTH: f32 = 10.0;
const BACKBOARD_HEIGHT: f32 = 110.0;

/// Hoop behaviour at a given score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    /// Easing rate toward the target, per second
    pub follow: f32,
    pub retarget_base: f32,
    pub retarget_random: f32,
    /// Leftmost target x as a share of the world width
    pub x_min_ratio: f32,
    pub y_padding: f32,
}

impl Difficulty {
    /// Interpolate from easy to hard as `score` approaches `max_score`
    pub fn at(score: u32, max_score: f32) -> Self {
        let n = clamp(score as f32 / max_score.max(1.0), 0.0, 1.0);
        Self {
            follow: 3.2 + n * 2.2,
            retarget_base: 2.1 - n * 0.9,
            retarget_random: 0.85 - n * 0.25,
            x_min_ratio: 0.62 - n * 0.1,
            y_padding: 190.0 - n * 32.0,
        }
    }
}

pub struct Hoops {
    pub tuning: HoopsTuning,
    pub status: Status,
    pub board: Scoreboard,
    pub ball: Vec2,
    /// Ball position before the current step, for the rim-plane crossing test
    pub prev_ball: Vec2,
    pub velocity: Vec2,
    /// Ball is in flight from a shot
    pub launched: bool,
    /// Current shot already scored
    pub shot_scored: bool,
    /// Shots fired this run
    pub shots: u32,
    pub hoop: Vec2,
    pub hoop_target: Vec2,
    pub retarget: Cooldown,
    rng: Box<dyn RandomSource>,
}

impl Hoops {
    pub fn new(tuning: HoopsTuning, rng: Box<dyn RandomSource>, best: BestScore) -> Self {
        Self {
            tuning,
            status: Status::Ready,
            board: Scoreboard::new(best),
            ball: BALL_START,
            prev_ball: BALL_START,
            velocity: Vec2::ZERO,
            launched: false,
            shot_scored: false,
            shots: 0,
            hoop: HOOP_START,
            hoop_target: HOOP_START,
            retarget: Cooldown::new(0.0),
            rng,
        }
    }

    pub fn start(&mut self) {
        self.ball = BALL_START;
        self.prev_ball = BALL_START;
        self.velocity = Vec2::ZERO;
        self.launched = false;
        self.shot_scored = false;
        self.shots = 0;
        self.hoop = HOOP_START;
        self.board.reset();
        self.retarget_hoop();
        self.retarget = Cooldown::new(FIRST_RETARGET);
        self.status = Status::Playing;
        log::info!("Tap Tap Shoots: start");
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::at(self.board.score, self.tuning.difficulty_score)
    }

    /// Pick a new point for the hoop to drift toward
    fn retarget_hoop(&mut self) {
        let d = self.difficulty();
        let x = self
            .rng
            .range(WORLD_WIDTH * d.x_min_ratio, WORLD_WIDTH - HOOP_RIGHT_MARGIN);
        let y = self.rng.range(d.y_padding, FLOOR_Y - d.y_padding);
        self.hoop_target = Vec2::new(x, y);
    }

    /// Rim post centres (left, right)
    pub fn rims(&self) -> [Vec2; 2] {
        let half = HOOP_WIDTH / 2.0;
        [
            Vec2::new(self.hoop.x - half, self.hoop.y + RIM_DROP),
            Vec2::new(self.hoop.x + half, self.hoop.y + RIM_DROP),
        ]
    }

    /// Throw the ball. Starts the run from `Ready`; ignored after game over.
    pub fn shoot(&mut self) {
        match self.status {
            Status::Ready => self.start(),
            Status::Playing => {}
            Status::Paused | Status::GameOver => return,
        }
        let aim = clamp((self.hoop.x - self.ball.x) / AIM_RANGE, -1.0, 1.0);
        let max_vx = self.tuning.max_shot_vx;
        self.velocity.y = -self.tuning.shot_speed;
        self.velocity.x = clamp(
            self.velocity.x * self.tuning.shot_carry + self.tuning.aim_strength * aim,
            -max_vx,
            max_vx,
        );
        self.launched = true;
        self.shot_scored = false;
        self.shots += 1;
        log::trace!("shot {} aim {aim:.2}", self.shots);
    }

    fn game_over(&mut self) {
        self.status = Status::GameOver;
        self.board.finalize();
        log::info!(
            "Tap Tap Shoots: game over, score {} in {} shots",
            self.board.score,
            self.shots
        );
    }

    fn step(&mut self, dt: f32) {
        let t = &self.tuning;
        self.prev_ball = self.ball;

        self.velocity.y += t.gravity * dt;
        self.velocity.x *= t.air_drag;
        self.ball += self.velocity * dt;

        let d = self.difficulty();
        if self.retarget.advance(dt) {
            self.retarget_hoop();
            let wait = d.retarget_base + self.rng.unit() * d.retarget_random;
            self.retarget.rearm(wait);
        }
        let ease = (dt * d.follow).min(1.0);
        self.hoop += (self.hoop_target - self.hoop) * ease;

        let t = &self.tuning;
        for rim in self.rims() {
            let contact = circle_point_contact(self.ball, BALL_RADIUS, rim, RIM_RADIUS);
            resolve_contact(
                &mut self.ball,
                &mut self.velocity,
                &contact,
                t.rim_restitution,
                t.rim_damping,
            );
        }

        // Walls after the rims so a push-out can never leave the court
        let (x_min, x_max) = (BALL_RADIUS, WORLD_WIDTH - BALL_RADIUS);
        bounce_low(&mut self.ball.x, &mut self.velocity.x, x_min, t.wall_damping);
        bounce_high(&mut self.ball.x, &mut self.velocity.x, x_max, t.wall_damping);
        bounce_low(&mut self.ball.y, &mut self.velocity.y, BALL_RADIUS, t.ceiling_damping);

        let crossed = self.prev_ball.y < self.hoop.y
            && self.ball.y >= self.hoop.y
            && self.velocity.y > 0.0;
        let inside = (self.ball.x - self.hoop.x).abs() <= RIM_INNER_RADIUS - BALL_RADIUS * 0.2;
        if crossed && inside && !self.shot_scored {
            self.shot_scored = true;
            self.board.award(1);
            self.retarget_hoop();
            self.retarget.rearm(SCORE_RETARGET);
        }

        self.land();
    }

    fn land(&mut self) {
        if self.ball.y + BALL_RADIUS < FLOOR_Y {
            return;
        }
        self.ball.y = FLOOR_Y - BALL_RADIUS;

        if !self.launched {
            self.velocity = Vec2::ZERO;
            return;
        }
        if self.velocity.y < 0.0 {
            return;
        }
        if !self.shot_scored {
            self.game_over();
            return;
        }

        let t = &self.tuning;
        if self.velocity.y > t.floor_bounce_min {
            self.velocity.y = -self.velocity.y * t.floor_bounce;
            self.velocity.x *= t.floor_bounce_friction;
        } else {
            self.velocity.y = 0.0;
            self.velocity.x *= t.roll_friction;
            if self.velocity.x.abs() < t.rest_speed {
                self.velocity.x = 0.0;
                self.launched = false;
                self.shot_scored = false;
            }
        }
    }

    fn paint_hoop(&self, scene: &mut Scene) {
        let c = self.hoop;
        let half = HOOP_WIDTH / 2.0;

        scene.fill_rect(
            c.x + half + 8.0,
            c.y - BACKBOARD_HEIGHT / 2.0,
            BACKBOARD_WIDTH,
            BACKBOARD_HEIGHT,
            Color::hex(0xf0f0f0),
        );
        let post = Color::hex(0xcb8b29);
        scene.fill_rect(c.x + half + 17.0, c.y - 18.0, 18.0, 36.0, post);
        scene.fill_rect(c.x + half + 12.0, c.y + 16.0, 10.0, 52.0, post);

        let pi = std::f32::consts::PI;
        scene.arc(
            c,
            Vec2::new(half, 11.0),
            (pi * 1.02, pi * -0.02),
            true,
            Color::hex(0x0e93f0),
            4.0,
        );

        let net = Color::rgba(232, 239, 245, 0.95);
        for i in 0..7 {
            let t = i as f32 / 6.0;
            scene.line(
                Vec2::new(c.x - half + HOOP_WIDTH * t, c.y + 6.0),
                Vec2::new(c.x + (t - 0.5) * 34.0, c.y + 40.0),
                net,
                2.0,
            );
        }
        for i in 0..4 {
            let y = c.y + 16.0 + i as f32 * 8.0;
            let inset = i as f32 * 2.0;
            scene.line(
                Vec2::new(c.x - 20.0 + inset, y),
                Vec2::new(c.x + 20.0 - inset, y),
                net,
                2.0,
            );
        }
    }
}

impl Game for Hoops {
    fn kind(&self) -> GameKind {
        GameKind::Hoops
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
                self.shoot()
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
        let center = Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
        scene.background(Paint::Radial {
            inner: center,
            inner_radius: 40.0,
            outer: center,
            outer_radius: WORLD_HEIGHT * 0.9,
            stops: vec![(0.0, Color::hex(0x4b4b4b)), (1.0, Color::hex(0x2f3136))],
        });
        scene.fill_rect(0.0, FLOOR_Y, WORLD_WIDTH, FLOOR_HEIGHT, Color::rgba(34, 35, 39, 0.88));
        scene.fill_rect(0.0, FLOOR_Y + 52.0, WORLD_WIDTH, 10.0, Color::rgba(20, 21, 24, 0.95));

        self.paint_hoop(scene);

        let b = self.ball;
        scene.circle(
            b,
            BALL_RADIUS,
            Paint::Radial {
                inner: b - Vec2::splat(5.0),
                inner_radius: 2.0,
                outer: b,
                outer_radius: BALL_RADIUS + 2.0,
                stops: vec![
                    (0.0, Color::hex(0xffd46a)),
                    (0.4, Color::hex(0xffae1f)),
                    (1.0, Color::hex(0xde6209)),
                ],
            },
        );
        let seam = Color::hex(0x9c3c08);
        scene.line(
            b - Vec2::new(BALL_RADIUS, 0.0),
            b + Vec2::new(BALL_RADIUS, 0.0),
            seam,
            2.0,
        );
        scene.line(
            b - Vec2::new(0.0, BALL_RADIUS),
            b + Vec2::new(0.0, BALL_RADIUS),
            seam,
            2.0,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::SequenceRng;
    use proptest::prelude::*;

    fn game() -> Hoops {
        Hoops::new(
            HoopsTuning::default(),
            Box::new(SequenceRng::constant(0.5)),
            BestScore::load(GameKind::Hoops.storage_key(), Box::new(MemoryStore::new())),
        )
    }

    /// Playing, hoop parked at `hoop` with no drift
    fn parked(hoop: Vec2) -> Hoops {
        let mut g = game();
        g.start();
        g.hoop = hoop;
        g.hoop_target = hoop;
        g.retarget.rearm(1000.0);
        g
    }

    #[test]
    fn test_first_tap_starts_and_shoots() {
        let mut g = game();
        g.apply(Intent::PointerDown { x: 0.0 });
        assert_eq!(g.status, Status::Playing);
        assert!(g.launched);
        assert_eq!(g.velocity, Vec2::new(250.0, -600.0));
        assert_eq!(g.shots, 1);
    }

    #[test]
    fn test_start_retargets_hoop() {
        let mut g = game();
        g.start();
        assert_eq!(g.hoop, HOOP_START);
        // x in [223.2, 298), y in [190, 378)
        assert!((g.hoop_target.x - 260.6).abs() < 1e-3);
        assert!((g.hoop_target.y - 284.0).abs() < 1e-3);
        assert!((g.retarget.remaining() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_unscored_landing_ends_run() {
        let mut g = parked(Vec2::new(200.0, 300.0));
        g.launched = true;
        g.ball = Vec2::new(100.0, FLOOR_Y - BALL_RADIUS + 1.0);
        g.velocity = Vec2::new(0.0, 100.0);
        g.advance(0.0);
        assert_eq!(g.status, Status::GameOver);
    }

    #[test]
    fn test_resting_ball_is_harmless() {
        let mut g = parked(Vec2::new(200.0, 300.0));
        for _ in 0..30 {
            g.advance(0.016);
        }
        assert_eq!(g.status, Status::Playing);
        assert_eq!(g.ball, BALL_START);
        assert_eq!(g.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_scoring_once_per_shot() {
        let mut g = parked(Vec2::new(200.0, 300.0));
        g.launched = true;
        g.ball = Vec2::new(200.0, 295.0);
        g.velocity = Vec2::new(0.0, 400.0);
        g.advance(0.016);
        assert_eq!(g.score(), 1);
        assert!(g.shot_scored);
        assert!((g.retarget.remaining() - 0.35).abs() < 1e-6);

        // Bounce back up through the plane and fall again: still one point
        g.ball = Vec2::new(g.hoop.x, g.hoop.y - 5.0);
        g.velocity = Vec2::new(0.0, 400.0);
        g.advance(0.016);
        assert_eq!(g.score(), 1);
    }

    #[test]
    fn test_outside_rim_does_not_score() {
        let mut g = parked(Vec2::new(200.0, 300.0));
        g.launched = true;
        // Clear of both rim posts, well outside the inner radius
        g.ball = Vec2::new(260.0, 295.0);
        g.velocity = Vec2::new(0.0, 400.0);
        g.advance(0.016);
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn test_rim_bounce() {
        let mut g = parked(Vec2::new(200.0, 300.0));
        g.launched = true;
        g.ball = Vec2::new(166.0, 282.0);
        g.velocity = Vec2::new(0.0, 300.0);
        g.advance(0.0);
        assert!((g.ball.y - 279.0).abs() < 1e-4);
        assert!((g.velocity.y - (-172.2)).abs() < 1e-3);
    }

    #[test]
    fn test_wall_bounce_damps() {
        let mut g = parked(Vec2::new(200.0, 300.0));
        g.launched = true;
        g.ball = Vec2::new(10.0, 200.0);
        g.velocity = Vec2::new(-100.0, 0.0);
        g.advance(0.0);
        assert_eq!(g.ball.x, BALL_RADIUS);
        assert!((g.velocity.x - 100.0 * 0.997 * 0.72).abs() < 1e-3);
    }

    #[test]
    fn test_scored_ball_bounces_then_settles() {
        let mut g = parked(Vec2::new(200.0, 300.0));
        g.launched = true;
        g.shot_scored = true;
        g.ball = Vec2::new(100.0, FLOOR_Y - BALL_RADIUS);
        g.velocity = Vec2::new(50.0, 200.0);
        g.advance(0.0);
        assert_eq!(g.status, Status::Playing);
        assert!((g.velocity.y - (-92.0)).abs() < 1e-3);

        g.velocity = Vec2::new(10.0, 50.0);
        g.advance(0.0);
        assert_eq!(g.velocity, Vec2::ZERO);
        assert!(!g.launched);
        assert!(!g.shot_scored);
    }

    #[test]
    fn test_difficulty_ramps() {
        let easy = Difficulty::at(0, 30.0);
        let hard = Difficulty::at(30, 30.0);
        assert_eq!(Difficulty::at(90, 30.0), hard);
        assert!(hard.follow > easy.follow);
        assert!(hard.retarget_base < easy.retarget_base);
        assert!((hard.y_padding - 158.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_ball_stays_in_court(
            seed in any::<u64>(),
            taps in prop::collection::vec(any::<bool>(), 1..300),
        ) {
            let mut g = Hoops::new(
                HoopsTuning::default(),
                Box::new(crate::sim::GameRng::new(seed)),
                BestScore::load("tap-tap-shoots-best", Box::new(MemoryStore::new())),
            );
            g.start();
            for tap in taps {
                if tap {
                    g.apply(Intent::Primary);
                }
                g.advance(0.016);
                prop_assert!(g.ball.x >= BALL_RADIUS && g.ball.x <= WORLD_WIDTH - BALL_RADIUS);
                prop_assert!(g.ball.y >= BALL_RADIUS && g.ball.y <= FLOOR_Y - BALL_RADIUS);
            }
        }
    }
}
