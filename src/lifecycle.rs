//! Lifecycle controller
//!
//! Keeps exactly one scheduled loop alive while a game is playing and none
//! otherwise. The platform supplies the `Scheduler` (requestAnimationFrame or
//! setInterval on the web, a recorder in tests); `sync` is called after every
//! intent and every tick so status changes start or stop the loop.

use crate::games::{Cadence, Game};
use crate::input::Intent;
use crate::sim::FrameClock;

/// Something that can run a game's loop
pub trait Scheduler {
    /// Begin driving callbacks at `cadence`. Only called when nothing is scheduled.
    fn schedule(&mut self, cadence: Cadence);

    /// Stop the current loop
    fn cancel(&mut self);
}

pub struct Lifecycle<S: Scheduler> {
    scheduler: S,
    active: Option<Cadence>,
    clock: FrameClock,
}

impl<S: Scheduler> Lifecycle<S> {
    pub fn new(scheduler: S, max_frame_dt: f32) -> Self {
        Self {
            scheduler,
            active: None,
            clock: FrameClock::new(max_frame_dt),
        }
    }

    /// Cadence of the running loop, if any
    pub fn active(&self) -> Option<Cadence> {
        self.active
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Match the scheduled loop to the game's status and cadence
    pub fn sync(&mut self, game: &dyn Game) {
        let wanted = game.status().is_playing().then(|| game.cadence());
        if wanted == self.active {
            return;
        }
        self.cancel();
        if let Some(cadence) = wanted {
            self.clock.reset();
            self.scheduler.schedule(cadence);
            self.active = Some(cadence);
            log::debug!("{}: loop scheduled at {cadence:?}", game.kind());
        }
    }

    /// Idempotent; a no-op when nothing is scheduled
    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            self.scheduler.cancel();
        }
    }

    /// Apply an intent and bring the loop in line with the result
    pub fn dispatch(&mut self, game: &mut dyn Game, intent: Intent) {
        game.apply(intent);
        self.sync(game);
    }

    /// Pause-on-hide hook
    pub fn suspend(&mut self, game: &mut dyn Game) {
        game.suspend();
        self.sync(game);
    }

    /// One scheduled callback. `now_ms` is the refresh timestamp for frame
    /// loops and ignored for interval loops.
    pub fn tick(&mut self, game: &mut dyn Game, now_ms: f64) {
        if !self.is_running() {
            return;
        }
        let dt = match self.active {
            Some(Cadence::Frame) => self.clock.tick(now_ms),
            _ => 0.0,
        };
        game.advance(dt);
        self.sync(game);
    }

    /// Unmount path: stop everything
    pub fn teardown(&mut self) {
        self.cancel();
    }
}

impl<S: Scheduler> Drop for Lifecycle<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Scheduler that only records calls; drives headless runs and tests
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingScheduler {
    pub scheduled: Vec<Cadence>,
    pub cancels: usize,
}

impl RecordingScheduler {
    /// Number of loops currently alive according to the record
    pub fn live(&self) -> usize {
        self.scheduled.len().saturating_sub(self.cancels)
    }
}

impl Scheduler for RecordingScheduler {
    fn schedule(&mut self, cadence: Cadence) {
        self.scheduled.push(cadence);
    }

    fn cancel(&mut self) {
        self.cancels += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::GameKind;
    use crate::games::snake::{Cell, Snake};
    use crate::highscores::{BestScore, MemoryStore};
    use crate::input::Direction;
    use crate::sim::{GameRng, Status};
    use crate::tuning::{SnakeTuning, Tuning};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session(kind: GameKind) -> (Box<dyn Game>, Lifecycle<RecordingScheduler>) {
        let game = kind.create(
            &Tuning::default(),
            Box::new(GameRng::new(11)),
            Box::new(MemoryStore::new()),
        );
        (game, Lifecycle::new(RecordingScheduler::default(), 0.032))
    }

    #[test]
    fn test_start_schedules_once() {
        let (mut game, mut life) = session(GameKind::Flappy);
        life.sync(game.as_ref());
        assert!(!life.is_running());

        life.dispatch(game.as_mut(), Intent::Confirm);
        life.sync(game.as_ref());
        assert_eq!(life.active(), Some(Cadence::Frame));
        assert_eq!(life.scheduler().scheduled, vec![Cadence::Frame]);
    }

    #[test]
    fn test_pause_cancels_and_resume_reschedules() {
        let (mut game, mut life) = session(GameKind::Dodger);
        life.dispatch(game.as_mut(), Intent::Restart);
        life.dispatch(game.as_mut(), Intent::Pause);
        assert!(!life.is_running());
        assert_eq!(life.scheduler().cancels, 1);

        life.dispatch(game.as_mut(), Intent::Pause);
        assert!(life.is_running());
        assert_eq!(life.scheduler().scheduled.len(), 2);
        assert_eq!(life.scheduler().live(), 1);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (mut game, mut life) = session(GameKind::Meteor);
        life.dispatch(game.as_mut(), Intent::Restart);
        life.cancel();
        life.cancel();
        life.teardown();
        assert_eq!(life.scheduler().cancels, 1);
    }

    #[test]
    fn test_first_frame_after_resume_is_zero() {
        let (mut game, mut life) = session(GameKind::Flappy);
        life.dispatch(game.as_mut(), Intent::Restart);
        life.tick(game.as_mut(), 1000.0);
        life.tick(game.as_mut(), 1016.0);
        life.dispatch(game.as_mut(), Intent::Pause);
        life.dispatch(game.as_mut(), Intent::Pause);
        // A long gap while paused must not leak into the next step
        let before = game.score();
        life.tick(game.as_mut(), 90_000.0);
        assert_eq!(game.status(), Status::Playing);
        assert_eq!(game.score(), before);
    }

    #[test]
    fn test_interval_change_reschedules() {
        let mut snake = Snake::new(
            SnakeTuning::default(),
            Box::new(GameRng::new(1)),
            BestScore::load("snake-best-score", Box::new(MemoryStore::new())),
        );
        let mut life = Lifecycle::new(RecordingScheduler::default(), 0.032);
        life.dispatch(&mut snake, Intent::Move(Direction::Right));
        assert_eq!(life.active(), Some(Cadence::Interval { ms: 140 }));

        snake.food = Some(Cell::new(11, 10));
        life.tick(&mut snake, 0.0);
        assert_eq!(snake.score(), 10);
        assert_eq!(life.active(), Some(Cadence::Interval { ms: 136 }));
        assert_eq!(
            life.scheduler().scheduled,
            vec![Cadence::Interval { ms: 140 }, Cadence::Interval { ms: 136 }]
        );
        assert_eq!(life.scheduler().live(), 1);
    }

    #[test]
    fn test_game_over_stops_loop() {
        let (mut game, mut life) = session(GameKind::Flappy);
        life.dispatch(game.as_mut(), Intent::Restart);
        let mut now = 0.0;
        while game.status() == Status::Playing {
            now += 16.0;
            life.tick(game.as_mut(), now);
        }
        assert_eq!(game.status(), Status::GameOver);
        assert!(!life.is_running());
        assert_eq!(life.scheduler().live(), 0);
        // Stray callback after cancel does nothing
        life.tick(game.as_mut(), now + 16.0);
        assert_eq!(game.status(), Status::GameOver);
    }

    struct SharedScheduler(Rc<RefCell<RecordingScheduler>>);

    impl Scheduler for SharedScheduler {
        fn schedule(&mut self, cadence: Cadence) {
            self.0.borrow_mut().schedule(cadence);
        }

        fn cancel(&mut self) {
            self.0.borrow_mut().cancel();
        }
    }

    #[test]
    fn test_drop_cancels_running_loop() {
        let record = Rc::new(RefCell::new(RecordingScheduler::default()));
        let mut game = GameKind::Tetris.create(
            &Tuning::default(),
            Box::new(GameRng::new(5)),
            Box::new(MemoryStore::new()),
        );
        {
            let mut life = Lifecycle::new(SharedScheduler(record.clone()), 0.032);
            life.dispatch(game.as_mut(), Intent::Confirm);
            assert!(life.is_running());
        }
        assert_eq!(record.borrow().live(), 0);
    }
}
