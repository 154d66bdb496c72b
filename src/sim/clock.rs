//! Frame timing and spawn timers

use crate::consts::MAX_FRAME_DT;

/// Converts display-refresh timestamps into a clamped simulation delta
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt: max_dt.max(0.0),
        }
    }

    /// Forget the previous timestamp; the next frame yields `dt = 0`
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Seconds since the previous frame, clamped to `[0, max_dt]`
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }
}

/// Countdown timer driving periodic spawns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    remaining: f32,
}

impl Cooldown {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Count down by `dt`; returns true once the timer has expired
    pub fn advance(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }

    pub fn rearm(&mut self, seconds: f32) {
        self.remaining = seconds;
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(1000.0), 0.0);
        let dt = clock.tick(1016.0);
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_large_gap_is_clamped() {
        let mut clock = FrameClock::default();
        clock.tick(0.0);
        // Tab resumed after five seconds in the background
        assert_eq!(clock.tick(5000.0), MAX_FRAME_DT);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::default();
        clock.tick(100.0);
        assert_eq!(clock.tick(50.0), 0.0);
    }

    #[test]
    fn test_reset_restarts_delta() {
        let mut clock = FrameClock::default();
        clock.tick(0.0);
        clock.tick(16.0);
        clock.reset();
        assert_eq!(clock.tick(900.0), 0.0);
    }

    #[test]
    fn test_cooldown_fires_and_rearms() {
        let mut cd = Cooldown::new(0.25);
        assert!(!cd.advance(0.1));
        assert!(!cd.advance(0.1));
        assert!(cd.advance(0.1));
        cd.rearm(1.0);
        assert!(!cd.advance(0.5));
        assert!((cd.remaining() - 0.5).abs() < 1e-6);
    }
}
