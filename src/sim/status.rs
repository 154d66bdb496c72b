//! Session status machine
//!
//! ```text
//! ready --start--> playing --terminal--> gameover --restart--> playing
//! playing --pause--> paused --resume--> playing
//! ```

use serde::{Deserialize, Serialize};

/// Current phase of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    /// Fresh world, waiting for the first intent
    #[default]
    Ready,
    /// Simulation loop running
    Playing,
    /// Loop suspended, world preserved
    Paused,
    /// Run ended; only a restart leaves this state
    GameOver,
}

impl Status {
    pub fn is_playing(self) -> bool {
        self == Status::Playing
    }

    /// Ready or GameOver: the next start-like intent (re)initializes the world
    pub fn is_idle(self) -> bool {
        matches!(self, Status::Ready | Status::GameOver)
    }

    /// Pause toggle; a no-op outside Playing/Paused
    pub fn toggle_pause(self) -> Self {
        match self {
            Status::Playing => Status::Paused,
            Status::Paused => Status::Playing,
            other => other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ready => "ready",
            Status::Playing => "playing",
            Status::Paused => "paused",
            Status::GameOver => "gameover",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_pause() {
        assert_eq!(Status::Playing.toggle_pause(), Status::Paused);
        assert_eq!(Status::Paused.toggle_pause(), Status::Playing);
        assert_eq!(Status::Ready.toggle_pause(), Status::Ready);
        assert_eq!(Status::GameOver.toggle_pause(), Status::GameOver);
    }

    #[test]
    fn test_idle_states() {
        assert!(Status::Ready.is_idle());
        assert!(Status::GameOver.is_idle());
        assert!(!Status::Playing.is_idle());
        assert!(!Status::Paused.is_idle());
    }
}
