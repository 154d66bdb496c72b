//! Shared simulation engine
//!
//! Building blocks every game composes. This module must stay pure:
//! - Time only enters through an explicit `dt`
//! - Randomness only through an injected `RandomSource`
//! - Stable iteration order (entities kept in spawn order, ids never reused)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod rng;
pub mod shape;
pub mod status;

pub use clock::{Cooldown, FrameClock};
pub use collision::{Contact, circle_point_contact, reflect_damped, reflect_velocity};
pub use rng::{GameRng, RandomSource, SequenceRng, shuffle};
pub use shape::{Aabb, Body, Shape};
pub use status::Status;

/// Monotonic entity id counter, reset only with the world that owns it
#[derive(Debug, Clone)]
pub struct IdCounter {
    next: u32,
}

impl Default for IdCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdCounter {
    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}
