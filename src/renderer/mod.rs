//! Rendering module
//!
//! Backend-agnostic: games emit a `Scene` in world units, the `Viewport`
//! decides how big the canvas is and how world units map onto it.

pub mod scene;
pub mod viewport;

pub use scene::{Color, DrawCmd, Paint, Scene};
pub use viewport::Viewport;
