//! Browser glue (wasm32 only)
//!
//! - `storage`: localStorage-backed best scores
//! - `canvas`: replays `Scene` draw lists on a 2D context
//! - `scheduler`: requestAnimationFrame / setInterval loops
//! - `listeners`: DOM subscriptions released on drop
//! - `mount`: wires a game to a canvas, its HUD and touch controls

mod canvas;
mod listeners;
mod mount;
mod scheduler;
mod storage;

pub use canvas::CanvasSurface;
pub use listeners::{Listener, ResizeWatch};
pub use mount::{init_logging, mount_all, mount_game, unmount_game};
pub use scheduler::WebScheduler;
pub use storage::LocalStore;
