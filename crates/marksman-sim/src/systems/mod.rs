//! Systems that operate on the simulation each tick or per command.
//!
//! Systems are free functions over the target `World` and the session
//! `GameState`. They do not own state.

pub mod combat;
pub mod movement;
pub mod progression;
pub mod snapshot;
pub mod wave_spawner;
