//! Simulation engine for MARKSMAN.
//!
//! Owns the hecs world of live targets and the session state, runs
//! systems at a fixed tick rate, and produces GameStateSnapshots for
//! the frontend.

pub mod engine;
pub mod rejection;
pub mod scheduler;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimError, SimulationEngine};
pub use hit_test::{RayHitTest, SphereHitTest};
pub use marksman_core as core;

#[cfg(test)]
mod tests;
