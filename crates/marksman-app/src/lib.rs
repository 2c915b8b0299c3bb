//! MARKSMAN host application.
//!
//! This crate runs the simulation engine on a dedicated game-loop thread,
//! loads its configuration, and drives headless demo sessions.

pub mod autopilot;
pub mod config;
pub mod error;
pub mod game_loop;
pub mod state;

pub use marksman_core as core;
