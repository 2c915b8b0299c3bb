//! Core types and definitions for the MARKSMAN simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, the weapon and environment catalogs, the game state
//! aggregate, commands, snapshots, events, and constants.
//! It has no dependency on any rendering or runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod environments;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
pub mod weapons;
