//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// How a target moves between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementPattern {
    /// Holds its spawn position.
    #[default]
    Static,
    /// Straight-line drift that bounces off the arena bounds.
    Linear,
    /// Follows a fixed circle around the player, driven by the session clock.
    Circular,
    /// Randomly jittering velocity with damping.
    Erratic,
}

/// Weapon archetype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Pistol,
    Smg,
    Shotgun,
    Rifle,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no session running.
    #[default]
    MainMenu,
    /// A session is running.
    Active,
}

impl MovementPattern {
    /// Base reward for destroying a target with this pattern.
    pub fn base_points(self) -> u32 {
        match self {
            MovementPattern::Static => 50,
            MovementPattern::Linear => 100,
            MovementPattern::Circular | MovementPattern::Erratic => 150,
        }
    }

    /// Starting health for a target with this pattern.
    pub fn base_health(self) -> i32 {
        match self {
            MovementPattern::Static => 50,
            _ => 100,
        }
    }
}
