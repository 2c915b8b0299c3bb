//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::MovementPattern;

/// Session-unique target identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// Gameplay data of a shootable target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    /// Base reward before the combo multiplier.
    pub points: u32,
    pub pattern: MovementPattern,
    /// Phase offset on the circular track (radians), assigned at spawn.
    pub phase_offset: f32,
}

/// Hit points. A target dies when `current` drops to zero or below.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

/// Opaque presentation handle. The simulation only passes it along.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VisualHandle {
    /// RGB color hint (0xRRGGBB).
    pub color: u32,
}

// Position and Velocity from types.rs are used as components too.
