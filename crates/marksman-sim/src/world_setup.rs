//! Entity spawn factories for populating the target world.
//!
//! Targets are built as plain `TargetSpec` values first so wave
//! generation can be tested without a world, then spawned as hecs
//! component bundles.

use glam::Vec3;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use marksman_core::components::*;
use marksman_core::constants::*;
use marksman_core::enums::MovementPattern;
use marksman_core::types::{Position, Velocity};

/// Everything needed to spawn one target.
#[derive(Debug, Clone, Copy)]
pub struct TargetSpec {
    pub target: Target,
    pub health: Health,
    pub position: Position,
    pub velocity: Velocity,
    pub visual: VisualHandle,
}

/// Draw a movement pattern: static 30%, linear 40%, circular 15%, erratic 15%.
pub fn roll_pattern(rng: &mut ChaCha8Rng) -> MovementPattern {
    let roll: f64 = rng.gen();
    if roll < PATTERN_WEIGHT_STATIC {
        MovementPattern::Static
    } else if roll < PATTERN_WEIGHT_STATIC + PATTERN_WEIGHT_LINEAR {
        MovementPattern::Linear
    } else if roll < PATTERN_WEIGHT_STATIC + PATTERN_WEIGHT_LINEAR + PATTERN_WEIGHT_CIRCULAR {
        MovementPattern::Circular
    } else {
        MovementPattern::Erratic
    }
}

/// Build a target at `position` with the pattern's points, health and
/// starting velocity.
pub fn make_target(
    rng: &mut ChaCha8Rng,
    id: TargetId,
    position: Vec3,
    pattern: MovementPattern,
) -> TargetSpec {
    let velocity = match pattern {
        MovementPattern::Linear => Vec3::new(
            centered(rng, LINEAR_SPEED_SPREAD),
            0.0,
            centered(rng, LINEAR_SPEED_SPREAD),
        ),
        MovementPattern::Erratic => Vec3::new(
            centered(rng, ERRATIC_SPEED_SPREAD_XZ),
            centered(rng, ERRATIC_SPEED_SPREAD_Y),
            centered(rng, ERRATIC_SPEED_SPREAD_XZ),
        ),
        MovementPattern::Static | MovementPattern::Circular => Vec3::ZERO,
    };

    let health = pattern.base_health();
    let color = TARGET_PALETTE[rng.gen_range(0..TARGET_PALETTE.len())];

    TargetSpec {
        target: Target {
            id,
            points: pattern.base_points(),
            pattern,
            phase_offset: rng.gen_range(0.0..std::f32::consts::TAU),
        },
        health: Health {
            current: health,
            max: health,
        },
        position: Position(position),
        velocity: Velocity(velocity),
        visual: VisualHandle { color },
    }
}

/// Spawn a target entity from its spec.
pub fn spawn_target(world: &mut World, spec: &TargetSpec) -> hecs::Entity {
    world.spawn((
        spec.target,
        spec.health,
        spec.position,
        spec.velocity,
        spec.visual,
    ))
}

/// Uniform sample in [-spread/2, spread/2).
pub(crate) fn centered(rng: &mut ChaCha8Rng, spread: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * spread
}
