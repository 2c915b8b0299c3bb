//! Target motion.
//!
//! `dt` is already dilated by bullet time. Circular movers ignore it and
//! read the undilated session clock instead, so bullet time does not slow
//! them down.

use glam::Vec3;
use hecs::World;
use rand_chacha::ChaCha8Rng;

use marksman_core::components::Target;
use marksman_core::constants::*;
use marksman_core::enums::MovementPattern;
use marksman_core::types::{Position, Velocity};

use crate::world_setup::centered;

/// Move every live target.
pub fn run(world: &mut World, rng: &mut ChaCha8Rng, dt: f32, clock_secs: f64) {
    for (_entity, (target, pos, vel)) in
        world.query_mut::<(&Target, &mut Position, &mut Velocity)>()
    {
        update_target(target, pos, vel, dt, clock_secs, rng);
    }
}

/// Advance one target by `dt` seconds.
pub fn update_target(
    target: &Target,
    pos: &mut Position,
    vel: &mut Velocity,
    dt: f32,
    clock_secs: f64,
    rng: &mut ChaCha8Rng,
) {
    match target.pattern {
        MovementPattern::Static => {}
        MovementPattern::Linear => {
            pos.0 += vel.0 * dt;
            if pos.0.x.abs() > ARENA_BOUND {
                vel.0.x = -vel.0.x;
            }
            if pos.0.z.abs() > ARENA_BOUND {
                vel.0.z = -vel.0.z;
            }
        }
        MovementPattern::Circular => {
            let angle = clock_secs + target.phase_offset as f64;
            pos.0.x = angle.cos() as f32 * CIRCULAR_RADIUS;
            pos.0.z = angle.sin() as f32 * CIRCULAR_RADIUS;
        }
        MovementPattern::Erratic => {
            let jitter = Vec3::new(
                centered(rng, ERRATIC_JITTER_XZ),
                centered(rng, ERRATIC_JITTER_Y),
                centered(rng, ERRATIC_JITTER_XZ),
            );
            vel.0 += jitter * dt;
            vel.0 *= ERRATIC_DAMPING;
            pos.0 += vel.0 * dt;

            pos.0 = pos.0.clamp_length_max(ARENA_BOUND);
            pos.0.y = pos.0.y.clamp(ERRATIC_HEIGHT_MIN, ERRATIC_HEIGHT_MAX);
        }
    }
}
