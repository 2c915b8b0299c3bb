//! Wave generation: sizing, ring placement, and advancing to the next wave.

use glam::Vec3;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use marksman_core::components::TargetId;
use marksman_core::constants::*;
use marksman_core::events::GameEvent;
use marksman_core::state::GameState;
use marksman_core::types::SimTime;

use crate::scheduler::{DeferredKind, Scheduler};
use crate::systems::snapshot::target_view;
use crate::world_setup::{self, TargetSpec};

/// Number of targets in a wave: grows by two per wave, capped at 20.
pub fn wave_size(wave: u32) -> u32 {
    WAVE_BASE_TARGETS
        .saturating_add(WAVE_TARGETS_PER_WAVE.saturating_mul(wave))
        .min(WAVE_MAX_TARGETS)
}

/// Generate the targets of a wave.
///
/// Targets sit on a ring around the player at evenly spaced angles, each
/// with its own random radius and height.
pub fn spawn_wave(rng: &mut ChaCha8Rng, wave: u32, next_id: &mut u32) -> Vec<TargetSpec> {
    let count = wave_size(wave);
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            let radius = rng.gen_range(SPAWN_RADIUS_MIN..SPAWN_RADIUS_MAX);
            let height = rng.gen_range(SPAWN_HEIGHT_MIN..SPAWN_HEIGHT_MAX);
            let position = Vec3::new(angle.cos() * radius, height, angle.sin() * radius);
            let pattern = world_setup::roll_pattern(rng);

            let id = TargetId(*next_id);
            *next_id += 1;
            world_setup::make_target(rng, id, position, pattern)
        })
        .collect()
}

/// Replace the playfield with the targets of `state.wave`.
pub fn populate(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    state: &mut GameState,
    next_id: &mut u32,
    events: &mut Vec<GameEvent>,
) {
    world.clear();
    let specs = spawn_wave(rng, state.wave, next_id);
    for spec in &specs {
        world_setup::spawn_target(world, spec);
        events.push(GameEvent::TargetSpawned {
            target: target_view(
                &spec.target,
                &spec.position,
                &spec.velocity,
                &spec.health,
                &spec.visual,
            ),
        });
    }

    state.targets_remaining = specs.len() as u32;
    events.push(GameEvent::WaveStarted {
        wave: state.wave,
        target_count: state.targets_remaining,
    });
    log::info!("wave {} started with {} targets", state.wave, specs.len());
}

/// The last target of a wave fell: queue the next wave.
pub fn schedule_advance(
    state: &GameState,
    scheduler: &mut Scheduler,
    time: &SimTime,
    events: &mut Vec<GameEvent>,
) {
    scheduler.schedule(DeferredKind::WaveAdvance, time.tick, WAVE_ADVANCE_DELAY_SECS);
    events.push(GameEvent::WaveCleared { wave: state.wave });
    log::info!("wave {} cleared", state.wave);
}

/// Deferred wave advance: bump the counter, pay the clear bonus, spawn.
pub fn advance_wave(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    state: &mut GameState,
    next_id: &mut u32,
    events: &mut Vec<GameEvent>,
) {
    state.wave += 1;
    state.currency += WAVE_CLEAR_BONUS;
    populate(world, rng, state, next_id, events);
}
