//! Snapshot system: queries the target world and the session state and
//! builds a complete GameStateSnapshot.
//!
//! Read-only: it never modifies the world.

use hecs::World;

use marksman_core::components::*;
use marksman_core::enums::GamePhase;
use marksman_core::environments::EnvironmentConfig;
use marksman_core::events::GameEvent;
use marksman_core::state::*;
use marksman_core::types::{Position, SimTime, Velocity};
use marksman_core::weapons::upgrade_cost;

/// Build a complete GameStateSnapshot from the current world and state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    state: &GameState,
    environment: &EnvironmentConfig,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        environment: Some(environment.clone()),
        hud: build_hud(state),
        weapon: Some(WeaponView {
            stats: state.weapon().clone(),
            upgrade_cost: upgrade_cost(state.weapon()),
        }),
        unlocked_weapons: state.unlocked_weapons.clone(),
        targets: build_targets(world),
        events,
    }
}

fn build_hud(state: &GameState) -> HudView {
    HudView {
        score: state.score,
        combo: state.combo,
        combo_timer: state.combo_timer,
        combo_multiplier: state.combo_multiplier,
        bullet_time_active: state.bullet_time_active,
        bullet_time_charge: state.bullet_time_charge,
        currency: state.currency,
        wave: state.wave,
        targets_remaining: state.targets_remaining,
        ammo: state.ammo,
        reloading: state.reloading,
        sensitivity: state.sensitivity,
        aim: state.aim,
        menu_open: state.menu_open,
    }
}

/// Build TargetView list from all target entities, ordered by id.
fn build_targets(world: &World) -> Vec<TargetView> {
    let mut targets: Vec<TargetView> = world
        .query::<(&Target, &Position, &Velocity, &Health, &VisualHandle)>()
        .iter()
        .map(|(_, (target, pos, vel, health, visual))| {
            target_view(target, pos, vel, health, visual)
        })
        .collect();

    targets.sort_by_key(|t| t.id);
    targets
}

pub fn target_view(
    target: &Target,
    position: &Position,
    velocity: &Velocity,
    health: &Health,
    visual: &VisualHandle,
) -> TargetView {
    TargetView {
        id: target.id,
        position: *position,
        velocity: *velocity,
        pattern: target.pattern,
        points: target.points,
        health: health.current,
        max_health: health.max,
        color: visual.color,
    }
}
