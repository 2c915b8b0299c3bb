//! Combat resolver: turns a trigger pull into a shot, a hit test, damage,
//! and on a kill the score, combo, currency and bullet-time payout.

use glam::Vec3;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use marksman_core::components::{Health, Target, TargetId, VisualHandle};
use marksman_core::constants::*;
use marksman_core::events::GameEvent;
use marksman_core::state::{combo_multiplier, GameState};
use marksman_core::types::{Position, SimTime};

use crate::hit_test::{HitCandidate, RayHitTest};
use crate::rejection::Rejection;
use crate::scheduler::{DeferredKind, Scheduler};
use crate::systems::{progression, wave_spawner};

/// Slack for comparing tick-quantized times against millisecond cooldowns.
const COOLDOWN_EPSILON_MS: f64 = 1e-6;

/// What an accepted shot did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    Miss,
    Hit {
        target: TargetId,
        remaining_health: i32,
    },
    Kill {
        target: TargetId,
        reward: KillReward,
    },
}

/// Payout of one kill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillReward {
    /// Score added.
    pub points: u64,
    /// Currency added.
    pub currency: u64,
    /// Combo after the kill.
    pub combo: u32,
    /// Multiplier applied to this kill.
    pub multiplier: u32,
    /// This kill filled the meter and started bullet time.
    pub bullet_time_triggered: bool,
}

/// Camera eye position.
pub fn camera_position() -> Vec3 {
    Vec3::new(0.0, CAMERA_HEIGHT, 0.0)
}

/// Perturb the aim direction by the weapon spread.
///
/// Random offsets are added to the x and y components of the forward
/// vector before renormalizing, so the spread is axis-biased rather than
/// a uniform cone.
pub fn shot_direction(forward: Vec3, spread: f32, rng: &mut ChaCha8Rng) -> Vec3 {
    let mut direction = forward;
    direction.x += (rng.gen::<f32>() - 0.5) * spread;
    direction.y += (rng.gen::<f32>() - 0.5) * spread;
    direction.normalize()
}

/// Fire the equipped weapon once.
#[allow(clippy::too_many_arguments)]
pub fn fire(
    world: &mut World,
    state: &mut GameState,
    rng: &mut ChaCha8Rng,
    hit_test: &dyn RayHitTest,
    scheduler: &mut Scheduler,
    time: &SimTime,
    events: &mut Vec<GameEvent>,
) -> Result<ShotOutcome, Rejection> {
    check_can_fire(state, time)?;

    state.last_shot_ms = Some(time.elapsed_ms());
    state.ammo -= 1;

    let origin = camera_position();
    let direction = shot_direction(state.aim.forward(), state.weapon().spread(), rng);
    events.push(GameEvent::ShotFired {
        origin: origin + direction * MUZZLE_OFFSET,
        direction,
    });

    let candidates = live_candidates(world);
    let outcome = match hit_test.query(origin, direction, &candidates) {
        Some(hit) => apply_hit(world, state, scheduler, time, events, hit.target, hit.impact_point),
        None => ShotOutcome::Miss,
    };

    if state.ammo == 0 {
        // Cannot be reloading here: check_can_fire rejected that.
        let _ = progression::reload(state, scheduler, time, events);
    }

    Ok(outcome)
}

/// Fire preconditions, in the order a player would notice them.
fn check_can_fire(state: &GameState, time: &SimTime) -> Result<(), Rejection> {
    if state.menu_open {
        return Err(Rejection::MenuOpen);
    }
    if state.reloading {
        return Err(Rejection::Reloading);
    }
    if state.ammo == 0 {
        return Err(Rejection::OutOfAmmo);
    }
    if let Some(last) = state.last_shot_ms {
        let since = time.elapsed_ms() - last;
        let fire_rate = state.weapon().fire_rate_ms;
        if since + COOLDOWN_EPSILON_MS < fire_rate {
            return Err(Rejection::Cooldown {
                remaining_ms: fire_rate - since,
            });
        }
    }
    Ok(())
}

/// Live targets offered to the hit test.
pub fn live_candidates(world: &World) -> Vec<HitCandidate> {
    let mut candidates: Vec<HitCandidate> = world
        .query::<(&Target, &Position)>()
        .iter()
        .map(|(_, (target, pos))| HitCandidate {
            id: target.id,
            position: pos.0,
        })
        .collect();
    candidates.sort_by_key(|c| c.id);
    candidates
}

/// Apply weapon damage to the hit target and resolve a kill.
fn apply_hit(
    world: &mut World,
    state: &mut GameState,
    scheduler: &mut Scheduler,
    time: &SimTime,
    events: &mut Vec<GameEvent>,
    target_id: TargetId,
    impact_point: Vec3,
) -> ShotOutcome {
    let damage = state.weapon().damage as i32;

    let struck = world
        .query_mut::<(&Target, &mut Health, &VisualHandle)>()
        .into_iter()
        .find(|(_, (target, _, _))| target.id == target_id)
        .map(|(entity, (target, health, visual))| {
            health.current -= damage;
            (entity, target.points, health.current, visual.color)
        });

    // A hit test that reports a target outside the live set is a miss.
    let Some((entity, points, remaining_health, color)) = struck else {
        log::warn!("hit test reported unknown target {:?}", target_id);
        return ShotOutcome::Miss;
    };

    events.push(GameEvent::TargetHit {
        impact_point,
        color,
    });

    if remaining_health > 0 {
        return ShotOutcome::Hit {
            target: target_id,
            remaining_health,
        };
    }

    let _ = world.despawn(entity);
    events.push(GameEvent::TargetRemoved { id: target_id });

    let reward = register_kill(state, points);
    events.push(GameEvent::TargetDestroyed {
        id: target_id,
        reward: reward.points,
        combo: reward.combo,
        multiplier: reward.multiplier,
    });

    if reward.bullet_time_triggered {
        scheduler.schedule(DeferredKind::BulletTimeEnd, time.tick, BULLET_TIME_DURATION_SECS);
        events.push(GameEvent::BulletTimeStarted);
        log::info!("bullet time engaged");
    }

    state.targets_remaining = world.query::<&Target>().iter().count() as u32;
    if state.targets_remaining == 0 {
        wave_spawner::schedule_advance(state, scheduler, time, events);
    }

    ShotOutcome::Kill {
        target: target_id,
        reward,
    }
}

/// Fold a kill into score, combo, currency and bullet-time charge.
///
/// The combo is incremented first; the multiplier for this kill is the
/// one derived from the new combo.
pub fn register_kill(state: &mut GameState, points: u32) -> KillReward {
    state.combo += 1;
    state.combo_multiplier = combo_multiplier(state.combo);
    state.combo_timer = COMBO_WINDOW_SECS;

    let reward = points as u64 * state.combo_multiplier as u64;
    let currency = (reward as f64 * CURRENCY_REWARD_FRACTION).floor() as u64;
    state.score += reward;
    state.currency += currency;

    let charge = state.bullet_time_charge + BULLET_TIME_CHARGE_PER_KILL;
    let triggered = charge >= BULLET_TIME_CHARGE_MAX && !state.bullet_time_active;
    state.bullet_time_charge = charge.min(BULLET_TIME_CHARGE_MAX);
    if triggered {
        state.bullet_time_active = true;
    }

    KillReward {
        points: reward,
        currency,
        combo: state.combo,
        multiplier: state.combo_multiplier,
        bullet_time_triggered: triggered,
    }
}
