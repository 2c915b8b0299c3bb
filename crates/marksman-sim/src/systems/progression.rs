//! Progression and economy transitions: reload, weapon switching,
//! purchases, upgrades, combo decay, bullet-time expiry, settings.
//!
//! Every function takes the session's `GameState` explicitly. Rejected
//! commands return a `Rejection` and leave the state unchanged.

use marksman_core::constants::*;
use marksman_core::events::GameEvent;
use marksman_core::state::GameState;
use marksman_core::types::SimTime;
use marksman_core::weapons::{upgrade_cost, upgrade_weapon, WeaponCatalog};

use crate::rejection::Rejection;
use crate::scheduler::{DeferredKind, Scheduler};

/// Start reloading the equipped weapon.
pub fn reload(
    state: &mut GameState,
    scheduler: &mut Scheduler,
    time: &SimTime,
    events: &mut Vec<GameEvent>,
) -> Result<(), Rejection> {
    if state.reloading {
        return Err(Rejection::AlreadyReloading);
    }

    let duration_secs = state.weapon().reload_secs;
    state.reloading = true;
    scheduler.schedule(DeferredKind::ReloadComplete, time.tick, duration_secs);
    events.push(GameEvent::ReloadStarted { duration_secs });
    Ok(())
}

/// Deferred reload completion. Fills the magazine of whatever weapon is
/// equipped now, which may differ from the one that started the reload.
pub fn finish_reload(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.ammo = state.weapon().magazine_size;
    state.reloading = false;
    events.push(GameEvent::ReloadFinished);
}

/// Equip the next unlocked weapon (wrapping) with a full magazine.
/// The reloading flag is left alone.
pub fn cycle_weapon(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.current_weapon = (state.current_weapon + 1) % state.unlocked_weapons.len();
    state.ammo = state.weapon().magazine_size;
    events.push(GameEvent::WeaponSwitched {
        weapon_id: state.weapon().id.clone(),
    });
}

/// Buy a catalog weapon at its base stats.
pub fn purchase_weapon(
    state: &mut GameState,
    catalog: &WeaponCatalog,
    weapon_id: &str,
    events: &mut Vec<GameEvent>,
) -> Result<(), Rejection> {
    let weapon = catalog
        .get(weapon_id)
        .map_err(|_| Rejection::UnknownWeapon(weapon_id.to_string()))?;

    if state.owns(weapon_id) {
        return Err(Rejection::AlreadyOwned(weapon_id.to_string()));
    }
    if state.currency < weapon.cost {
        return Err(Rejection::InsufficientFunds {
            needed: weapon.cost,
            available: state.currency,
        });
    }

    state.currency -= weapon.cost;
    state.unlocked_weapons.push(weapon.clone());
    events.push(GameEvent::WeaponPurchased {
        weapon_id: weapon.id.clone(),
        cost: weapon.cost,
    });
    Ok(())
}

/// Upgrade the equipped weapon by one level.
pub fn upgrade_current_weapon(
    state: &mut GameState,
    events: &mut Vec<GameEvent>,
) -> Result<(), Rejection> {
    let cost = upgrade_cost(state.weapon());
    if state.currency < cost {
        return Err(Rejection::InsufficientFunds {
            needed: cost,
            available: state.currency,
        });
    }

    let upgraded = upgrade_weapon(state.weapon());
    state.currency -= cost;
    events.push(GameEvent::WeaponUpgraded {
        weapon_id: upgraded.id.clone(),
        level: upgraded.level,
        cost,
    });
    let slot = state.current_weapon;
    state.unlocked_weapons[slot] = upgraded;
    Ok(())
}

/// Count the combo window down; an expired window drops the streak.
pub fn decay_combo(state: &mut GameState, dt: f64) {
    if state.combo_timer <= 0.0 {
        return;
    }
    state.combo_timer = (state.combo_timer - dt).max(0.0);
    if state.combo_timer == 0.0 {
        state.combo = 0;
        state.combo_multiplier = 1;
    }
}

/// Deferred bullet-time expiry.
pub fn end_bullet_time(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.bullet_time_active = false;
    state.bullet_time_charge = 0.0;
    events.push(GameEvent::BulletTimeEnded);
}

pub fn set_sensitivity(state: &mut GameState, value: f32) -> Result<(), Rejection> {
    if !value.is_finite() {
        return Err(Rejection::InvalidSensitivity(value));
    }
    state.sensitivity = value.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX);
    Ok(())
}

/// Rotate the camera by a pointer drag.
pub fn aim_delta(state: &mut GameState, dx: f32, dy: f32) {
    let scale = AIM_RADIANS_PER_PIXEL * state.sensitivity;
    state.aim.apply_delta(dx, dy, scale);
}
