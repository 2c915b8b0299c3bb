//! Weapon archetypes and the upgrade/cost formulas.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::WeaponKind;
use crate::error::CatalogError;

/// Stats of one weapon at one upgrade level. Never mutated in place:
/// upgrading produces a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub id: String,
    pub name: String,
    pub damage: u32,
    /// Minimum time between shots (milliseconds).
    pub fire_rate_ms: f64,
    /// Reload duration (seconds).
    pub reload_secs: f64,
    /// Aim accuracy in [0, 1]. Spread shrinks as it grows.
    pub accuracy: f64,
    pub magazine_size: u32,
    pub kind: WeaponKind,
    pub level: u32,
    /// Purchase price at catalog level.
    pub cost: u64,
}

impl WeaponStats {
    /// Angular perturbation applied to each shot.
    pub fn spread(&self) -> f32 {
        (1.0 - self.accuracy as f32) * SPREAD_FACTOR
    }
}

/// The purchasable weapon archetypes, all at level 1.
#[derive(Debug, Clone)]
pub struct WeaponCatalog {
    weapons: Vec<WeaponStats>,
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl WeaponCatalog {
    /// The four stock weapons, cheapest first.
    pub fn standard() -> Self {
        Self {
            weapons: vec![
                base_weapon("pistol_basic", "Pistol", 25, 300.0, 1.5, 0.95, 12, WeaponKind::Pistol, 0),
                base_weapon("smg_basic", "SMG", 15, 100.0, 2.0, 0.85, 30, WeaponKind::Smg, 500),
                base_weapon("shotgun_basic", "Shotgun", 60, 800.0, 2.5, 0.7, 6, WeaponKind::Shotgun, 750),
                base_weapon("rifle_basic", "Rifle", 40, 150.0, 2.2, 0.98, 20, WeaponKind::Rifle, 1000),
            ],
        }
    }

    /// Look up an archetype by id.
    pub fn get(&self, id: &str) -> Result<&WeaponStats, CatalogError> {
        self.weapons
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| CatalogError::UnknownWeapon(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeaponStats> {
        self.weapons.iter()
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn base_weapon(
    id: &str,
    name: &str,
    damage: u32,
    fire_rate_ms: f64,
    reload_secs: f64,
    accuracy: f64,
    magazine_size: u32,
    kind: WeaponKind,
    cost: u64,
) -> WeaponStats {
    WeaponStats {
        id: id.to_string(),
        name: name.to_string(),
        damage,
        fire_rate_ms,
        reload_secs,
        accuracy,
        magazine_size,
        kind,
        level: 1,
        cost,
    }
}

/// Produce the next level of a weapon.
///
/// Fire rate, reload and accuracy saturate at their floors/ceiling;
/// damage and level always grow.
pub fn upgrade_weapon(weapon: &WeaponStats) -> WeaponStats {
    WeaponStats {
        level: weapon.level + 1,
        damage: (weapon.damage as f64 * UPGRADE_DAMAGE_FACTOR).floor() as u32,
        fire_rate_ms: (weapon.fire_rate_ms * UPGRADE_FIRE_RATE_FACTOR).max(MIN_FIRE_RATE_MS),
        reload_secs: (weapon.reload_secs * UPGRADE_RELOAD_FACTOR).max(MIN_RELOAD_SECS),
        accuracy: (weapon.accuracy + UPGRADE_ACCURACY_STEP).min(MAX_ACCURACY),
        cost: (weapon.cost as f64 * UPGRADE_COST_FACTOR).floor() as u64,
        ..weapon.clone()
    }
}

/// Price of the next upgrade. Scales with level only, not with the
/// weapon's purchase cost.
pub fn upgrade_cost(weapon: &WeaponStats) -> u64 {
    weapon.level as u64 * UPGRADE_COST_PER_LEVEL
}
