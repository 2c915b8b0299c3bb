//! The session aggregate and the snapshot read model sent to the frontend.

use serde::{Deserialize, Serialize};

use crate::components::TargetId;
use crate::constants::*;
use crate::enums::*;
use crate::environments::EnvironmentConfig;
use crate::events::GameEvent;
use crate::types::{Aim, Position, SimTime, Velocity};
use crate::weapons::WeaponStats;

/// All mutable progression state of one session.
///
/// Owned by the simulation engine; every command and deferred action
/// mutates it through explicit transition functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    /// Consecutive kills inside the combo window.
    pub combo: u32,
    /// Seconds left before the combo resets.
    pub combo_timer: f64,
    pub combo_multiplier: u32,
    pub bullet_time_active: bool,
    /// Charge meter in [0, 100].
    pub bullet_time_charge: f64,
    /// Index into `unlocked_weapons`.
    pub current_weapon: usize,
    /// Owned weapons in unlock order, unique by id.
    pub unlocked_weapons: Vec<WeaponStats>,
    pub currency: u64,
    pub wave: u32,
    /// Number of live targets.
    pub targets_remaining: u32,
    pub ammo: u32,
    pub reloading: bool,
    /// Aim sensitivity (player preference).
    pub sensitivity: f32,
    pub aim: Aim,
    /// Armory menu open; firing is blocked while set.
    pub menu_open: bool,
    /// Real session time of the last accepted shot (milliseconds).
    pub last_shot_ms: Option<f64>,
}

impl GameState {
    /// Fresh session state holding only the starting weapon, fully loaded.
    pub fn new(starting_weapon: WeaponStats) -> Self {
        let ammo = starting_weapon.magazine_size;
        Self {
            score: 0,
            combo: 0,
            combo_timer: 0.0,
            combo_multiplier: 1,
            bullet_time_active: false,
            bullet_time_charge: 0.0,
            current_weapon: 0,
            unlocked_weapons: vec![starting_weapon],
            currency: 0,
            wave: 1,
            targets_remaining: 0,
            ammo,
            reloading: false,
            sensitivity: SENSITIVITY_DEFAULT,
            aim: Aim::default(),
            menu_open: false,
            last_shot_ms: None,
        }
    }

    /// The equipped weapon.
    pub fn weapon(&self) -> &WeaponStats {
        &self.unlocked_weapons[self.current_weapon]
    }

    /// Whether a weapon with this id has been unlocked.
    pub fn owns(&self, weapon_id: &str) -> bool {
        self.unlocked_weapons.iter().any(|w| w.id == weapon_id)
    }

    /// Time dilation applied to target motion.
    pub fn time_scale(&self) -> f64 {
        if self.bullet_time_active {
            BULLET_TIME_SCALE
        } else {
            1.0
        }
    }
}

/// Score multiplier for a combo length: one step per five kills, capped.
pub fn combo_multiplier(combo: u32) -> u32 {
    (combo / COMBO_KILLS_PER_STEP + 1).min(COMBO_MULTIPLIER_MAX)
}

/// Complete game state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub environment: Option<EnvironmentConfig>,
    pub hud: HudView,
    pub weapon: Option<WeaponView>,
    pub unlocked_weapons: Vec<WeaponStats>,
    pub targets: Vec<TargetView>,
    pub events: Vec<GameEvent>,
}

/// Numbers shown on the heads-up display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HudView {
    pub score: u64,
    pub combo: u32,
    pub combo_timer: f64,
    pub combo_multiplier: u32,
    pub bullet_time_active: bool,
    pub bullet_time_charge: f64,
    pub currency: u64,
    pub wave: u32,
    pub targets_remaining: u32,
    pub ammo: u32,
    pub reloading: bool,
    pub sensitivity: f32,
    pub aim: Aim,
    pub menu_open: bool,
}

/// The equipped weapon plus its next upgrade price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponView {
    pub stats: WeaponStats,
    pub upgrade_cost: u64,
}

/// A live target on the playfield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub id: TargetId,
    pub position: Position,
    pub velocity: Velocity,
    pub pattern: MovementPattern,
    pub points: u32,
    pub health: i32,
    pub max_health: i32,
    pub color: u32,
}
