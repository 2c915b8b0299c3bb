//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.
//! Commands whose preconditions fail are ignored.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Session ---
    /// Start a new session, discarding any running one.
    StartGame,

    // --- Combat ---
    /// Pull the trigger once.
    Fire,
    /// Start reloading the equipped weapon.
    Reload,
    /// Point the camera (radians).
    Aim { yaw: f32, pitch: f32 },
    /// Rotate the camera by a pointer drag (pixels).
    AimDelta { dx: f32, dy: f32 },

    // --- Armory ---
    /// Equip the next unlocked weapon.
    CycleWeapon,
    /// Buy a weapon from the catalog.
    PurchaseWeapon { weapon_id: String },
    /// Upgrade the equipped weapon by one level.
    UpgradeWeapon,

    // --- Settings / UI ---
    SetSensitivity { value: f32 },
    OpenMenu,
    CloseMenu,
}
