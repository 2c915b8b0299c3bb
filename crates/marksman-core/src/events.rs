//! Events emitted by the simulation for presentation and audio.
//!
//! Fire-and-forget: the simulation never reads them back.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::TargetId;
use crate::state::TargetView;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A target entered the playfield; add its visual.
    TargetSpawned { target: TargetView },
    /// A target left the playfield; remove its visual.
    TargetRemoved { id: TargetId },
    /// Muzzle flash / tracer.
    ShotFired { origin: Vec3, direction: Vec3 },
    /// Impact burst at the hit point.
    TargetHit { impact_point: Vec3, color: u32 },
    /// A target was destroyed and paid out.
    TargetDestroyed {
        id: TargetId,
        reward: u64,
        combo: u32,
        multiplier: u32,
    },
    ReloadStarted { duration_secs: f64 },
    ReloadFinished,
    BulletTimeStarted,
    BulletTimeEnded,
    WaveCleared { wave: u32 },
    WaveStarted { wave: u32, target_count: u32 },
    WeaponSwitched { weapon_id: String },
    WeaponPurchased { weapon_id: String, cost: u64 },
    WeaponUpgraded { weapon_id: String, level: u32, cost: u64 },
}
