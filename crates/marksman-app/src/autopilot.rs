//! Scripted player for headless demo sessions.
//!
//! Each tick the autopilot looks at the latest snapshot and emits the
//! commands a simple player would: start a session, spend currency on
//! upgrades and new weapons, snap the aim to the nearest target, and
//! pull the trigger.

use glam::Vec3;

use marksman_core::commands::PlayerCommand;
use marksman_core::enums::GamePhase;
use marksman_core::state::{GameStateSnapshot, TargetView};
use marksman_core::weapons::WeaponCatalog;

/// Camera eye position the aim is computed from.
fn eye() -> Vec3 {
    Vec3::new(0.0, marksman_core::constants::CAMERA_HEIGHT, 0.0)
}

/// Yaw and pitch that point the camera from `from` at `to`.
pub fn aim_at(from: Vec3, to: Vec3) -> (f32, f32) {
    let d = to - from;
    let yaw = (-d.x).atan2(-d.z);
    let pitch = d.y.atan2((d.x * d.x + d.z * d.z).sqrt());
    (yaw, pitch)
}

/// The live target closest to the player.
pub fn nearest_target(targets: &[TargetView]) -> Option<&TargetView> {
    let eye = eye();
    targets
        .iter()
        .min_by(|a, b| {
            eye.distance_squared(a.position.0)
                .total_cmp(&eye.distance_squared(b.position.0))
        })
}

pub struct Autopilot {
    catalog: WeaponCatalog,
    /// Spend currency in the armory between waves.
    shop: bool,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            catalog: WeaponCatalog::standard(),
            shop: true,
        }
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable buying and upgrading weapons.
    pub fn with_shop(mut self, shop: bool) -> Self {
        self.shop = shop;
        self
    }

    /// Commands for the next tick.
    pub fn plan(&self, snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
        if snapshot.phase == GamePhase::MainMenu {
            return vec![PlayerCommand::StartGame];
        }
        if snapshot.hud.menu_open {
            return vec![PlayerCommand::CloseMenu];
        }

        let mut commands = Vec::new();
        if self.shop {
            commands.extend(self.shopping(snapshot));
        }

        let hud = &snapshot.hud;
        if hud.ammo == 0 && !hud.reloading {
            commands.push(PlayerCommand::Reload);
        }

        if let Some(target) = nearest_target(&snapshot.targets) {
            let (yaw, pitch) = aim_at(eye(), target.position.0);
            commands.push(PlayerCommand::Aim { yaw, pitch });
            if hud.ammo > 0 && !hud.reloading {
                commands.push(PlayerCommand::Fire);
            }
        }
        commands
    }

    /// Buy the cheapest affordable weapon not yet owned, otherwise upgrade
    /// the equipped one. At most one purchase per tick.
    fn shopping(&self, snapshot: &GameStateSnapshot) -> Option<PlayerCommand> {
        let currency = snapshot.hud.currency;
        let owned = |id: &str| snapshot.unlocked_weapons.iter().any(|w| w.id == id);

        let purchase = self
            .catalog
            .iter()
            .filter(|w| !owned(w.id.as_str()) && w.cost <= currency)
            .min_by_key(|w| w.cost);
        if let Some(weapon) = purchase {
            return Some(PlayerCommand::PurchaseWeapon {
                weapon_id: weapon.id.clone(),
            });
        }

        let upgrade_cost = snapshot.weapon.as_ref()?.upgrade_cost;
        (upgrade_cost <= currency).then_some(PlayerCommand::UpgradeWeapon)
    }
}
